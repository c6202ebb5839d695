use serde::{Deserialize, Serialize};

use super::synthetic::{synthetic_records, SYNTHETIC_COUNT};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub content: String,
}

impl Record {
    /// One-based label shown on the record card.
    pub fn label(&self) -> String {
        format!("#{}", i128::from(self.id) + 1)
    }
}

/// Where a collection came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Remote,
    Synthetic,
}

/// Records for one render of the records view. Built fresh on every fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordCollection {
    pub records: Vec<Record>,
    pub provenance: Provenance,
}

impl RecordCollection {
    pub fn remote(records: Vec<Record>) -> Self {
        Self { records, provenance: Provenance::Remote }
    }

    pub fn synthetic() -> Self {
        Self { records: synthetic_records(SYNTHETIC_COUNT), provenance: Provenance::Synthetic }
    }

    pub fn is_synthetic(&self) -> bool {
        self.provenance == Provenance::Synthetic
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
