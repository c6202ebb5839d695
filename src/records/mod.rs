//! User-scoped conversation records and the fetcher that retrieves them.

mod model;
mod synthetic;
mod fetcher;

pub use model::{Provenance, Record, RecordCollection};
pub use synthetic::{synthetic_record, synthetic_records, SYNTHETIC_COUNT, SYNTHETIC_DATE};
pub use fetcher::{parse_records, FetchError, RecordFetcher, RECORDS_PATH};
