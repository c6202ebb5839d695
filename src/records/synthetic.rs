//! Placeholder records used when the records API cannot be reached.

use super::model::Record;

pub const SYNTHETIC_DATE: &str = "2026-01-18";
pub const SYNTHETIC_COUNT: usize = 1;

/// Deterministic placeholder at index `i`.
pub fn synthetic_record(i: usize) -> Record {
    let minutes = (i * 10) % 60;
    let minutes = if minutes == 0 { "00".to_string() } else { minutes.to_string() };
    Record {
        id: i as i64,
        date: SYNTHETIC_DATE.to_string(),
        time: format!("{}:{}", 10 + i / 3, minutes),
        content: format!(
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Conversation update #{} regarding the automation flow.",
            i + 1
        ),
    }
}

pub fn synthetic_records(count: usize) -> Vec<Record> {
    (0..count).map(synthetic_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_placeholder_is_fixed() {
        let r = synthetic_record(0);
        assert_eq!(r.id, 0);
        assert_eq!(r.date, "2026-01-18");
        assert_eq!(r.time, "10:00");
        assert!(r.content.ends_with("Conversation update #1 regarding the automation flow."));
        assert_eq!(r.label(), "#1");
    }

    #[test]
    fn time_formula_advances_hour_every_three() {
        assert_eq!(synthetic_record(1).time, "10:10");
        assert_eq!(synthetic_record(3).time, "11:30");
        assert_eq!(synthetic_record(6).time, "12:00");
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(synthetic_records(SYNTHETIC_COUNT), synthetic_records(SYNTHETIC_COUNT));
        assert_eq!(synthetic_records(SYNTHETIC_COUNT).len(), 1);
    }
}
