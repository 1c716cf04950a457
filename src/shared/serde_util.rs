//! Custom serde helpers for backend wire formats.

/// Parses backend timestamps into `DateTime<Utc>`.
///
/// The backend emits ISO 8601 strings, with an offset when the column is
/// timezone-aware and without one otherwise. Naive values are taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::timestamp;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let at = timestamp::parse("2025-01-02T03:04:05+02:00").unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2025, 1, 2, 1, 4, 5).unwrap());
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let at = timestamp::parse("2025-01-02T03:04:05.123456").unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-01-02 03:04:05");
        assert!(timestamp::parse("2025-01-02 03:04:05").is_some());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(timestamp::parse("yesterday").is_none());
    }
}
