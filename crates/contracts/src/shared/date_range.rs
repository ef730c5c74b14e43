use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `start_date` / `end_date` query shared by the analytics API and the sales
/// export endpoints. Dates travel as `YYYY-MM-DD`; absent bounds are omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl DateRangeQuery {
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Build from raw `<input type="date">` values. Blank or malformed values
    /// are treated as an open bound.
    pub fn from_inputs(start: &str, end: &str) -> Self {
        Self {
            start_date: parse_iso(start),
            end_date: parse_iso(end),
        }
    }
}

fn parse_iso(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_inputs_parses_iso_dates() {
        let q = DateRangeQuery::from_inputs("2025-01-01", " 2025-01-31 ");
        assert_eq!(q.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(q.end_date, NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn test_blank_and_garbage_are_open_bounds() {
        let q = DateRangeQuery::from_inputs("", "31/01/2025");
        assert_eq!(q, DateRangeQuery::default());
    }
}
