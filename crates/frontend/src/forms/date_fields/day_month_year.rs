use super::{DateNormalizer, SubmitStrategy, ValidationOutcome};
use crate::shared::date_utils::{days_in_month, ddmmyyyy_to_iso, digits_only, iso_to_ddmmyyyy};
use chrono::NaiveDate;

/// Full dates typed as eight digits, `DDMMYYYY`
pub struct DayMonthYear;

/// Day, month and year ranges plus the real length of the month.
pub fn is_valid_ddmmyyyy(value: &str) -> bool {
    if value.len() != 8 || !value.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let day: u32 = value[0..2].parse().unwrap_or(0);
    let month: u32 = value[2..4].parse().unwrap_or(0);
    let year: i32 = value[4..8].parse().unwrap_or(0);

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || !(1900..=2100).contains(&year) {
        return false;
    }
    days_in_month(year, month).is_some_and(|max| day <= max)
}

impl DateNormalizer for DayMonthYear {
    fn placeholder(&self) -> &'static str {
        "DDMMYYYY"
    }

    fn max_length(&self) -> u32 {
        8
    }

    fn format(&self, raw: &str) -> String {
        digits_only(raw, 8)
    }

    fn validate(&self, display: &str) -> ValidationOutcome {
        if display.is_empty() || is_valid_ddmmyyyy(display) {
            ValidationOutcome::ok()
        } else {
            ValidationOutcome::invalid("Please enter a valid date in DDMMYYYY format")
        }
    }

    fn canonical(&self, display: &str, _today: NaiveDate) -> Option<String> {
        if is_valid_ddmmyyyy(display) {
            ddmmyyyy_to_iso(display)
        } else {
            None
        }
    }

    fn display_from_server(&self, value: &str) -> Option<String> {
        iso_to_ddmmyyyy(value.trim())
    }

    fn validates_while_typing(&self) -> bool {
        true
    }

    fn is_complete(&self, display: &str) -> bool {
        display.len() == 8
    }

    fn partial_hint(&self) -> Option<&'static str> {
        Some("Enter 8 digits (DDMMYYYY)")
    }

    fn submit_strategy(&self) -> SubmitStrategy {
        SubmitStrategy::HiddenCompanion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_day() {
        assert!(is_valid_ddmmyyyy("29022024"));
        assert!(!is_valid_ddmmyyyy("29022023"));
        assert!(is_valid_ddmmyyyy("29022000"));
        assert!(!is_valid_ddmmyyyy("29021900"));
    }

    #[test]
    fn test_ranges() {
        assert!(is_valid_ddmmyyyy("31122100"));
        assert!(!is_valid_ddmmyyyy("01012101"));
        assert!(!is_valid_ddmmyyyy("01011899"));
        assert!(!is_valid_ddmmyyyy("00012024"));
        assert!(!is_valid_ddmmyyyy("01132024"));
        assert!(!is_valid_ddmmyyyy("31042024"));
        assert!(!is_valid_ddmmyyyy("1503202"));
    }

    #[test]
    fn test_format_strips_and_truncates() {
        assert_eq!(DayMonthYear.format("15/03/2024"), "15032024");
        assert_eq!(DayMonthYear.format("150320245"), "15032024");
    }

    #[test]
    fn test_canonical() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            DayMonthYear.canonical("15032024", today).as_deref(),
            Some("2024-03-15")
        );
        assert_eq!(DayMonthYear.canonical("150320", today), None);
        assert_eq!(DayMonthYear.canonical("29022023", today), None);
    }

    #[test]
    fn test_server_value_shown_as_digits() {
        assert_eq!(
            DayMonthYear.display_from_server("2024-03-15").as_deref(),
            Some("15032024")
        );
        assert_eq!(DayMonthYear.display_from_server("15032024"), None);
    }
}
