use super::{DateNormalizer, ValidationOutcome};
use crate::shared::date_utils::{ddmmyyyy_to_iso, digits_only, iso_to_dashed, split_iso};
use chrono::NaiveDate;

/// Free-form field accepting `YYYY-MM-DD` or eight digits read as `DDMMYYYY`.
/// Separators are ignored in the digit form, so `15-03-2024` also works.
pub struct Flexible;

/// Shape-only conversion to ISO; day-of-month is not checked.
pub fn to_iso(value: &str) -> Option<String> {
    let value = value.trim();
    if let Some((year, month, day)) = split_iso(value) {
        return Some(format!("{}-{}-{}", year, month, day));
    }
    let digits = digits_only(value, usize::MAX);
    ddmmyyyy_to_iso(&digits)
}

impl DateNormalizer for Flexible {
    fn placeholder(&self) -> &'static str {
        "DD-MM-YYYY"
    }

    fn max_length(&self) -> u32 {
        10
    }

    fn format(&self, raw: &str) -> String {
        raw.chars()
            .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '/')
            .take(10)
            .collect()
    }

    fn validate(&self, display: &str) -> ValidationOutcome {
        if display.is_empty() || to_iso(display).is_some() {
            ValidationOutcome::ok()
        } else {
            ValidationOutcome::invalid("Use DD-MM-YYYY, DDMMYYYY or YYYY-MM-DD")
        }
    }

    fn canonical(&self, display: &str, _today: NaiveDate) -> Option<String> {
        to_iso(display)
    }

    fn display_from_server(&self, value: &str) -> Option<String> {
        iso_to_dashed(value.trim())
    }

    fn is_complete(&self, display: &str) -> bool {
        to_iso(display).is_some()
    }

    fn digits_only(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_iso_accepts_both_shapes() {
        assert_eq!(to_iso("2024-03-15").as_deref(), Some("2024-03-15"));
        assert_eq!(to_iso("15032024").as_deref(), Some("2024-03-15"));
        assert_eq!(to_iso("15-03-2024").as_deref(), Some("2024-03-15"));
        assert_eq!(to_iso("15/03/2024").as_deref(), Some("2024-03-15"));
        assert_eq!(to_iso("1503"), None);
    }

    #[test]
    fn test_day_of_month_not_checked() {
        assert_eq!(to_iso("31022024").as_deref(), Some("2024-02-31"));
        assert!(Flexible.validate("31-02-2024").valid);
    }

    #[test]
    fn test_format_mask() {
        assert_eq!(Flexible.format("15-03-2024abc"), "15-03-2024");
        assert_eq!(Flexible.format("15/03/20245"), "15/03/2024");
    }

    #[test]
    fn test_server_iso_shown_dashed() {
        assert_eq!(Flexible.display_from_server("2024-03-15").as_deref(), Some("15-03-2024"));
    }
}
