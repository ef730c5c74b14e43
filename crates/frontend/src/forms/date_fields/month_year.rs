use super::{DateNormalizer, ValidationOutcome};
use crate::shared::date_utils::digits_only;
use chrono::NaiveDate;

pub const MIN_YEAR: u32 = 2020;
pub const MAX_YEAR: u32 = 2050;

/// Expiry dates in `MM-YYYY`
pub struct MonthYear;

/// Clamp a two-digit month: above 12 becomes 12, `00` becomes `01`.
fn clamp_month(month: &str) -> String {
    match month.parse::<u32>() {
        Ok(m) if m > 12 => "12".to_string(),
        Ok(0) => "01".to_string(),
        _ => month.to_string(),
    }
}

impl DateNormalizer for MonthYear {
    fn placeholder(&self) -> &'static str {
        "MM-YYYY"
    }

    fn max_length(&self) -> u32 {
        7
    }

    fn format(&self, raw: &str) -> String {
        let digits = digits_only(raw, 6);
        if digits.len() < 2 {
            return digits;
        }
        let month = clamp_month(&digits[..2]);
        let year = &digits[2..];
        if year.is_empty() {
            month
        } else {
            format!("{}-{}", month, year)
        }
    }

    /// `MMYY` becomes `MM-20YY`.
    fn finalize(&self, display: &str) -> String {
        let digits = digits_only(display, 6);
        if digits.len() == 4 {
            format!("{}-20{}", clamp_month(&digits[..2]), &digits[2..])
        } else {
            display.to_string()
        }
    }

    fn validate(&self, display: &str) -> ValidationOutcome {
        if display.is_empty() {
            return ValidationOutcome::ok();
        }

        let Some((month, year)) = display.split_once('-') else {
            return ValidationOutcome::invalid(
                "Please enter expiry in MM-YYYY format (e.g., 12-2025)",
            );
        };
        let well_formed = month.len() == 2
            && year.len() == 4
            && month.chars().chain(year.chars()).all(|c| c.is_ascii_digit());
        if !well_formed {
            return ValidationOutcome::invalid(
                "Please enter expiry in MM-YYYY format (e.g., 12-2025)",
            );
        }

        let month: u32 = month.parse().unwrap_or(0);
        if !(1..=12).contains(&month) {
            return ValidationOutcome::invalid("Invalid month. Use 01-12.");
        }
        let year: u32 = year.parse().unwrap_or(0);
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return ValidationOutcome::invalid("Invalid year. Use a year between 2020-2050.");
        }

        ValidationOutcome::ok()
    }

    fn canonical(&self, display: &str, _today: NaiveDate) -> Option<String> {
        if display.is_empty() || !self.validate(display).valid {
            return None;
        }
        Some(display.to_string())
    }

    /// Expiry is already stored as `MM-YYYY`; ISO dates are folded to it.
    fn display_from_server(&self, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if let Some((year, month, _)) = crate::shared::date_utils::split_iso(value) {
            return Some(format!("{}-{}", month, year));
        }
        Some(self.format(value))
    }

    fn is_complete(&self, display: &str) -> bool {
        display.len() == 7
    }

    fn digits_only(&self) -> bool {
        false
    }

    fn enter_advances(&self) -> bool {
        true
    }

    fn uses_custom_validity(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_groups_and_clamps_month() {
        assert_eq!(MonthYear.format("1"), "1");
        assert_eq!(MonthYear.format("12"), "12");
        assert_eq!(MonthYear.format("122"), "12-2");
        assert_eq!(MonthYear.format("122025"), "12-2025");
        assert_eq!(MonthYear.format("1520251"), "12-2025");
        assert_eq!(MonthYear.format("00"), "01");
        assert_eq!(MonthYear.format("12/2025"), "12-2025");
    }

    #[test]
    fn test_finalize_expands_short_year() {
        assert_eq!(MonthYear.finalize("03-27"), "03-2027");
        assert_eq!(MonthYear.finalize("03-2027"), "03-2027");
        assert_eq!(MonthYear.finalize(""), "");
    }

    #[test]
    fn test_validate() {
        assert!(MonthYear.validate("12-2025").valid);
        assert!(MonthYear.validate("").valid);
        assert!(!MonthYear.validate("13-2025").valid);
        assert!(!MonthYear.validate("12-2019").valid);
        assert!(!MonthYear.validate("12-2051").valid);
        assert_eq!(
            MonthYear.validate("1-2025").message,
            "Please enter expiry in MM-YYYY format (e.g., 12-2025)"
        );
        assert_eq!(MonthYear.validate("00-2025").message, "Invalid month. Use 01-12.");
        assert_eq!(
            MonthYear.validate("12-2019").message,
            "Invalid year. Use a year between 2020-2050."
        );
    }

    #[test]
    fn test_canonical_keeps_month_year() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(MonthYear.canonical("12-2025", today).as_deref(), Some("12-2025"));
        assert_eq!(MonthYear.canonical("", today), None);
        assert_eq!(MonthYear.canonical("12-20", today), None);
    }

    #[test]
    fn test_display_from_server() {
        assert_eq!(MonthYear.display_from_server("2026-04-30").as_deref(), Some("04-2026"));
        assert_eq!(MonthYear.display_from_server("04-2026").as_deref(), Some("04-2026"));
        assert_eq!(MonthYear.display_from_server(""), None);
    }
}
