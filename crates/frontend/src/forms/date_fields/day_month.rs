use super::{DateNormalizer, ValidationOutcome};
use crate::shared::date_utils::{digits_only, iso_to_ddmm};
use chrono::{Datelike, NaiveDate};

/// Day and month typed as `DDMM`; the year is filled in on blur.
pub struct DayMonth;

fn parts(display: &str) -> Option<(u32, u32)> {
    if display.len() != 4 || !display.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let day = display[0..2].parse().ok()?;
    let month = display[2..4].parse().ok()?;
    Some((day, month))
}

impl DateNormalizer for DayMonth {
    fn placeholder(&self) -> &'static str {
        "DDMM"
    }

    fn max_length(&self) -> u32 {
        4
    }

    fn format(&self, raw: &str) -> String {
        digits_only(raw, 4)
    }

    /// Ranges only; the month length is unknown until a year is chosen.
    fn validate(&self, display: &str) -> ValidationOutcome {
        if display.is_empty() {
            return ValidationOutcome::ok();
        }
        match parts(display) {
            Some((day, month)) if (1..=31).contains(&day) && (1..=12).contains(&month) => {
                ValidationOutcome::ok()
            }
            Some(_) => ValidationOutcome::invalid("Invalid date format"),
            None => ValidationOutcome::invalid("Enter 4 digits (DDMM)"),
        }
    }

    /// Also rejects days that do not exist in `today`'s year, e.g. 3102.
    fn validate_on(&self, display: &str, today: NaiveDate) -> ValidationOutcome {
        let outcome = self.validate(display);
        if !outcome.valid || display.is_empty() {
            return outcome;
        }
        match self.canonical(display, today) {
            Some(_) => outcome,
            None => ValidationOutcome::invalid("Invalid date format"),
        }
    }

    fn canonical(&self, display: &str, today: NaiveDate) -> Option<String> {
        let (day, month) = parts(display)?;
        let date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
        Some(date.format("%Y-%m-%d").to_string())
    }

    fn display_from_server(&self, value: &str) -> Option<String> {
        iso_to_ddmm(value.trim())
    }

    fn is_complete(&self, display: &str) -> bool {
        display.len() == 4
    }

    /// Example: "1503" in 2025 -> "Date: 15/03/2025"
    fn confirmation(&self, display: &str, today: NaiveDate) -> Option<String> {
        let (day, month) = parts(display)?;
        Some(format!("Date: {:02}/{:02}/{}", day, month, today.year()))
    }

    fn partial_hint(&self) -> Option<&'static str> {
        Some("Enter 4 digits (DDMM)")
    }
}
