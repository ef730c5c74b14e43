/// Date string helpers shared by the date field variants
///
/// All conversions are purely textual apart from `days_in_month`, which
/// relies on chrono's calendar.
use chrono::NaiveDate;

/// Keep only ASCII digits, truncated to `max` characters.
pub fn digits_only(raw: &str, max: usize) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).take(max).collect()
}

/// Number of days in `month` of `year`; `None` for an invalid month or year.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Split a strict `YYYY-MM-DD` string into its parts.
/// Example: "2024-03-15" -> Some(("2024", "03", "15"))
pub fn split_iso(value: &str) -> Option<(&str, &str, &str)> {
    let value = value.split('T').next().unwrap_or(value);
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let (year, month, day) = (&value[0..4], &value[5..7], &value[8..10]);
    if [year, month, day]
        .iter()
        .all(|part| part.chars().all(|c| c.is_ascii_digit()))
    {
        Some((year, month, day))
    } else {
        None
    }
}

/// Example: "2024-03-15" -> "15032024"
pub fn iso_to_ddmmyyyy(iso: &str) -> Option<String> {
    let (year, month, day) = split_iso(iso)?;
    Some(format!("{}{}{}", day, month, year))
}

/// Example: "2024-03-15" -> "1503"
pub fn iso_to_ddmm(iso: &str) -> Option<String> {
    let (_, month, day) = split_iso(iso)?;
    Some(format!("{}{}", day, month))
}

/// Example: "2024-03-15" -> "15-03-2024"
pub fn iso_to_dashed(iso: &str) -> Option<String> {
    let (year, month, day) = split_iso(iso)?;
    Some(format!("{}-{}-{}", day, month, year))
}

/// Example: "2024-03-15" -> "15/03/2024"
pub fn iso_to_slashed(iso: &str) -> Option<String> {
    let (year, month, day) = split_iso(iso)?;
    Some(format!("{}/{}/{}", day, month, year))
}

/// Example: "15032024" -> "2024-03-15". Only the shape is checked.
pub fn ddmmyyyy_to_iso(digits: &str) -> Option<String> {
    if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}-{}-{}", &digits[4..8], &digits[2..4], &digits[0..2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("12/03-2024x", 8), "12032024");
        assert_eq!(digits_only("1234567890", 4), "1234");
        assert_eq!(digits_only("abc", 4), "");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 4), Some(30));
        assert_eq!(days_in_month(2025, 13), None);
    }

    #[test]
    fn test_iso_conversions() {
        assert_eq!(iso_to_ddmmyyyy("2024-03-15").as_deref(), Some("15032024"));
        assert_eq!(iso_to_ddmm("2024-03-15").as_deref(), Some("1503"));
        assert_eq!(iso_to_dashed("2024-03-15T10:00:00").as_deref(), Some("15-03-2024"));
        assert_eq!(iso_to_slashed("2024-03-15").as_deref(), Some("15/03/2024"));
        assert_eq!(ddmmyyyy_to_iso("15032024").as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(split_iso("15-03-2024"), None);
        assert_eq!(iso_to_ddmm("invalid"), None);
        assert_eq!(ddmmyyyy_to_iso("1503202"), None);
    }
}
