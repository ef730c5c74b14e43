//! Number formatting for totals and KPI cards

/// Fixed decimals without grouping, as written into form inputs.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_fixed(45.0, 2), "45.00");
/// ```
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let formatted = format!("{:.*}", decimals, value);
    // "-0.00" reads badly in a total field
    if formatted.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        formatted.trim_start_matches('-').to_string()
    } else {
        formatted
    }
}

/// Money value written into totals: 2 decimals.
pub fn format_money(value: f64) -> String {
    format_fixed(value, 2)
}

/// Group an unsigned integer string the Indian way: the last three digits,
/// then pairs. Example: "12345678" -> "1,23,45,678"
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Integer with Indian digit grouping.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_number_in(1234567.0), "12,34,567");
/// ```
pub fn format_number_in(value: f64) -> String {
    let rounded = format_fixed(value.round(), 0);
    match rounded.strip_prefix('-') {
        Some(digits) => format!("-{}", group_indian(digits)),
        None => group_indian(&rounded),
    }
}

/// Rupee amount with no decimals, e.g. "₹1,23,456".
pub fn format_inr(value: f64) -> String {
    let grouped = format_number_in(value);
    match grouped.strip_prefix('-') {
        Some(digits) => format!("-₹{}", digits),
        None => format!("₹{}", grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(45.0), "45.00");
        assert_eq!(format_money(1234.567), "1234.57");
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(-0.001), "0.00");
        assert_eq!(format_money(f64::NAN), "0.00");
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_number_in(0.0), "0");
        assert_eq!(format_number_in(999.0), "999");
        assert_eq!(format_number_in(1000.0), "1,000");
        assert_eq!(format_number_in(123456.0), "1,23,456");
        assert_eq!(format_number_in(12345678.0), "1,23,45,678");
        assert_eq!(format_number_in(-123456.0), "-1,23,456");
    }

    #[test]
    fn test_format_inr_rounds_to_rupees() {
        assert_eq!(format_inr(123456.6), "₹1,23,457");
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(-1500.0), "-₹1,500");
    }
}
