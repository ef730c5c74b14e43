//! Lenient numeric fields.
//!
//! The server serializes Django `Decimal` aggregates either as JSON numbers or
//! as strings (`"1234.50"`), and empty aggregates as `null`. Amount fields use
//! [`de_amount`] so every variant lands in an `f64`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// Deserialize a number, numeric string or `null` into `f64` (`null` and
/// unparsable strings become `0.0`).
pub fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Number(n)) => n,
        Some(RawAmount::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        None => 0.0,
    })
}

/// Same as [`de_amount`] but keeps the difference between "absent" and zero.
pub fn de_opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Number(n)) => Some(n),
        Some(RawAmount::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "de_amount")]
        amount: f64,
        #[serde(default, deserialize_with = "de_opt_amount")]
        rate: Option<f64>,
    }

    #[test]
    fn test_amount_accepts_number_string_and_null() {
        let row: Row = serde_json::from_str(r#"{"amount": 12.5, "rate": "3.25"}"#).unwrap();
        assert_eq!(row.amount, 12.5);
        assert_eq!(row.rate, Some(3.25));

        let row: Row = serde_json::from_str(r#"{"amount": "1500.00", "rate": null}"#).unwrap();
        assert_eq!(row.amount, 1500.0);
        assert_eq!(row.rate, None);
    }

    #[test]
    fn test_missing_amount_defaults_to_zero() {
        let row: Row = serde_json::from_str("{}").unwrap();
        assert_eq!(row.amount, 0.0);
        assert_eq!(row.rate, None);
    }
}
