use crate::shared::amount::{de_amount, de_opt_amount};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Query for `GET /api/product-info/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfoQuery {
    pub product_id: String,
}

/// Response of `GET /api/product-info/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfoResponse {
    pub success: bool,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_company: String,
    #[serde(default)]
    pub product_packing: String,
    #[serde(rename = "rate_A", default, deserialize_with = "de_opt_amount")]
    pub rate_a: Option<f64>,
    #[serde(rename = "rate_B", default, deserialize_with = "de_opt_amount")]
    pub rate_b: Option<f64>,
    #[serde(rename = "rate_C", default, deserialize_with = "de_opt_amount")]
    pub rate_c: Option<f64>,
}

/// Price tier selected in the sales form (`#id_rate_applied`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateTier {
    A,
    B,
    C,
    Custom,
}

impl FromStr for RateTier {
    type Err = String;

    /// Option values of `#id_rate_applied`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RateTier::A),
            "B" => Ok(RateTier::B),
            "C" => Ok(RateTier::C),
            "custom" => Ok(RateTier::Custom),
            other => Err(format!("Unknown rate tier: {}", other)),
        }
    }
}

impl ProductInfoResponse {
    /// Rate for the given tier; `Custom` is entered by hand.
    pub fn rate_for(&self, tier: RateTier) -> Option<f64> {
        match tier {
            RateTier::A => self.rate_a,
            RateTier::B => self.rate_b,
            RateTier::C => self.rate_c,
            RateTier::Custom => None,
        }
    }
}

/// Query for `GET /products/search/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSearchQuery {
    pub q: String,
}

/// One hit of `GET /products/search/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSearchHit {
    pub id: i64,
    pub product_name: String,
    #[serde(default)]
    pub product_company: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub mrp: f64,
}

impl ProductSearchHit {
    /// Text shown in the results list
    pub fn label(&self) -> String {
        format!("{} ({})", self.product_name, self.product_company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_info_rates_by_tier() {
        let json = r#"{"success": true, "product_name": "Azithral 500", "product_company": "Alembic",
            "product_packing": "3 TAB", "rate_A": "98.50", "rate_B": 95, "rate_C": null}"#;
        let info: ProductInfoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(info.rate_for(RateTier::A), Some(98.5));
        assert_eq!(info.rate_for(RateTier::B), Some(95.0));
        assert_eq!(info.rate_for(RateTier::C), None);
        assert_eq!(info.rate_for(RateTier::Custom), None);
    }

    #[test]
    fn test_search_hit_label() {
        let hits: Vec<ProductSearchHit> = serde_json::from_str(
            r#"[{"id": 7, "product_name": "Dolo 650", "product_company": "Micro Labs", "mrp": "30.91"}]"#,
        )
        .unwrap();
        assert_eq!(hits[0].label(), "Dolo 650 (Micro Labs)");
        assert_eq!(hits[0].mrp, 30.91);
    }

    #[test]
    fn test_rate_tier_parsing() {
        assert_eq!("custom".parse::<RateTier>(), Ok(RateTier::Custom));
        assert_eq!(RateTier::from_str("B"), Ok(RateTier::B));
        assert!("b".parse::<RateTier>().is_err());
    }
}
