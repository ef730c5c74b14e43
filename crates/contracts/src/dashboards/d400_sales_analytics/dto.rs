use crate::shared::amount::{de_amount, de_opt_amount};
use serde::{Deserialize, Serialize};

/// Envelope returned by `GET /api/sales-analytics/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesAnalyticsResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<SalesAnalyticsData>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Report body. Sections missing from the payload stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesAnalyticsData {
    #[serde(default)]
    pub core_metrics: Option<CoreMetrics>,
    #[serde(default)]
    pub realtime_stats: Option<RealtimeStats>,
    #[serde(default)]
    pub product_analytics: Option<Vec<ProductAnalyticsRow>>,
    #[serde(default)]
    pub customer_analytics: Option<Vec<CustomerAnalyticsRow>>,
    #[serde(default)]
    pub daily_trend: Option<Vec<DailyTrendPoint>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreMetrics {
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub total_sales: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub total_received: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub total_pending: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub total_invoices: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealtimeStats {
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub unique_customers: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub total_products_sold: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub total_discount_given: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub total_tax_collected: Option<f64>,
}

/// One product aggregate; field names mirror the Django `values()` lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAnalyticsRow {
    #[serde(rename = "productid__product_name", default)]
    pub product_name: Option<String>,
    #[serde(rename = "productid__product_company", default)]
    pub product_company: Option<String>,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerAnalyticsRow {
    #[serde(rename = "sales_invoice_no__customerid__customer_name", default)]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_amount: f64,
    #[serde(default)]
    pub invoice_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTrendPoint {
    /// Calendar day as sent by the server (`YYYY-MM-DD`, sometimes with a time part)
    pub day: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub daily_total: f64,
}

/// KPI slots rendered as `[data-kpi="<key>"]` on the analytics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kpi {
    TotalSales,
    TotalReceived,
    TotalPending,
    TotalInvoices,
    UniqueCustomers,
    TotalProductsSold,
    TotalDiscount,
    TotalTax,
}

impl Kpi {
    pub fn all() -> [Kpi; 8] {
        [
            Kpi::TotalSales,
            Kpi::TotalReceived,
            Kpi::TotalPending,
            Kpi::TotalInvoices,
            Kpi::UniqueCustomers,
            Kpi::TotalProductsSold,
            Kpi::TotalDiscount,
            Kpi::TotalTax,
        ]
    }

    /// Value of the `data-kpi` attribute
    pub fn key(&self) -> &'static str {
        match self {
            Kpi::TotalSales => "total_sales",
            Kpi::TotalReceived => "total_received",
            Kpi::TotalPending => "total_pending",
            Kpi::TotalInvoices => "total_invoices",
            Kpi::UniqueCustomers => "unique_customers",
            Kpi::TotalProductsSold => "total_products_sold",
            Kpi::TotalDiscount => "total_discount",
            Kpi::TotalTax => "total_tax",
        }
    }
}

impl SalesAnalyticsData {
    /// Current value of a KPI, `None` when the section or field is missing.
    pub fn kpi(&self, kpi: Kpi) -> Option<f64> {
        let core = self.core_metrics.as_ref();
        let live = self.realtime_stats.as_ref();
        match kpi {
            Kpi::TotalSales => core?.total_sales,
            Kpi::TotalReceived => core?.total_received,
            Kpi::TotalPending => core?.total_pending,
            Kpi::TotalInvoices => core?.total_invoices,
            Kpi::UniqueCustomers => live?.unique_customers,
            Kpi::TotalProductsSold => live?.total_products_sold,
            Kpi::TotalDiscount => live?.total_discount_given,
            Kpi::TotalTax => live?.total_tax_collected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "success": true,
        "data": {
            "core_metrics": {"total_sales": 125000.5, "total_received": "100000.00", "total_pending": 25000.5, "total_invoices": 42, "collection_rate": 80},
            "realtime_stats": {"unique_customers": 17, "total_products_sold": 310, "total_discount_given": "1250.00", "total_tax_collected": null},
            "product_analytics": [{"productid__product_name": "Paracetamol 500", "productid__product_company": "Cipla", "total_amount": "5400.00", "total_quantity": 120}],
            "customer_analytics": [{"sales_invoice_no__customerid__customer_name": "City Clinic", "total_amount": 9100, "invoice_count": 3}],
            "daily_trend": [{"day": "2025-10-19", "daily_total": "3100.00"}]
        }
    }"#;

    #[test]
    fn test_parse_full_payload() {
        let resp: SalesAnalyticsResponse = serde_json::from_str(SAMPLE).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data.product_analytics.unwrap()[0].total_amount, 5400.0);
        assert_eq!(
            data.customer_analytics.unwrap()[0].customer_name.as_deref(),
            Some("City Clinic")
        );
        assert_eq!(data.daily_trend.unwrap()[0].daily_total, 3100.0);
    }

    #[test]
    fn test_absent_sections_differ_from_empty() {
        let data: SalesAnalyticsData =
            serde_json::from_str(r#"{"product_analytics": [], "daily_trend": null}"#).unwrap();
        assert_eq!(data.product_analytics.map(|rows| rows.len()), Some(0));
        assert!(data.customer_analytics.is_none());
        assert!(data.daily_trend.is_none());
    }

    #[test]
    fn test_kpi_lookup_maps_both_sections() {
        let resp: SalesAnalyticsResponse = serde_json::from_str(SAMPLE).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data.kpi(Kpi::TotalReceived), Some(100000.0));
        assert_eq!(data.kpi(Kpi::TotalInvoices), Some(42.0));
        assert_eq!(data.kpi(Kpi::TotalDiscount), Some(1250.0));
        assert_eq!(data.kpi(Kpi::TotalTax), None);
    }

    #[test]
    fn test_failure_envelope_without_data() {
        let resp: SalesAnalyticsResponse =
            serde_json::from_str(r#"{"success": false, "error": "boom"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.error.as_deref(), Some("boom"));
    }
}
