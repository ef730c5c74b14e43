use crate::shared::api_utils::{get_json, with_query};
use crate::shared::config::config;
use contracts::dashboards::d400_sales_analytics::{SalesAnalyticsData, SalesAnalyticsResponse};
use contracts::shared::date_range::DateRangeQuery;

/// Fetch the analytics report for a date range.
pub async fn fetch_sales_analytics(range: &DateRangeQuery) -> Result<SalesAnalyticsData, String> {
    let url = with_query(&config().analytics_endpoint, range)?;
    let response: SalesAnalyticsResponse = get_json(&url).await?;

    match (response.success, response.data) {
        (true, Some(data)) => Ok(data),
        (_, _) => Err(response
            .error
            .unwrap_or_else(|| "Failed to refresh data".to_string())),
    }
}

/// URL of a sales export for the same range.
pub fn export_url(path: &str, range: &DateRangeQuery) -> Result<String, String> {
    with_query(path, range)
}
