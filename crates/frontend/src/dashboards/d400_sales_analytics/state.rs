//! Pure pieces of the analytics page: quick ranges, chart series, KPI text.

use crate::shared::number_format::format_inr;
use chrono::{Datelike, Duration, NaiveDate};
use contracts::dashboards::d400_sales_analytics::{
    CustomerAnalyticsRow, DailyTrendPoint, Kpi, ProductAnalyticsRow, SalesAnalyticsData,
};
use serde::Serialize;

/// Bars shown in the product and customer charts
pub const TOP_N: usize = 8;
/// Longest chart label, in characters
pub const LABEL_CHARS: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuickRange {
    Today,
    ThisWeek,
    ThisMonth,
    ThisQuarter,
}

impl QuickRange {
    /// From a button caption such as "This Week".
    pub fn from_label(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "today" => Some(QuickRange::Today),
            "thisweek" => Some(QuickRange::ThisWeek),
            "thismonth" => Some(QuickRange::ThisMonth),
            "thisquarter" => Some(QuickRange::ThisQuarter),
            _ => None,
        }
    }

    /// `(start, end)` ending today. Weeks start on Sunday.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            QuickRange::Today => today,
            QuickRange::ThisWeek => {
                today - Duration::days(today.weekday().num_days_from_sunday() as i64)
            }
            QuickRange::ThisMonth => today.with_day(1).unwrap_or(today),
            QuickRange::ThisQuarter => {
                let first_month = (today.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), first_month, 1).unwrap_or(today)
            }
        };
        (start, today)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    pub fn path(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "/export/sales/pdf/",
            ExportFormat::Excel => "/export/sales/excel/",
        }
    }
}

/// Labels and values written into an existing chart.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

pub fn truncate_label(name: &str) -> String {
    name.chars().take(LABEL_CHARS).collect()
}

pub fn product_series(rows: &[ProductAnalyticsRow]) -> ChartSeries {
    let top = rows.iter().take(TOP_N);
    ChartSeries {
        labels: top
            .clone()
            .map(|r| truncate_label(r.product_name.as_deref().unwrap_or_default()))
            .collect(),
        data: top.map(|r| r.total_amount).collect(),
    }
}

pub fn customer_series(rows: &[CustomerAnalyticsRow]) -> ChartSeries {
    let top = rows.iter().take(TOP_N);
    ChartSeries {
        labels: top
            .clone()
            .map(|r| truncate_label(r.customer_name.as_deref().unwrap_or_default()))
            .collect(),
        data: top.map(|r| r.total_amount).collect(),
    }
}

/// "2025-10-19" (optionally followed by a time) -> "Oct 19"
pub fn day_label(day: &str) -> String {
    day.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.format("%b %-d").to_string())
        .unwrap_or_else(|| day.to_string())
}

pub fn daily_series(points: &[DailyTrendPoint]) -> ChartSeries {
    ChartSeries {
        labels: points.iter().map(|p| day_label(&p.day)).collect(),
        data: points.iter().map(|p| p.daily_total).collect(),
    }
}

/// `(chart name, series)` for each chart whose section is in the payload.
/// Charts without a section keep what they show.
pub fn chart_updates(data: &SalesAnalyticsData) -> Vec<(&'static str, ChartSeries)> {
    let mut updates = Vec::new();
    if let Some(rows) = &data.product_analytics {
        updates.push(("productChart", product_series(rows)));
    }
    if let Some(rows) = &data.customer_analytics {
        updates.push(("customerChart", customer_series(rows)));
    }
    if let Some(points) = &data.daily_trend {
        updates.push(("dailyChart", daily_series(points)));
    }
    updates
}

/// `(data-kpi key, text)` for every KPI present in the payload.
pub fn kpi_texts(data: &SalesAnalyticsData) -> Vec<(&'static str, String)> {
    Kpi::all()
        .into_iter()
        .filter_map(|kpi| data.kpi(kpi).map(|v| (kpi.key(), format_inr(v))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn product(name: &str, amount: f64) -> ProductAnalyticsRow {
        ProductAnalyticsRow {
            product_name: Some(name.to_string()),
            product_company: None,
            total_amount: amount,
            total_quantity: 1.0,
        }
    }

    #[test]
    fn test_quick_range_labels() {
        assert_eq!(QuickRange::from_label("This Week"), Some(QuickRange::ThisWeek));
        assert_eq!(QuickRange::from_label(" today "), Some(QuickRange::Today));
        assert_eq!(QuickRange::from_label("Last Year"), None);
    }

    #[test]
    fn test_quick_range_bounds() {
        // 2025-10-16 is a Thursday
        let today = date(2025, 10, 16);
        assert_eq!(QuickRange::Today.bounds(today), (today, today));
        assert_eq!(QuickRange::ThisWeek.bounds(today).0, date(2025, 10, 12));
        assert_eq!(QuickRange::ThisMonth.bounds(today).0, date(2025, 10, 1));
        assert_eq!(QuickRange::ThisQuarter.bounds(today).0, date(2025, 10, 1));
        assert_eq!(QuickRange::ThisQuarter.bounds(date(2025, 5, 20)).0, date(2025, 4, 1));
    }

    #[test]
    fn test_week_starting_sunday() {
        let sunday = date(2025, 10, 19);
        assert_eq!(QuickRange::ThisWeek.bounds(sunday).0, sunday);
    }

    #[test]
    fn test_product_series_top_eight_truncated() {
        let rows: Vec<_> = (0..10)
            .map(|i| product(&format!("Amoxicillin Clavulanate {}", i), 100.0 - i as f64))
            .collect();
        let series = product_series(&rows);
        assert_eq!(series.labels.len(), 8);
        assert_eq!(series.labels[0], "Amoxicillin Clavulan");
        assert_eq!(series.data[7], 93.0);
    }

    #[test]
    fn test_missing_names_become_empty_labels() {
        let rows = vec![CustomerAnalyticsRow {
            customer_name: None,
            total_amount: 50.0,
            invoice_count: None,
        }];
        assert_eq!(customer_series(&rows).labels, vec![String::new()]);
    }

    #[test]
    fn test_day_labels() {
        assert_eq!(day_label("2025-10-19"), "Oct 19");
        assert_eq!(day_label("2025-03-05T00:00:00"), "Mar 5");
        assert_eq!(day_label("yesterday"), "yesterday");
    }

    #[test]
    fn test_chart_updates_only_for_present_sections() {
        let data: SalesAnalyticsData = serde_json::from_str(
            r#"{"product_analytics": [], "daily_trend": [{"day": "2025-10-19", "daily_total": 10}]}"#,
        )
        .unwrap();
        let names: Vec<_> = chart_updates(&data).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["productChart", "dailyChart"]);

        assert!(chart_updates(&SalesAnalyticsData::default()).is_empty());
    }

    #[test]
    fn test_kpi_texts_skip_missing() {
        let data: SalesAnalyticsData = serde_json::from_str(
            r#"{"core_metrics": {"total_sales": 123456.7}, "realtime_stats": {"unique_customers": 12}}"#,
        )
        .unwrap();
        let texts = kpi_texts(&data);
        assert_eq!(
            texts,
            vec![
                ("total_sales", "₹1,23,457".to_string()),
                ("unique_customers", "₹12".to_string()),
            ]
        );
    }
}
