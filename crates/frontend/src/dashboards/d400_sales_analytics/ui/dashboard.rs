//! Sales analytics page: live pulse, token-guarded refresh, quick ranges and
//! exports. Charts are owned by the page (`window.salesCharts`); only their
//! data is replaced here.

use crate::dashboards::d400_sales_analytics::api;
use crate::dashboards::d400_sales_analytics::state::{
    chart_updates, kpi_texts, ChartSeries, ExportFormat, QuickRange,
};
use crate::shared::config::config;
use crate::shared::dom::{self, closest};
use crate::shared::notify::{toast_error, toast_success};
use crate::shared::request_guard::RequestGuard;
use contracts::dashboards::d400_sales_analytics::SalesAnalyticsData;
use contracts::shared::date_range::DateRangeQuery;
use gloo_timers::callback::Interval;
use js_sys::{Function, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlButtonElement, HtmlElement, HtmlFormElement};

const REFRESH_BUTTON_ID: &str = "refreshBtn";
const LOADING_OVERLAY_ID: &str = "loadingOverlay";
const RANGE_FORM_ID: &str = "dateRangeForm";
const REFRESH_IDLE_HTML: &str = r#"<i class="fas fa-sync-alt"></i> Refresh Data"#;
const REFRESH_BUSY_HTML: &str = r#"<i class="fas fa-spinner fa-spin"></i> Loading..."#;

thread_local! {
    static REFRESH_GUARD: RequestGuard = const { RequestGuard::new() };
}

fn current_range() -> DateRangeQuery {
    let value = |id: &str| dom::input_by_id(id).map(|i| i.value()).unwrap_or_default();
    DateRangeQuery::from_inputs(&value("start_date"), &value("end_date"))
}

fn set_loading(loading: bool) {
    if let Some(overlay) = dom::by_id::<HtmlElement>(LOADING_OVERLAY_ID) {
        dom::set_style(&overlay, "display", if loading { "flex" } else { "none" });
    }
    if let Some(button) = dom::by_id::<HtmlButtonElement>(REFRESH_BUTTON_ID) {
        button.set_disabled(loading);
        button.set_inner_html(if loading { REFRESH_BUSY_HTML } else { REFRESH_IDLE_HTML });
    }
}

fn update_kpis(data: &SalesAnalyticsData) {
    for (key, text) in kpi_texts(data) {
        if let Some(el) = dom::query(&format!(r#"[data-kpi="{}"]"#, key)) {
            el.set_text_content(Some(&text));
        }
    }
}

/// Replace labels and the first dataset of `window.salesCharts[name]`.
fn update_chart(name: &str, series: &ChartSeries) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let charts = Reflect::get(&window, &JsValue::from_str("salesCharts"))?;
    if charts.is_undefined() || charts.is_null() {
        return Ok(());
    }
    let chart = Reflect::get(&charts, &JsValue::from_str(name))?;
    if chart.is_undefined() || chart.is_null() {
        return Ok(());
    }

    let serializer = Serializer::json_compatible();
    let labels = series
        .labels
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let values = series
        .data
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let data = Reflect::get(&chart, &JsValue::from_str("data"))?;
    Reflect::set(&data, &JsValue::from_str("labels"), &labels)?;
    let datasets = Reflect::get(&data, &JsValue::from_str("datasets"))?;
    let first = Reflect::get_u32(&datasets, 0)?;
    if !first.is_undefined() {
        Reflect::set(&first, &JsValue::from_str("data"), &values)?;
    }

    let update: Function = Reflect::get(&chart, &JsValue::from_str("update"))?.dyn_into()?;
    update.call0(&chart)?;
    Ok(())
}

fn update_charts(data: &SalesAnalyticsData) {
    for (name, series) in chart_updates(data) {
        if let Err(e) = update_chart(name, &series) {
            log::error!("Failed to update {}: {:?}", name, e);
        }
    }
}

/// Fetch and apply fresh numbers. Responses overtaken by a newer refresh
/// are dropped.
pub fn refresh_data() {
    let token = REFRESH_GUARD.with(|g| g.issue());
    let range = current_range();
    set_loading(true);

    wasm_bindgen_futures::spawn_local(async move {
        let result = api::fetch_sales_analytics(&range).await;
        if !REFRESH_GUARD.with(|g| g.is_current(token)) {
            log::debug!("Dropping stale analytics response {}", token);
            return;
        }
        set_loading(false);
        match result {
            Ok(data) => {
                update_kpis(&data);
                update_charts(&data);
                toast_success("Data refreshed successfully");
            }
            Err(e) => {
                log::error!("Error refreshing data: {}", e);
                toast_error("Error refreshing data");
            }
        }
    });
}

fn apply_quick_range(range: QuickRange) {
    let (Some(start), Some(end)) = (dom::input_by_id("start_date"), dom::input_by_id("end_date"))
    else {
        return;
    };
    let Some(today) = dom::today() else {
        return;
    };
    let (from, to) = range.bounds(today);
    start.set_value(&from.format("%Y-%m-%d").to_string());
    end.set_value(&to.format("%Y-%m-%d").to_string());
    if let Some(form) = dom::by_id::<HtmlFormElement>(RANGE_FORM_ID) {
        set_loading(true);
        let _ = form.submit();
    }
}

fn export(format: ExportFormat) {
    let url = match api::export_url(format.path(), &current_range()) {
        Ok(url) => url,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(&url, "_blank");
    }
}

fn pulse_indicator() {
    let Some(indicator) = dom::query(".realtime-pulse").and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    dom::set_style(&indicator, "animation", "none");
    dom::after(100, move || dom::set_style(&indicator, "animation", "pulse 2s infinite"));
}

fn on_click(ev: web_sys::Event) {
    let Some(target) = dom::event_element(&ev) else {
        return;
    };
    if closest(&target, &format!("#{}", REFRESH_BUTTON_ID)).is_some() {
        refresh_data();
    } else if closest(&target, "#exportPDF").is_some() {
        export(ExportFormat::Pdf);
    } else if closest(&target, "#exportExcel").is_some() {
        export(ExportFormat::Excel);
    } else if let Some(button) = closest(&target, ".btn-quick") {
        ev.prevent_default();
        let label = button.text_content().unwrap_or_default();
        match QuickRange::from_label(&label) {
            Some(range) => apply_quick_range(range),
            None => log::warn!("Unknown quick range {:?}", label.trim()),
        }
    }
}

/// Wire up the analytics page. No-op on pages without the refresh button.
pub fn init() {
    if dom::by_id::<HtmlElement>(REFRESH_BUTTON_ID).is_none() {
        return;
    }
    dom::listen_document("click", on_click);
    if let Some(form) = dom::by_id::<HtmlFormElement>(RANGE_FORM_ID) {
        dom::listen(form.as_ref(), "submit", |_ev| set_loading(true));
    }
    Interval::new(config().analytics_pulse_interval_ms, pulse_indicator).forget();
    log::info!("Sales analytics ready");
}
