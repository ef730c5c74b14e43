//! Product details on selection and live product search.

use crate::forms::calculators::{recalc_line_form, SALES_FORM};
use crate::shared::api_utils::{get_json, with_query};
use crate::shared::config::config;
use crate::shared::dom::{self, listen, mark_once};
use crate::shared::request_guard::RequestGuard;
use contracts::domain::a001_product::{
    ProductInfoQuery, ProductInfoResponse, ProductSearchHit, ProductSearchQuery, RateTier,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlInputElement, HtmlSelectElement};

const LOOKUP_MARKER: &str = "data-lookup-bound";

thread_local! {
    static SEARCH_GUARD: RequestGuard = const { RequestGuard::new() };
}

/// Search term to send, or `None` while it is too short.
pub fn search_term(raw: &str, min_chars: usize) -> Option<String> {
    let term = raw.trim().to_lowercase();
    (term.chars().count() >= min_chars).then_some(term)
}

pub async fn fetch_product_info(product_id: &str) -> Result<ProductInfoResponse, String> {
    let query = ProductInfoQuery {
        product_id: product_id.to_string(),
    };
    let url = with_query(&config().product_info_endpoint, &query)?;
    get_json(&url).await
}

pub async fn search_products(term: &str) -> Result<Vec<ProductSearchHit>, String> {
    let query = ProductSearchQuery { q: term.to_string() };
    let url = with_query(&config().product_search_endpoint, &query)?;
    get_json(&url).await
}

fn apply_product_info(info: &ProductInfoResponse) {
    dom::set_text("product_name_display", &info.product_name);
    dom::set_text("product_company_display", &info.product_company);
    dom::set_text("product_packing_display", &info.product_packing);

    let Some(rate_input) = dom::input_by_id("id_sale_rate") else {
        return;
    };
    let tier = dom::by_id::<HtmlSelectElement>("id_rate_applied")
        .and_then(|select| select.value().parse::<RateTier>().ok());
    if let Some(rate) = tier.and_then(|t| info.rate_for(t)) {
        rate_input.set_value(&rate.to_string());
        recalc_line_form(&SALES_FORM);
    }
}

fn bind_product_select(root: &Element) {
    let Some(select) = dom::query_within(root, "#id_productid").into_iter().next() else {
        return;
    };
    if !mark_once(&select, LOOKUP_MARKER) {
        return;
    }
    listen(select.as_ref(), "change", |ev: Event| {
        let Some(product_id) = dom::event_element(&ev)
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .map(|s| s.value())
            .filter(|v| !v.is_empty())
        else {
            return;
        };
        spawn_local(async move {
            match fetch_product_info(&product_id).await {
                Ok(info) if info.success => apply_product_info(&info),
                Ok(_) => log::error!("Failed to load product data for {}", product_id),
                Err(e) => log::error!("Error fetching product data: {}", e),
            }
        });
    });
}

fn clear_results(results: &Element) {
    results.set_inner_html("");
}

fn fill_field(id: &str, value: &str) {
    if let Some(input) = dom::input_by_id(id) {
        input.set_value(value);
    }
}

fn render_results(results: &Element, hits: Vec<ProductSearchHit>) {
    clear_results(results);
    let Some(doc) = dom::document() else {
        return;
    };

    if hits.is_empty() {
        if let Ok(empty) = doc.create_element("div") {
            empty.set_class_name("no-results");
            empty.set_text_content(Some("No products found"));
            let _ = results.append_child(&empty);
        }
        return;
    }

    for hit in hits {
        let Ok(row) = doc.create_element("div") else {
            continue;
        };
        row.set_class_name("search-result");
        row.set_text_content(Some(&hit.label()));

        let container = results.clone();
        listen(row.as_ref(), "click", move |_ev: Event| {
            fill_field("productId", &hit.id.to_string());
            fill_field("productName", &hit.product_name);
            fill_field("productCompany", &hit.product_company);
            fill_field("productMRP", &hit.mrp.to_string());
            clear_results(&container);
            fill_field("productSearch", "");
        });
        let _ = results.append_child(&row);
    }
}

fn bind_search(root: &Element) {
    let Some(input) = dom::query_within(root, "#productSearch")
        .into_iter()
        .next()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    if !mark_once(&input, LOOKUP_MARKER) {
        return;
    }

    let field = input.clone();
    listen(input.as_ref(), "keyup", move |_ev: Event| {
        let Some(term) = search_term(&field.value(), config().product_search_min_chars) else {
            return;
        };
        let token = SEARCH_GUARD.with(|g| g.issue());
        spawn_local(async move {
            let result = search_products(&term).await;
            if !SEARCH_GUARD.with(|g| g.is_current(token)) {
                return;
            }
            let Some(results) = dom::by_id::<Element>("searchResults") else {
                return;
            };
            match result {
                Ok(hits) => render_results(&results, hits),
                Err(e) => log::error!("Product search failed: {}", e),
            }
        });
    });
}

pub fn attach(root: &Element) {
    bind_product_select(root);
    bind_search(root);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_needs_min_chars() {
        assert_eq!(search_term("pa", 3), None);
        assert_eq!(search_term("  pa ", 3), None);
        assert_eq!(search_term("Para", 3).as_deref(), Some("para"));
    }

    #[test]
    fn test_search_term_counts_characters() {
        assert_eq!(search_term("åäö", 3).as_deref(), Some("åäö"));
    }
}
