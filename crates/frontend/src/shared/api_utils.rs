//! Requests against the server's JSON and form endpoints.
//!
//! All helpers return `Result<T, String>` with a message that is safe to show
//! in a toast or alert.

use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlInputElement, HtmlMetaElement};

const CSRF_COOKIE: &str = "csrftoken";

/// Build `path?query` from a serializable query struct.
///
/// # Example
/// ```ignore
/// let url = with_query("/api/product-info/", &ProductInfoQuery { product_id: "7".into() })?;
/// ```
pub fn with_query<Q: Serialize>(path: &str, query: &Q) -> Result<String, String> {
    let qs = serde_qs::to_string(query).map_err(|e| format!("Invalid query: {}", e))?;
    if qs.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, qs))
    }
}

/// GET a JSON document.
pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Form-encoded body carrying only the CSRF token.
pub fn csrf_form_body(token: &str) -> String {
    format!("csrfmiddlewaretoken={}", urlencoding::encode(token))
}

/// POST the CSRF token to `url`. Only a 2xx status is success.
pub async fn post_with_csrf(url: &str, token: &str) -> Result<(), String> {
    let response = Request::post(url)
        .header("X-CSRFToken", token)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(csrf_form_body(token))
        .map_err(|e| format!("Request failed: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if response.ok() {
        Ok(())
    } else {
        Err(format!("HTTP error: {}", response.status()))
    }
}

/// Value of `name` in a `document.cookie` string, URL-decoded.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key != name {
            return None;
        }
        urlencoding::decode(value).ok().map(|v| v.into_owned())
    })
}

/// First non-empty candidate in resolution order.
pub fn first_token<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

/// CSRF token from the hidden form field, then `<meta name="csrf-token">`,
/// then the `csrftoken` cookie.
pub fn csrf_token() -> Option<String> {
    let doc = super::dom::document()?;

    let from_field = super::dom::query("[name=csrfmiddlewaretoken]")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value());
    let from_meta = super::dom::query("meta[name=csrf-token]")
        .and_then(|el| el.dyn_into::<HtmlMetaElement>().ok())
        .map(|meta| meta.content());
    let from_cookie = doc
        .dyn_ref::<HtmlDocument>()
        .and_then(|html| html.cookie().ok())
        .and_then(|cookies| cookie_value(&cookies, CSRF_COOKIE));

    first_token([from_field, from_meta, from_cookie])
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::date_range::DateRangeQuery;

    #[test]
    fn test_cookie_value() {
        let cookies = "sessionid=abc; csrftoken=tok%2B123; theme=dark";
        assert_eq!(cookie_value(cookies, "csrftoken").as_deref(), Some("tok+123"));
        assert_eq!(cookie_value(cookies, "missing"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
    }

    #[test]
    fn test_first_token_order() {
        assert_eq!(
            first_token([None, Some("meta".into()), Some("cookie".into())]).as_deref(),
            Some("meta")
        );
        assert_eq!(
            first_token([Some("  ".into()), None, Some("cookie".into())]).as_deref(),
            Some("cookie")
        );
        assert_eq!(first_token([None, None, None]), None);
    }

    #[test]
    fn test_csrf_form_body_is_encoded() {
        assert_eq!(csrf_form_body("a+b/c"), "csrfmiddlewaretoken=a%2Bb%2Fc");
    }

    #[test]
    fn test_with_query_skips_empty_dates() {
        let url = with_query("/api/sales-analytics/", &DateRangeQuery::default()).unwrap();
        assert_eq!(url, "/api/sales-analytics/");
        let range = DateRangeQuery::from_inputs("2025-10-01", "2025-10-19");
        let url = with_query("/api/sales-analytics/", &range).unwrap();
        assert_eq!(
            url,
            "/api/sales-analytics/?start_date=2025-10-01&end_date=2025-10-19"
        );
    }
}
