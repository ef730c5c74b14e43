use serde::Deserialize;
use std::cell::OnceCell;

/// Runtime knobs of the client layer.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Window for completing a two-key shortcut
    pub sequence_timeout_ms: u32,
    /// Window after Alt+S before it falls through to the supplier list
    pub supplier_timeout_ms: u32,
    /// Widths at or below this are treated as mobile
    pub mobile_breakpoint_px: f64,
    pub analytics_endpoint: String,
    pub analytics_pulse_interval_ms: u32,
    pub product_info_endpoint: String,
    pub product_search_endpoint: String,
    pub product_search_min_chars: usize,
    pub sidebar_storage_key: String,
    pub theme_storage_key: String,
    /// Let Ctrl+B/S/D act while focus is in a text field
    pub ctrl_shortcuts_in_fields: bool,
}

/// Id of the optional `<script type="application/json">` override block
pub const CONFIG_ELEMENT_ID: &str = "pharma-client-config";

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            sequence_timeout_ms: 1500,
            supplier_timeout_ms: 800,
            mobile_breakpoint_px: 768.0,
            analytics_endpoint: "/api/sales-analytics/".to_string(),
            analytics_pulse_interval_ms: 300_000,
            product_info_endpoint: "/api/product-info/".to_string(),
            product_search_endpoint: "/products/search/".to_string(),
            product_search_min_chars: 3,
            sidebar_storage_key: "pharmaSidebarState".to_string(),
            theme_storage_key: "theme".to_string(),
            ctrl_shortcuts_in_fields: false,
        }
    }
}

/// Parse a page override. Keys that are absent keep their default value.
pub fn parse_config(json: &str) -> Result<ClientConfig, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid client config: {}", e))
}

/// Load configuration
///
/// Search order:
/// 1. `<script id="pharma-client-config" type="application/json">` on the page
/// 2. Falls back to [`ClientConfig::default`]
pub fn load_config() -> ClientConfig {
    let page_override = crate::shared::dom::document()
        .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());

    if let Some(json) = page_override {
        match parse_config(&json) {
            Ok(config) => {
                log::info!("Loaded client config from #{}", CONFIG_ELEMENT_ID);
                return config;
            }
            Err(e) => log::warn!("{}; using defaults", e),
        }
    }

    ClientConfig::default()
}

thread_local! {
    static CONFIG: OnceCell<ClientConfig> = const { OnceCell::new() };
}

/// Page-wide configuration, loaded on first use.
pub fn config() -> ClientConfig {
    CONFIG.with(|cell| cell.get_or_init(load_config).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_override_is_default() {
        let config = parse_config("{}");
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.sequence_timeout_ms, 1500);
        assert!(!config.ctrl_shortcuts_in_fields);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(r#"{"sequence_timeout_ms": 1000}"#).unwrap();
        assert_eq!(config.sequence_timeout_ms, 1000);
        assert_eq!(config.supplier_timeout_ms, 800);
        assert_eq!(config.sidebar_storage_key, "pharmaSidebarState");
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let err = parse_config("{not json").unwrap_err();
        assert!(err.starts_with("Invalid client config"));
    }
}
