//! Light/dark theme switching.
//!
//! The preference lives in localStorage and is applied as `data-theme` on
//! `<html>`, so the server-rendered stylesheet can key off it.

use crate::shared::{config::config, dom, storage};
use wasm_bindgen::JsCast;
use web_sys::{HtmlMetaElement, KeyboardEvent};

/// Available themes in the application.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Returns the theme name as stored and applied.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse theme from string. Unknown values fall back to light.
    pub fn from_name(s: &str) -> Self {
        match s.trim() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// `<meta name="theme-color">` for mobile browser chrome
    pub fn meta_color(&self) -> &'static str {
        match self {
            Theme::Light => "#ffffff",
            Theme::Dark => "#0f172a",
        }
    }

    /// Icon of the action the toggle performs next.
    fn icon_html(&self) -> &'static str {
        match self {
            Theme::Light => r#"<i class="fas fa-moon"></i>"#,
            Theme::Dark => r#"<i class="fas fa-sun"></i>"#,
        }
    }
}

fn load_theme() -> Theme {
    storage::load(&config().theme_storage_key)
        .map(|s| Theme::from_name(&s))
        .unwrap_or_default()
}

fn current_theme() -> Theme {
    dom::document()
        .and_then(|d| d.document_element())
        .and_then(|html| html.get_attribute("data-theme"))
        .map(|s| Theme::from_name(&s))
        .unwrap_or_else(load_theme)
}

fn update_meta_theme_color(theme: Theme) {
    let Some(doc) = dom::document() else {
        return;
    };
    let meta = match dom::query(r#"meta[name="theme-color"]"#) {
        Some(existing) => existing.dyn_into::<HtmlMetaElement>().ok(),
        None => {
            let created = doc
                .create_element("meta")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlMetaElement>().ok());
            if let (Some(meta), Some(head)) = (&created, doc.head()) {
                meta.set_name("theme-color");
                let _ = head.append_child(meta);
            }
            created
        }
    };
    if let Some(meta) = meta {
        meta.set_content(theme.meta_color());
    }
}

/// Apply a theme to the page without persisting it.
pub fn apply_theme(theme: Theme) {
    if let Some(html) = dom::document().and_then(|d| d.document_element()) {
        let _ = html.set_attribute("data-theme", theme.as_str());
    }
    update_meta_theme_color(theme);
    for button in dom::query_all(".theme-toggle") {
        button.set_inner_html(theme.icon_html());
    }
}

/// Switch to the other theme and remember the choice.
pub fn toggle_theme() {
    let next = current_theme().toggled();
    apply_theme(next);
    storage::save(&config().theme_storage_key, next.as_str());
    log::info!("Theme switched to {}", next.as_str());
}

fn insert_toggle_button(theme: Theme) {
    let (Some(doc), Some(menu)) = (dom::document(), dom::query(".top-navbar .user-menu")) else {
        return;
    };
    if dom::query(".theme-toggle").is_some() {
        return;
    }
    let Ok(button) = doc.create_element("button") else {
        return;
    };
    button.set_class_name("theme-toggle");
    let _ = button.set_attribute("type", "button");
    let _ = button.set_attribute("aria-label", "Toggle theme");
    let _ = button.set_attribute("title", "Toggle Dark/Light Mode");
    button.set_inner_html(theme.icon_html());
    let _ = menu.insert_before(&button, menu.first_child().as_ref());
}

/// Apply the stored theme and wire the toggle button and Ctrl+Shift+T.
pub fn init() {
    let theme = load_theme();
    apply_theme(theme);
    insert_toggle_button(theme);

    dom::listen_document("click", |ev| {
        let Some(target) = dom::event_element(&ev) else {
            return;
        };
        if dom::closest(&target, ".theme-toggle").is_some() {
            toggle_theme();
        }
    });

    dom::listen_document("keydown", |ev| {
        let Some(key_ev) = ev.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if key_ev.ctrl_key() && key_ev.shift_key() && key_ev.key().eq_ignore_ascii_case("t") {
            ev.prevent_default();
            toggle_theme();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_light() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::from_name("garbage"), Theme::Light);
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
        assert_eq!(Theme::from_name(Theme::Dark.as_str()), Theme::Dark);
    }

    #[test]
    fn test_meta_colors() {
        assert_eq!(Theme::Dark.meta_color(), "#0f172a");
        assert_eq!(Theme::Light.meta_color(), "#ffffff");
    }
}
