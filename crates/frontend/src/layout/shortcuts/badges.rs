use super::keymap::shortcut_for_path;
use crate::shared::dom::{self, mark_once};
use web_sys::Element;

const NAV_LINKS: &str =
    ".pharma-nav-link, .pharma-nav-submenu-link, .nav-link, .nav-submenu-link";

/// Append an `Alt+..` badge to every nav link whose target has a shortcut.
pub fn attach(root: &Element) {
    let Some(doc) = dom::document() else {
        return;
    };
    for link in dom::query_within(root, NAV_LINKS) {
        let Some(label) = link.get_attribute("href").and_then(|h| shortcut_for_path(&h)) else {
            continue;
        };
        if !mark_once(&link, "data-shortcut-badge") {
            continue;
        }
        let Ok(badge) = doc.create_element("span") else {
            continue;
        };
        badge.set_class_name("shortcut-badge");
        badge.set_text_content(Some(&label));
        let _ = link.append_child(&badge);
    }
}
