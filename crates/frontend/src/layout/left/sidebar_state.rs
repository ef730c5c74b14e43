//! Sidebar state model, kept free of DOM access.

use serde::{Deserialize, Serialize};

/// Shape persisted in localStorage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSidebarState {
    #[serde(default)]
    pub active_submenu: Option<String>,
    #[serde(default)]
    pub active_menu_item: Option<String>,
    #[serde(default)]
    pub is_collapsed: bool,
    #[serde(default)]
    pub timestamp: f64,
}

/// Parse a stored state. Any failure means the value must be discarded.
pub fn parse_saved(json: &str) -> Result<SavedSidebarState, String> {
    serde_json::from_str(json).map_err(|e| format!("Corrupt sidebar state: {}", e))
}

pub fn is_mobile_width(width: f64, breakpoint: f64) -> bool {
    width <= breakpoint
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidebarModel {
    pub collapsed: bool,
    pub mobile_open: bool,
    pub is_mobile: bool,
    /// At most one submenu is open
    pub open_submenu: Option<String>,
    /// `data-nav-item` or `href` of the active link
    pub active_item: Option<String>,
}

impl SidebarModel {
    pub fn new(is_mobile: bool) -> Self {
        Self {
            is_mobile,
            ..Self::default()
        }
    }

    /// Replay a saved state. Collapse is a desktop-only notion.
    pub fn restore(saved: Option<SavedSidebarState>, is_mobile: bool) -> Self {
        let Some(saved) = saved else {
            return Self::new(is_mobile);
        };
        Self {
            collapsed: saved.is_collapsed && !is_mobile,
            mobile_open: false,
            is_mobile,
            open_submenu: saved.active_submenu,
            active_item: saved.active_menu_item,
        }
    }

    pub fn snapshot(&self, now_ms: f64) -> SavedSidebarState {
        SavedSidebarState {
            active_submenu: self.open_submenu.clone(),
            active_menu_item: self.active_item.clone(),
            is_collapsed: self.collapsed,
            timestamp: now_ms,
        }
    }

    /// Toggle button: collapse on desktop, open/close on mobile.
    pub fn toggle_sidebar(&mut self) {
        if self.is_mobile {
            self.mobile_open = !self.mobile_open;
        } else {
            self.toggle_collapse();
        }
    }

    pub fn toggle_collapse(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn close_mobile(&mut self) {
        self.mobile_open = false;
    }

    /// Open `id` and close any other submenu, or close `id` if it is open.
    pub fn toggle_submenu(&mut self, id: &str) {
        if self.open_submenu.as_deref() == Some(id) {
            self.open_submenu = None;
        } else {
            self.open_submenu = Some(id.to_string());
        }
    }

    pub fn close_all_submenus(&mut self) {
        self.open_submenu = None;
    }

    /// A menu link was clicked.
    pub fn select_item(&mut self, item: &str, parent_submenu: Option<&str>) {
        self.active_item = Some(item.to_string());
        if let Some(parent) = parent_submenu {
            self.open_submenu = Some(parent.to_string());
        }
        if self.is_mobile {
            self.close_mobile();
        }
    }

    /// Click outside every nav item.
    pub fn outside_click(&mut self) {
        if !self.is_mobile {
            self.close_all_submenus();
        }
    }

    /// Escape closes the mobile sidebar first, otherwise all submenus.
    pub fn escape(&mut self) {
        if self.is_mobile && self.mobile_open {
            self.close_mobile();
        } else {
            self.close_all_submenus();
        }
    }

    /// Returns `true` when the width crossed the breakpoint.
    pub fn resize(&mut self, is_mobile: bool) -> bool {
        if is_mobile == self.is_mobile {
            return false;
        }
        self.is_mobile = is_mobile;
        self.mobile_open = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reload(model: &SidebarModel, is_mobile: bool) -> SidebarModel {
        let json = serde_json::to_string(&model.snapshot(1.0)).unwrap();
        SidebarModel::restore(parse_saved(&json).ok(), is_mobile)
    }

    #[test]
    fn test_collapse_survives_reload() {
        let mut model = SidebarModel::new(false);
        model.toggle_sidebar();
        assert!(model.collapsed);
        assert!(reload(&model, false).collapsed);
    }

    #[test]
    fn test_cleared_storage_is_expanded() {
        let model = SidebarModel::restore(None, false);
        assert!(!model.collapsed);
        assert_eq!(model.open_submenu, None);
        assert_eq!(model.active_item, None);
    }

    #[test]
    fn test_persisted_field_names() {
        let mut model = SidebarModel::new(false);
        model.toggle_submenu("salesSubmenu");
        let json = serde_json::to_string(&model.snapshot(42.0)).unwrap();
        assert!(json.contains("\"activeSubmenu\":\"salesSubmenu\""));
        assert!(json.contains("\"isCollapsed\":false"));
        assert!(json.contains("\"activeMenuItem\":null"));
        assert!(json.contains("\"timestamp\":42"));
    }

    #[test]
    fn test_corrupt_state_rejected() {
        assert!(parse_saved("{not json").is_err());
        assert!(parse_saved("{\"isCollapsed\":\"yes\"}").is_err());
    }

    #[test]
    fn test_single_open_submenu() {
        let mut model = SidebarModel::new(false);
        model.toggle_submenu("a");
        model.toggle_submenu("b");
        assert_eq!(model.open_submenu.as_deref(), Some("b"));
        model.toggle_submenu("b");
        assert_eq!(model.open_submenu, None);
    }

    #[test]
    fn test_select_item_opens_parent_and_closes_mobile() {
        let mut model = SidebarModel::new(true);
        model.toggle_sidebar();
        assert!(model.mobile_open);
        model.select_item("/sales", Some("salesSubmenu"));
        assert_eq!(model.active_item.as_deref(), Some("/sales"));
        assert_eq!(model.open_submenu.as_deref(), Some("salesSubmenu"));
        assert!(!model.mobile_open);
    }

    #[test]
    fn test_outside_click_desktop_only() {
        let mut desktop = SidebarModel::new(false);
        desktop.toggle_submenu("a");
        desktop.outside_click();
        assert_eq!(desktop.open_submenu, None);

        let mut mobile = SidebarModel::new(true);
        mobile.toggle_submenu("a");
        mobile.outside_click();
        assert_eq!(mobile.open_submenu.as_deref(), Some("a"));
    }

    #[test]
    fn test_resize_across_breakpoint_closes_mobile() {
        let mut model = SidebarModel::new(true);
        model.toggle_sidebar();
        assert!(model.resize(false));
        assert!(!model.mobile_open);
        assert!(!model.resize(false));
        assert!(is_mobile_width(768.0, 768.0));
        assert!(!is_mobile_width(769.0, 768.0));
    }

    #[test]
    fn test_escape_prefers_mobile_sidebar() {
        let mut model = SidebarModel::new(true);
        model.toggle_submenu("a");
        model.toggle_sidebar();
        model.escape();
        assert!(!model.mobile_open);
        assert_eq!(model.open_submenu.as_deref(), Some("a"));
        model.escape();
        assert_eq!(model.open_submenu, None);
    }

    #[test]
    fn test_collapse_not_restored_on_mobile() {
        let mut model = SidebarModel::new(false);
        model.toggle_collapse();
        assert!(!reload(&model, true).collapsed);
    }
}
