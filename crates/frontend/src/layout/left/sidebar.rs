//! Sidebar controller over the server-rendered `#pharmaSidebar` markup.
//!
//! All transitions go through [`update`], which mutates the model, re-applies
//! it to the DOM and persists it.

use super::sidebar_state::{is_mobile_width, parse_saved, SidebarModel};
use crate::shared::config::config;
use crate::shared::dom::{self, closest, set_class};
use crate::shared::storage;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement};

const SIDEBAR_ID: &str = "pharmaSidebar";
const MAIN_CONTENT_ID: &str = "mainContent";
const OVERLAY_ID: &str = "mobileOverlay";
const LINK_SELECTOR: &str = ".pharma-nav-link, .pharma-nav-submenu-link";

thread_local! {
    static SIDEBAR: RefCell<Option<SidebarModel>> = const { RefCell::new(None) };
}

fn is_mobile_now() -> bool {
    is_mobile_width(dom::inner_width(), config().mobile_breakpoint_px)
}

fn load_saved() -> Option<super::sidebar_state::SavedSidebarState> {
    let key = config().sidebar_storage_key;
    let raw = storage::load(&key)?;
    match parse_saved(&raw) {
        Ok(saved) => Some(saved),
        Err(e) => {
            log::warn!("{}; clearing", e);
            storage::remove(&key);
            None
        }
    }
}

fn save(model: &SidebarModel) {
    match serde_json::to_string(&model.snapshot(dom::now_ms())) {
        Ok(json) => storage::save(&config().sidebar_storage_key, &json),
        Err(e) => log::warn!("Could not serialize sidebar state: {}", e),
    }
}

/// Key a link is remembered by
fn item_key(link: &Element) -> Option<String> {
    link.get_attribute("data-nav-item")
        .or_else(|| link.get_attribute("href"))
}

fn render(model: &SidebarModel) {
    let Some(sidebar) = dom::by_id::<Element>(SIDEBAR_ID) else {
        return;
    };
    let main = dom::by_id::<Element>(MAIN_CONTENT_ID);

    set_class(&sidebar, "collapsed", model.collapsed && !model.is_mobile);
    set_class(&sidebar, "mobile-open", model.mobile_open);
    if let Some(main) = &main {
        set_class(main, "sidebar-collapsed", model.collapsed && !model.is_mobile);
        set_class(main, "sidebar-mobile", model.is_mobile);
    }
    if let Some(overlay) = dom::by_id::<Element>(OVERLAY_ID) {
        set_class(&overlay, "active", model.mobile_open);
    }
    if let Some(body) = dom::body() {
        dom::set_style(&body, "overflow", if model.mobile_open { "hidden" } else { "" });
    }

    for submenu in dom::query_all(".pharma-submenu") {
        let open = model.open_submenu.as_deref() == Some(submenu.id().as_str());
        render_submenu(&submenu, open);
    }

    for link in dom::query_all(LINK_SELECTOR) {
        let active = model.active_item.is_some() && item_key(&link) == model.active_item;
        set_class(&link, "active", active);
    }
}

fn render_submenu(submenu: &Element, open: bool) {
    set_class(submenu, "hidden", !open);
    if let Some(html) = submenu.dyn_ref::<HtmlElement>() {
        let height = if open {
            format!("{}px", submenu.scroll_height())
        } else {
            "0px".to_string()
        };
        dom::set_style(html, "max-height", &height);
    }

    let selector = format!(r#"[data-submenu="{}"]"#, submenu.id());
    let Some(button) = dom::query(&selector) else {
        return;
    };
    let _ = button.set_attribute("aria-expanded", if open { "true" } else { "false" });
    if let Some(item) = closest(&button, ".pharma-nav-item") {
        set_class(&item, "active", open);
    }
    if let Some(arrow) = button
        .query_selector(".pharma-nav-arrow")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        dom::set_style(&arrow, "transform", if open { "rotate(180deg)" } else { "rotate(0deg)" });
        dom::set_style(&arrow, "opacity", if open { "1" } else { "0.7" });
    }
}

/// Apply a transition, then render and persist.
pub fn update<F>(f: F)
where
    F: FnOnce(&mut SidebarModel),
{
    let snapshot = SIDEBAR.with(|cell| {
        let mut slot = cell.borrow_mut();
        let model = slot.as_mut()?;
        f(model);
        Some(model.clone())
    });
    if let Some(model) = snapshot {
        render(&model);
        save(&model);
    }
}

pub fn is_mounted() -> bool {
    SIDEBAR.with(|cell| cell.borrow().is_some())
}

pub fn is_mobile() -> bool {
    SIDEBAR.with(|cell| cell.borrow().as_ref().is_some_and(|m| m.is_mobile))
}

pub fn toggle_sidebar() {
    update(|m| m.toggle_sidebar());
}

/// Ctrl+B: desktop collapse only.
pub fn toggle_collapse_desktop() {
    if !is_mobile() {
        update(|m| m.toggle_collapse());
    }
}

pub fn escape() {
    update(|m| m.escape());
}

fn on_document_click(ev: Event) {
    let Some(target) = dom::event_element(&ev) else {
        return;
    };

    if let Some(button) = closest(&target, ".pharma-nav-menu-button") {
        if let Some(id) = button.get_attribute("data-submenu") {
            update(|m| m.toggle_submenu(&id));
        }
        return;
    }

    if let Some(link) = closest(&target, LINK_SELECTOR) {
        if let Some(key) = item_key(&link) {
            let parent = closest(&link, ".pharma-submenu").map(|s| s.id());
            update(|m| m.select_item(&key, parent.as_deref()));
        }
        return;
    }

    if closest(&target, "#sidebarToggle").is_some() {
        toggle_sidebar();
        return;
    }

    if closest(&target, &format!("#{}", OVERLAY_ID)).is_some() {
        update(|m| m.close_mobile());
        return;
    }

    if closest(&target, ".pharma-nav-item").is_none() {
        update(|m| m.outside_click());
    }
}

/// Link matching the current path, used when nothing was saved.
fn active_from_path() -> Option<String> {
    let path = dom::current_path();
    dom::query_all(LINK_SELECTOR)
        .into_iter()
        .find(|link| link.get_attribute("href").as_deref() == Some(path.as_str()))
        .and_then(|link| item_key(&link))
}

/// Restore the saved state and start listening. No-op without a sidebar.
pub fn init() {
    if dom::by_id::<Element>(SIDEBAR_ID).is_none() {
        return;
    }

    let mut model = SidebarModel::restore(load_saved(), is_mobile_now());
    if model.active_item.is_none() {
        model.active_item = active_from_path();
    }
    if let Some(submenu) = model.open_submenu.clone() {
        if dom::by_id::<Element>(&submenu).is_none() {
            model.open_submenu = None;
        }
    }
    render(&model);
    SIDEBAR.with(|cell| *cell.borrow_mut() = Some(model));

    dom::listen_document("click", on_document_click);
    dom::listen_window("resize", |_ev| {
        let mobile = is_mobile_now();
        let crossed = SIDEBAR.with(|cell| {
            cell.borrow_mut()
                .as_mut()
                .is_some_and(|m| m.resize(mobile))
        });
        if crossed {
            update(|_| {});
        }
    });

    if let Some(sidebar) = dom::by_id::<Element>(SIDEBAR_ID) {
        dom::after(100, move || dom::add_class(&sidebar, "pharma-fade-in"));
    }
    log::info!("Sidebar initialized");
}
