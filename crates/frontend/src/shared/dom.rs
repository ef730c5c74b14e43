//! Thin helpers over `web_sys` for enhancing server-rendered markup.
//!
//! Every lookup returns `Option`/empty collections instead of errors: a missing
//! element means the feature is simply not present on the current page.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement};

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn body() -> Option<HtmlElement> {
    document()?.body()
}

/// `document.getElementById` cast to the requested element type
pub fn by_id<T: JsCast>(id: &str) -> Option<T> {
    document()?.get_element_by_id(id)?.dyn_into::<T>().ok()
}

pub fn input_by_id(id: &str) -> Option<HtmlInputElement> {
    by_id::<HtmlInputElement>(id)
}

/// First match of `selector` in the whole document
pub fn query(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok().flatten()
}

/// All matches of `selector` in the whole document
pub fn query_all(selector: &str) -> Vec<Element> {
    match document() {
        Some(doc) => match doc.query_selector_all(selector) {
            Ok(list) => (0..list.length())
                .filter_map(|i| list.item(i))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect(),
            Err(_) => Vec::new(),
        },
        None => Vec::new(),
    }
}

/// All matches of `selector` inside `root`, including `root` itself.
pub fn query_within(root: &Element, selector: &str) -> Vec<Element> {
    let mut found = Vec::new();
    if root.matches(selector).unwrap_or(false) {
        found.push(root.clone());
    }
    if let Ok(list) = root.query_selector_all(selector) {
        found.extend(
            (0..list.length())
                .filter_map(|i| list.item(i))
                .filter_map(|node| node.dyn_into::<Element>().ok()),
        );
    }
    found
}

pub fn closest(el: &Element, selector: &str) -> Option<Element> {
    el.closest(selector).ok().flatten()
}

/// Element that dispatched the event
pub fn event_element(ev: &Event) -> Option<Element> {
    ev.target()?.dyn_into::<Element>().ok()
}

/// Set `marker` on the element. Returns `false` when it was already present,
/// so callers bind listeners exactly once per element.
pub fn mark_once(el: &Element, marker: &str) -> bool {
    if el.has_attribute(marker) {
        return false;
    }
    let _ = el.set_attribute(marker, "true");
    true
}

/// Add a bubbling listener that lives as long as the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Add a page-lifetime listener on the document.
pub fn listen_document<F>(event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    if let Some(doc) = document() {
        listen(doc.as_ref(), event, handler);
    }
}

/// Add a page-lifetime listener on the window.
pub fn listen_window<F>(event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    if let Some(window) = web_sys::window() {
        listen(window.as_ref(), event, handler);
    }
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

pub fn add_class(el: &Element, class: &str) {
    let _ = el.class_list().add_1(class);
}

pub fn remove_class(el: &Element, class: &str) {
    let _ = el.class_list().remove_1(class);
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    if on {
        add_class(el, class);
    } else {
        remove_class(el, class);
    }
}

/// Rendered and not `display: none` anywhere up the tree.
pub fn is_visible(el: &HtmlElement) -> bool {
    el.offset_parent().is_some()
}

/// Focus is in something the user types into.
pub fn is_typing_target(ev: &Event) -> bool {
    event_element(ev).is_some_and(|el| {
        el.matches("input, textarea, select, [contenteditable=\"true\"]")
            .unwrap_or(false)
    })
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
        el.set_text_content(Some(text));
    }
}

pub fn navigate(path: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(path);
    }
}

pub fn reload() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}

pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn inner_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(1024.0)
}

pub fn inner_height() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(768.0)
}

/// Milliseconds since the epoch, from the JS clock.
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Run `f` once after `ms` milliseconds on the event loop.
pub fn after<F>(ms: u32, f: F)
where
    F: FnOnce() + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(ms).await;
        f();
    });
}

/// Local calendar date from the JS clock.
pub fn today() -> Option<chrono::NaiveDate> {
    let now = js_sys::Date::new_0();
    chrono::NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
}
