//! Keyboard accessibility: initial focus, modal focus and Tab trapping, and
//! keyboard activation of clickable non-native elements.

use crate::shared::dom::{self, mark_once};
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, FocusOptions, HtmlElement, HtmlInputElement, KeyboardEvent, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition,
};

const FIELDS: &str = "input, select, textarea";
const CLICKABLE: &str = "button, a[href], [onclick], .btn, .clickable, [data-action]";
const NATIVE_CONTROLS: &str = "button, a, input, select, textarea";
const VISIBLE_MODALS: &str =
    ".modal.show, .modal[style*=\"block\"], .modal-overlay[style*=\"flex\"], .modal-overlay[style*=\"block\"]";
const MODAL_FOCUSABLE: &str = "input:not([type=\"hidden\"]):not([disabled]), select:not([disabled]), \
     textarea:not([disabled]), button:not([disabled])";
const KEYBOARD_MARKER: &str = "data-keyboard-enabled";
const MODAL_FOCUSED_MARKER: &str = "data-modal-focused";
const HIGHLIGHT_MS: u32 = 2000;
const MODAL_SETTLE_MS: u32 = 300;

/// Static facts about a form field that decide whether it may take focus.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldFacts<'a> {
    pub input_type: Option<&'a str>,
    pub disabled: bool,
    pub read_only: bool,
    pub visible: bool,
}

pub fn is_focus_candidate(facts: FieldFacts) -> bool {
    !facts.disabled
        && !facts.read_only
        && facts.visible
        && !facts.input_type.is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
}

/// Index Tab should jump to when focus would leave a modal, if any.
pub fn wrapped_index(current: Option<usize>, len: usize, backwards: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match (current, backwards) {
        (Some(0), true) => Some(len - 1),
        (Some(i), false) if i + 1 == len => Some(0),
        _ => None,
    }
}

fn facts_of(el: &Element) -> (Option<String>, bool, bool, bool) {
    let visible = el.dyn_ref::<HtmlElement>().is_some_and(dom::is_visible);
    (
        el.get_attribute("type"),
        el.has_attribute("disabled"),
        el.has_attribute("readonly"),
        visible,
    )
}

fn focusable_fields(scope: &Element) -> Vec<HtmlElement> {
    dom::query_within(scope, FIELDS)
        .into_iter()
        .filter(|el| {
            let (input_type, disabled, read_only, visible) = facts_of(el);
            is_focus_candidate(FieldFacts {
                input_type: input_type.as_deref(),
                disabled,
                read_only,
                visible,
            })
        })
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn highlight(el: &HtmlElement) {
    dom::add_class(el, "autofocus-highlight");
    let el = el.clone();
    dom::after(HIGHLIGHT_MS, move || dom::remove_class(&el, "autofocus-highlight"));
}

fn in_viewport(el: &HtmlElement) -> bool {
    let rect = el.get_bounding_client_rect();
    rect.top() >= 0.0 && rect.bottom() <= dom::inner_height()
}

/// Smooth-scroll `el` to the middle of the viewport.
pub fn scroll_to_center(el: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Center);
    el.scroll_into_view_with_scroll_into_view_options(&options);
}

fn focus_first_field(scope: &Element, select_text: bool) -> bool {
    let Some(first) = focusable_fields(scope).into_iter().next() else {
        return false;
    };
    let options = FocusOptions::new();
    options.set_prevent_scroll(true);
    let _ = first.focus_with_options(&options);
    if !in_viewport(&first) {
        scroll_to_center(&first);
    }
    if select_text {
        if let Some(input) = first.dyn_ref::<HtmlInputElement>() {
            if matches!(input.type_().as_str(), "text" | "date" | "number") {
                input.select();
            }
        }
    }
    highlight(&first);
    true
}

fn focus_is_on_field() -> bool {
    dom::document()
        .and_then(|d| d.active_element())
        .is_some_and(|el| el.matches(FIELDS).unwrap_or(false))
}

/// Focus the first usable field of the page unless the user got there first.
pub fn autofocus_page() {
    dom::after(100, || {
        if focus_is_on_field() {
            return;
        }
        let Some(body) = dom::body() else {
            return;
        };
        if !focus_first_field(&body, false) {
            log::debug!("No focusable field on this page");
        }
    });
}

fn visible_modals() -> Vec<Element> {
    dom::query_all(VISIBLE_MODALS)
        .into_iter()
        .filter(|m| m.dyn_ref::<HtmlElement>().is_some_and(dom::is_visible))
        .collect()
}

/// Focus newly shown modals once; forget modals that were hidden again.
fn refresh_modal_focus() {
    for modal in dom::query_all(&format!("[{}]", MODAL_FOCUSED_MARKER)) {
        if !modal.dyn_ref::<HtmlElement>().is_some_and(dom::is_visible) {
            let _ = modal.remove_attribute(MODAL_FOCUSED_MARKER);
        }
    }
    for modal in visible_modals() {
        if mark_once(&modal, MODAL_FOCUSED_MARKER) {
            focus_first_field(&modal, true);
        }
    }
}

fn trap_tab(ev: &KeyboardEvent) {
    let Some(modal) = visible_modals().into_iter().next() else {
        return;
    };
    let items: Vec<HtmlElement> = dom::query_within(&modal, MODAL_FOCUSABLE)
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();
    let active = dom::document().and_then(|d| d.active_element());
    let current = active.and_then(|a| items.iter().position(|el| el.is_same_node(Some(&a))));
    if let Some(target) = wrapped_index(current, items.len(), ev.shift_key()).and_then(|i| items.get(i)) {
        ev.prevent_default();
        let _ = target.focus();
    }
}

fn on_clickable_keydown(ev: Event) {
    let Some(key_ev) = ev.dyn_ref::<KeyboardEvent>() else {
        return;
    };
    if key_ev.key() != "Enter" && key_ev.key() != " " {
        return;
    }
    let Some(el) = ev.current_target().and_then(|t| t.dyn_into::<HtmlElement>().ok()) else {
        return;
    };
    ev.prevent_default();
    ev.stop_propagation();
    el.click();
}

/// Make clickables under `root` reachable and operable from the keyboard.
pub fn attach(root: &Element) {
    for el in dom::query_within(root, CLICKABLE) {
        if !mark_once(&el, KEYBOARD_MARKER) {
            continue;
        }
        if !el.has_attribute("tabindex") {
            let _ = el.set_attribute("tabindex", "0");
        }
        if el.matches(NATIVE_CONTROLS).unwrap_or(false) {
            continue;
        }
        if !el.has_attribute("role") {
            let _ = el.set_attribute("role", "button");
        }
        dom::listen(el.as_ref(), "keydown", on_clickable_keydown);
    }
}

pub fn init() {
    autofocus_page();
    dom::listen_document("click", |_ev| {
        dom::after(MODAL_SETTLE_MS, refresh_modal_focus);
    });
    dom::listen_document("keydown", |ev| {
        if let Some(key_ev) = ev.dyn_ref::<KeyboardEvent>() {
            if key_ev.key() == "Tab" {
                trap_tab(key_ev);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(input_type: Option<&str>) -> FieldFacts<'_> {
        FieldFacts {
            input_type,
            visible: true,
            ..FieldFacts::default()
        }
    }

    #[test]
    fn test_focus_candidate() {
        assert!(is_focus_candidate(field(Some("text"))));
        assert!(is_focus_candidate(field(None)));
        assert!(!is_focus_candidate(field(Some("hidden"))));
        assert!(!is_focus_candidate(FieldFacts { disabled: true, ..field(None) }));
        assert!(!is_focus_candidate(FieldFacts { read_only: true, ..field(None) }));
        assert!(!is_focus_candidate(FieldFacts { visible: false, ..field(None) }));
    }

    #[test]
    fn test_tab_wraps_forward_from_last() {
        assert_eq!(wrapped_index(Some(2), 3, false), Some(0));
        assert_eq!(wrapped_index(Some(1), 3, false), None);
    }

    #[test]
    fn test_shift_tab_wraps_backward_from_first() {
        assert_eq!(wrapped_index(Some(0), 3, true), Some(2));
        assert_eq!(wrapped_index(Some(2), 3, true), None);
    }

    #[test]
    fn test_wrap_empty_modal() {
        assert_eq!(wrapped_index(None, 0, false), None);
        assert_eq!(wrapped_index(None, 3, false), None);
    }
}
