//! Global keyboard shortcuts.
//!
//! Alt+letter presses feed a [`ShortcutMachine`]; a timer fires the pending
//! sequence's expiry action when no second key arrives. Ctrl combinations are
//! handled directly.

pub mod badges;
pub mod keymap;
pub mod machine;

use crate::layout::left::sidebar;
use crate::shared::config::config;
use crate::shared::dom;
use crate::shared::modal::delete_dialog;
use gloo_timers::callback::Timeout;
use keymap::{normalize_key, Action};
use machine::ShortcutMachine;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, KeyboardEvent};

thread_local! {
    static MACHINE: RefCell<ShortcutMachine> = RefCell::new(ShortcutMachine::new(
        config().sequence_timeout_ms as f64,
        config().supplier_timeout_ms as f64,
    ));
    static EXPIRY: RefCell<Option<Timeout>> = const { RefCell::new(None) };
}

fn run(action: Action) {
    match action {
        Action::Navigate(path) => {
            log::debug!("Shortcut -> {}", path);
            dom::navigate(path);
        }
        Action::ToggleSidebar => {
            log::debug!("Shortcut -> toggle sidebar");
            sidebar::toggle_sidebar();
        }
    }
}

/// Replace the expiry timer so it matches the machine's current deadline.
fn schedule_expiry() {
    let deadline = MACHINE.with(|m| m.borrow().deadline_ms());
    let timer = deadline.map(|deadline| {
        let delay = (deadline - dom::now_ms()).max(0.0) as u32;
        Timeout::new(delay, move || {
            let action = MACHINE.with(|m| m.borrow_mut().expire(deadline));
            if let Some(action) = action {
                run(action);
            }
        })
    });
    // Dropping the previous Timeout cancels it
    EXPIRY.with(|slot| *slot.borrow_mut() = timer);
}

fn on_alt_key(ev: &KeyboardEvent) {
    let Some(key) = normalize_key(&ev.key(), &ev.code()) else {
        return;
    };
    let dispatch = MACHINE.with(|m| m.borrow_mut().press(key, dom::now_ms()));
    if dispatch.consumed {
        ev.prevent_default();
    }
    schedule_expiry();
    for action in dispatch.actions {
        run(action);
    }
}

fn click_by_id(id: &str) -> bool {
    match dom::by_id::<HtmlElement>(id) {
        Some(el) => {
            el.click();
            true
        }
        None => false,
    }
}

/// Ctrl shortcuts stay out of text fields unless configured otherwise.
pub fn ctrl_shortcut_allowed(typing: bool, in_fields: bool) -> bool {
    !typing || in_fields
}

fn on_ctrl_key(ev: &KeyboardEvent) {
    if ev.shift_key() {
        return;
    }
    if !ctrl_shortcut_allowed(dom::is_typing_target(ev), config().ctrl_shortcuts_in_fields) {
        return;
    }
    match ev.key().to_ascii_lowercase().as_str() {
        "b" if sidebar::is_mounted() => {
            ev.prevent_default();
            sidebar::toggle_collapse_desktop();
        }
        "s" => {
            if click_by_id("quickInvoiceLink") {
                ev.prevent_default();
            }
        }
        "d" => {
            ev.prevent_default();
            delete_dialog::open_for_page();
        }
        _ => {}
    }
}

fn on_keydown(ev: Event) {
    let Some(ev) = ev.dyn_ref::<KeyboardEvent>() else {
        return;
    };
    if ev.alt_key() && !ev.ctrl_key() && !ev.meta_key() {
        on_alt_key(ev);
    } else if (ev.ctrl_key() || ev.meta_key()) && !ev.alt_key() {
        on_ctrl_key(ev);
    } else if ev.key() == "Escape" {
        sidebar::escape();
    }
}

pub fn init() {
    dom::listen_document("keydown", on_keydown);
    log::info!("Keyboard shortcuts ready");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_shortcuts_skip_text_fields_by_default() {
        assert!(ctrl_shortcut_allowed(false, false));
        assert!(!ctrl_shortcut_allowed(true, false));
        assert!(ctrl_shortcut_allowed(true, true));
    }
}
