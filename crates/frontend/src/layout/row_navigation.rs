//! Keyboard navigation over list rows, list quick actions and pagination.

use super::accessibility::scroll_to_center;
use crate::shared::dom::{self, closest};
use crate::shared::transient::{close_all, close_host_of, mount_transient};
use leptos::ev;
use leptos::prelude::*;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, KeyboardEvent};

const ROWS: &str = "table tbody tr, .list-item, .data-row";
const SELECTED_CLASS: &str = "keyboard-selected";
const HELP_HOST: &str = "keyboard-help-host";
const ADD_LINKS: &str = "a[href*=\"add\"], a[href*=\"new\"], .add-btn, .new-btn";
const EDIT_LINKS: &str = "a[href*=\"edit\"], a[href*=\"update\"], .btn-edit, .edit-btn";
const VIEW_LINKS: &str = "a[href*=\"detail\"], a[href*=\"view\"], .btn-view, .view-btn";
/// Approximate rendered row height used for PageUp/PageDown
const ROW_HEIGHT_PX: f64 = 50.0;

const HELP_ROWS: &[(&str, &str)] = &[
    ("↑/↓ or j/k", "Navigate rows"),
    ("Enter/Space", "Activate row"),
    ("Home/End", "First/Last row"),
    ("Page Up/Down", "Page navigation"),
    ("Ctrl + ←/→", "Previous/Next page"),
    ("Ctrl + N", "Add new item"),
    ("Ctrl + E", "Edit selected"),
    ("Ctrl + V", "View selected"),
    ("Ctrl + D", "Delete"),
    ("Escape", "Clear selection"),
    ("?", "Show this help"),
];

/// Selected row index over a list whose length may change between keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowCursor {
    index: Option<usize>,
}

impl RowCursor {
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Selection still valid for a list of `len` rows
    pub fn selected(&self, len: usize) -> Option<usize> {
        self.index.filter(|i| *i < len)
    }

    fn set(&mut self, index: usize, len: usize) -> Option<usize> {
        if len == 0 {
            self.index = None;
        } else {
            self.index = Some(index.min(len - 1));
        }
        self.index
    }

    pub fn down(&mut self, len: usize) -> Option<usize> {
        let next = self.selected(len).map_or(0, |i| i + 1);
        self.set(next, len)
    }

    pub fn up(&mut self, len: usize) -> Option<usize> {
        let prev = self.selected(len).map_or(0, |i| i.saturating_sub(1));
        self.set(prev, len)
    }

    pub fn first(&mut self, len: usize) -> Option<usize> {
        self.set(0, len)
    }

    pub fn last(&mut self, len: usize) -> Option<usize> {
        self.set(len.saturating_sub(1), len)
    }

    pub fn page_down(&mut self, len: usize, page: usize) -> Option<usize> {
        let from = self.selected(len).unwrap_or(0);
        self.set(from + page.max(1), len)
    }

    pub fn page_up(&mut self, len: usize, page: usize) -> Option<usize> {
        let from = self.selected(len).unwrap_or(0);
        self.set(from.saturating_sub(page.max(1)), len)
    }

    pub fn clear(&mut self) {
        self.index = None;
    }
}

/// Plain (unmodified) keys the row list reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKey {
    Down,
    Up,
    First,
    Last,
    PageDown,
    PageUp,
    Activate,
    Clear,
}

impl RowKey {
    /// `None` for unrelated keys and for keys another handler already consumed.
    pub fn classify(key: &str, default_prevented: bool) -> Option<Self> {
        if default_prevented {
            return None;
        }
        match key {
            "ArrowDown" | "j" => Some(RowKey::Down),
            "ArrowUp" | "k" => Some(RowKey::Up),
            "Home" => Some(RowKey::First),
            "End" => Some(RowKey::Last),
            "PageDown" => Some(RowKey::PageDown),
            "PageUp" => Some(RowKey::PageUp),
            "Enter" | " " => Some(RowKey::Activate),
            "Escape" => Some(RowKey::Clear),
            _ => None,
        }
    }
}

thread_local! {
    static CURSOR: RefCell<RowCursor> = RefCell::new(RowCursor::default());
}

fn rows() -> Vec<Element> {
    dom::query_all(ROWS)
        .into_iter()
        .filter(|row| {
            let classes = row.class_list();
            !classes.contains("empty-message")
                && !classes.contains("header-row")
                && row.dyn_ref::<HtmlElement>().is_some_and(dom::is_visible)
        })
        .collect()
}

fn highlight(rows: &[Element], selected: Option<usize>) {
    for (i, row) in rows.iter().enumerate() {
        dom::set_class(row, SELECTED_CLASS, Some(i) == selected);
    }
    if let Some(row) = selected.and_then(|i| rows.get(i)) {
        scroll_to_center(row);
    }
}

fn click_first(scope: Option<&Element>, selector: &str) -> bool {
    let found = match scope {
        Some(scope) => scope.query_selector(selector).ok().flatten(),
        None => dom::query(selector),
    };
    match found.and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
        Some(el) => {
            el.click();
            true
        }
        None => false,
    }
}

/// Pagination links are recognised by their arrow icon
fn click_pager(icon: &str) -> bool {
    dom::query(icon)
        .and_then(|icon| closest(&icon, "a"))
        .and_then(|a| a.dyn_into::<HtmlElement>().ok())
        .map(|a| a.click())
        .is_some()
}

#[component]
fn KeyboardHelp() -> impl IntoView {
    let close = move |ev: ev::MouseEvent| {
        if let Some(el) = dom::event_element(&ev) {
            close_host_of(&el, HELP_HOST);
        }
    };

    view! {
        <div class="keyboard-help-overlay">
            <div class="keyboard-help" role="dialog" aria-label="Keyboard Shortcuts">
                <h3>"Keyboard Shortcuts"</h3>
                <div class="keyboard-help-grid">
                    {HELP_ROWS
                        .iter()
                        .map(|(keys, what)| view! {
                            <strong>{*keys}</strong>
                            <span>{*what}</span>
                        })
                        .collect_view()}
                </div>
                <button type="button" class="btn btn-primary" on:click=close>"Close"</button>
            </div>
        </div>
    }
}

fn show_help() {
    if dom::query(&format!(".{}", HELP_HOST)).is_some() {
        return;
    }
    mount_transient(HELP_HOST, || view! { <KeyboardHelp /> });
}

fn close_help() -> bool {
    close_all(HELP_HOST)
}

fn on_ctrl_key(ev: &KeyboardEvent, rows: &[Element]) {
    let selected = CURSOR.with(|c| c.borrow().selected(rows.len()));
    let row = selected.and_then(|i| rows.get(i));
    let handled = match ev.key().as_str() {
        "ArrowLeft" => click_pager("a .fa-angle-left"),
        "ArrowRight" => click_pager("a .fa-angle-right"),
        "n" => click_first(None, ADD_LINKS),
        "e" => row.is_some_and(|r| click_first(Some(r), EDIT_LINKS)),
        "v" => row.is_some_and(|r| click_first(Some(r), VIEW_LINKS)),
        _ => false,
    };
    if handled {
        ev.prevent_default();
    }
}

fn on_keydown(ev: Event) {
    if dom::is_typing_target(&ev) {
        return;
    }
    let Some(key_ev) = ev.dyn_ref::<KeyboardEvent>() else {
        return;
    };
    if key_ev.alt_key() || key_ev.meta_key() {
        return;
    }
    if key_ev.key() == "?" {
        ev.prevent_default();
        show_help();
        return;
    }
    if key_ev.key() == "Escape" && close_help() {
        return;
    }

    let rows = rows();
    if key_ev.ctrl_key() {
        on_ctrl_key(key_ev, &rows);
        return;
    }
    if rows.is_empty() {
        return;
    }
    let Some(row_key) = RowKey::classify(&key_ev.key(), ev.default_prevented()) else {
        return;
    };

    let len = rows.len();
    let page = (dom::inner_height() / ROW_HEIGHT_PX).floor() as usize;
    let moved = CURSOR.with(|c| {
        let mut cursor = c.borrow_mut();
        match row_key {
            RowKey::Down => Some(cursor.down(len)),
            RowKey::Up => Some(cursor.up(len)),
            RowKey::First => Some(cursor.first(len)),
            RowKey::Last => Some(cursor.last(len)),
            RowKey::PageDown => Some(cursor.page_down(len, page)),
            RowKey::PageUp => Some(cursor.page_up(len, page)),
            RowKey::Activate | RowKey::Clear => None,
        }
    });
    if let Some(selected) = moved {
        ev.prevent_default();
        highlight(&rows, selected);
        return;
    }

    match row_key {
        RowKey::Activate => {
            let Some(row) = CURSOR.with(|c| c.borrow().selected(len)).and_then(|i| rows.get(i)) else {
                return;
            };
            ev.prevent_default();
            if !click_first(Some(row), "a[href]") {
                click_first(Some(row), "button");
            }
        }
        RowKey::Clear => {
            CURSOR.with(|c| c.borrow_mut().clear());
            highlight(&rows, None);
        }
        _ => {}
    }
}

pub fn init() {
    dom::listen_document("keydown", on_keydown);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_starts_at_first_row_and_stops_at_last() {
        let mut cursor = RowCursor::default();
        assert_eq!(cursor.down(3), Some(0));
        assert_eq!(cursor.down(3), Some(1));
        assert_eq!(cursor.down(3), Some(2));
        assert_eq!(cursor.down(3), Some(2));
    }

    #[test]
    fn test_up_stops_at_first_row() {
        let mut cursor = RowCursor::default();
        assert_eq!(cursor.up(3), Some(0));
        cursor.last(3);
        assert_eq!(cursor.up(3), Some(1));
        assert_eq!(cursor.up(3), Some(0));
        assert_eq!(cursor.up(3), Some(0));
    }

    #[test]
    fn test_paging_clamps() {
        let mut cursor = RowCursor::default();
        assert_eq!(cursor.page_down(30, 12), Some(12));
        assert_eq!(cursor.page_down(30, 12), Some(24));
        assert_eq!(cursor.page_down(30, 12), Some(29));
        assert_eq!(cursor.page_up(30, 12), Some(17));
        assert_eq!(cursor.page_up(30, 100), Some(0));
    }

    #[test]
    fn test_selection_dropped_when_list_shrinks() {
        let mut cursor = RowCursor::default();
        cursor.last(10);
        assert_eq!(cursor.selected(10), Some(9));
        assert_eq!(cursor.selected(5), None);
        assert_eq!(cursor.down(5), Some(0));
    }

    #[test]
    fn test_keys_consumed_elsewhere_are_ignored() {
        assert_eq!(RowKey::classify("Enter", false), Some(RowKey::Activate));
        assert_eq!(RowKey::classify(" ", false), Some(RowKey::Activate));
        assert_eq!(RowKey::classify("Enter", true), None);
        assert_eq!(RowKey::classify("j", true), None);
        assert_eq!(RowKey::classify("k", false), Some(RowKey::Up));
        assert_eq!(RowKey::classify("x", false), None);
    }

    #[test]
    fn test_empty_list_has_no_selection() {
        let mut cursor = RowCursor::default();
        assert_eq!(cursor.down(0), None);
        assert_eq!(cursor.last(0), None);
        cursor.first(4);
        cursor.clear();
        assert_eq!(cursor.index(), None);
    }
}
