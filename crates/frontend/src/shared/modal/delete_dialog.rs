//! Blocking delete confirmation.
//!
//! While a dialog is open it owns the keyboard through a capture-phase
//! `keydown` listener on the document. Every way out of the dialog hands its
//! [`Session`] to [`release`], which removes that listener and unmounts the
//! view.

use crate::shared::api_utils::{csrf_token, post_with_csrf};
use crate::shared::dom::{self, closest};
use crate::shared::transient::{close_host_of, close_transient, mount_transient};
use leptos::ev;
use leptos::prelude::*;
use std::cell::RefCell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, HtmlAnchorElement, HtmlElement, KeyboardEvent};

const DIALOG_HOST: &str = "delete-dialog-host";
const LOADING_HOST: &str = "delete-loading-host";
const NOTICE_HOST: &str = "delete-notice-host";
const CONFIRM_ID: &str = "deleteDialogConfirm";
const CANCEL_ID: &str = "deleteDialogCancel";
const NOTICE_MS: u32 = 2000;

/// Controls Ctrl+D looks for, in priority order
const DELETE_CONTROLS: &[&str] = &[
    "[data-delete-url]",
    "a[href*=\"delete\"]",
    "button[onclick*=\"delete\"]",
    ".delete-btn",
    ".btn-delete",
    ".delete-button",
    "[data-action=\"delete\"]",
    ".fa-trash",
    ".fa-trash-alt",
];

const ROW_CONTEXT: &str = "tr, .item, .card, .list-item";
const ROW_NAME: &str = ".name, .title, .product-name, .customer-name, .supplier-name";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteRequest {
    pub item_type: String,
    pub item_id: String,
    pub item_name: String,
    pub delete_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Delete,
    Cancel,
}

impl Focus {
    fn element_id(&self) -> &'static str {
        match self {
            Focus::Delete => CONFIRM_ID,
            Focus::Cancel => CANCEL_ID,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Confirm,
    Cancel,
}

/// Result of a keypress while the dialog listener is installed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyResult {
    /// No dialog is open; the key is not ours
    Inactive,
    /// The dialog closes with this outcome
    Exit(Outcome),
    /// Focus moved to this button
    Moved(Focus),
    /// Swallowed without effect
    Swallow,
}

/// Keyboard state of the (single) dialog.
#[derive(Debug, Default)]
pub struct DialogState {
    focus: Option<Focus>,
}

impl DialogState {
    /// Start a session with Delete focused. Returns `true` if one was
    /// already open and must be torn down first.
    pub fn open(&mut self) -> bool {
        self.focus.replace(Focus::Delete).is_some()
    }

    pub fn is_open(&self) -> bool {
        self.focus.is_some()
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn close(&mut self) {
        self.focus = None;
    }

    pub fn key(&mut self, key: &str) -> KeyResult {
        let Some(focus) = self.focus else {
            return KeyResult::Inactive;
        };
        match key {
            "Escape" => {
                self.close();
                KeyResult::Exit(Outcome::Cancel)
            }
            "Enter" => {
                self.close();
                KeyResult::Exit(Outcome::Confirm)
            }
            "Tab" => {
                let next = match focus {
                    Focus::Delete => Focus::Cancel,
                    Focus::Cancel => Focus::Delete,
                };
                self.focus = Some(next);
                KeyResult::Moved(next)
            }
            _ => KeyResult::Swallow,
        }
    }
}

/// The open dialog's keyboard state together with the resources it holds.
///
/// Whatever closes the dialog hands the session back exactly once so the
/// caller can release it.
#[derive(Debug)]
pub struct DialogSession<S> {
    state: DialogState,
    session: Option<S>,
}

impl<S> DialogSession<S> {
    pub const fn new() -> Self {
        Self {
            state: DialogState { focus: None },
            session: None,
        }
    }

    /// Take ownership of `session`. Returns the session it replaces.
    pub fn begin(&mut self, session: S) -> Option<S> {
        self.state.open();
        self.session.replace(session)
    }

    pub fn focus(&self) -> Option<Focus> {
        self.state.focus()
    }

    /// Feed a key; on exit the session comes back with the result.
    pub fn key(&mut self, key: &str) -> (KeyResult, Option<S>) {
        let result = self.state.key(key);
        let released = match result {
            KeyResult::Exit(_) => self.session.take(),
            _ => None,
        };
        (result, released)
    }

    /// Close from outside the keyboard path (buttons, overlay, reopen).
    pub fn end(&mut self) -> Option<S> {
        self.state.close();
        self.session.take()
    }
}

impl<S> Default for DialogSession<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Where to go after a successful delete
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterDelete {
    Navigate(&'static str),
    Reload,
}

pub fn after_delete(delete_url: &str) -> AfterDelete {
    for list in ["/products/", "/customers/", "/suppliers/"] {
        if delete_url.contains(list) {
            return AfterDelete::Navigate(list);
        }
    }
    AfterDelete::Reload
}

/// Item type guessed from a URL or path
pub fn infer_item_type(url: &str) -> &'static str {
    const KINDS: &[(&str, &str)] = &[
        ("product", "Product"),
        ("customer", "Customer"),
        ("supplier", "Supplier"),
        ("invoice", "Invoice"),
        ("user", "User"),
    ];
    KINDS
        .iter()
        .find(|(needle, _)| url.contains(needle))
        .map(|(_, kind)| *kind)
        .unwrap_or("Item")
}

/// First quoted string containing "delete" in an inline `onclick` handler.
pub fn url_from_onclick(onclick: &str) -> Option<String> {
    let mut rest = onclick;
    while let Some(start) = rest.find(['\'', '"']) {
        let quote = rest[start..].chars().next()?;
        let after = &rest[start + 1..];
        let end = after.find(quote)?;
        let candidate = &after[..end];
        if candidate.contains("delete") {
            return Some(candidate.to_string());
        }
        rest = &after[end + 1..];
    }
    None
}

/// Fixed delete endpoints exposed to page templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteTarget {
    Customer,
    Supplier,
    Product,
    Invoice,
    SalesInvoice,
    User,
}

impl DeleteTarget {
    pub fn all() -> &'static [DeleteTarget] {
        &[
            DeleteTarget::Customer,
            DeleteTarget::Supplier,
            DeleteTarget::Product,
            DeleteTarget::Invoice,
            DeleteTarget::SalesInvoice,
            DeleteTarget::User,
        ]
    }

    pub fn global_name(&self) -> &'static str {
        match self {
            DeleteTarget::Customer => "confirmDeleteCustomer",
            DeleteTarget::Supplier => "confirmDeleteSupplier",
            DeleteTarget::Product => "confirmDeleteProduct",
            DeleteTarget::Invoice => "confirmDeleteInvoice",
            DeleteTarget::SalesInvoice => "confirmDeleteSalesInvoice",
            DeleteTarget::User => "confirmDeleteUser",
        }
    }

    /// `label` is the item's name, or its number for invoices. Sales
    /// invoices are addressed by number alone.
    pub fn request(&self, id: &str, label: Option<&str>) -> DeleteRequest {
        let (item_type, segment) = match self {
            DeleteTarget::Customer => ("Customer", "customers"),
            DeleteTarget::Supplier => ("Supplier", "suppliers"),
            DeleteTarget::Product => ("Product", "products"),
            DeleteTarget::Invoice => ("Invoice", "invoices"),
            DeleteTarget::SalesInvoice => ("Sales Invoice", "sales"),
            DeleteTarget::User => ("User", "users"),
        };
        let label = label.unwrap_or(id);
        let item_name = match self {
            DeleteTarget::Invoice | DeleteTarget::SalesInvoice => format!("#{}", label),
            _ => label.to_string(),
        };
        DeleteRequest {
            item_type: item_type.to_string(),
            item_id: id.to_string(),
            item_name,
            delete_url: format!("/{}/{}/delete/", segment, id),
        }
    }
}

struct Session {
    host: HtmlElement,
    listener: Closure<dyn FnMut(Event)>,
    delete_url: String,
}

thread_local! {
    static DIALOG: RefCell<DialogSession<Session>> = const { RefCell::new(DialogSession::new()) };
}

/// Remove the capture listener and unmount the dialog. Returns its delete URL.
fn release(session: Session) -> String {
    let Session { host, listener, delete_url } = session;
    if let Some(doc) = dom::document() {
        let _ = doc.remove_event_listener_with_callback_and_bool(
            "keydown",
            listener.as_ref().unchecked_ref(),
            true,
        );
    }
    close_transient(&host);
    // The listener may be the caller; drop it on the next tick
    dom::after(0, move || drop(listener));
    delete_url
}

fn conclude(outcome: Outcome, session: Session) {
    let url = release(session);
    match outcome {
        Outcome::Cancel => log::debug!("Delete cancelled"),
        Outcome::Confirm => perform_delete(url),
    }
}

fn finish(outcome: Outcome) {
    if let Some(session) = DIALOG.with(|d| d.borrow_mut().end()) {
        conclude(outcome, session);
    }
}

fn focus_button(focus: Focus) {
    for other in [Focus::Delete, Focus::Cancel] {
        if let Some(button) = dom::by_id::<HtmlElement>(other.element_id()) {
            dom::set_class(&button, "focused", other == focus);
            if other == focus {
                let _ = button.focus();
            }
        }
    }
}

fn on_dialog_keydown(ev: Event) {
    let Some(key_ev) = ev.dyn_ref::<KeyboardEvent>() else {
        return;
    };
    let (result, released) = DIALOG.with(|d| d.borrow_mut().key(&key_ev.key()));
    if result == KeyResult::Inactive {
        return;
    }
    ev.stop_propagation();
    match result {
        KeyResult::Exit(outcome) => {
            ev.prevent_default();
            if let Some(session) = released {
                conclude(outcome, session);
            }
        }
        KeyResult::Moved(focus) => {
            ev.prevent_default();
            focus_button(focus);
        }
        KeyResult::Swallow | KeyResult::Inactive => {}
    }
}

#[component]
fn DeleteDialog(item_type: String, item_name: String) -> impl IntoView {
    let on_overlay = move |ev: ev::MouseEvent| {
        let outside = dom::event_element(&ev).is_some_and(|el| closest(&el, ".delete-dialog").is_none());
        if outside {
            finish(Outcome::Cancel);
        }
    };
    let on_cancel = move |ev: ev::MouseEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        finish(Outcome::Cancel);
    };
    let on_confirm = move |ev: ev::MouseEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        finish(Outcome::Confirm);
    };
    let type_lower = item_type.to_lowercase();

    view! {
        <div class="delete-dialog-overlay" on:click=on_overlay>
            <div class="delete-dialog" role="alertdialog" aria-modal="true">
                <div class="delete-dialog-icon">
                    <i class="fas fa-exclamation-triangle"></i>
                </div>
                <h3>{format!("Delete {}", item_type)}</h3>
                <p>
                    "Are you sure you want to delete " {type_lower} " "
                    <strong>{item_name}</strong>
                    "? This action cannot be undone."
                </p>
                <div class="delete-dialog-hint">
                    "Press " <kbd>"Enter"</kbd> " to confirm or " <kbd>"Esc"</kbd> " to cancel"
                </div>
                <div class="delete-dialog-actions">
                    <button id=CANCEL_ID type="button" class="btn btn-success" on:click=on_cancel>
                        "Cancel"
                    </button>
                    <button id=CONFIRM_ID type="button" class="btn btn-outline-danger focused" on:click=on_confirm>
                        "Delete"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Open the dialog for `request`, replacing any dialog already open.
pub fn open(request: DeleteRequest) {
    if let Some(previous) = DIALOG.with(|d| d.borrow_mut().end()) {
        release(previous);
    }

    let DeleteRequest { item_type, item_name, delete_url, .. } = request;
    let Some(host) = mount_transient(DIALOG_HOST, move || {
        view! { <DeleteDialog item_type item_name /> }
    }) else {
        return;
    };

    let listener = Closure::wrap(Box::new(on_dialog_keydown) as Box<dyn FnMut(Event)>);
    if let Some(doc) = dom::document() {
        let _ = doc.add_event_listener_with_callback_and_bool(
            "keydown",
            listener.as_ref().unchecked_ref(),
            true,
        );
    }
    let replaced = DIALOG.with(|d| d.borrow_mut().begin(Session { host, listener, delete_url }));
    if let Some(replaced) = replaced {
        release(replaced);
    }

    dom::after(100, || {
        if DIALOG.with(|d| d.borrow().focus()) == Some(Focus::Delete) {
            focus_button(Focus::Delete);
        }
    });
}

fn perform_delete(url: String) {
    let overlay = mount_transient(LOADING_HOST, || {
        view! {
            <div class="delete-loading-overlay">
                <div class="spinner-border text-light" role="status"></div>
                <div>"Deleting..."</div>
            </div>
        }
    });
    let token = csrf_token().unwrap_or_default();
    if token.is_empty() {
        log::warn!("No CSRF token found for {}", url);
    }

    wasm_bindgen_futures::spawn_local(async move {
        match post_with_csrf(&url, &token).await {
            Ok(()) => {
                log::info!("Deleted via {}", url);
                match after_delete(&url) {
                    AfterDelete::Navigate(path) => dom::navigate(path),
                    AfterDelete::Reload => dom::reload(),
                }
            }
            Err(e) => {
                log::error!("Delete failed for {}: {}", url, e);
                if let Some(overlay) = overlay {
                    close_transient(&overlay);
                }
                dom::alert(&format!("Error deleting item: {}", e));
            }
        }
    });
}

fn show_no_delete_notice() {
    let close = |el: Option<Element>| {
        if let Some(el) = el {
            close_host_of(&el, NOTICE_HOST);
        }
    };
    let Some(host) = mount_transient(NOTICE_HOST, move || {
        view! {
            <div
                class="delete-dialog-overlay"
                tabindex="-1"
                on:click=move |ev: ev::MouseEvent| close(dom::event_element(&ev))
                on:keydown=move |ev: ev::KeyboardEvent| {
                    if ev.key() == "Escape" {
                        close(dom::event_element(&ev));
                    }
                }
            >
                <div class="delete-dialog delete-dialog--notice">
                    <div class="delete-dialog-icon text-info">
                        <i class="fas fa-info-circle"></i>
                    </div>
                    <p>"No delete action available on this page"</p>
                    <small>"Press Esc to close"</small>
                </div>
            </div>
        }
    }) else {
        return;
    };
    if let Some(Ok(overlay)) = host.first_element_child().map(|el| el.dyn_into::<HtmlElement>()) {
        let _ = overlay.focus();
    }
    dom::after(NOTICE_MS, move || close_transient(&host));
}

/// The element that carries the delete target for a matched control.
fn control_element(matched: Element) -> Element {
    if matched.class_list().contains("fa-trash") || matched.class_list().contains("fa-trash-alt") {
        closest(&matched, "a, button, [data-delete-url]").unwrap_or(matched)
    } else {
        matched
    }
}

fn first_visible_control() -> Option<Element> {
    DELETE_CONTROLS
        .iter()
        .flat_map(|selector| dom::query_all(selector))
        .map(control_element)
        .find(|el| el.dyn_ref::<HtmlElement>().is_some_and(dom::is_visible))
}

fn control_url(control: &Element) -> Option<String> {
    control
        .get_attribute("data-delete-url")
        .or_else(|| control.dyn_ref::<HtmlAnchorElement>().map(|a| a.href()))
        .filter(|url| !url.is_empty())
        .or_else(|| control.get_attribute("onclick").and_then(|js| url_from_onclick(&js)))
}

fn request_for_control(control: &Element, delete_url: String) -> DeleteRequest {
    let attr = |name: &str| control.get_attribute(name).filter(|v| !v.trim().is_empty());

    let item_name = attr("data-item-name")
        .or_else(|| attr("data-name"))
        .or_else(|| {
            closest(control, ROW_CONTEXT)
                .and_then(|row| row.query_selector(ROW_NAME).ok().flatten())
                .and_then(|cell| cell.text_content())
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
        })
        .unwrap_or_else(|| "this item".to_string());

    let item_type = attr("data-item-type").unwrap_or_else(|| {
        let kind = infer_item_type(&delete_url);
        if kind == "Item" {
            infer_item_type(&dom::current_path()).to_string()
        } else {
            kind.to_string()
        }
    });

    DeleteRequest {
        item_type,
        item_id: attr("data-item-id").unwrap_or_default(),
        item_name,
        delete_url,
    }
}

/// Ctrl+D: confirm the first visible delete control on the page.
pub fn open_for_page() {
    let Some(control) = first_visible_control() else {
        show_no_delete_notice();
        return;
    };
    match control_url(&control) {
        Some(url) => open(request_for_control(&control, url)),
        None => {
            if let Some(el) = control.dyn_ref::<HtmlElement>() {
                el.click();
            }
        }
    }
}

/// Route clicks on `[data-delete-url]` controls through the dialog.
fn on_document_click(ev: Event) {
    let Some(target) = dom::event_element(&ev) else {
        return;
    };
    let Some(control) = closest(&target, "[data-delete-url]") else {
        return;
    };
    let Some(url) = control.get_attribute("data-delete-url") else {
        return;
    };
    ev.prevent_default();
    open(request_for_control(&control, url));
}

fn js_arg(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.as_f64().map(|n| n.to_string()))
        .unwrap_or_default()
}

fn opt_js_arg(value: &JsValue) -> Option<String> {
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(js_arg(value))
    }
}

/// Publish a global function on `window` for inline template handlers.
fn expose(name: &str, closure: Closure<dyn FnMut(JsValue, JsValue, JsValue, JsValue)>) {
    if let Some(window) = web_sys::window() {
        let _ = js_sys::Reflect::set(&window, &JsValue::from_str(name), closure.as_ref());
    }
    closure.forget();
}

pub fn init() {
    dom::listen_document("click", on_document_click);

    expose(
        "confirmDelete",
        Closure::wrap(Box::new(|item_type: JsValue, id: JsValue, name: JsValue, url: JsValue| {
            open(DeleteRequest {
                item_type: js_arg(&item_type),
                item_id: js_arg(&id),
                item_name: js_arg(&name),
                delete_url: js_arg(&url),
            });
        }) as Box<dyn FnMut(JsValue, JsValue, JsValue, JsValue)>),
    );

    for target in DeleteTarget::all() {
        let target = *target;
        expose(
            target.global_name(),
            Closure::wrap(Box::new(move |id: JsValue, label: JsValue, _: JsValue, _: JsValue| {
                open(target.request(&js_arg(&id), opt_js_arg(&label).as_deref()));
            }) as Box<dyn FnMut(JsValue, JsValue, JsValue, JsValue)>),
        );
    }
    log::info!("Delete dialog ready");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_then_enter_has_no_effect() {
        let mut state = DialogState::default();
        assert!(!state.open());
        assert_eq!(state.key("Escape"), KeyResult::Exit(Outcome::Cancel));
        assert!(!state.is_open());
        assert_eq!(state.key("Enter"), KeyResult::Inactive);
    }

    #[test]
    fn test_enter_confirms_once() {
        let mut state = DialogState::default();
        state.open();
        assert_eq!(state.key("Enter"), KeyResult::Exit(Outcome::Confirm));
        assert_eq!(state.key("Enter"), KeyResult::Inactive);
    }

    #[test]
    fn test_tab_toggles_focus() {
        let mut state = DialogState::default();
        state.open();
        assert_eq!(state.focus(), Some(Focus::Delete));
        assert_eq!(state.key("Tab"), KeyResult::Moved(Focus::Cancel));
        assert_eq!(state.key("Tab"), KeyResult::Moved(Focus::Delete));
        assert_eq!(state.key("x"), KeyResult::Swallow);
        assert!(state.is_open());
    }

    #[test]
    fn test_reopen_reports_existing_session() {
        let mut state = DialogState::default();
        state.open();
        state.key("Tab");
        assert!(state.open());
        assert_eq!(state.focus(), Some(Focus::Delete));
    }

    #[test]
    fn test_escape_releases_session_once() {
        let mut dialog = DialogSession::new();
        assert!(dialog.begin("listener+mount").is_none());
        assert_eq!(dialog.key("Tab"), (KeyResult::Moved(Focus::Cancel), None));
        assert_eq!(
            dialog.key("Escape"),
            (KeyResult::Exit(Outcome::Cancel), Some("listener+mount"))
        );
        assert_eq!(dialog.key("Enter"), (KeyResult::Inactive, None));
        assert_eq!(dialog.end(), None);
    }

    #[test]
    fn test_confirm_releases_session() {
        let mut dialog = DialogSession::new();
        dialog.begin(7);
        assert_eq!(dialog.key("x"), (KeyResult::Swallow, None));
        assert_eq!(dialog.key("Enter"), (KeyResult::Exit(Outcome::Confirm), Some(7)));
        assert_eq!(dialog.focus(), None);
    }

    #[test]
    fn test_button_close_and_reopen_release_previous() {
        let mut dialog = DialogSession::new();
        dialog.begin(1);
        assert_eq!(dialog.begin(2), Some(1));
        assert_eq!(dialog.focus(), Some(Focus::Delete));
        assert_eq!(dialog.end(), Some(2));
        assert_eq!(dialog.key("Escape"), (KeyResult::Inactive, None));
    }

    #[test]
    fn test_after_delete() {
        assert_eq!(after_delete("/products/7/delete/"), AfterDelete::Navigate("/products/"));
        assert_eq!(after_delete("/customers/3/delete/"), AfterDelete::Navigate("/customers/"));
        assert_eq!(after_delete("/suppliers/3/delete/"), AfterDelete::Navigate("/suppliers/"));
        assert_eq!(after_delete("/invoices/9/delete/"), AfterDelete::Reload);
    }

    #[test]
    fn test_target_requests() {
        let req = DeleteTarget::Invoice.request("12", Some("INV-7"));
        assert_eq!(req.item_type, "Invoice");
        assert_eq!(req.item_name, "#INV-7");
        assert_eq!(req.delete_url, "/invoices/12/delete/");

        let req = DeleteTarget::SalesInvoice.request("55", None);
        assert_eq!(req.item_name, "#55");
        assert_eq!(req.delete_url, "/sales/55/delete/");

        let req = DeleteTarget::Customer.request("3", Some("Ravi"));
        assert_eq!(req.item_name, "Ravi");
        assert_eq!(req.delete_url, "/customers/3/delete/");
    }

    #[test]
    fn test_infer_item_type() {
        assert_eq!(infer_item_type("/products/1/delete/"), "Product");
        assert_eq!(infer_item_type("/users/1/delete/"), "User");
        assert_eq!(infer_item_type("/sales-returns/1/delete/"), "Item");
    }

    #[test]
    fn test_url_from_onclick() {
        assert_eq!(
            url_from_onclick("confirmDelete('Batch', 4, \"B-4\", '/batches/4/delete/')").as_deref(),
            Some("/batches/4/delete/")
        );
        assert_eq!(url_from_onclick("doSomething('x')"), None);
        assert_eq!(url_from_onclick("broken('delete"), None);
    }
}
