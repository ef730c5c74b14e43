//! Short-lived Leptos views layered over the server-rendered page.
//!
//! Each view gets its own container under `<body>`. The unmount handle is
//! kept until the container is closed, so closing releases the view's owner,
//! effects and event handlers along with the DOM.

use leptos::mount::UnmountHandle;
use leptos::prelude::*;
use leptos::tachys::view::any_view::AnyViewState;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

const HOST_ID_ATTR: &str = "data-transient-id";

/// Live handles keyed by host id.
#[derive(Debug)]
pub struct Registry<H> {
    next_id: u32,
    live: HashMap<u32, H>,
}

impl<H> Registry<H> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            live: HashMap::new(),
        }
    }

    pub fn insert(&mut self, handle: H) -> u32 {
        self.next_id = self.next_id.wrapping_add(1);
        self.live.insert(self.next_id, handle);
        self.next_id
    }

    /// Hand back the handle for `id`; a second release of the same id is `None`.
    pub fn release(&mut self, id: u32) -> Option<H> {
        self.live.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

type Mounted = UnmountHandle<AnyViewState>;

thread_local! {
    static MOUNTED: RefCell<Registry<Mounted>> = RefCell::new(Registry::new());
}

/// Mount `view` into a fresh `<div class=host_class>` appended to `<body>`.
pub fn mount_transient<F, N>(host_class: &str, view: F) -> Option<HtmlElement>
where
    F: FnOnce() -> N + 'static,
    N: IntoView + 'static,
{
    let doc = super::dom::document()?;
    let body = doc.body()?;
    let host = doc.create_element("div").ok()?.dyn_into::<HtmlElement>().ok()?;
    host.set_class_name(host_class);
    body.append_child(&host).ok()?;
    let handle = leptos::mount::mount_to(host.clone(), move || view().into_any());
    let id = MOUNTED.with(|m| m.borrow_mut().insert(handle));
    let _ = host.set_attribute(HOST_ID_ATTR, &id.to_string());
    Some(host)
}

/// Unmount and remove a host created by [`mount_transient`].
///
/// The handle is dropped on the next tick: the caller is often one of the
/// view's own event handlers.
pub fn close_transient(host: &Element) {
    let handle = host
        .get_attribute(HOST_ID_ATTR)
        .and_then(|id| id.parse::<u32>().ok())
        .and_then(|id| MOUNTED.with(|m| m.borrow_mut().release(id)));
    host.remove();
    if let Some(handle) = handle {
        super::dom::after(0, move || drop(handle));
    }
}

/// Close the transient host that contains `el`.
pub fn close_host_of(el: &Element, host_class: &str) {
    if let Some(host) = super::dom::closest(el, &format!(".{}", host_class)) {
        close_transient(&host);
    }
}

/// Close every open host of `host_class`. Returns whether any was open.
pub fn close_all(host_class: &str) -> bool {
    let hosts = super::dom::query_all(&format!(".{}", host_class));
    for host in &hosts {
        close_transient(host);
    }
    !hosts.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Tracked(Rc<RefCell<u32>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_release_hands_back_each_handle_once() {
        let drops = Rc::new(RefCell::new(0));
        let mut registry = Registry::new();
        let a = registry.insert(Tracked(drops.clone()));
        let b = registry.insert(Tracked(drops.clone()));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        drop(registry.release(a));
        assert_eq!(*drops.borrow(), 1);
        assert!(registry.release(a).is_none());
        assert_eq!(registry.len(), 1);

        drop(registry.release(b));
        assert_eq!(*drops.borrow(), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_id_releases_nothing() {
        let mut registry: Registry<u8> = Registry::default();
        registry.insert(1);
        assert!(registry.release(99).is_none());
        assert_eq!(registry.len(), 1);
    }
}
