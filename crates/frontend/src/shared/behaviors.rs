//! One idempotent pass that enhances a subtree, run over `<body>` at load and
//! over every subtree the page inserts afterwards.

use crate::forms;
use crate::layout::{accessibility, shortcuts};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord};

/// Enhance everything under `root`. Safe to call repeatedly: each behaviour
/// marks the elements it has handled.
pub fn attach_behaviors(root: &Element) {
    forms::attach(root);
    shortcuts::badges::attach(root);
    accessibility::attach(root);
}

fn on_mutations(records: js_sys::Array, _observer: MutationObserver) {
    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };
        let added = record.added_nodes();
        for i in 0..added.length() {
            if let Some(el) = added.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                attach_behaviors(&el);
            }
        }
    }
}

/// Watch `<body>` for inserted subtrees.
pub fn observe_body() -> Result<(), String> {
    let body = crate::shared::dom::body().ok_or("No document body")?;
    let callback = Closure::wrap(
        Box::new(on_mutations) as Box<dyn FnMut(js_sys::Array, MutationObserver)>
    );
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
        .map_err(|e| format!("MutationObserver unavailable: {:?}", e))?;
    callback.forget();

    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer
        .observe_with_options(&body, &options)
        .map_err(|e| format!("Failed to observe body: {:?}", e))
}
