use super::transient::{close_host_of, close_transient, mount_transient};
use leptos::ev;
use leptos::prelude::*;

const TOAST_HOST: &str = "toast-host";
const TOAST_MS: u32 = 5000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn alert_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "alert-success",
            ToastKind::Error => "alert-danger",
            ToastKind::Info => "alert-info",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "fa-check-circle",
            ToastKind::Error => "fa-exclamation-circle",
            ToastKind::Info => "fa-info-circle",
        }
    }
}

#[component]
fn Toast(kind: ToastKind, message: String) -> impl IntoView {
    let close = move |ev: ev::MouseEvent| {
        if let Some(el) = super::dom::event_element(&ev) {
            close_host_of(&el, TOAST_HOST);
        }
    };

    view! {
        <div
            class=format!("alert {} alert-dismissible toast-notification", kind.alert_class())
            role="alert"
        >
            <i class=format!("fas {} me-2", kind.icon())></i>
            {message}
            <button type="button" class="btn-close" aria-label="Close" on:click=close></button>
        </div>
    }
}

/// Show a dismissible toast for five seconds.
pub fn show_toast(kind: ToastKind, message: impl Into<String>) {
    let message = message.into();
    let Some(host) = mount_transient(TOAST_HOST, move || view! { <Toast kind message /> }) else {
        log::warn!("No document body; {:?} toast dropped", kind);
        return;
    };
    super::dom::after(TOAST_MS, move || close_transient(&host));
}

pub fn toast_success(message: impl Into<String>) {
    show_toast(ToastKind::Success, message);
}

pub fn toast_error(message: impl Into<String>) {
    show_toast(ToastKind::Error, message);
}

pub fn toast_info(message: impl Into<String>) {
    show_toast(ToastKind::Info, message);
}
