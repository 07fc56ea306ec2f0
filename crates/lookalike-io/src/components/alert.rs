//! Dismissible banner for errors and notices.

use dioxus::prelude::*;

use crate::view::{Alert, AlertKind};

const fn kind_class(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Invalid => "alert alert-invalid",
        AlertKind::Service => "alert alert-service",
        AlertKind::Connectivity => "alert alert-connectivity",
        AlertKind::Notice => "alert alert-notice",
    }
}

/// Props for the [`AlertBanner`] component.
#[derive(Props, Clone, PartialEq)]
pub struct AlertBannerProps {
    alert: Alert,
    on_dismiss: EventHandler<()>,
}

/// A banner showing one message with a close button.
#[component]
pub fn AlertBanner(props: AlertBannerProps) -> Element {
    let class = kind_class(props.alert.kind);
    let role = if props.alert.is_error() { "alert" } else { "status" };

    rsx! {
        div { class: "{class}", role: "{role}",
            span { "{props.alert.message}" }
            button {
                class: "alert-close",
                aria_label: "Dismiss",
                onclick: move |_| props.on_dismiss.call(()),
                "×"
            }
        }
    }
}
