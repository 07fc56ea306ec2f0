//! Results panel: placeholder, loading spinner, or the match card.

use dioxus::prelude::*;
use lookalike_core::MatchResult;

use super::ConfidenceBar;
use crate::view::ResultsPanel;

/// Props for the [`Results`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultsProps {
    panel: ResultsPanel,
    /// Delay before the confidence bar fills.
    animation_delay_ms: u32,
    on_share: EventHandler<()>,
    on_retry: EventHandler<()>,
}

/// Shows whatever the current results panel holds.
#[component]
pub fn Results(props: ResultsProps) -> Element {
    match props.panel {
        ResultsPanel::Placeholder => rsx! {
            div { class: "results-placeholder",
                p { "Your doppelgänger will appear here" }
            }
        },
        ResultsPanel::Loading => rsx! {
            div { class: "results-loading",
                div { class: "spinner" }
                p { "Searching the database..." }
            }
        },
        ResultsPanel::Match(result) => {
            let name = result.display_name();
            let percent = result.confidence_bar_percent();
            let confidence = result.confidence_text();
            let image_url = result.image_url().to_owned();
            let subtitle = MatchResult::SUBTITLE;
            rsx! {
                div { class: "match-card",
                    img {
                        class: "match-image",
                        src: "{image_url}",
                        alt: "{name}",
                    }
                    h2 { class: "match-name", "{name}" }
                    p { class: "match-subtitle", "{subtitle}" }

                    if let Some(text) = confidence {
                        div { class: "match-confidence",
                            span { "{text}" }
                            ConfidenceBar {
                                key: "{image_url}",
                                percent,
                                delay_ms: props.animation_delay_ms,
                            }
                        }
                    }

                    if let Some(roast) = result.roast_message() {
                        p { class: "match-roast", "{roast}" }
                    }

                    div { class: "match-actions",
                        button {
                            class: "btn btn-secondary",
                            onclick: move |_| props.on_share.call(()),
                            "Share"
                        }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| props.on_retry.call(()),
                            "Try another"
                        }
                    }
                }
            }
        }
    }
}
