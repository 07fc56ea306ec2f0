//! Animated confidence bar.

use dioxus::prelude::*;

/// Props for the [`ConfidenceBar`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ConfidenceBarProps {
    /// Target fill, already clamped to 0..=100.
    percent: f64,
    /// How long the bar stays empty before filling.
    delay_ms: u32,
}

/// A bar that starts empty and fills to `percent` after `delay_ms`.
///
/// The parent gives each result its own key so a new result restarts
/// the animation from zero.
#[component]
pub fn ConfidenceBar(props: ConfidenceBarProps) -> Element {
    let mut width = use_signal(|| 0.0_f64);

    use_effect(move || {
        let target = props.percent;
        let delay = props.delay_ms;
        spawn(async move {
            gloo_timers::future::TimeoutFuture::new(delay).await;
            width.set(target);
        });
    });

    let fill = width();

    rsx! {
        div { class: "confidence-track",
            div {
                class: "confidence-fill",
                style: "width: {fill}%",
            }
        }
    }
}
