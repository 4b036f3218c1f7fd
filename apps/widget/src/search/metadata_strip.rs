//! Metadata strip showing result count and any filters that were ignored.

use dioxus::prelude::*;
use moviescope_core::ResultsState;

use crate::state::WidgetState;

#[component]
pub fn MetadataStrip() -> Element {
    let state = use_context::<WidgetState>();
    let issues: Vec<String> =
        state.pipeline.read().issues().iter().map(|issue| issue.to_string()).collect();
    let count = match state.view.read().state() {
        ResultsState::Results(links) => Some(links.len()),
        _ => None,
    };

    if count.is_none() && issues.is_empty() {
        return rsx! {
            div { class: "metadata-strip hidden" }
        };
    }

    rsx! {
        div {
            class: "metadata-strip",
            if let Some(count) = count {
                span { class: "metadata-count", "{count} results" }
            }
            for issue in issues {
                span { class: "metadata-sep", "\u{00B7}" }
                span { class: "metadata-issue", "{issue}, ignored" }
            }
        }
    }
}
