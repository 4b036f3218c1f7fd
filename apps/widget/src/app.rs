//! Root application component — search form above the results list.

use dioxus::prelude::*;
use moviescope_core::render::LOADING_TEXT;
use moviescope_core::{ResultsState, WidgetConfig};

use crate::search::SearchPanel;
use crate::state::WidgetState;

static WIDGET_CSS: Asset = asset!("/assets/styles/widget.css");

#[component]
pub fn App() -> Element {
    let config = try_use_context::<WidgetConfig>().unwrap_or_default();
    use_context_provider(|| WidgetState::new(&config));

    rsx! {
        document::Stylesheet { href: WIDGET_CSS }

        div {
            class: "widget-shell",
            SearchPanel {}
            ResultsList {}
        }
    }
}

/// The `results` container: a loading line, an error line, or one link per title.
#[component]
fn ResultsList() -> Element {
    let state = use_context::<WidgetState>();
    let view = state.view.read();

    match view.state() {
        ResultsState::Empty => rsx! {
            div { id: "results", class: "results-list empty" }
        },
        ResultsState::Loading => rsx! {
            div {
                id: "results",
                class: "results-list",
                div { class: "results-loading", "{LOADING_TEXT}" }
            }
        },
        ResultsState::Failed(message) => rsx! {
            div {
                id: "results",
                class: "results-list",
                div { class: "results-error", "{message}" }
            }
        },
        ResultsState::Results(links) => rsx! {
            div {
                id: "results",
                class: "results-list",
                for link in links.iter() {
                    a {
                        key: "{link.id}",
                        class: "result-item",
                        href: "{link.href}",
                        li { id: "{link.id}", "{link.text}" }
                    }
                }
            }
        },
    }
}
