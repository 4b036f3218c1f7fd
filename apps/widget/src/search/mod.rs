//! Search form — title input, filter inputs, and the metadata strip.

mod metadata_strip;
mod search_input;

use dioxus::prelude::*;
use metadata_strip::MetadataStrip;
use search_input::SearchInput;

use crate::state::WidgetState;

/// The `search` form. Submitting runs the title through the parser immediately.
#[component]
pub fn SearchPanel() -> Element {
    let state = use_context::<WidgetState>();

    rsx! {
        form {
            id: "search",
            class: "search-panel",
            onsubmit: move |e: Event<FormData>| {
                e.prevent_default();
                state.submit();
            },
            SearchInput {
                field: "title",
                label: "SEARCH",
                placeholder: "batman year:2008 type:movie",
                autofocus: true,
            }
            div {
                class: "search-filters",
                SearchInput { field: "title_type", label: "TYPE", placeholder: "movie" }
                SearchInput { field: "year", label: "YEAR", placeholder: "any" }
            }
            button { class: "search-submit", r#type: "submit", "Search" }
            MetadataStrip {}
        }
    }
}
