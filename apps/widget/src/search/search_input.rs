//! Labelled text input bound to one query field, with debounced search.

use dioxus::prelude::*;

use crate::state::WidgetState;

#[component]
pub fn SearchInput(
    field: &'static str,
    label: &'static str,
    placeholder: &'static str,
    #[props(default)] autofocus: bool,
) -> Element {
    let state = use_context::<WidgetState>();
    let mut text = use_signal(String::new);
    let has_text = !text.read().is_empty();

    rsx! {
        div {
            class: if has_text { "search-field has-query" } else { "search-field" },

            label { r#for: field, class: "search-label", "{label}" }

            div {
                class: "search-input-row",

                input {
                    id: field,
                    class: "search-input",
                    r#type: "text",
                    placeholder: placeholder,
                    value: "{text}",
                    autofocus: autofocus,
                    oninput: move |e: Event<FormData>| {
                        let value = e.value();
                        *text.write() = value.clone();
                        state.input(field, value);
                    },
                }

                // Clearing counts as input, so it goes through the gate like typing
                if has_text {
                    button {
                        class: "search-clear",
                        r#type: "button",
                        onclick: move |_| {
                            *text.write() = String::new();
                            state.input(field, String::new());
                        },
                        "\u{00D7}"
                    }
                }
            }
        }
    }
}
