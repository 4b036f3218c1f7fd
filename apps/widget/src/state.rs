//! Per-widget state and the debounced input → dispatch → render flow.
//!
//! Everything lives in signals owned by the widget's root scope and is handed to
//! child components through context; nothing is global.

use std::time::Duration;

use dioxus::prelude::*;
use moviescope_core::debounce::DebounceGate;
use moviescope_core::{Dispatch, HttpSearchClient, Query, ResultsView, SearchPipeline, WidgetConfig};
use tracing::debug;

#[derive(Clone, Copy)]
pub struct WidgetState {
    pub pipeline: Signal<SearchPipeline>,
    pub view: Signal<ResultsView>,
    /// One gate for the whole form, shared by every field.
    pub gate: Signal<DebounceGate>,
    /// Current text of the title input, read again on submit.
    pub title_text: Signal<String>,
    client: Signal<HttpSearchClient>,
}

impl WidgetState {
    /// Must be called inside a component scope; the signals belong to it.
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            pipeline: Signal::new(SearchPipeline::new(Query::with_title_type(
                config.default_title_type.clone(),
            ))),
            view: Signal::new(ResultsView::new(config.item_link_prefix.clone())),
            gate: Signal::new(DebounceGate::new(config.debounce())),
            title_text: Signal::new(String::new()),
            client: Signal::new(HttpSearchClient::new(config)),
        }
    }

    /// Input event from field `field_id`. Only the latest event within the quiet
    /// period reaches the pipeline.
    pub fn input(mut self, field_id: &'static str, value: String) {
        if field_id == "title" {
            *self.title_text.write() = value.clone();
        }

        let ticket = self.gate.write().arm();
        let wait = self.gate.read().wait();
        spawn(async move {
            sleep(wait).await;
            if !self.gate.read().is_current(ticket) {
                return;
            }
            let dispatch = self.pipeline.write().handle_input(field_id, &value);
            if let Some(dispatch) = dispatch {
                self.dispatch(dispatch);
            }
        });
    }

    /// Explicit submit: re-parse the title as it stands now, skipping the gate.
    pub fn submit(mut self) {
        let title = self.title_text.read().clone();
        let dispatch = self.pipeline.write().handle_submit(&title);
        if let Some(dispatch) = dispatch {
            self.dispatch(dispatch);
        }
    }

    fn dispatch(mut self, dispatch: Dispatch) {
        self.view.write().begin(dispatch.seq);
        let client = self.client.read().clone();
        spawn(async move {
            let outcome = client.search(&dispatch.query).await;
            if !self.view.write().complete(dispatch.seq, outcome) {
                debug!(seq = dispatch.seq, "Superseded before it returned");
            }
        });
    }
}

#[cfg(feature = "desktop")]
async fn sleep(wait: Duration) {
    tokio::time::sleep(wait).await;
}

#[cfg(all(feature = "web", not(feature = "desktop")))]
async fn sleep(wait: Duration) {
    gloo_timers::future::TimeoutFuture::new(wait.as_millis() as u32).await;
}
