//! MovieScope core — query parsing, debounced dispatch, and the search client.
//!
//! The search widget and the `ms` CLI share everything in here; they only differ
//! in how they read input and draw the results.
//!
//! # Modules
//!
//! - [`query`] — `Query` model and the inline `year:` / `type:` filter parser
//! - [`debounce`] — Debounce gate (runtime-agnostic) and Tokio-driven debouncer
//! - [`pipeline`] — Input events to sequence-numbered dispatches
//! - [`render`] — Results container state, stale-response discard, HTML fragment
//! - [`client`] — HTTP client for the search service
//! - [`config`] — `.moviescope.toml` loading
//! - [`types`] — Wire types
//! - [`error`] — `SearchError`

pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod render;
pub mod types;

pub use client::{HttpSearchClient, SearchBackend};
pub use config::{load_config_file, load_moviescope_config, WidgetConfig};
pub use error::SearchError;
pub use pipeline::{Dispatch, SearchPipeline};
pub use query::{parse_input_query, Query, QueryField};
pub use render::{ResultsState, ResultsView};

/// Send one dispatch and render its outcome into `view`.
///
/// Used where the view is owned by the caller for the whole request; UI code that
/// shares the view across an await calls [`ResultsView::begin`] and
/// [`ResultsView::complete`] itself.
pub async fn fetch_and_render<B: SearchBackend>(
    backend: &B,
    dispatch: &Dispatch,
    view: &mut ResultsView,
) -> bool {
    view.begin(dispatch.seq);
    let outcome = backend.search(&dispatch.query).await;
    view.complete(dispatch.seq, outcome)
}
