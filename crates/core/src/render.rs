//! State of the results container.
//!
//! The container shows nothing, a loading placeholder, a list of result links, or
//! an error line. Completions are matched against the latest dispatch sequence
//! number so a slow early response can't overwrite a newer one.

use tracing::{debug, error};

use crate::error::SearchError;
use crate::types::TitleItem;

/// Text of the placeholder shown while a search is in flight.
pub const LOADING_TEXT: &str = "loading...";

/// One rendered result: an anchor wrapping a list element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLink {
    pub href: String,
    /// Element id of the list element (the item's `tconst`).
    pub id: String,
    pub text: String,
}

impl ResultLink {
    pub fn new(item: &TitleItem, link_prefix: &str) -> Self {
        Self {
            href: format!("{}/{}", link_prefix.trim_end_matches('/'), item.tconst),
            id: item.tconst.clone(),
            text: item.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsState {
    #[default]
    Empty,
    Loading,
    Results(Vec<ResultLink>),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ResultsView {
    link_prefix: String,
    latest_seq: u64,
    state: ResultsState,
}

impl ResultsView {
    pub fn new(link_prefix: impl Into<String>) -> Self {
        Self {
            link_prefix: link_prefix.into(),
            latest_seq: 0,
            state: ResultsState::Empty,
        }
    }

    pub fn state(&self) -> &ResultsState {
        &self.state
    }

    pub fn links(&self) -> &[ResultLink] {
        match &self.state {
            ResultsState::Results(links) => links,
            _ => &[],
        }
    }

    /// A search with sequence number `seq` has been sent.
    pub fn begin(&mut self, seq: u64) {
        if seq < self.latest_seq {
            return;
        }
        self.latest_seq = seq;
        self.state = ResultsState::Loading;
    }

    /// Render the outcome of search `seq`. Returns `false` if a newer search has
    /// been sent since, in which case nothing changes.
    pub fn complete(&mut self, seq: u64, outcome: Result<Vec<TitleItem>, SearchError>) -> bool {
        if seq < self.latest_seq {
            debug!(seq, latest = self.latest_seq, "Discarding stale search response");
            return false;
        }
        self.latest_seq = seq;
        self.state = match outcome {
            Ok(items) => ResultsState::Results(
                items.iter().map(|item| ResultLink::new(item, &self.link_prefix)).collect(),
            ),
            Err(e) => {
                error!(seq, error = %e, "Search failed");
                ResultsState::Failed(e.to_string())
            }
        };
        true
    }

    /// The container's contents as an HTML fragment.
    pub fn to_html(&self) -> String {
        match &self.state {
            ResultsState::Empty => String::new(),
            ResultsState::Loading => format!("<div>{LOADING_TEXT}</div>"),
            ResultsState::Failed(message) => {
                format!("<div class=\"error\">{}</div>", escape_html(message))
            }
            ResultsState::Results(links) => links
                .iter()
                .map(|link| {
                    format!(
                        "<a href=\"{}\"><li id=\"{}\">{}</li></a>",
                        escape_html(&link.href),
                        escape_html(&link.id),
                        escape_html(&link.text)
                    )
                })
                .collect(),
        }
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> TitleItem {
        TitleItem {
            tconst: "tt0133093".into(),
            title_type: "movie".into(),
            start_year: 1999,
            primary_title: "The Matrix".into(),
        }
    }

    #[test]
    fn results_render_as_links() {
        let mut view = ResultsView::new("/movie");
        view.begin(1);
        assert_eq!(view.state(), &ResultsState::Loading);
        assert_eq!(view.to_html(), "<div>loading...</div>");

        assert!(view.complete(1, Ok(vec![matrix()])));
        assert_eq!(
            view.links(),
            &[ResultLink {
                href: "/movie/tt0133093".into(),
                id: "tt0133093".into(),
                text: "movie 1999 The Matrix".into(),
            }]
        );
        assert_eq!(
            view.to_html(),
            r#"<a href="/movie/tt0133093"><li id="tt0133093">movie 1999 The Matrix</li></a>"#
        );
    }

    #[test]
    fn alternate_link_prefix() {
        let link = ResultLink::new(&matrix(), "/api/item/");
        assert_eq!(link.href, "/api/item/tt0133093");
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut view = ResultsView::new("/movie");
        view.begin(1);
        view.begin(2);
        assert!(view.complete(2, Ok(vec![matrix()])));
        assert!(!view.complete(1, Ok(vec![])));
        assert_eq!(view.links().len(), 1);

        // a late begin for an older search doesn't reset the container either
        view.begin(1);
        assert_eq!(view.links().len(), 1);
    }

    #[test]
    fn errors_replace_the_loading_placeholder() {
        let mut view = ResultsView::new("/movie");
        view.begin(1);
        let err = SearchError::Status {
            status: 404,
            message: "not found".into(),
        };
        assert!(view.complete(1, Err(err)));
        assert_eq!(
            view.state(),
            &ResultsState::Failed("Search service returned 404: not found".into())
        );
        assert!(view.to_html().contains("not found"));
    }

    #[test]
    fn html_is_escaped() {
        let mut view = ResultsView::new("/movie");
        let mut item = matrix();
        item.primary_title = "Tom & Jerry <3".into();
        view.complete(1, Ok(vec![item]));
        assert!(view.to_html().contains("Tom &amp; Jerry &lt;3"));
    }
}
