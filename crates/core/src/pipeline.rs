//! The input pipeline: field updates in, sequence-numbered dispatches out.
//!
//! A [`SearchPipeline`] owns the [`Query`] for the lifetime of one widget. Each
//! debounced input event or explicit submit updates it in place and, when the
//! title is non-empty, yields a [`Dispatch`] for the fetch step.

use tracing::{debug, warn};

use crate::query::{parse_input_query, FilterIssue, Query, QueryField};

/// A query snapshot handed to the fetch step, tagged so late responses can be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub seq: u64,
    pub query: Query,
}

#[derive(Debug, Clone)]
pub struct SearchPipeline {
    query: Query,
    next_seq: u64,
    issues: Vec<FilterIssue>,
}

impl Default for SearchPipeline {
    fn default() -> Self {
        Self::new(Query::default())
    }
}

impl SearchPipeline {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            next_seq: 1,
            issues: Vec::new(),
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Filter values rejected by the most recent update.
    pub fn issues(&self) -> &[FilterIssue] {
        &self.issues
    }

    /// Handle a debounced input event from the element with id `field_id`.
    ///
    /// Unknown ids are ignored and never dispatch.
    pub fn handle_input(&mut self, field_id: &str, value: &str) -> Option<Dispatch> {
        let Some(field) = QueryField::from_id(field_id) else {
            warn!(field = field_id, "Ignoring input from unknown field");
            return None;
        };
        self.issues = self.query.assign(field, value);
        self.warn_issues();
        self.dispatch_if_ready()
    }

    /// Handle an explicit submit: re-parse the title field's current value.
    pub fn handle_submit(&mut self, title_value: &str) -> Option<Dispatch> {
        self.issues = parse_input_query(&mut self.query, title_value);
        self.warn_issues();
        self.dispatch_if_ready()
    }

    fn warn_issues(&self) {
        for issue in &self.issues {
            warn!(field = %issue.field, input = %issue.input, "Ignoring filter: {issue}");
        }
    }

    fn dispatch_if_ready(&mut self) -> Option<Dispatch> {
        if !self.query.is_dispatchable() {
            debug!("Empty title, not searching");
            return None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        debug!(seq, query = ?self.query, "Dispatching search");
        Some(Dispatch {
            seq,
            query: self.query.clone(),
        })
    }
}
