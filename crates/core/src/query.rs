//! Search query model and the inline filter parser.
//!
//! Free text typed into the title field may carry filter tokens such as
//! `year:1999` or `type:movie`. [`parse_input_query`] splits them out, folds them
//! into the [`Query`], and joins what is left back together as the title.

use serde::Serialize;
use std::fmt;

/// Prefix of the release-year filter token.
pub const YEAR_PREFIX: &str = "year:";
/// Prefix of the title-type filter token.
pub const TYPE_PREFIX: &str = "type:";

/// Title type used until the user picks another one.
pub const DEFAULT_TITLE_TYPE: &str = "movie";

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Structured search parameters, serialized as the request body of a search.
///
/// Field order matches the wire format: `{ "title_type", "title", "year"? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub title_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl Default for Query {
    fn default() -> Self {
        Self::with_title_type(DEFAULT_TITLE_TYPE)
    }
}

impl Query {
    /// Empty query with the given initial title type.
    pub fn with_title_type(title_type: impl Into<String>) -> Self {
        Self {
            title_type: title_type.into(),
            title: String::new(),
            year: None,
        }
    }

    /// A search is only worth sending once there is some title text.
    pub fn is_dispatchable(&self) -> bool {
        !self.title.is_empty()
    }

    /// Assign a raw input value to one field.
    ///
    /// The title goes through [`parse_input_query`], so filter tokens typed into it
    /// still apply. An empty year value clears the year.
    pub fn assign(&mut self, field: QueryField, value: &str) -> Vec<FilterIssue> {
        match field {
            QueryField::Title => parse_input_query(self, value),
            QueryField::TitleType => {
                self.title_type = value.to_string();
                Vec::new()
            }
            QueryField::Year => {
                if value.is_empty() {
                    self.year = None;
                    return Vec::new();
                }
                match parse_year(value) {
                    Some(year) => {
                        self.year = Some(year);
                        Vec::new()
                    }
                    None => vec![FilterIssue::invalid_year(value)],
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// The query fields an input element may be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryField {
    Title,
    TitleType,
    Year,
}

impl QueryField {
    pub const ALL: [QueryField; 3] = [QueryField::Title, QueryField::TitleType, QueryField::Year];

    /// Resolve an input element id. Unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "title" => Some(QueryField::Title),
            "title_type" => Some(QueryField::TitleType),
            "year" => Some(QueryField::Year),
            _ => None,
        }
    }

    /// Element id (and JSON key) of this field.
    pub fn id(self) -> &'static str {
        match self {
            QueryField::Title => "title",
            QueryField::TitleType => "title_type",
            QueryField::Year => "year",
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Filter issues
// ---------------------------------------------------------------------------

/// A filter value that could not be applied. The query keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterIssue {
    /// The offending input, as typed.
    pub input: String,
    pub field: QueryField,
}

impl FilterIssue {
    fn invalid_year(input: &str) -> Self {
        Self {
            input: input.to_string(),
            field: QueryField::Year,
        }
    }
}

impl fmt::Display for FilterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            QueryField::Year => write!(f, "'{}' is not a valid year", self.input),
            other => write!(f, "'{}' is not a valid {other}", self.input),
        }
    }
}

fn parse_year(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok()
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Tokens of one input string, partitioned into filters and title words.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedInput<'a> {
    pub filters: Vec<&'a str>,
    pub title: Vec<&'a str>,
}

fn is_filter(token: &str) -> bool {
    token.starts_with(YEAR_PREFIX) || token.starts_with(TYPE_PREFIX)
}

impl<'a> ParsedInput<'a> {
    /// Split on single spaces and partition, keeping the relative order of each group.
    pub fn split(input: &'a str) -> Self {
        let (filters, title) = input.split(' ').partition(|token| is_filter(token));
        Self { filters, title }
    }

    /// Fold the filters and the joined title into `query`.
    pub fn apply(self, query: &mut Query) -> Vec<FilterIssue> {
        let mut issues = Vec::new();
        for token in &self.filters {
            if let Some(raw) = token.strip_prefix(YEAR_PREFIX) {
                match parse_year(raw) {
                    Some(year) => query.year = Some(year),
                    None => issues.push(FilterIssue::invalid_year(raw)),
                }
            } else if let Some(title_type) = token.strip_prefix(TYPE_PREFIX) {
                query.title_type = title_type.to_string();
            }
        }
        query.title = self.title.join(" ");
        issues
    }
}

/// Parse free text into `query`: filter tokens set their fields, the remaining
/// words become the title. Returns the filters that could not be applied.
pub fn parse_input_query(query: &mut Query, input: &str) -> Vec<FilterIssue> {
    ParsedInput::split(input).apply(query)
}
