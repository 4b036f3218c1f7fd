//! Wire types exchanged with the search service.

use serde::{Deserialize, Serialize};

/// One search hit. The service sends more columns than these; the rest are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleItem {
    pub tconst: String,
    pub title_type: String,
    pub start_year: i64,
    pub primary_title: String,
}

impl TitleItem {
    /// Display text of a result row: `"{title_type} {start_year} {primary_title}"`.
    pub fn label(&self) -> String {
        format!("{} {} {}", self.title_type, self.start_year, self.primary_title)
    }
}

/// Error body the service sends with a failing status.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Response of the `/hc` health endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
