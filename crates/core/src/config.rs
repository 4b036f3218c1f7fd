//! `.moviescope.toml` loading.
//!
//! Every key is optional; missing keys keep their defaults. Unknown keys are
//! reported with a typo suggestion, and a file that can't be read or parsed
//! falls back to defaults with a warning.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::query::DEFAULT_TITLE_TYPE;

/// Name of the per-project config file.
pub const CONFIG_FILE: &str = ".moviescope.toml";

/// Known keys in `.moviescope.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &[
    "base_url",
    "search_path",
    "item_link_prefix",
    "item_detail_path",
    "debounce_ms",
    "default_title_type",
];

/// Endpoints and timings shared by the widget and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Origin of the search service, without a trailing slash.
    pub base_url: String,
    /// Path the query is POSTed to.
    pub search_path: String,
    /// Result links point at `{item_link_prefix}/{tconst}`.
    pub item_link_prefix: String,
    /// Item details are POSTed to `{item_detail_path}/{tconst}`.
    pub item_detail_path: String,
    pub debounce_ms: u64,
    pub default_title_type: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            search_path: "/api".to_string(),
            item_link_prefix: "/movie".to_string(),
            item_detail_path: "/api/item".to_string(),
            debounce_ms: 500,
            default_title_type: DEFAULT_TITLE_TYPE.to_string(),
        }
    }
}

impl WidgetConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Overlay the keys present in a parsed TOML table.
    pub fn apply_table(&mut self, table: &toml::Table) {
        for key in table.keys() {
            if !KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
                warn_unknown_key(key);
            }
        }

        let string_keys: [(&str, &mut String); 5] = [
            ("base_url", &mut self.base_url),
            ("search_path", &mut self.search_path),
            ("item_link_prefix", &mut self.item_link_prefix),
            ("item_detail_path", &mut self.item_detail_path),
            ("default_title_type", &mut self.default_title_type),
        ];
        for (key, slot) in string_keys {
            match table.get(key) {
                Some(toml::Value::String(s)) => *slot = s.clone(),
                Some(other) => warn!(key, value = %other, "Expected a string, keeping default"),
                None => {}
            }
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();

        match table.get("debounce_ms") {
            Some(toml::Value::Integer(ms)) if *ms >= 0 => self.debounce_ms = *ms as u64,
            Some(other) => {
                warn!(key = "debounce_ms", value = %other, "Expected a non-negative integer, keeping default")
            }
            None => {}
        }
    }
}

fn warn_unknown_key(key: &str) {
    let suggestion = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
    match suggestion {
        Some(suggestion) if edit_distance(key, suggestion) <= 3 => warn!(
            key,
            suggestion = *suggestion,
            "Unknown key in {CONFIG_FILE} — did you mean '{suggestion}'?"
        ),
        _ => warn!(
            key,
            "Unknown key in {CONFIG_FILE} (known keys: {})",
            KNOWN_CONFIG_KEYS.join(", ")
        ),
    }
}

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Load a config file, merging it over the defaults.
pub fn load_config_file(path: &Path) -> WidgetConfig {
    let mut config = WidgetConfig::default();
    if !path.exists() {
        return config;
    }

    debug!(path = %path.display(), "Loading config");
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read config file");
            return config;
        }
    };
    match content.parse::<toml::Table>() {
        Ok(table) => config.apply_table(&table),
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to parse config file"),
    }
    config
}

/// Load `.moviescope.toml` from `dir`, or defaults if there is none.
pub fn load_moviescope_config(dir: &Path) -> WidgetConfig {
    load_config_file(&dir.join(CONFIG_FILE))
}
