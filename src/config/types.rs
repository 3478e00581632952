//! Config types for chronoscope.
//!
//! Defines structures for parsing and representing configuration files.

use crate::record::Field;
use crate::table::{SortKey, SortState, VisibilityState};
use crate::year_range::DEFAULT_CORRECTION_DELAY;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level keys accepted in a config file, for typo suggestions.
pub const KNOWN_KEYS: &[&str] = &["columns", "sort", "node_gap", "year_debounce_ms"];

/// Default extra cells per missing year on the terminal timeline.
pub const DEFAULT_NODE_GAP: f64 = 1.0;

/// Raw config file structure (used for parsing).
///
/// This struct directly mirrors the YAML config file structure.
/// Unknown fields are rejected with an error.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Columns visible when a session starts.
    pub columns: Option<Vec<String>>,
    /// Initial sort keys, highest precedence first.
    pub sort: Option<Vec<RawSortKey>>,
    /// Timeline spacing per missing year.
    pub node_gap: Option<f64>,
    /// Delay before typed year bounds are corrected.
    pub year_debounce_ms: Option<u64>,
}

/// Raw sort key: `{ field: year, direction: desc }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSortKey {
    pub field: String,
    #[serde(default)]
    pub direction: Option<String>,
}

/// Validated configuration with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Path the config was loaded from (None when using defaults).
    pub source: Option<PathBuf>,
    pub visible_columns: Vec<Field>,
    pub sort: Vec<SortKey>,
    pub node_gap: f64,
    pub year_debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            visible_columns: VisibilityState::default().visible_fields(),
            sort: SortState::default().keys().to_vec(),
            node_gap: DEFAULT_NODE_GAP,
            year_debounce: DEFAULT_CORRECTION_DELAY,
        }
    }
}

impl Config {
    pub fn visibility(&self) -> VisibilityState {
        VisibilityState::only(&self.visible_columns)
    }

    pub fn sort_state(&self) -> SortState {
        SortState::new(self.sort.clone())
    }
}
