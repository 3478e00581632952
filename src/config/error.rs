//! Config error types for chronoscope.
//!
//! Provides rich error messages with file locations and typo suggestions.

use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use strsim::jaro_winkler;
use thiserror::Error;

/// Minimum similarity for a typo suggestion.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"line (\d+),? column (\d+)").expect("valid location pattern")
});

static UNKNOWN_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"unknown field `([^`]*)`").expect("valid field pattern"));

/// Error loading or parsing a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file.
    #[error("error: cannot read config file\n  --> {}\n  |\n  = {source}\n", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error.
    #[error("{}", format_parse(path, message, *line, *column, suggestion.as_deref()))]
    Parse {
        path: PathBuf,
        message: String,
        line: Option<usize>,
        column: Option<usize>,
        suggestion: Option<String>,
    },

    /// Semantic error after parsing.
    #[error("{}", format_validation(path, message, suggestion.as_deref()))]
    Validation {
        path: PathBuf,
        message: String,
        suggestion: Option<String>,
    },
}

impl ConfigError {
    /// Build a parse error from a YAML deserializer message, pulling out the
    /// location and suggesting the closest known key for unknown fields.
    pub fn from_yaml_error(path: PathBuf, err: impl fmt::Display, known: &[&str]) -> Self {
        let message = err.to_string();
        let (line, column) = match LOCATION.captures(&message) {
            Some(caps) => (
                caps.get(1).and_then(|m| m.as_str().parse().ok()),
                caps.get(2).and_then(|m| m.as_str().parse().ok()),
            ),
            None => (None, None),
        };
        let suggestion = UNKNOWN_FIELD
            .captures(&message)
            .and_then(|caps| caps.get(1))
            .and_then(|m| suggest(m.as_str(), known));
        let first_line = message.lines().next().unwrap_or_default().to_string();
        ConfigError::Parse {
            path,
            message: first_line,
            line,
            column,
            suggestion,
        }
    }
}

/// Closest candidate to `name`, if any is similar enough.
pub fn suggest(name: &str, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter(|&&known| jaro_winkler(name, known) >= SIMILARITY_THRESHOLD)
        .max_by(|a, b| {
            jaro_winkler(name, a)
                .partial_cmp(&jaro_winkler(name, b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|&s| s.to_string())
}

fn format_parse(
    path: &std::path::Path,
    message: &str,
    line: Option<usize>,
    column: Option<usize>,
    suggestion: Option<&str>,
) -> String {
    let location = match (line, column) {
        (Some(l), Some(c)) => format!("{}:{}:{}", path.display(), l, c),
        (Some(l), None) => format!("{}:{}", path.display(), l),
        _ => format!("{}", path.display()),
    };
    let mut output = format!("error: {}\n  --> {}\n  |\n", message, location);
    if let Some(suggestion) = suggestion {
        output.push_str(&format!("  = help: did you mean `{}`?\n", suggestion));
    }
    output
}

fn format_validation(path: &std::path::Path, message: &str, suggestion: Option<&str>) -> String {
    format_parse(path, message, None, None, suggestion)
}
