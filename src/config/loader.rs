//! Config loading for chronoscope.
//!
//! Loads a YAML config file and validates it into a [`Config`].

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::discovery::DiscoveryResult;
use crate::config::error::{suggest, ConfigError};
use crate::config::types::{Config, RawConfig, RawSortKey, KNOWN_KEYS};
use crate::record::Field;
use crate::table::{SortDirection, SortKey};

/// Load and parse a YAML config file.
///
/// A file holding only comments or whitespace parses as an empty config.
fn load_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let blank = content
        .lines()
        .map(str::trim)
        .all(|l| l.is_empty() || l.starts_with('#'));
    if blank {
        return Ok(RawConfig::default());
    }

    serde_saphyr::from_str(&content)
        .map_err(|e| ConfigError::from_yaml_error(path.to_path_buf(), e, KNOWN_KEYS))
}

fn field_names() -> Vec<&'static str> {
    Field::ALL.iter().map(|f| f.name()).collect()
}

fn parse_field(path: &Path, name: &str, key: &str) -> Result<Field, ConfigError> {
    Field::from_name(name).ok_or_else(|| ConfigError::Validation {
        path: path.to_path_buf(),
        message: format!("unknown field '{}' in `{}`", name, key),
        suggestion: suggest(name, &field_names()),
    })
}

fn validate_sort(path: &Path, raw: &[RawSortKey]) -> Result<Vec<SortKey>, ConfigError> {
    let mut keys = Vec::with_capacity(raw.len());
    for entry in raw {
        let field = parse_field(path, &entry.field, "sort")?;
        if !crate::table::column(field).sortable {
            return Err(ConfigError::Validation {
                path: path.to_path_buf(),
                message: format!("column '{}' cannot be sorted", field.name()),
                suggestion: None,
            });
        }
        let direction = match entry.direction.as_deref() {
            None => SortDirection::Ascending,
            Some(name) => SortDirection::from_name(name).ok_or_else(|| ConfigError::Validation {
                path: path.to_path_buf(),
                message: format!("unknown sort direction '{}'", name),
                suggestion: suggest(name, &["asc", "desc"]),
            })?,
        };
        keys.push(SortKey::new(field, direction));
    }
    Ok(keys)
}

/// Turn a parsed file into a validated config, keeping defaults for
/// absent keys.
fn validate(path: &Path, raw: RawConfig) -> Result<Config, ConfigError> {
    let mut config = Config {
        source: Some(path.to_path_buf()),
        ..Config::default()
    };

    if let Some(columns) = raw.columns {
        config.visible_columns = columns
            .iter()
            .map(|name| parse_field(path, name, "columns"))
            .collect::<Result<_, _>>()?;
    }

    if let Some(sort) = raw.sort {
        config.sort = validate_sort(path, &sort)?;
    }

    if let Some(gap) = raw.node_gap {
        if !gap.is_finite() || gap < 0.0 {
            return Err(ConfigError::Validation {
                path: path.to_path_buf(),
                message: format!("node_gap must be a non-negative number, got {}", gap),
                suggestion: None,
            });
        }
        config.node_gap = gap;
    }

    if let Some(ms) = raw.year_debounce_ms {
        config.year_debounce = Duration::from_millis(ms);
    }

    Ok(config)
}

/// Load and validate one config file.
///
/// Used by `config validate`, `config show` and `--config`.
pub fn load_single_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = load_file(path)?;
    validate(path, raw)
}

/// Load config from discovered config files.
///
/// The closest config wins completely: a project config shadows the global
/// one. Returns the default config if no config files exist.
pub fn load(discovery: &DiscoveryResult) -> Result<Config, ConfigError> {
    match discovery.winning_config() {
        Some(path) => {
            let config = load_single_file(path)?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}
