//! Config validate and show commands for chronoscope.
//!
//! Provides config introspection and validation for CI pipelines and debugging.

use chronoscope::config::{self, Config};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Get the effective config path.
///
/// An explicit `--config` wins. Otherwise closest wins: a project
/// chronoscope.yaml found in cwd or a parent shadows the global config.
fn effective_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    config::discover().winning_config().map(Path::to_path_buf)
}

/// Validate the effective config file.
///
/// Exit 0 with no output on success, exit 1 with the error on stderr
/// otherwise. Checks YAML syntax, known keys (typo detection), column names
/// and sort directions.
pub fn validate(explicit: Option<&Path>) -> Result<(), i32> {
    let Some(config_path) = effective_config_path(explicit) else {
        eprintln!("error: No config found to validate");
        return Err(1);
    };

    match config::load_single_file(&config_path) {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("{}", e);
            Err(1)
        }
    }
}

/// Show the effective configuration.
///
/// Respects NO_COLOR via the colored crate.
pub fn show(explicit: Option<&Path>) -> Result<(), i32> {
    match effective_config_path(explicit) {
        Some(path) => match config::load_single_file(&path) {
            Ok(cfg) => {
                println!("Using: {}", path.display().to_string().dimmed());
                println!();
                show_config(&cfg);
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", e);
                Err(1)
            }
        },
        None => {
            println!("{}", "No config found. Using defaults.".dimmed());
            println!();
            show_config(&Config::default());
            Ok(())
        }
    }
}

fn show_config(cfg: &Config) {
    for (key, value) in config_lines(cfg) {
        println!("{}: {}", key.cyan(), value.green());
    }
}

fn config_lines(cfg: &Config) -> Vec<(&'static str, String)> {
    let columns = if cfg.visible_columns.is_empty() {
        "(none)".to_string()
    } else {
        cfg.visible_columns
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let sort = if cfg.sort.is_empty() {
        "(unsorted)".to_string()
    } else {
        cfg.sort
            .iter()
            .map(|k| format!("{} {}", k.field.name(), k.direction.arrow()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    vec![
        ("columns", columns),
        ("sort", sort),
        ("node_gap", cfg.node_gap.to_string()),
        (
            "year_debounce_ms",
            cfg.year_debounce.as_millis().to_string(),
        ),
    ]
}
