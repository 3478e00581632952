//! Config discovery for chronoscope.
//!
//! Walks from a starting directory up through its ancestors looking for
//! `chronoscope.yaml`, and checks for a global config at
//! `<config_dir>/chronoscope/config.yaml`.

use std::path::{Path, PathBuf};

/// Project config filename to search for in parent directories.
pub const PROJECT_CONFIG_NAME: &str = "chronoscope.yaml";

/// Global config filename within the chronoscope config directory.
pub const GLOBAL_CONFIG_NAME: &str = "config.yaml";

/// Result of config discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Directory containing `chronoscope.yaml`.
    pub project_root: Option<PathBuf>,
    /// Full path to the project config file.
    pub project_config: Option<PathBuf>,
    /// Full path to the global config file.
    pub global_config: Option<PathBuf>,
}

impl DiscoveryResult {
    /// Returns true if any config was found (project or global).
    pub fn has_config(&self) -> bool {
        self.project_config.is_some() || self.global_config.is_some()
    }

    /// The config that applies: project first, then global.
    pub fn winning_config(&self) -> Option<&Path> {
        self.project_config
            .as_deref()
            .or(self.global_config.as_deref())
    }
}

fn is_file(path: &Path) -> bool {
    path.try_exists().unwrap_or(false) && path.is_file()
}

/// Location of the global config, whether or not it exists.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chronoscope").join(GLOBAL_CONFIG_NAME))
}

/// Discover config files starting from the current working directory.
pub fn discover() -> DiscoveryResult {
    discover_verbose().0
}

/// Same as [`discover`] but also returns every directory that was searched.
pub fn discover_verbose() -> (DiscoveryResult, Vec<PathBuf>) {
    let global = global_config_path().filter(|p| is_file(p));
    match std::env::current_dir() {
        Ok(dir) => {
            let cwd = dir.canonicalize().unwrap_or(dir);
            discover_from(&cwd, global)
        }
        Err(_) => (
            DiscoveryResult {
                global_config: global,
                ..Default::default()
            },
            Vec::new(),
        ),
    }
}

/// Walk `start` and its ancestors for a project config.
pub fn discover_from(start: &Path, global_config: Option<PathBuf>) -> (DiscoveryResult, Vec<PathBuf>) {
    let mut result = DiscoveryResult {
        global_config,
        ..Default::default()
    };
    let mut searched_paths = Vec::new();

    for ancestor in start.ancestors() {
        searched_paths.push(ancestor.to_path_buf());

        let config_path = ancestor.join(PROJECT_CONFIG_NAME);
        if is_file(&config_path) {
            result.project_root = Some(ancestor.to_path_buf());
            result.project_config = Some(config_path);
            break;
        }
    }

    (result, searched_paths)
}
