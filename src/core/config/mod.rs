//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. An explicit path (must exist)
//! 2. `$GITGRAPH_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/gitgraph/config.toml`
//! 4. `~/.gitgraph/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use gitgraph::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//!
//! println!("Main branch: {}", config.main_branch_name());
//! println!("Commit spacing: {}", config.layout_config().commit_spacing);
//! ```

pub mod schema;

pub use schema::{FileConfig, FontSection, LayoutSection, RoutingSection};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::store::GraphStore;
use crate::core::types::{BranchName, Orientation};
use crate::layout::measure::FontConfig;
use crate::layout::LayoutConfig;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "GITGRAPH_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Configuration with defaults applied through accessor methods.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: FileConfig,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and a missing file simply means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed or
    /// validated, or if an explicit path does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();
        Self::load_with(explicit, &env, dirs::home_dir())
    }

    /// Load configuration with injectable environment and home directory.
    pub fn load_with(
        explicit: Option<&Path>,
        env: &dyn Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let path = match explicit {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
            None => Self::locate(env, home, &mut warnings),
        };

        let config = match path {
            Some(path) => Config {
                file: Self::read_file(&path)?,
                path: Some(path),
            },
            None => Config::default(),
        };
        config.validate()?;

        Ok(ConfigLoadResult { config, warnings })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Config, ConfigError> {
        let file: FileConfig = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;
        let config = Config { file, path: None };
        config.validate()?;
        Ok(config)
    }

    fn locate(
        env: &dyn Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Option<PathBuf> {
        // 1. Check $GITGRAPH_CONFIG
        if let Some(path) = env(CONFIG_ENV).map(PathBuf::from) {
            if path.exists() {
                return Some(path);
            }
            warnings.push(ConfigWarning {
                message: format!("{} points at a missing file, ignoring it", CONFIG_ENV),
                path,
            });
        }

        // 2. Check $XDG_CONFIG_HOME/gitgraph/config.toml
        if let Some(xdg_home) = env("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gitgraph/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.gitgraph/config.toml
        let path = home?.join(".gitgraph/config.toml");
        path.exists().then_some(path)
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate file values and the resolved layout settings together.
    fn validate(&self) -> Result<(), ConfigError> {
        self.file.validate()?;

        let layout = self.layout_config();
        if layout.reroute_margin <= layout.min_clearance {
            return Err(ConfigError::InvalidValue(format!(
                "routing.reroute_margin ({}) must exceed routing.min_clearance ({})",
                layout.reroute_margin, layout.min_clearance
            )));
        }
        Ok(())
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed. Writes to a temp file in the
    /// same directory, then renames it into place.
    pub fn write_atomic(path: &Path, config: &FileConfig) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Name of the default branch.
    ///
    /// Defaults to "main" if not configured.
    pub fn main_branch_name(&self) -> BranchName {
        self.file
            .main_branch_name
            .as_deref()
            .and_then(|name| BranchName::new(name).ok())
            .unwrap_or_else(BranchName::main)
    }

    /// Display order of the default branch.
    ///
    /// Defaults to `0` if not configured.
    pub fn main_branch_order(&self) -> i64 {
        self.file.main_branch_order.unwrap_or(0)
    }

    /// Default orientation.
    ///
    /// Defaults to `LR` if not configured.
    pub fn orientation(&self) -> Orientation {
        self.file.orientation.unwrap_or_default()
    }

    /// A fresh store for a new diagram, using the configured default branch.
    pub fn new_store(&self) -> GraphStore {
        GraphStore::with_default_branch(self.main_branch_name(), self.main_branch_order())
            .with_default_orientation(self.orientation())
    }

    /// Resolve the settings consumed by the layout engine.
    pub fn layout_config(&self) -> LayoutConfig {
        let defaults = LayoutConfig::default();
        let layout = self.file.layout.clone().unwrap_or_default();
        let routing = self.file.routing.clone().unwrap_or_default();
        let font = self.file.font.clone().unwrap_or_default();

        LayoutConfig {
            commit_spacing: layout.commit_spacing.unwrap_or(defaults.commit_spacing),
            branch_spacing: layout.branch_spacing.unwrap_or(defaults.branch_spacing),
            layout_offset: layout.layout_offset.unwrap_or(defaults.layout_offset),
            commit_radius: layout.commit_radius.unwrap_or(defaults.commit_radius),
            rotate_commit_label: layout
                .rotate_commit_label
                .unwrap_or(defaults.rotate_commit_label),
            show_commit_label: layout.show_commit_label.unwrap_or(defaults.show_commit_label),
            parallel_commits: layout.parallel_commits.unwrap_or(defaults.parallel_commits),
            diagram_padding: layout.diagram_padding.unwrap_or(defaults.diagram_padding),
            theme_color_limit: layout.theme_color_limit.unwrap_or(defaults.theme_color_limit),
            min_clearance: routing.min_clearance.unwrap_or(defaults.min_clearance),
            reroute_margin: routing.reroute_margin.unwrap_or(defaults.reroute_margin),
            curve_fraction: routing.curve_fraction.unwrap_or(defaults.curve_fraction),
            font: FontConfig {
                family: font.family.unwrap_or(defaults.font.family),
                size: font.size.unwrap_or(defaults.font.size),
            },
        }
    }

    /// The configuration with every default written out.
    pub fn effective(&self) -> FileConfig {
        let layout = self.layout_config();
        FileConfig {
            main_branch_name: Some(self.main_branch_name().to_string()),
            main_branch_order: Some(self.main_branch_order()),
            orientation: Some(self.orientation()),
            layout: Some(LayoutSection {
                commit_spacing: Some(layout.commit_spacing),
                branch_spacing: Some(layout.branch_spacing),
                layout_offset: Some(layout.layout_offset),
                commit_radius: Some(layout.commit_radius),
                rotate_commit_label: Some(layout.rotate_commit_label),
                show_commit_label: Some(layout.show_commit_label),
                parallel_commits: Some(layout.parallel_commits),
                diagram_padding: Some(layout.diagram_padding),
                theme_color_limit: Some(layout.theme_color_limit),
            }),
            routing: Some(RoutingSection {
                min_clearance: Some(layout.min_clearance),
                reroute_margin: Some(layout.reroute_margin),
                curve_fraction: Some(layout.curve_fraction),
            }),
            font: Some(FontSection {
                family: Some(layout.font.family),
                size: Some(layout.font.size),
            }),
        }
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::CommitArgs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn load_empty_defaults() {
        let result = Config::load_with(None, &no_env, None).unwrap();
        let config = result.config;

        assert_eq!(config.main_branch_name().as_str(), "main");
        assert_eq!(config.main_branch_order(), 0);
        assert_eq!(config.orientation(), Orientation::LR);
        assert_eq!(config.layout_config(), LayoutConfig::default());
        assert!(config.loaded_from().is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn load_from_env() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
            main_branch_name = "trunk"

            [layout]
            commit_spacing = 80.0
            "#,
        )
        .unwrap();

        let path = config_path.to_string_lossy().to_string();
        let env = move |key: &str| (key == CONFIG_ENV).then(|| path.clone());
        let result = Config::load_with(None, &env, None).unwrap();

        assert_eq!(result.config.main_branch_name().as_str(), "trunk");
        assert_eq!(result.config.layout_config().commit_spacing, 80.0);
        assert_eq!(result.config.loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn missing_env_file_warns() {
        let env = |key: &str| (key == CONFIG_ENV).then(|| "/nonexistent/gitgraph.toml".to_string());
        let result = Config::load_with(None, &env, None).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.config.loaded_from().is_none());
    }

    #[test]
    fn load_from_home() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".gitgraph");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "orientation = \"BT\"").unwrap();

        let result = Config::load_with(None, &no_env, Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(result.config.orientation(), Orientation::BT);
    }

    #[test]
    fn explicit_path_must_exist() {
        let result = Config::load_with(Some(Path::new("/nonexistent/x.toml")), &no_env, None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "unknown_field = true").unwrap();

        let result = Config::load_with(Some(&config_path), &no_env, None);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn margin_must_exceed_clearance() {
        let result = Config::from_toml(
            r#"
            [routing]
            min_clearance = 30.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn new_store_uses_configured_branch() {
        let config = Config::from_toml(
            r#"
            main_branch_name = "trunk"
            main_branch_order = 3
            orientation = "TB"
            "#,
        )
        .unwrap();

        let store = config.new_store();
        assert_eq!(store.current_branch().as_str(), "trunk");
        assert_eq!(store.branches()[0].order, Some(3));
        assert_eq!(store.orientation(), Orientation::TB);
    }

    #[test]
    fn cleared_store_matches_new_store() {
        let config = Config::from_toml("orientation = \"TB\"\nmain_branch_name = \"trunk\"").unwrap();

        let mut store = config.new_store();
        store.commit(CommitArgs::new("a")).unwrap();
        store.clear();

        assert_eq!(store, config.new_store());
        assert_eq!(store.orientation(), Orientation::TB);
    }

    #[test]
    fn write_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");
        let file = FileConfig {
            main_branch_name: Some("develop".to_string()),
            ..Default::default()
        };

        Config::write_atomic(&path, &file).unwrap();

        assert!(path.exists());
        let loaded = Config::load_with(Some(&path), &no_env, None).unwrap();
        assert_eq!(loaded.config.main_branch_name().as_str(), "develop");
    }

    #[test]
    fn effective_fills_every_default() {
        let config = Config::from_toml("[layout]\ncommit_spacing = 70.0\n").unwrap();
        let effective = config.effective();

        assert_eq!(effective.main_branch_name.as_deref(), Some("main"));
        let layout = effective.layout.clone().unwrap();
        assert_eq!(layout.commit_spacing, Some(70.0));
        assert_eq!(layout.branch_spacing, Some(50.0));
        assert_eq!(effective.routing.clone().unwrap().reroute_margin, Some(20.0));

        let reparsed = Config::from_toml(&toml::to_string_pretty(&effective).unwrap()).unwrap();
        assert_eq!(reparsed.layout_config(), config.layout_config());
    }
}
