//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! Searched in order of precedence:
//! 1. An explicit `--config <path>`
//! 2. `$GITGRAPH_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/gitgraph/config.toml`
//! 4. `~/.gitgraph/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Config values are validated after parsing so that the layout engine only
//! ever sees positive spacings and a consistent routing clearance.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{BranchName, Orientation};

/// Top-level configuration file.
///
/// # Example
///
/// ```toml
/// main_branch_name = "trunk"
/// orientation = "TB"
///
/// [layout]
/// commit_spacing = 60.0
/// parallel_commits = false
///
/// [routing]
/// min_clearance = 12.0
///
/// [font]
/// size = 14.0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Name of the branch every diagram starts on
    pub main_branch_name: Option<String>,

    /// Display order of the main branch
    pub main_branch_order: Option<i64>,

    /// Orientation used when a script does not choose one
    pub orientation: Option<Orientation>,

    /// Position calculator settings
    pub layout: Option<LayoutSection>,

    /// Arrow router settings
    pub routing: Option<RoutingSection>,

    /// Font handed to the text measurer
    pub font: Option<FontSection>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.main_branch_name {
            BranchName::new(name).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid main branch name: {}", e))
            })?;
        }

        if let Some(layout) = &self.layout {
            layout.validate()?;
        }

        if let Some(routing) = &self.routing {
            routing.validate()?;
        }

        if let Some(font) = &self.font {
            font.validate()?;
        }

        Ok(())
    }
}

/// `[layout]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSection {
    pub commit_spacing: Option<f64>,
    pub branch_spacing: Option<f64>,
    pub layout_offset: Option<f64>,
    pub commit_radius: Option<f64>,
    pub rotate_commit_label: Option<bool>,
    pub show_commit_label: Option<bool>,
    /// Pack independent commits onto shared rows (bottom-to-top only)
    pub parallel_commits: Option<bool>,
    pub diagram_padding: Option<f64>,
    pub theme_color_limit: Option<usize>,
}

impl LayoutSection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("layout.commit_spacing", self.commit_spacing)?;
        positive("layout.branch_spacing", self.branch_spacing)?;
        positive("layout.commit_radius", self.commit_radius)?;
        non_negative("layout.layout_offset", self.layout_offset)?;
        non_negative("layout.diagram_padding", self.diagram_padding)?;

        if self.theme_color_limit == Some(0) {
            return Err(ConfigError::InvalidValue(
                "layout.theme_color_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[routing]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingSection {
    pub min_clearance: Option<f64>,
    pub reroute_margin: Option<f64>,
    pub curve_fraction: Option<f64>,
}

impl RoutingSection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("routing.min_clearance", self.min_clearance)?;
        positive("routing.reroute_margin", self.reroute_margin)?;

        if let Some(fraction) = self.curve_fraction {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(ConfigError::InvalidValue(format!(
                    "routing.curve_fraction must be in (0, 1], got {}",
                    fraction
                )));
            }
        }
        Ok(())
    }
}

/// `[font]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FontSection {
    pub family: Option<String>,
    pub size: Option<f64>,
}

impl FontSection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(family) = &self.family {
            if family.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "font.family cannot be empty".to_string(),
                ));
            }
        }
        positive("font.size", self.size)
    }
}

fn positive(key: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(ConfigError::InvalidValue(format!(
            "{} must be a positive number, got {}",
            key, v
        ))),
        _ => Ok(()),
    }
}

fn non_negative(key: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !(v.is_finite() && v >= 0.0) => Err(ConfigError::InvalidValue(format!(
            "{} must not be negative, got {}",
            key, v
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod file_config {
        use super::*;

        #[test]
        fn defaults() {
            let config = FileConfig::default();
            assert!(config.main_branch_name.is_none());
            assert!(config.layout.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn invalid_main_branch() {
            let config = FileConfig {
                main_branch_name: Some("invalid..name".to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn roundtrip() {
            let config = FileConfig {
                main_branch_name: Some("trunk".to_string()),
                main_branch_order: Some(1),
                orientation: Some(Orientation::BT),
                layout: Some(LayoutSection {
                    commit_spacing: Some(60.0),
                    parallel_commits: Some(false),
                    ..Default::default()
                }),
                routing: Some(RoutingSection {
                    min_clearance: Some(12.0),
                    ..Default::default()
                }),
                font: Some(FontSection {
                    family: Some("monospace".to_string()),
                    size: Some(14.0),
                }),
            };

            let toml = toml::to_string_pretty(&config).unwrap();
            let parsed: FileConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config, parsed);
        }

        #[test]
        fn reject_unknown_fields() {
            let toml = r#"
                main_branch_name = "main"
                unknown_field = true
            "#;

            let result: Result<FileConfig, _> = toml::from_str(toml);
            assert!(result.is_err());
        }

        #[test]
        fn orientation_uses_short_names() {
            let parsed: FileConfig = toml::from_str("orientation = \"TB\"").unwrap();
            assert_eq!(parsed.orientation, Some(Orientation::TB));
        }
    }

    mod sections {
        use super::*;

        #[test]
        fn non_positive_spacing_rejected() {
            let layout = LayoutSection {
                branch_spacing: Some(0.0),
                ..Default::default()
            };
            assert!(layout.validate().is_err());
        }

        #[test]
        fn zero_color_limit_rejected() {
            let layout = LayoutSection {
                theme_color_limit: Some(0),
                ..Default::default()
            };
            assert!(layout.validate().is_err());
        }

        #[test]
        fn curve_fraction_bounds() {
            let ok = RoutingSection {
                curve_fraction: Some(1.0),
                ..Default::default()
            };
            assert!(ok.validate().is_ok());

            let bad = RoutingSection {
                curve_fraction: Some(1.5),
                ..Default::default()
            };
            assert!(bad.validate().is_err());
        }

        #[test]
        fn blank_font_family_rejected() {
            let font = FontSection {
                family: Some("  ".to_string()),
                size: None,
            };
            assert!(font.validate().is_err());
        }
    }
}
