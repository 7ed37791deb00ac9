#![forbid(unsafe_code)]

//! Board configuration.
//!
//! Every field has a default, so an empty file (or `{}`) is a valid config.
//! Loaders for TOML and JSON files are available with the `config-files`
//! feature.
//!
//! # Example (TOML)
//!
//! ```toml
//! multiple = true
//! throttle_timing_ms = 50
//! layout = "compact"
//!
//! [compact]
//! swap_threshold = 20.0
//!
//! [grid]
//! mode = "align"
//! unit_x = 10.0
//! unit_y = 10.0
//! ```

#[cfg(feature = "config-files")]
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tinyboard_core::IdGenerator;
use tinyboard_layout::{CompactConfig, FreeLayout, GridConfig, StyleConfig};

use crate::error::ConfigError;

/// Options for one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Disable every mutation and selection entry point.
    pub readonly: bool,
    /// Allow more than one selected item.
    pub multiple: bool,
    /// Dragged items follow the pointer; the resolved position is shown by
    /// the shadow indicator.
    pub smooth_drag: bool,
    /// Trailing throttle window for speculative re-layout. Zero resolves
    /// every call synchronously.
    pub throttle_timing_ms: u64,
    /// Keep dragged items inside the board horizontally and below its top.
    pub no_overflow: bool,
    /// Registered name of the layout handler.
    pub layout: String,
    pub compact: CompactConfig,
    pub grid: GridConfig,
    pub style: StyleConfig,
    /// Prefix of generated item ids.
    pub id_prefix: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            readonly: false,
            multiple: false,
            smooth_drag: true,
            throttle_timing_ms: 100,
            no_overflow: false,
            layout: FreeLayout::NAME.to_owned(),
            compact: CompactConfig::default(),
            grid: GridConfig::default(),
            style: StyleConfig::default(),
            id_prefix: IdGenerator::DEFAULT_PREFIX.to_owned(),
        }
    }
}

impl BoardConfig {
    /// Throttle window as a [`Duration`].
    #[must_use]
    pub const fn throttle_timing(&self) -> Duration {
        Duration::from_millis(self.throttle_timing_ms)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.compact.validate();

        if self.layout.trim().is_empty() {
            errors.push("layout must name a registered handler".into());
        }

        if let Err(err) = self.grid.build() {
            errors.push(format!("grid: {err}"));
        }

        if let StyleConfig::Grid {
            columns,
            row_height,
        } = self.style
        {
            if columns == 0 {
                errors.push("style.columns must be > 0".into());
            }
            if !row_height.is_finite() || row_height <= 0.0 {
                errors.push(format!("style.row_height must be > 0, got {row_height}"));
            }
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds no problems.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] carrying every problem found.
    pub fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BoardConfig::default();
        assert!(config.validate().is_empty());
        assert!(config.smooth_drag);
        assert_eq!(config.throttle_timing(), Duration::from_millis(100));
        assert_eq!(config.layout, "free");
        assert_eq!(config.id_prefix, "block-");
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config: BoardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: BoardConfig =
            serde_json::from_str(r#"{"multiple":true,"compact":{"swap_threshold":12.0}}"#)
                .unwrap();
        assert!(config.multiple);
        assert!(config.smooth_drag);
        assert_eq!(config.compact.swap_threshold, 12.0);
        assert_eq!(config.compact.collision_tolerance, 1.5);
    }

    #[test]
    fn validation_collects_every_problem() {
        let config = BoardConfig {
            layout: "  ".into(),
            grid: GridConfig::Align {
                unit_x: 0.0,
                unit_y: 10.0,
            },
            style: StyleConfig::Grid {
                columns: 0,
                row_height: 30.0,
            },
            ..BoardConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors[1].starts_with("grid: "));
    }

    #[test]
    fn into_validated_rejects() {
        let mut config = BoardConfig::default();
        config.compact.swap_threshold = f64::NAN;
        assert!(matches!(
            config.into_validated(),
            Err(ConfigError::Validation(errors)) if errors.len() == 1
        ));
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn toml_round_trip() {
        let config = BoardConfig::from_toml_str(
            r#"
                readonly = true
                throttle_timing_ms = 0
                layout = "compact"

                [grid]
                mode = "width_percent"
                cell_count = 96
            "#,
        )
        .unwrap();
        assert!(config.readonly);
        assert_eq!(config.throttle_timing(), Duration::ZERO);
        assert_eq!(config.grid, GridConfig::WidthPercent { cell_count: 96 });
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(
            BoardConfig::from_toml_str("readonly = 3"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            BoardConfig::from_json_file("/nonexistent/tinyboard.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
