// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Session Configuration
//!
//! User-tunable settings for a [`Session`](crate::core::session::Session),
//! read from YAML. Every field is optional; anything left out keeps its
//! default.
//!
//! ```yaml
//! correlation_timeout_ms: 250
//! group_ores_in_creative: false
//! command_spacing_ms: 100
//! auto_page: true
//! max_auto_pages: 3
//! teleport_command: "/tppos {x} {y} {z}"
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::analysis::AnalysisSettings;
use crate::core::error::{BlockWatchError, BlockWatchResult};

/// Bundled defaults, identical to [`SessionConfig::default`].
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../../resources/config.yml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Window after a header in which detail lines are accepted.
    pub correlation_timeout_ms: i64,
    /// Cluster ore destructions even while in creative mode.
    pub group_ores_in_creative: bool,
    /// Minimum time between two outbound commands.
    pub command_spacing_ms: i64,
    /// Request further result pages automatically.
    pub auto_page: bool,
    /// Highest page number that triggers an automatic request for the next.
    pub max_auto_pages: u32,
    /// Expanded with the `x`, `y`, `z` of a deposit's key block.
    pub teleport_command: String,
    /// Expanded with the selection's date and time in server time.
    pub pre_edit_query: String,
    pub deposits_per_page: usize,
    /// Log lines no category matched at info level rather than debug.
    pub show_unknown_lines: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            correlation_timeout_ms: 250,
            group_ores_in_creative: false,
            command_spacing_ms: 100,
            auto_page: true,
            max_auto_pages: 3,
            teleport_command: "/tppos {x} {y} {z}".to_string(),
            pre_edit_query: "/lb before {day}.{month}.{year} {hour}:{minute}:{second} sum b"
                .to_string(),
            deposits_per_page: 10,
            show_unknown_lines: false,
        }
    }
}

impl SessionConfig {
    /// Parse and validate YAML text.
    pub fn from_yaml(text: &str) -> BlockWatchResult<Self> {
        let config: SessionConfig = if text.trim().is_empty() {
            SessionConfig::default()
        } else {
            serde_yaml::from_str(text).map_err(|e| {
                BlockWatchError::configuration(format!("Invalid configuration: {}", e))
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> BlockWatchResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_yaml(&text)?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No configuration at {}; using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_yaml(&self) -> BlockWatchResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> BlockWatchResult<()> {
        if self.correlation_timeout_ms <= 0 {
            return Err(BlockWatchError::configuration_with_key(
                "correlation_timeout_ms must be positive",
                "correlation_timeout_ms",
            ));
        }
        if self.command_spacing_ms < 0 {
            return Err(BlockWatchError::configuration_with_key(
                "command_spacing_ms must not be negative",
                "command_spacing_ms",
            ));
        }
        if self.deposits_per_page == 0 {
            return Err(BlockWatchError::configuration_with_key(
                "deposits_per_page must be at least 1",
                "deposits_per_page",
            ));
        }
        if self.teleport_command.trim().is_empty() {
            return Err(BlockWatchError::configuration_with_key(
                "teleport_command must not be empty",
                "teleport_command",
            ));
        }
        Ok(())
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            timeout_ms: self.correlation_timeout_ms,
            auto_page: self.auto_page,
            max_auto_pages: self.max_auto_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_yaml_matches_defaults() {
        assert_eq!(
            SessionConfig::from_yaml(DEFAULT_CONFIG_YAML).unwrap(),
            SessionConfig::default()
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = SessionConfig::from_yaml("auto_page: false\nmax_auto_pages: 7\n").unwrap();
        assert!(!config.auto_page);
        assert_eq!(config.max_auto_pages, 7);
        assert_eq!(config.correlation_timeout_ms, 250);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = SessionConfig::from_yaml("correlation_timeout_ms: 0").unwrap_err();
        assert!(matches!(
            err,
            BlockWatchError::Configuration { config_key: Some(ref key), .. } if key == "correlation_timeout_ms"
        ));
        assert!(SessionConfig::from_yaml("auto_page: [1, 2]").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig::load(&dir.path().join("absent.yml")).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "deposits_per_page: 5").unwrap();
        let config = SessionConfig::load(file.path()).unwrap();
        assert_eq!(config.deposits_per_page, 5);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = SessionConfig::default();
        let text = config.to_yaml().unwrap();
        assert_eq!(SessionConfig::from_yaml(&text).unwrap(), config);
    }
}
