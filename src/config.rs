//! Configuration loading.
//!
//! Exposes [`RelmapConfig`] so applications can set the conventional
//! record-kinds directory from `config/config.toml` or environment
//! variables using `RelmapConfig::load()`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Settings for the relation-mapping layer.
#[derive(Debug, Deserialize)]
pub struct RelmapConfig {
    /// Directory bare record-kind names resolve under.
    #[serde(default = "default_kinds_dir")]
    pub kinds_dir: String,
}

fn default_kinds_dir() -> String {
    "record_kinds".to_string()
}

impl Default for RelmapConfig {
    fn default() -> Self {
        RelmapConfig {
            kinds_dir: default_kinds_dir(),
        }
    }
}

impl RelmapConfig {
    /// Load the configuration from `config/config.toml`, falling back to
    /// `RELMAP`-prefixed environment variables, and to defaults when the
    /// `relmap` section is absent altogether.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/config.toml").required(false))
            .add_source(Environment::with_prefix("RELMAP").separator("__"));

        let settings = builder.build()?;
        match settings.get::<RelmapConfig>("relmap") {
            Ok(cfg) => Ok(cfg),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kinds_dir() {
        assert_eq!(RelmapConfig::default().kinds_dir, "record_kinds");
    }

    #[test]
    fn test_load_without_file_falls_back_to_defaults() {
        // No config file ships with the crate; loading still succeeds.
        let cfg = RelmapConfig::load().unwrap();
        assert!(!cfg.kinds_dir.is_empty());
    }
}
