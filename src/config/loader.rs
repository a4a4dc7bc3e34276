// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::config::consts::DEFAULT_COMPOSITION_CACHE_SIZE;
use crate::errors::ConfigError;

/// Engine configuration, typically loaded from a YAML file.
///
/// All sections are optional; an absent section means built-in defaults.
///
/// # Example
/// ```yaml
/// constraints:
///   cache:
///     size: 1024
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub constraints: ConstraintsConfig,
}

/// Constraint-subsystem options.
#[derive(Debug, Default, Deserialize)]
pub struct ConstraintsConfig {
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Composition-cache options.
///
/// # Fields
/// * `size` - maximum entries of the composition-plan cache; must be a
///   positive integer when set
#[derive(Debug, Default, Deserialize)]
pub struct CacheConfig {
    pub size: Option<usize>,
}

impl CacheConfig {
    /// Get the cache size, using the built-in default if not configured.
    pub fn get_size(&self) -> usize {
        self.size.unwrap_or(DEFAULT_COMPOSITION_CACHE_SIZE)
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(size) = self.constraints.cache.size {
            if size == 0 {
                return Err(ConfigError::InvalidCacheSize { value: size });
            }
        }
        Ok(())
    }
}

/// Load a config from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: EngineConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file.
///
/// Any parse or validation failure here is a startup failure; the engine
/// never runs over a half-read configuration.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
constraints:
  cache:
    size: 64
"#;
        let cfg: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.constraints.cache.size, Some(64));
        assert_eq!(cfg.constraints.cache.get_size(), 64);
    }

    #[test]
    fn test_defaults_when_sections_absent() {
        let cfg: EngineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.constraints.cache.size, None);
        assert_eq!(
            cfg.constraints.cache.get_size(),
            DEFAULT_COMPOSITION_CACHE_SIZE
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_zero_cache_size_is_a_startup_failure() {
        let yaml = r#"
constraints:
  cache:
    size: 0
"#;
        let cfg: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCacheSize { value: 0 }));
    }

    #[test]
    fn test_load_and_validate_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, "constraints:\n  cache:\n    size: 16\n").unwrap();

        let cfg = load_and_validate_config(&path).unwrap();
        assert_eq!(cfg.constraints.cache.get_size(), 16);
    }

    #[test]
    fn test_load_rejects_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, "constraints: [not, a, mapping]\n").unwrap();

        let result = load_and_validate_config(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
