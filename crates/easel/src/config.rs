// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::error::{ConfigError, ConfigResult};
use crate::generator::SuggestionRules;
use crate::synth::SynthesisLimits;
use easel_contracts::EnhancementConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub const ENV_ENHANCER_ENABLED: &str = "EASEL_ENHANCER_ENABLED";
pub const ENV_ENHANCER_URL: &str = "EASEL_ENHANCER_URL";
pub const ENV_ENHANCER_TIMEOUT_MS: &str = "EASEL_ENHANCER_TIMEOUT_MS";
pub const ENV_ENHANCER_MAX_RETRIES: &str = "EASEL_ENHANCER_MAX_RETRIES";
pub const ENV_CACHE_ENABLED: &str = "EASEL_CACHE_ENABLED";

fn default_cache_enabled() -> bool {
    true
}
fn default_cache_capacity() -> usize {
    64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Distinct tables remembered before the cache starts evicting.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            capacity: default_cache_capacity(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EaselConfig {
    #[serde(default)]
    pub enhancement: EnhancementConfig,
    #[serde(default)]
    pub rules: SuggestionRules,
    #[serde(default)]
    pub limits: SynthesisLimits,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl EaselConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: EaselConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileError {
                path: path.display().to_string(),
                source,
            })?;
        debug!(path = %path.display(), "loaded configuration file");
        Self::from_yaml_str(&contents)
    }

    /// Defaults overlaid with `EASEL_*` variables. A `.env` file in the
    /// working directory is read first when present.
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// File (or defaults when `path` is `None`), then environment overrides.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> ConfigResult<()> {
        dotenvy::dotenv().ok();
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(enabled) = parse_var::<String>(&lookup, ENV_ENHANCER_ENABLED)? {
            self.enhancement.enabled = parse_flag(ENV_ENHANCER_ENABLED, &enabled)?;
        }
        if let Some(url) = lookup(ENV_ENHANCER_URL).filter(|v| !v.trim().is_empty()) {
            self.enhancement.endpoint = url.trim().to_string();
        }
        if let Some(timeout_ms) = parse_var(&lookup, ENV_ENHANCER_TIMEOUT_MS)? {
            self.enhancement.timeout_ms = timeout_ms;
        }
        if let Some(max_retries) = parse_var(&lookup, ENV_ENHANCER_MAX_RETRIES)? {
            self.enhancement.max_retries = max_retries;
        }
        if let Some(enabled) = parse_var::<String>(&lookup, ENV_CACHE_ENABLED)? {
            self.cache.enabled = parse_flag(ENV_CACHE_ENABLED, &enabled)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |reason: String| ConfigError::ValidationFailed { reason };
        self.enhancement
            .validate()
            .map_err(|e| invalid(e.to_string()))?;
        self.rules.validate().map_err(invalid)?;
        self.limits.validate().map_err(invalid)?;
        if self.cache.enabled && self.cache.capacity == 0 {
            return Err(invalid("cache capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> ConfigResult<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvValue {
                key: key.to_string(),
                value: raw,
            }),
    }
}

fn parse_flag(key: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn yaml_fills_missing_sections_with_defaults() {
        let config = EaselConfig::from_yaml_str(
            "enhancement:\n  enabled: true\n  endpoint: http://svc:9000\nrules:\n  pie: 60\n",
        )
        .unwrap();
        assert!(config.enhancement.enabled);
        assert_eq!(config.enhancement.timeout_ms, 5_000);
        assert_eq!(config.rules.pie, 60);
        assert_eq!(config.rules.bar, 85);
        assert_eq!(config.limits.parallel_rows, 50);
        assert!(config.cache.enabled);
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config = EaselConfig::default();
        config
            .apply_overrides(env(&[
                (ENV_ENHANCER_ENABLED, "true"),
                (ENV_ENHANCER_URL, " http://ai.local:8080/ "),
                (ENV_ENHANCER_TIMEOUT_MS, "1500"),
                (ENV_ENHANCER_MAX_RETRIES, "0"),
                (ENV_CACHE_ENABLED, "off"),
            ]))
            .unwrap();
        assert!(config.enhancement.enabled);
        assert_eq!(config.enhancement.base_url(), "http://ai.local:8080");
        assert_eq!(config.enhancement.timeout_ms, 1500);
        assert_eq!(config.enhancement.max_retries, 0);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn malformed_override_is_reported_with_its_key() {
        let mut config = EaselConfig::default();
        let err = config
            .apply_overrides(env(&[(ENV_ENHANCER_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_ENHANCER_TIMEOUT_MS));
        let err = config
            .apply_overrides(env(&[(ENV_ENHANCER_ENABLED, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvValue { .. }));
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let yaml = "enhancement:\n  enabled: true\n  endpoint: ftp://nope\n";
        assert!(matches!(
            EaselConfig::from_yaml_str(yaml),
            Err(ConfigError::ValidationFailed { .. })
        ));
        assert!(EaselConfig::from_yaml_str("rules:\n  bar: 120\n").is_err());
        assert!(EaselConfig::from_yaml_str("limits:\n  radar_rows: 0\n").is_err());
    }
}
