//! Feed configuration.

use thiserror::Error;

pub const MODEL_ENV: &str = "FACTS_MODEL";
pub const INITIAL_BATCH_ENV: &str = "FACTS_INITIAL_BATCH";
pub const BATCH_SIZE_ENV: &str = "FACTS_BATCH_SIZE";
pub const MAX_TOKENS_ENV: &str = "FACTS_MAX_TOKENS";
pub const TEMPERATURE_ENV: &str = "FACTS_TEMPERATURE";

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Configuration for the feed and its providers.
#[derive(Debug, Clone)]
pub struct FactsConfig {
    /// Model override; the client default is used when unset.
    pub model: Option<String>,

    /// Facts requested when the feed mounts.
    pub initial_batch: usize,

    /// Facts requested per incremental fetch.
    pub batch_size: usize,

    /// Maximum tokens per provider response.
    pub max_tokens: usize,

    /// Sampling temperature. High by default so batches vary.
    pub temperature: Option<f32>,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FactsConfig {
    pub fn new() -> Self {
        Self {
            model: None,
            initial_batch: 10,
            batch_size: 5,
            max_tokens: 2048,
            temperature: Some(1.0),
        }
    }

    /// Defaults overridden by `FACTS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            config.model = Some(model.trim().to_string());
        }
        if let Some(value) = lookup(INITIAL_BATCH_ENV) {
            config.initial_batch = parse_count(INITIAL_BATCH_ENV, &value)?;
        }
        if let Some(value) = lookup(BATCH_SIZE_ENV) {
            config.batch_size = parse_count(BATCH_SIZE_ENV, &value)?;
        }
        if let Some(value) = lookup(MAX_TOKENS_ENV) {
            config.max_tokens = parse_count(MAX_TOKENS_ENV, &value)?;
        }
        if let Some(value) = lookup(TEMPERATURE_ENV) {
            config.temperature = Some(parse_temperature(&value)?);
        }

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_initial_batch(mut self, count: usize) -> Self {
        self.initial_batch = count;
        self
    }

    pub fn with_batch_size(mut self, count: usize) -> Self {
        self.batch_size = count;
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

fn parse_count(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            var,
            expected: "a positive integer",
            value: value.to_string(),
        }),
    }
}

fn parse_temperature(value: &str) -> Result<f32, ConfigError> {
    match value.trim().parse::<f32>() {
        Ok(t) if (0.0..=1.0).contains(&t) => Ok(t),
        _ => Err(ConfigError::Invalid {
            var: TEMPERATURE_ENV,
            expected: "a number between 0 and 1",
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = FactsConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.initial_batch, 10);
        assert_eq!(config.batch_size, 5);
        assert!(config.model.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = FactsConfig::from_lookup(lookup(&[
            (MODEL_ENV, "claude-3-5-haiku-latest"),
            (INITIAL_BATCH_ENV, "4"),
            (BATCH_SIZE_ENV, " 2 "),
            (TEMPERATURE_ENV, "0.3"),
        ]))
        .unwrap();

        assert_eq!(config.model.as_deref(), Some("claude-3-5-haiku-latest"));
        assert_eq!(config.initial_batch, 4);
        assert_eq!(config.batch_size, 2);
        assert_eq!(config.temperature, Some(0.3));
    }

    #[test]
    fn test_invalid_values() {
        let err = FactsConfig::from_lookup(lookup(&[(BATCH_SIZE_ENV, "0")])).unwrap_err();
        assert!(err.to_string().contains(BATCH_SIZE_ENV));

        assert!(FactsConfig::from_lookup(lookup(&[(TEMPERATURE_ENV, "hot")])).is_err());
        assert!(FactsConfig::from_lookup(lookup(&[(MAX_TOKENS_ENV, "-5")])).is_err());
    }
}
