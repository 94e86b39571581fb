//! Service configuration
//!
//! Loaded from `retro.{APP_ENV}.toml` (profile `dev` when `APP_ENV` is
//! unset), then overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `RETRO_OPENAI_API_KEY`, `OPENAI_API_KEY` | `generation.api_key` |
//! | `RETRO_OPENAI_BASE_URL` | `generation.base_url` |
//! | `RETRO_OPENAI_MODEL` | `generation.model` |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable selecting the profile
pub const PROFILE_VAR: &str = "APP_ENV";

/// Profile used when `APP_ENV` is unset
pub const DEFAULT_PROFILE: &str = "dev";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values are out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetroConfig {
    /// Text-generation settings
    pub generation: GenerationConfig,
}

/// Chat-completions client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Bearer token, requests fail without it
    pub api_key: Option<String>,
    /// API root, `/chat/completions` is appended
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature for advice
    pub advice_temperature: f32,
    /// Token cap for advice
    pub advice_max_tokens: u32,
    /// Sampling temperature for summaries
    pub summary_temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            advice_temperature: 0.3,
            advice_max_tokens: 300,
            summary_temperature: 0.0,
        }
    }
}

impl RetroConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.generation.api_key = Some(key.into());
        self
    }

    /// With API root
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.generation.base_url = url.into();
        self
    }

    /// With model name
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.generation.model = model.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.generation.timeout_secs = secs;
        self
    }

    /// Parse TOML text; absent keys keep their defaults
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed input
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, `ConfigError::Parse` if
    /// it is malformed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// File name for a profile
    #[must_use]
    pub fn profile_path(dir: impl AsRef<Path>, profile: &str) -> PathBuf {
        dir.as_ref().join(format!("retro.{profile}.toml"))
    }

    /// Load the `APP_ENV` profile from `dir` and apply environment overrides
    ///
    /// A missing profile file falls back to defaults.
    ///
    /// # Errors
    /// Any load or validation error
    pub fn load_profile(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_profile_with(dir, |key| std::env::var(key).ok())
    }

    /// [`RetroConfig::load_profile`] with an explicit variable lookup
    ///
    /// # Errors
    /// Any load or validation error
    pub fn load_profile_with(
        dir: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let profile = lookup(PROFILE_VAR).unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        let path = Self::profile_path(dir, &profile);

        let config = if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config profile");
            Self::load(&path)?
        } else {
            tracing::debug!(path = %path.display(), "config profile not found, using defaults");
            Self::default()
        };

        let config = config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Override fields from environment variables
    #[must_use]
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("RETRO_OPENAI_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")) {
            self.generation.api_key = Some(key);
        }
        if let Some(url) = non_empty("RETRO_OPENAI_BASE_URL") {
            self.generation.base_url = url;
        }
        if let Some(model) = non_empty("RETRO_OPENAI_MODEL") {
            self.generation.model = model;
        }
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first bad value
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.generation;
        if !(generation.base_url.starts_with("http://") || generation.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got '{}'",
                generation.base_url
            )));
        }
        if generation.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if generation.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        for (name, value) in [
            ("advice_temperature", generation.advice_temperature),
            ("summary_temperature", generation.summary_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} must be within 0..=2, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = RetroConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.advice_max_tokens, 300);
        assert!(config.generation.api_key.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = RetroConfig::from_toml_str("[generation]\nmodel = \"gpt-4o\"\n").unwrap();
        assert_eq!(config.generation.model, "gpt-4o");
        assert_eq!(config.generation.timeout_secs, 30);
    }

    #[test]
    fn malformed_toml_fails() {
        assert!(matches!(
            RetroConfig::from_toml_str("[generation\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides() {
        let config = RetroConfig::default().apply_env(env(&[
            ("OPENAI_API_KEY", "fallback"),
            ("RETRO_OPENAI_MODEL", "gpt-4o"),
        ]));
        assert_eq!(config.generation.api_key.as_deref(), Some("fallback"));
        assert_eq!(config.generation.model, "gpt-4o");

        let config = RetroConfig::default().apply_env(env(&[
            ("OPENAI_API_KEY", "fallback"),
            ("RETRO_OPENAI_API_KEY", "preferred"),
            ("RETRO_OPENAI_BASE_URL", "  "),
        ]));
        assert_eq!(config.generation.api_key.as_deref(), Some("preferred"));
        assert_eq!(config.generation.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(RetroConfig::new().with_base_url("ftp://x").validate().is_err());
        assert!(RetroConfig::new().with_model(" ").validate().is_err());
        assert!(RetroConfig::new().with_timeout_secs(0).validate().is_err());

        let mut config = RetroConfig::new();
        config.generation.advice_temperature = 3.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn loads_selected_profile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            RetroConfig::profile_path(dir.path(), "prod"),
            "[generation]\nbase_url = \"http://localhost:8080/v1\"\n",
        )
        .unwrap();

        let config = RetroConfig::load_profile_with(
            dir.path(),
            env(&[("APP_ENV", "prod"), ("RETRO_OPENAI_API_KEY", "k")]),
        )
        .unwrap();
        assert_eq!(config.generation.base_url, "http://localhost:8080/v1");
        assert_eq!(config.generation.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn missing_profile_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RetroConfig::load_profile_with(dir.path(), env(&[])).unwrap();
        assert_eq!(config, RetroConfig::default());
    }

    #[test]
    fn invalid_profile_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            RetroConfig::profile_path(dir.path(), DEFAULT_PROFILE),
            "[generation]\ntimeout_secs = 0\n",
        )
        .unwrap();
        assert!(matches!(
            RetroConfig::load_profile_with(dir.path(), env(&[])),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = RetroConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
