use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use sift_core::config::{EngineConfig, GestureConfig};
use sift_core::error::ConfigError;
use sift_core::tracker::{DecisionReporter, NoopReporter};

use crate::http::HttpDecisionReporter;

/// Environment variable that overrides `tracker.token`.
pub const TOKEN_ENV: &str = "SIFT_TRACKER_TOKEN";

#[derive(Debug, Default, Deserialize)]
pub struct SiftConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub token: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_enabled() -> bool {
    true
}
fn default_base_url() -> String {
    "http://localhost:3000/api".into()
}
fn default_timeout_ms() -> u64 {
    5000
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            token: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl TrackerConfig {
    /// The env var wins over the file so tokens can stay out of config.
    pub fn resolve_token(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.clone())
    }
}

impl SiftConfig {
    /// Default config location: ~/.sift/config.toml
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sift")
            .join("config.toml")
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or the default location when `path` is `None`. A missing
    /// default file yields the built-in defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    tracing::debug!(path = %path.display(), "No config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.gesture.validate()?;
        if self.tracker.enabled && self.tracker.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "tracker.base_url must be set when tracking is enabled".into(),
            ));
        }
        Ok(())
    }

    pub fn build_reporter(&self) -> Result<Arc<dyn DecisionReporter>, ConfigError> {
        if !self.tracker.enabled {
            tracing::info!("Decision tracking disabled");
            return Ok(Arc::new(NoopReporter));
        }

        let token = self.tracker.resolve_token(std::env::var(TOKEN_ENV).ok());
        if token.is_none() {
            tracing::warn!(
                "No tracker token configured (set {TOKEN_ENV} or tracker.token); reports will be unauthenticated"
            );
        }

        let reporter = HttpDecisionReporter::new(
            &self.tracker.base_url,
            token,
            Duration::from_millis(self.tracker.timeout_ms),
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        tracing::info!(endpoint = reporter.endpoint(), "Decision tracking enabled");
        Ok(Arc::new(reporter))
    }
}
