use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Timing and layout settings for the decision engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// How long a decided card animates off-screen before the next one is current.
    #[serde(default = "default_exit_duration_ms")]
    pub exit_duration_ms: u64,
    /// Number of cards in the preview window (current card included).
    #[serde(default = "default_preview_depth")]
    pub preview_depth: usize,
    /// Horizontal distance a decided card travels while exiting.
    #[serde(default = "default_exit_distance")]
    pub exit_distance: f64,
}

fn default_exit_duration_ms() -> u64 {
    800
}
fn default_preview_depth() -> usize {
    3
}
fn default_exit_distance() -> f64 {
    500.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exit_duration_ms: default_exit_duration_ms(),
            preview_depth: default_preview_depth(),
            exit_distance: default_exit_distance(),
        }
    }
}

impl EngineConfig {
    pub fn exit_duration(&self) -> Duration {
        Duration::from_millis(self.exit_duration_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exit_duration_ms == 0 {
            return Err(ConfigError::Invalid("engine.exit_duration_ms must be > 0".into()));
        }
        if self.preview_depth == 0 {
            return Err(ConfigError::Invalid("engine.preview_depth must be >= 1".into()));
        }
        Ok(())
    }
}

/// Parameters of the offset → rotation/opacity/decision mapping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GestureConfig {
    /// A release further than this (strictly) commits a decision.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Offsets in `[-rotation_domain, rotation_domain]` map linearly onto rotation.
    #[serde(default = "default_rotation_domain")]
    pub rotation_domain: f64,
    #[serde(default = "default_max_rotation_deg")]
    pub max_rotation_deg: f64,
    /// Card stays fully opaque up to this distance.
    #[serde(default = "default_fade_start")]
    pub fade_start: f64,
    /// Card is fully transparent from this distance on.
    #[serde(default = "default_fade_end")]
    pub fade_end: f64,
}

fn default_threshold() -> f64 {
    100.0
}
fn default_rotation_domain() -> f64 {
    200.0
}
fn default_max_rotation_deg() -> f64 {
    25.0
}
fn default_fade_start() -> f64 {
    150.0
}
fn default_fade_end() -> f64 {
    200.0
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            rotation_domain: default_rotation_domain(),
            max_rotation_deg: default_max_rotation_deg(),
            fade_start: default_fade_start(),
            fade_end: default_fade_end(),
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold.is_nan() || self.threshold <= 0.0 {
            return Err(ConfigError::Invalid("gesture.threshold must be > 0".into()));
        }
        if self.rotation_domain.is_nan() || self.rotation_domain <= 0.0 {
            return Err(ConfigError::Invalid(
                "gesture.rotation_domain must be > 0".into(),
            ));
        }
        if self.fade_start.is_nan() || self.fade_start < 0.0 || self.fade_start >= self.fade_end {
            return Err(ConfigError::Invalid(
                "gesture.fade_start must be >= 0 and below gesture.fade_end".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(GestureConfig::default().validate().is_ok());
        assert_eq!(EngineConfig::default().exit_duration(), Duration::from_millis(800));
    }

    #[test]
    fn rejects_inverted_fade_range() {
        let config = GestureConfig {
            fade_start: 250.0,
            ..GestureConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_exit_duration() {
        let config = EngineConfig {
            exit_duration_ms: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
