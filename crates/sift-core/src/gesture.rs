//! Stateless mapping from a horizontal drag offset to what the card looks
//! like and what letting go of it would mean.
//!
//! This runs on every pointer-move event, so it holds no state and never
//! touches the engine; the engine only ever sees the discrete
//! [`GestureInterpreter::release`] result.

use crate::config::GestureConfig;
use crate::decision::Outcome;

/// Visual state of the interactive card for one drag offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureFrame {
    pub offset: f64,
    /// Degrees, positive = clockwise.
    pub rotation: f64,
    /// 0.0 (invisible) ..= 1.0 (opaque).
    pub opacity: f64,
    /// The outcome a release at this offset would commit, if any.
    pub intent: Option<Outcome>,
}

impl GestureFrame {
    pub fn at_rest() -> Self {
        Self {
            offset: 0.0,
            rotation: 0.0,
            opacity: 1.0,
            intent: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    config: GestureConfig,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Linear in the offset, saturating outside `±rotation_domain`.
    pub fn rotation(&self, offset: f64) -> f64 {
        let domain = self.config.rotation_domain;
        let clamped = offset.clamp(-domain, domain);
        clamped / domain * self.config.max_rotation_deg
    }

    /// Opaque until `fade_start`, linear fade to 0 at `fade_end`, symmetric.
    pub fn opacity(&self, offset: f64) -> f64 {
        let distance = offset.abs();
        let GestureConfig {
            fade_start,
            fade_end,
            ..
        } = self.config;

        if distance <= fade_start {
            1.0
        } else if distance >= fade_end {
            0.0
        } else {
            1.0 - (distance - fade_start) / (fade_end - fade_start)
        }
    }

    /// The committed outcome for a release at `offset`, or `None` to snap back.
    pub fn release(&self, offset: f64) -> Option<Outcome> {
        if offset.abs() > self.config.threshold {
            if offset > 0.0 {
                Some(Outcome::Kept)
            } else {
                Some(Outcome::Discarded)
            }
        } else {
            None
        }
    }

    pub fn frame(&self, offset: f64) -> GestureFrame {
        GestureFrame {
            offset,
            rotation: self.rotation(offset),
            opacity: self.opacity(offset),
            intent: self.release(offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> GestureInterpreter {
        GestureInterpreter::default()
    }

    #[test]
    fn rest_position_is_neutral() {
        let frame = interpreter().frame(0.0);
        assert_eq!(frame, GestureFrame::at_rest());
    }

    #[test]
    fn rotation_is_linear_then_saturates() {
        let g = interpreter();
        assert_eq!(g.rotation(100.0), 12.5);
        assert_eq!(g.rotation(-100.0), -12.5);
        assert_eq!(g.rotation(200.0), 25.0);
        assert_eq!(g.rotation(900.0), 25.0);
        assert_eq!(g.rotation(-900.0), -25.0);
    }

    #[test]
    fn opacity_fades_symmetrically() {
        let g = interpreter();
        assert_eq!(g.opacity(150.0), 1.0);
        assert_eq!(g.opacity(175.0), 0.5);
        assert_eq!(g.opacity(-175.0), 0.5);
        assert_eq!(g.opacity(200.0), 0.0);
        assert_eq!(g.opacity(-450.0), 0.0);
    }

    #[test]
    fn release_requires_strictly_passing_threshold() {
        let g = interpreter();
        assert_eq!(g.release(100.0), None);
        assert_eq!(g.release(-100.0), None);
        assert_eq!(g.release(100.5), Some(Outcome::Kept));
        assert_eq!(g.release(-130.0), Some(Outcome::Discarded));
        assert_eq!(g.release(40.0), None);
    }

    #[test]
    fn custom_threshold_is_respected() {
        let g = GestureInterpreter::new(GestureConfig {
            threshold: 20.0,
            ..GestureConfig::default()
        });
        assert_eq!(g.release(25.0), Some(Outcome::Kept));
        assert_eq!(g.frame(-25.0).intent, Some(Outcome::Discarded));
    }
}
