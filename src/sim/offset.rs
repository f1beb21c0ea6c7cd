//! Relative offset between the two cars
//!
//! `target` is the exact physics gap; `visual` chases it for drawing only and
//! never feeds back into the race.

use serde::{Deserialize, Serialize};

use crate::consts::OFFSET_SMOOTHING_FACTOR;
use crate::sanitize_dt;

/// How `visual` chases `target`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Fixed lerp factor per tick. Frame-rate dependent.
    ConstantFactor { factor: f64 },
    /// `1 - exp(-rate * dt)` per tick. Same feel at any frame rate.
    FrameRateIndependent { rate: f64 },
}

impl Default for SmoothingMode {
    fn default() -> Self {
        SmoothingMode::ConstantFactor {
            factor: OFFSET_SMOOTHING_FACTOR,
        }
    }
}

impl SmoothingMode {
    /// Blend weight toward the target for a tick of length `dt`
    pub fn alpha(&self, dt: f64) -> f64 {
        match *self {
            SmoothingMode::ConstantFactor { factor } => factor.clamp(0.0, 1.0),
            SmoothingMode::FrameRateIndependent { rate } => {
                1.0 - (-rate.max(0.0) * sanitize_dt(dt)).exp()
            }
        }
    }
}

/// One smoothing step
#[inline]
pub fn smooth_step(visual: f64, target: f64, alpha: f64) -> f64 {
    visual + (target - visual) * alpha
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RelativeOffset {
    /// Integral of (opponent speed - player speed)
    pub target: f64,
    /// Smoothed follower of `target`
    pub visual: f64,
}

impl RelativeOffset {
    /// Accumulate the speed difference over `dt`
    pub fn integrate(&mut self, player_speed: f64, opponent_speed: f64, dt: f64) {
        self.target += (opponent_speed - player_speed) * sanitize_dt(dt);
    }

    /// Move `visual` toward `target`
    pub fn smooth(&mut self, mode: &SmoothingMode, dt: f64) -> f64 {
        self.visual = smooth_step(self.visual, self.target, mode.alpha(dt));
        self.visual
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_integrates_speed_gap() {
        let mut offset = RelativeOffset::default();
        offset.integrate(100.0, 150.0, 0.5);
        offset.integrate(200.0, 150.0, 0.5);
        assert!(offset.target.abs() < 1e-12);
    }

    #[test]
    fn test_constant_factor_ignores_dt() {
        let mode = SmoothingMode::ConstantFactor { factor: 0.1 };
        assert_eq!(mode.alpha(0.016), mode.alpha(0.1));
    }

    #[test]
    fn test_frame_rate_independent_composes() {
        // Two half steps land where one full step does
        let mode = SmoothingMode::FrameRateIndependent { rate: 6.0 };
        let one = smooth_step(0.0, 100.0, mode.alpha(0.1));
        let half = smooth_step(0.0, 100.0, mode.alpha(0.05));
        let two = smooth_step(half, 100.0, mode.alpha(0.05));
        assert!((one - two).abs() < 1e-9);
    }

    #[test]
    fn test_converges_to_held_target() {
        let mut offset = RelativeOffset {
            target: 250.0,
            visual: 0.0,
        };
        let mode = SmoothingMode::default();
        for _ in 0..400 {
            offset.smooth(&mode, 1.0 / 60.0);
        }
        assert!((offset.visual - 250.0).abs() < 1e-6);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Starting below a held target, visual rises monotonically and never overshoots
            #[test]
            fn prop_no_overshoot(
                target in -5000.0f64..5000.0,
                gap in 0.0f64..5000.0,
                factor in 0.01f64..0.99,
                steps in 1usize..200,
            ) {
                let mode = SmoothingMode::ConstantFactor { factor };
                let mut offset = RelativeOffset { target, visual: target - gap };
                let mut last = offset.visual;
                for _ in 0..steps {
                    let visual = offset.smooth(&mode, 1.0 / 60.0);
                    prop_assert!(visual >= last);
                    prop_assert!(visual <= target + 1e-9 * target.abs().max(1.0));
                    last = visual;
                }
            }
        }
    }
}
