//! World scroll integration
//!
//! The world scrolls left as a car advances, so positions grow negative.

use serde::{Deserialize, Serialize};

use crate::sanitize_dt;

/// Signed cumulative displacement of one car
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub scroll_distance: f64,
}

impl WorldPosition {
    /// Move by `speed` for `dt` seconds, returning the new scroll distance
    pub fn step(&mut self, speed: f64, dt: f64) -> f64 {
        self.scroll_distance = scroll_step(self.scroll_distance, speed, dt);
        self.scroll_distance
    }

    /// Distance covered, used for race-length comparisons
    pub fn distance_traveled(&self) -> f64 {
        self.scroll_distance.abs()
    }

    pub fn reset(&mut self) {
        self.scroll_distance = 0.0;
    }
}

#[inline]
pub fn scroll_step(position: f64, speed: f64, dt: f64) -> f64 {
    position - speed * sanitize_dt(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_speed_travel() {
        let mut pos = WorldPosition::default();
        for _ in 0..6 {
            pos.step(200.0, 0.1);
        }
        assert!((pos.scroll_distance + 120.0).abs() < 1e-9);
        assert!((pos.distance_traveled() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_speed_holds() {
        let mut pos = WorldPosition { scroll_distance: -42.0 };
        pos.step(0.0, 0.5);
        assert_eq!(pos.scroll_distance, -42.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Non-negative speeds never shrink the distance traveled
            #[test]
            fn prop_distance_monotone(
                speeds in proptest::collection::vec((0.0f64..500.0, 0.0f64..0.5), 1..64)
            ) {
                let mut pos = WorldPosition::default();
                let mut last = 0.0;
                for (speed, dt) in speeds {
                    pos.step(speed, dt);
                    prop_assert!(pos.distance_traveled() >= last);
                    last = pos.distance_traveled();
                }
            }
        }
    }
}
