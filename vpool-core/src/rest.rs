//! Rest detection: ends a shot once the table has slowed down.
//!
//! Geometric friction never reaches zero on its own, so once the fastest
//! moving ball drops below `min_velocity` every ball is stopped outright.

use serde::{Deserialize, Serialize};

use crate::types::{BallState, Vec3};

/// Motion state of the table within one shot.
///
/// `Moving` → (fastest ball below threshold) → `AtRest`. `AtRest` is final
/// until the next launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    Moving,
    AtRest,
}

/// Stops every ball once the fastest one is slow enough.
#[derive(Debug, Clone, Copy)]
pub struct RestDetector {
    pub min_velocity: f64,
}

impl RestDetector {
    pub fn new(min_velocity: f64) -> Self {
        Self { min_velocity }
    }

    /// Highest speed among balls that are moving at all.
    ///
    /// `None` when no ball has a nonzero velocity.
    pub fn peak_speed(balls: &[BallState]) -> Option<f64> {
        balls
            .iter()
            .map(BallState::speed)
            .filter(|&speed| speed != 0.0)
            .fold(None, |peak, speed| match peak {
                Some(p) if p >= speed => Some(p),
                _ => Some(speed),
            })
    }

    /// Check the balls and zero every velocity if the table is at rest.
    ///
    /// A table with no moving ball counts as at rest, so calling this
    /// again on a stopped table is harmless.
    pub fn check(&self, balls: &mut [BallState]) -> Motion {
        match Self::peak_speed(balls) {
            Some(peak) if peak >= self.min_velocity => Motion::Moving,
            _ => {
                for ball in balls.iter_mut() {
                    ball.vel = Vec3::ZERO;
                }
                Motion::AtRest
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
