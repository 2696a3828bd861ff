//! Discrete overlap detection.
//!
//! Detects ball-vs-cushion penetration and ball-vs-ball overlap at the end
//! of a tick. Unlike a swept test this can miss very fast contacts; the
//! tick length is short enough that table speeds never tunnel a cushion.

use crate::types::{BallState, Boundary, Vec3, Wall};

/// A ball whose leading edge has reached a cushion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub wall: Wall,
    /// How far the leading edge sits past the cushion plane
    pub penetration: f64,
}

/// Two balls whose centres are closer than the sum of their radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContact {
    /// Centre-to-centre vector, from the first ball to the second
    pub diff: Vec3,
    pub distance: f64,
    pub penetration: f64,
}

/// Overlap detector for the billiards table.
pub struct CollisionDetector;

impl CollisionDetector {
    /// Test a ball's leading edge against one cushion.
    ///
    /// Touching the plane exactly counts as a contact.
    pub fn detect_wall(ball: &BallState, boundary: &Boundary, wall: Wall) -> Option<WallContact> {
        let plane = boundary.plane(wall);
        let penetration = match wall {
            Wall::Right => (ball.pos.x + ball.radius) - plane,
            Wall::Left => plane - (ball.pos.x - ball.radius),
            Wall::Front => (ball.pos.z + ball.radius) - plane,
            Wall::Back => plane - (ball.pos.z - ball.radius),
        };

        if penetration >= 0.0 {
            Some(WallContact { wall, penetration })
        } else {
            None
        }
    }

    /// Test two balls for overlap.
    ///
    /// The overlap test is strict: balls exactly touching do not collide.
    pub fn detect_pair(a: &BallState, b: &BallState) -> Option<PairContact> {
        let diff = b.pos - a.pos;
        let distance = diff.magnitude();
        let reach = a.radius + b.radius;

        if distance < reach {
            Some(PairContact {
                diff,
                distance,
                penetration: reach - distance,
            })
        } else {
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
