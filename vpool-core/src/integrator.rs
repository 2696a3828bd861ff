//! Per-tick motion: friction decay followed by an explicit position step.
//!
//! ## Algorithm
//!
//! Given position x, velocity v, friction factor μ and tick dt:
//!
//! ```text
//! 1. v_new = μ * v
//! 2. x_new = x + v_new * dt
//! ```
//!
//! Friction is applied first, so the position step already uses the damped
//! velocity. [`Euler::undo`] reverses exactly one position step; the
//! pairwise collision resolver uses it to back balls out of an overlap.

use crate::types::{BallState, Vec3};

/// Trait for how a rolling ball loses speed each tick.
pub trait DampingModel {
    /// Velocity after one tick of damping.
    fn damp(&self, vel: Vec3) -> Vec3;
}

/// Uniform, isotropic decay: every tick the velocity is scaled by a
/// constant factor. Not Coulomb friction; speed decays geometrically.
#[derive(Debug, Clone, Copy)]
pub struct GeometricFriction {
    pub coefficient: f64,
}

impl GeometricFriction {
    pub fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }
}

impl DampingModel for GeometricFriction {
    fn damp(&self, vel: Vec3) -> Vec3 {
        vel * self.coefficient
    }
}

/// Forward Euler position integrator.
pub struct Euler;

impl Euler {
    /// Damp the velocity, then move the ball by one tick.
    pub fn step<D: DampingModel>(ball: &BallState, damping: &D, dt: f64) -> BallState {
        let vel = damping.damp(ball.vel);
        BallState {
            pos: ball.pos + vel * dt,
            vel,
            ..*ball
        }
    }

    /// Advance every ball by one tick, in ball order.
    pub fn step_all<D: DampingModel>(balls: &mut [BallState], damping: &D, dt: f64) {
        for ball in balls.iter_mut() {
            *ball = Self::step(ball, damping, dt);
        }
    }

    /// Reverse the last position step using the current velocity.
    pub fn undo(ball: &mut BallState, dt: f64) {
        ball.pos -= ball.vel * dt;
    }
}

// =============================================================================
// Tests
// =============================================================================
