//! Collision resolution for billiards physics.
//!
//! Computes post-collision position and velocity for the two contact kinds:
//! - Cushions: clamp just inside the table and reflect one axis
//! - Balls: equal-mass elastic exchange of the radial velocity components
//!
//! ## Model Assumptions
//!
//! - **Perfectly elastic**: no restitution loss at cushions or between balls.
//!   Friction is the only thing that slows the table down.
//! - **Equal masses**: exchanging radial components is the full elastic
//!   solution only because every ball weighs the same.
//! - **One-step rollback**: overlapping balls are moved back by one
//!   position step instead of searching for the exact time of impact, so
//!   very fast contacts may still end a tick interpenetrating.
//!
//! ## Radial / Tangential Exchange
//!
//! ```text
//!          tangent (diff rotated 90° about +y)
//!              ↑
//!     ●────────────────→●
//!     a      diff       b
//!
//! a keeps its tangential part and takes b's radial part, and vice versa.
//! ```

use std::f64::consts::FRAC_PI_2;

use super::detection::{CollisionDetector, PairContact, WallContact};
use crate::integrator::Euler;
use crate::types::{BallState, Boundary, SimulationState, Vec3, Wall};

/// Collision resolver for the billiards table.
pub struct CollisionResolver;

impl CollisionResolver {
    /// Push a ball back inside a cushion and reflect its velocity on that axis.
    ///
    /// The ball ends up `radius + buffer` from the plane so it does not
    /// register the same cushion again on the next tick.
    pub fn resolve_wall(
        ball: &mut BallState,
        boundary: &Boundary,
        contact: &WallContact,
        buffer: f64,
    ) {
        let plane = boundary.plane(contact.wall);
        let clearance = ball.radius + buffer;
        match contact.wall {
            Wall::Right => {
                ball.pos.x = plane - clearance;
                ball.vel.x = -ball.vel.x;
            }
            Wall::Left => {
                ball.pos.x = plane + clearance;
                ball.vel.x = -ball.vel.x;
            }
            Wall::Front => {
                ball.pos.z = plane - clearance;
                ball.vel.z = -ball.vel.z;
            }
            Wall::Back => {
                ball.pos.z = plane + clearance;
                ball.vel.z = -ball.vel.z;
            }
        }
    }

    /// Resolve an overlap between two balls.
    ///
    /// Both balls are rolled back one step, then swap the velocity
    /// components along the centre line while keeping the perpendicular
    /// ones. Coincident centres give a zero axis, which zeroes both
    /// velocities rather than producing NaN.
    pub fn resolve_pair(a: &mut BallState, b: &mut BallState, contact: &PairContact, dt: f64) {
        let diff = contact.diff;
        let tangent = diff.rotate_about(&Vec3::UP, FRAC_PI_2);

        let vel_a = a.vel;
        let vel_b = b.vel;

        Euler::undo(b, dt);
        Euler::undo(a, dt);

        let a_radial = vel_a.project_onto(&(-diff));
        let a_tangent = vel_a.project_onto(&tangent);
        let b_radial = vel_b.project_onto(&diff);
        let b_tangent = vel_b.project_onto(&tangent);

        b.vel = a_radial + b_tangent;
        a.vel = b_radial + a_tangent;
    }

    /// Run every ball against all four cushions.
    ///
    /// Cushions are checked one after another on the already-corrected
    /// position, so a ball in a corner can reflect on both axes in one pass.
    /// Returns the number of cushion contacts.
    pub fn resolve_walls(state: &mut SimulationState) -> usize {
        let boundary = state.table.boundary;
        let buffer = state.config.position_buffer;
        let mut contacts = 0;

        for ball in state.balls.iter_mut() {
            for wall in Wall::ALL {
                if let Some(contact) = CollisionDetector::detect_wall(ball, &boundary, wall) {
                    Self::resolve_wall(ball, &boundary, &contact, buffer);
                    contacts += 1;
                    log::debug!(
                        "{} hit {:?} cushion, penetration {:.4}",
                        ball.id,
                        wall,
                        contact.penetration
                    );
                }
            }
        }

        contacts
    }

    /// Run every unordered pair (i < j) through detection and resolution.
    ///
    /// Pairs are visited with i ascending and j ascending from i + 1. A
    /// resolved pair changes velocities and positions that later pairs in
    /// the same pass read, so this order is part of the behaviour.
    /// Returns the number of ball contacts.
    pub fn resolve_pairs(state: &mut SimulationState) -> usize {
        let dt = state.config.time_step;
        let count = state.balls.len();
        let mut contacts = 0;

        for i in 0..count {
            for j in (i + 1)..count {
                let (head, tail) = state.balls.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];

                if let Some(contact) = CollisionDetector::detect_pair(a, b) {
                    Self::resolve_pair(a, b, &contact, dt);
                    contacts += 1;
                    log::debug!(
                        "{} struck {}, overlap {:.4}",
                        a.id,
                        b.id,
                        contact.penetration
                    );
                }
            }
        }

        contacts
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::types::BallId;
    use approx::assert_abs_diff_eq;

    const RADIUS: f64 = 0.1;

    fn ball(id: BallId, pos: Vec3, vel: Vec3) -> BallState {
        BallState::new(id, pos, vel, RADIUS)
    }

    fn state_of(balls: Vec<BallState>) -> SimulationState {
        SimulationState::with_balls(balls, PhysicsConfig::default())
    }

    #[test]
    fn test_right_wall_reflection() {
        let v = 3.0;
        let mut state = state_of(vec![ball(
            BallId::Cue,
            Vec3::new(4.32, 0.125, 0.0),
            Vec3::new(v, 0.0, 0.0),
        )]);

        let contacts = CollisionResolver::resolve_walls(&mut state);

        let cue = state.balls[0];
        assert_eq!(contacts, 1);
        assert_eq!(cue.vel.x, -v, "Reflection should be exact");
        let bound = 4.4 - RADIUS - 0.01 / 2.0;
        assert!(cue.pos.x <= bound, "x={} should be <= {}", cue.pos.x, bound);
        assert_abs_diff_eq!(cue.pos.x, 4.29, epsilon = 1e-12);
    }

    #[test]
    fn test_left_and_back_walls_clamp_inward() {
        let mut state = state_of(vec![ball(
            BallId::Cue,
            Vec3::new(-4.35, 0.125, -2.18),
            Vec3::new(-1.0, 0.0, -2.0),
        )]);

        let contacts = CollisionResolver::resolve_walls(&mut state);

        let cue = state.balls[0];
        assert_eq!(contacts, 2, "Corner ball should reflect on both axes");
        assert_eq!(cue.vel, Vec3::new(1.0, 0.0, 2.0));
        assert_abs_diff_eq!(cue.pos.x, -4.29, epsilon = 1e-12);
        assert_abs_diff_eq!(cue.pos.z, -2.09, epsilon = 1e-12);
        assert!(state.table.boundary.contains(&cue.pos, RADIUS));
    }

    #[test]
    fn test_wall_reflection_keeps_speed() {
        let vel = Vec3::new(0.7, 0.0, 2.4);
        let mut state = state_of(vec![ball(BallId::Cue, Vec3::new(1.0, 0.125, 2.15), vel)]);

        CollisionResolver::resolve_walls(&mut state);

        assert_eq!(state.balls[0].vel, Vec3::new(0.7, 0.0, -2.4));
        assert_eq!(state.balls[0].speed(), vel.magnitude());
    }

    #[test]
    fn test_head_on_swap() {
        let v = 2.0;
        let mut a = ball(BallId::Cue, Vec3::new(0.0, 0.125, 0.0), Vec3::new(v, 0.0, 0.0));
        let mut b = ball(BallId::One, Vec3::new(0.15, 0.125, 0.0), Vec3::new(-v, 0.0, 0.0));
        let contact = CollisionDetector::detect_pair(&a, &b).unwrap();

        CollisionResolver::resolve_pair(&mut a, &mut b, &contact, 0.01);

        assert_abs_diff_eq!(a.vel.x, -v, epsilon = 1e-12);
        assert_abs_diff_eq!(b.vel.x, v, epsilon = 1e-12);
        assert_abs_diff_eq!(a.vel.z, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.vel.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rollback_uses_incoming_velocity() {
        let mut a = ball(BallId::Cue, Vec3::new(0.0, 0.125, 0.0), Vec3::new(2.0, 0.0, 0.0));
        let mut b = ball(BallId::One, Vec3::new(0.15, 0.125, 0.0), Vec3::ZERO);
        let contact = CollisionDetector::detect_pair(&a, &b).unwrap();

        CollisionResolver::resolve_pair(&mut a, &mut b, &contact, 0.01);

        // a moved back by 2.0 * 0.01, b was at rest and stays put
        assert_abs_diff_eq!(a.pos.x, -0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(b.pos.x, 0.15, epsilon = 1e-12);
        // Moving ball stops dead, struck ball takes all the speed
        assert_abs_diff_eq!(a.vel.magnitude(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.vel.x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_glancing_hit_conserves_energy() {
        let mut a = ball(BallId::Cue, Vec3::new(0.0, 0.125, 0.0), Vec3::new(3.0, 0.0, 0.5));
        let mut b = ball(BallId::One, Vec3::new(0.12, 0.125, 0.1), Vec3::new(-0.4, 0.0, 0.2));
        let before = a.kinetic_energy() + b.kinetic_energy();
        let momentum_before = a.vel + b.vel;
        let contact = CollisionDetector::detect_pair(&a, &b).unwrap();

        CollisionResolver::resolve_pair(&mut a, &mut b, &contact, 0.01);

        let after = a.kinetic_energy() + b.kinetic_energy();
        let momentum_after = a.vel + b.vel;
        assert_abs_diff_eq!(after, before, epsilon = 1e-9);
        assert_abs_diff_eq!(momentum_after.x, momentum_before.x, epsilon = 1e-9);
        assert_abs_diff_eq!(momentum_after.z, momentum_before.z, epsilon = 1e-9);
        assert_eq!(a.vel.y, 0.0);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_glancing_hit_keeps_tangential_part() {
        let diff = Vec3::new(0.12, 0.0, 0.1);
        let tangent = diff.rotate_about(&Vec3::UP, FRAC_PI_2);
        let incoming = Vec3::new(3.0, 0.0, 0.5);
        let mut a = ball(BallId::Cue, Vec3::new(0.0, 0.125, 0.0), incoming);
        let mut b = ball(BallId::One, Vec3::new(0.12, 0.125, 0.1), Vec3::ZERO);
        let contact = CollisionDetector::detect_pair(&a, &b).unwrap();

        CollisionResolver::resolve_pair(&mut a, &mut b, &contact, 0.01);

        // a keeps only its tangential part, b only gets a radial part
        let kept = incoming.project_onto(&tangent);
        assert_abs_diff_eq!(a.vel.x, kept.x, epsilon = 1e-12);
        assert_abs_diff_eq!(a.vel.z, kept.z, epsilon = 1e-12);
        assert_abs_diff_eq!(b.vel.dot(&tangent), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_coincident_balls_do_not_produce_nan() {
        let pos = Vec3::new(1.0, 0.125, 1.0);
        let mut a = ball(BallId::Cue, pos, Vec3::new(1.0, 0.0, 0.0));
        let mut b = ball(BallId::One, pos, Vec3::new(0.0, 0.0, 1.0));
        let contact = CollisionDetector::detect_pair(&a, &b).unwrap();

        CollisionResolver::resolve_pair(&mut a, &mut b, &contact, 0.01);

        assert!(a.vel.magnitude().is_finite());
        assert!(b.vel.magnitude().is_finite());
        assert_eq!(a.vel, Vec3::ZERO);
        assert_eq!(b.vel, Vec3::ZERO);
    }

    #[test]
    fn test_nearly_coincident_balls_keep_energy() {
        let mut a = ball(BallId::Cue, Vec3::new(1.0, 0.125, 1.0), Vec3::new(1.0, 0.0, 0.0));
        let mut b = ball(BallId::One, Vec3::new(1.000005, 0.125, 1.0), Vec3::ZERO);
        let contact = CollisionDetector::detect_pair(&a, &b).unwrap();

        CollisionResolver::resolve_pair(&mut a, &mut b, &contact, 0.01);

        assert_abs_diff_eq!(a.vel.magnitude(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.vel.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_separated_pairs_untouched() {
        let balls = vec![
            ball(BallId::Cue, Vec3::new(-1.0, 0.125, 0.0), Vec3::new(1.0, 0.0, 0.0)),
            ball(BallId::One, Vec3::new(1.0, 0.125, 0.0), Vec3::ZERO),
            ball(BallId::Two, Vec3::new(1.0, 0.125, 1.0), Vec3::ZERO),
        ];
        let mut state = state_of(balls.clone());

        let contacts = CollisionResolver::resolve_pairs(&mut state);

        assert_eq!(contacts, 0);
        assert_eq!(state.balls, balls);
    }

    #[test]
    fn test_pairs_resolved_in_index_order() {
        // Ball 1 overlaps both 0 and 2. Pair (0, 1) runs first and hands
        // ball 1 the cue's speed; pair (1, 2) then passes it on.
        let balls = vec![
            ball(BallId::Cue, Vec3::new(0.0, 0.125, 0.0), Vec3::new(1.0, 0.0, 0.0)),
            ball(BallId::One, Vec3::new(0.19, 0.125, 0.0), Vec3::ZERO),
            ball(BallId::Two, Vec3::new(0.38, 0.125, 0.0), Vec3::ZERO),
        ];
        let mut state = state_of(balls);

        let contacts = CollisionResolver::resolve_pairs(&mut state);

        assert_eq!(contacts, 2);
        assert_abs_diff_eq!(state.balls[0].vel.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.balls[1].vel.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.balls[2].vel.x, 1.0, epsilon = 1e-12);
    }
}
