//! Core types for the billiards simulation.
//!
//! Table units are arbitrary but consistent:
//! - Position: table units
//! - Velocity: table units per second
//! - The table lies in the x–z plane, y points up and is never perturbed
//!   by the physics.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::config::PhysicsConfig;

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions and velocities.
///
/// Coordinate system:
/// - X: horizontal, along the table length (goal region toward negative X)
/// - Y: vertical (positive upward)
/// - Z: horizontal, along the table width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// The vertical axis, used as the rotation axis for tangents.
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Project this vector onto another vector
    pub fn project_onto(&self, other: &Self) -> Self {
        let other_mag_sq = other.magnitude_squared();
        if other_mag_sq < constants::EPSILON * constants::EPSILON {
            Self::ZERO
        } else {
            *other * (self.dot(other) / other_mag_sq)
        }
    }

    /// Rotate this vector about `axis` by `angle` radians (right-hand rule).
    ///
    /// Uses Rodrigues' formula:
    ///
    /// ```text
    /// v' = v cos θ + (k × v) sin θ + k (k · v)(1 − cos θ)
    /// ```
    ///
    /// A zero axis leaves the vector unchanged.
    pub fn rotate_about(&self, axis: &Self, angle: f64) -> Self {
        let k = axis.normalized();
        if k == Self::ZERO {
            return *self;
        }
        let (sin, cos) = angle.sin_cos();
        *self * cos + k.cross(self) * sin + k * (k.dot(self) * (1.0 - cos))
    }

    /// The same vector with its vertical component dropped.
    pub fn horizontal(&self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }
}

// Operator overloads for Vec3
impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Ball Identity
// =============================================================================

/// Which ball this is. Index 0 is always the cue ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallId {
    Cue,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
}

impl BallId {
    /// All balls in rack order.
    pub const ALL: [BallId; 7] = [
        BallId::Cue,
        BallId::One,
        BallId::Two,
        BallId::Three,
        BallId::Four,
        BallId::Five,
        BallId::Six,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_cue(self) -> bool {
        self == BallId::Cue
    }

    /// Colour the ball is drawn with. Presentation only.
    pub fn color(self) -> BallColor {
        match self {
            BallId::Cue => BallColor::White,
            BallId::One | BallId::Four | BallId::Six => BallColor::Blue,
            BallId::Two | BallId::Three | BallId::Five => BallColor::Orange,
        }
    }
}

impl std::fmt::Display for BallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallId::Cue => write!(f, "cue"),
            other => write!(f, "ball {}", other.index()),
        }
    }
}

/// Display colour hint for the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallColor {
    White,
    Blue,
    Orange,
}

// =============================================================================
// Ball State
// =============================================================================

/// Complete state of one ball at a given instant.
///
/// Balls are point masses with a radius: there is no spin and every ball
/// has the same mass, so collisions only exchange velocity components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub id: BallId,
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f64,
}

impl BallState {
    pub fn new(id: BallId, pos: Vec3, vel: Vec3, radius: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
        }
    }

    /// Ball at rest at a given position
    pub fn at_rest(id: BallId, pos: Vec3, radius: f64) -> Self {
        Self::new(id, pos, Vec3::ZERO, radius)
    }

    pub fn speed(&self) -> f64 {
        self.vel.magnitude()
    }

    /// Kinetic energy per unit mass (all balls share one mass).
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.vel.magnitude_squared()
    }
}

// =============================================================================
// Table State
// =============================================================================

/// One of the four cushions around the playing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Right,
    Left,
    Back,
    Front,
}

impl Wall {
    /// Walls in the order they are resolved each tick.
    pub const ALL: [Wall; 4] = [Wall::Right, Wall::Left, Wall::Back, Wall::Front];
}

/// The four boundary planes, as half-extents about the table centre.
///
/// Planes sit at x = ±half_x and z = ±half_z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub half_x: f64,
    pub half_z: f64,
}

impl Boundary {
    pub fn standard() -> Self {
        Self {
            half_x: constants::BOUNDARY_X,
            half_z: constants::BOUNDARY_Z,
        }
    }

    /// Signed coordinate of a wall's plane along its axis.
    pub fn plane(&self, wall: Wall) -> f64 {
        match wall {
            Wall::Right => self.half_x,
            Wall::Left => -self.half_x,
            Wall::Front => self.half_z,
            Wall::Back => -self.half_z,
        }
    }

    /// Whether a ball centre lies in the legal region for a ball of `radius`.
    pub fn contains(&self, pos: &Vec3, radius: f64) -> bool {
        pos.x.abs() <= self.half_x - radius && pos.z.abs() <= self.half_z - radius
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::standard()
    }
}

/// Axis-aligned target rectangle in the x–z plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalRegion {
    pub center: Vec3,
    /// Extent along x
    pub length: f64,
    /// Extent along z
    pub width: f64,
}

impl GoalRegion {
    pub fn standard() -> Self {
        Self {
            center: Vec3::new(constants::GOAL_CENTER_X, 0.0, constants::GOAL_CENTER_Z),
            length: constants::GOAL_LENGTH,
            width: constants::GOAL_WIDTH,
        }
    }

    /// Strictly inside: a point on the edge does not count.
    pub fn contains(&self, pos: &Vec3) -> bool {
        let half_length = 0.5 * self.length;
        let half_width = 0.5 * self.width;
        pos.x > self.center.x - half_length
            && pos.x < self.center.x + half_length
            && pos.z > self.center.z - half_width
            && pos.z < self.center.z + half_width
    }
}

impl Default for GoalRegion {
    fn default() -> Self {
        Self::standard()
    }
}

/// The static table: cushions plus goal region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    pub boundary: Boundary,
    pub goal: GoalRegion,
}

impl TableState {
    pub fn standard() -> Self {
        Self {
            boundary: Boundary::standard(),
            goal: GoalRegion::standard(),
        }
    }
}

impl Default for TableState {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Simulation State
// =============================================================================

/// Complete state of a round: the balls, the table and the constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub balls: Vec<BallState>,
    pub table: TableState,
    pub config: PhysicsConfig,
}

impl SimulationState {
    /// Seven balls at their starting positions with zero velocity.
    pub fn standard_rack(config: PhysicsConfig) -> Self {
        let balls = BallId::ALL
            .iter()
            .zip(constants::RACK_POSITIONS.iter())
            .map(|(&id, &pos)| BallState::at_rest(id, pos, config.ball_radius))
            .collect();
        Self::with_balls(balls, config)
    }

    /// A state over an arbitrary ball list; index 0 plays the cue ball.
    pub fn with_balls(balls: Vec<BallState>, config: PhysicsConfig) -> Self {
        Self {
            balls,
            table: TableState::standard(),
            config,
        }
    }

    pub fn cue(&self) -> Option<&BallState> {
        self.balls.first()
    }

    pub fn cue_mut(&mut self) -> Option<&mut BallState> {
        self.balls.first_mut()
    }

    /// Read-only snapshot of every ball position, in ball order.
    pub fn positions(&self) -> Vec<Vec3> {
        self.balls.iter().map(|b| b.pos).collect()
    }

    pub fn velocities(&self) -> Vec<Vec3> {
        self.balls.iter().map(|b| b.vel).collect()
    }

    pub fn total_kinetic_energy(&self) -> f64 {
        self.balls.iter().map(BallState::kinetic_energy).sum()
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::standard_rack(PhysicsConfig::default())
    }
}

// =============================================================================
// Constants
// =============================================================================

/// Fixed table geometry and starting layout.
pub mod constants {
    use super::Vec3;

    /// Right/left cushion planes at x = ±BOUNDARY_X
    pub const BOUNDARY_X: f64 = 4.4;

    /// Front/back cushion planes at z = ±BOUNDARY_Z
    pub const BOUNDARY_Z: f64 = 2.2;

    pub const GOAL_CENTER_X: f64 = -3.0;
    pub const GOAL_CENTER_Z: f64 = 0.0;
    pub const GOAL_LENGTH: f64 = 3.0;
    pub const GOAL_WIDTH: f64 = 3.0;

    /// Height of every ball centre above the table origin
    pub const BALL_HEIGHT: f64 = 0.125;

    /// Starting positions: cue ball first, then the six target balls.
    pub const RACK_POSITIONS: [Vec3; 7] = [
        Vec3::new(-2.25, BALL_HEIGHT, 0.0),
        Vec3::new(2.25, BALL_HEIGHT, 0.0),
        Vec3::new(2.45, BALL_HEIGHT, 0.15),
        Vec3::new(2.45, BALL_HEIGHT, -0.15),
        Vec3::new(2.7, BALL_HEIGHT, -0.25),
        Vec3::new(2.7, BALL_HEIGHT, 0.0),
        Vec3::new(2.7, BALL_HEIGHT, 0.25),
    ];

    /// Small value for degenerate-vector checks
    pub const EPSILON: f64 = 1e-10;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a - b, Vec3::new(-3.0, -3.0, -3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(a.dot(&b), 32.0); // 1*4 + 2*5 + 3*6 = 32
    }

    #[test]
    fn test_vec3_magnitude() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert!((v.magnitude() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_projection_onto_axis() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        let p = v.project_onto(&Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(p, Vec3::new(3.0, 0.0, 0.0));

        // Projection onto the negated axis is the same vector
        let q = v.project_onto(&Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(q, p);
    }

    #[test]
    fn test_degenerate_vectors_give_zero() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.project_onto(&Vec3::ZERO), Vec3::ZERO);
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn test_projection_onto_short_axis() {
        // Well above the degenerate cutoff, so still a real projection
        let axis = Vec3::new(1e-6, 0.0, 0.0);
        let p = Vec3::new(3.0, 0.0, 4.0).project_onto(&axis);
        assert_abs_diff_eq!(p.x, 3.0, epsilon = 1e-9);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_rotate_quarter_turn_about_vertical() {
        let v = Vec3::new(1.0, 0.0, 0.0);
        let r = v.rotate_about(&Vec3::UP, std::f64::consts::FRAC_PI_2);

        // +x rotated a quarter turn about +y lands on -z
        assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.z, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.dot(&v), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_keeps_vertical_component() {
        let v = Vec3::new(0.3, 0.7, -0.2);
        let r = v.rotate_about(&Vec3::UP, 1.1);
        assert_abs_diff_eq!(r.y, 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(r.magnitude(), v.magnitude(), epsilon = 1e-12);
    }

    #[test]
    fn test_standard_rack() {
        let state = SimulationState::default();
        assert_eq!(state.balls.len(), 7);
        assert!(state.balls[0].id.is_cue());
        for (i, ball) in state.balls.iter().enumerate() {
            assert_eq!(ball.id.index(), i);
            assert_eq!(ball.vel, Vec3::ZERO);
            assert_eq!(ball.radius, 0.1);
            assert!(state.table.boundary.contains(&ball.pos, ball.radius));
        }
        assert_eq!(state.balls[0].pos, Vec3::new(-2.25, 0.125, 0.0));
    }

    #[test]
    fn test_goal_region_edges_are_outside() {
        let goal = GoalRegion::standard();
        assert!(goal.contains(&Vec3::new(-3.0, 0.125, 0.0)));
        assert!(!goal.contains(&Vec3::new(-4.5, 0.125, 0.0)));
        assert!(!goal.contains(&Vec3::new(-1.5, 0.125, 0.0)));
        assert!(!goal.contains(&Vec3::new(-3.0, 0.125, 1.5)));
        assert!(goal.contains(&Vec3::new(-1.51, 0.125, 0.0)));
    }

    #[test]
    fn test_ball_colors() {
        assert_eq!(BallId::Cue.color(), BallColor::White);
        assert_eq!(BallId::One.color(), BallColor::Blue);
        assert_eq!(BallId::Two.color(), BallColor::Orange);
        assert_eq!(BallId::Three.to_string(), "ball 3");
    }
}
