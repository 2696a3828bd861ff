//! Main orchestrator: ticks the table from a launch until it comes to rest.
//!
//! ## Tick Order
//!
//! ```text
//! 1. friction      v *= μ                (every ball)
//! 2. integrate     x += v * dt           (every ball)
//! 3. cushions      clamp + reflect       (every ball, four walls)
//! 4. rest check    stop all if slow      → shot over, skip step 5
//! 5. ball pairs    rollback + exchange   (i < j, in index order)
//! ```
//!
//! The tick advances simulated time by exactly `time_step`; how fast ticks
//! are shown on screen is up to the [`PresentationSink`].
//!
//! Input and rendering stay outside the core: an [`InputProvider`] hands
//! over launch velocities between shots, and a [`PresentationSink`]
//! receives position snapshots.

use serde::{Deserialize, Serialize};

use crate::collision::CollisionResolver;
use crate::config::PhysicsConfig;
use crate::integrator::{Euler, GeometricFriction};
use crate::rest::{Motion, RestDetector};
use crate::rules::WinEvaluator;
use crate::types::{SimulationState, Vec3};

/// Summary of one shot, from launch to rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotReport {
    pub ticks: u64,
    /// Simulated seconds (`ticks * time_step`)
    pub time: f64,
    pub wall_contacts: usize,
    pub ball_contacts: usize,
    pub win: bool,
    pub final_positions: Vec<Vec3>,
}

/// Source of player shots. Polled only between shots.
pub trait InputProvider {
    /// Launch velocity for the cue ball, or `None` to stop playing.
    fn next_launch(&mut self, state: &SimulationState) -> Option<Vec3>;
}

/// Consumer of table snapshots, typically a renderer.
pub trait PresentationSink {
    /// Called after every tick with the ball positions in ball order.
    fn on_tick(&mut self, _positions: &[Vec3]) {}

    /// Called once when a shot comes to rest.
    fn on_shot_end(&mut self, _report: &ShotReport) {}
}

/// Sink that ignores everything (headless runs, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PresentationSink for NullSink {}

/// Turns pointer positions on the table into launch velocities.
///
/// Each pointer aims the cue ball from its current position, scaled by the
/// configured launch multiplier.
pub struct PointerInput<I> {
    pointers: I,
}

impl<I: Iterator<Item = Vec3>> PointerInput<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(pointers: T) -> Self {
        Self {
            pointers: pointers.into_iter(),
        }
    }
}

impl<I: Iterator<Item = Vec3>> InputProvider for PointerInput<I> {
    fn next_launch(&mut self, state: &SimulationState) -> Option<Vec3> {
        let pointer = self.pointers.next()?;
        Some(aim(state, pointer))
    }
}

/// Launch velocity toward a pointer on the table plane.
///
/// `launch_multiplier * (pointer - cue)` with the vertical part dropped.
pub fn aim(state: &SimulationState, pointer: Vec3) -> Vec3 {
    let cue = state.cue().map(|b| b.pos).unwrap_or(Vec3::ZERO);
    (pointer - cue).horizontal() * state.config.launch_multiplier
}

/// Single-threaded billiards simulation.
pub struct Simulation {
    state: SimulationState,
    friction: GeometricFriction,
    rest: RestDetector,
    motion: Motion,
    ticks: u64,
    wall_contacts: usize,
    ball_contacts: usize,
}

impl Simulation {
    /// Standard rack with the given constants.
    pub fn new(config: PhysicsConfig) -> Self {
        Self::from_state(SimulationState::standard_rack(config))
    }

    /// Simulation over an existing table. Starts at rest.
    pub fn from_state(state: SimulationState) -> Self {
        let config = state.config;
        Self {
            state,
            friction: GeometricFriction::new(config.friction_coefficient),
            rest: RestDetector::new(config.min_velocity),
            motion: Motion::AtRest,
            ticks: 0,
            wall_contacts: 0,
            ball_contacts: 0,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.state.config
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn is_at_rest(&self) -> bool {
        self.motion == Motion::AtRest
    }

    /// Ticks run since the last launch.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds since the last launch.
    pub fn time(&self) -> f64 {
        self.ticks as f64 * self.state.config.time_step
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.state.positions()
    }

    /// Launch velocity toward `pointer`; see [`aim`].
    pub fn aim(&self, pointer: Vec3) -> Vec3 {
        aim(&self.state, pointer)
    }

    /// Give the cue ball a new velocity and start a shot.
    pub fn launch(&mut self, velocity: Vec3) {
        let Some(cue) = self.state.cue_mut() else {
            log::warn!("launch ignored: table has no cue ball");
            return;
        };
        cue.vel = velocity;

        self.motion = Motion::Moving;
        self.ticks = 0;
        self.wall_contacts = 0;
        self.ball_contacts = 0;
        log::info!(
            "cue launched at ({:.3}, {:.3}, {:.3}), speed {:.3}",
            velocity.x,
            velocity.y,
            velocity.z,
            velocity.magnitude()
        );
    }

    /// Advance the table by one tick.
    ///
    /// Does nothing once the shot is at rest.
    pub fn tick(&mut self) -> Motion {
        if self.motion == Motion::AtRest {
            return Motion::AtRest;
        }

        Euler::step_all(
            &mut self.state.balls,
            &self.friction,
            self.state.config.time_step,
        );
        self.wall_contacts += CollisionResolver::resolve_walls(&mut self.state);
        self.ticks += 1;

        if self.rest.check(&mut self.state.balls) == Motion::AtRest {
            self.motion = Motion::AtRest;
            log::trace!("tick {}: table at rest", self.ticks);
            return Motion::AtRest;
        }

        self.ball_contacts += CollisionResolver::resolve_pairs(&mut self.state);
        log::trace!(
            "tick {}: peak speed {:.4}",
            self.ticks,
            RestDetector::peak_speed(&self.state.balls).unwrap_or(0.0)
        );
        Motion::Moving
    }

    /// Tick until the table is at rest, feeding every snapshot to `sink`.
    pub fn run_shot<S: PresentationSink>(&mut self, sink: &mut S) -> ShotReport {
        while self.motion == Motion::Moving {
            self.tick();
            sink.on_tick(&self.state.positions());
        }

        let report = ShotReport {
            ticks: self.ticks,
            time: self.time(),
            wall_contacts: self.wall_contacts,
            ball_contacts: self.ball_contacts,
            win: self.is_win(),
            final_positions: self.state.positions(),
        };
        log::info!(
            "shot over after {} ticks ({} cushion, {} ball contacts), {} of {} in goal",
            report.ticks,
            report.wall_contacts,
            report.ball_contacts,
            WinEvaluator::balls_in_goal(&self.state),
            self.state.balls.len().saturating_sub(1)
        );
        sink.on_shot_end(&report);
        report
    }

    pub fn is_win(&self) -> bool {
        WinEvaluator::is_win(&self.state)
    }

    /// Re-rack all seven balls at their starting positions.
    pub fn reset(&mut self) {
        *self = Self::new(self.state.config);
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

/// Outcome of a whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub shots: u32,
    pub won: bool,
}

/// Outer loop: shots until the goal is filled or the player stops.
pub struct Game {
    pub simulation: Simulation,
}

impl Game {
    pub fn new(simulation: Simulation) -> Self {
        Self { simulation }
    }

    pub fn play<I: InputProvider, S: PresentationSink>(
        &mut self,
        input: &mut I,
        sink: &mut S,
    ) -> GameSummary {
        let mut shots = 0;
        while let Some(velocity) = input.next_launch(self.simulation.state()) {
            self.simulation.launch(velocity);
            let report = self.simulation.run_shot(sink);
            shots += 1;
            if report.win {
                log::info!("goal filled after {} shots", shots);
                return GameSummary { shots, won: true };
            }
        }
        GameSummary { shots, won: false }
    }
}

// =============================================================================
// Tests
// =============================================================================
