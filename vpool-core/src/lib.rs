//! # vpool Core
//!
//! Rigid-body physics for a top-down billiards table: a cue ball and six
//! target balls rolling, bouncing off cushions and striking each other
//! until friction brings the table to rest.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec3, balls, table, simulation state)
//! - `config`: Named physics constants and YAML presets
//! - `integrator`: Friction decay and explicit position step
//! - `collision`: Cushion and ball-ball detection and resolution
//! - `rest`: Rest detection that ends a shot
//! - `rules`: Win condition
//! - `simulation`: Main orchestrator, input and presentation seams

pub mod collision;
pub mod config;
pub mod integrator;
pub mod rest;
pub mod rules;
pub mod simulation;
pub mod types;

pub use config::{ConfigError, ConfigLoader, PhysicsConfig};
pub use rest::Motion;
pub use simulation::{Game, InputProvider, PresentationSink, ShotReport, Simulation};
pub use types::{BallId, BallState, SimulationState, Vec3};
