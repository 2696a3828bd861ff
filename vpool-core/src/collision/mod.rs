//! Collision detection and resolution for billiards physics.
//!
//! This module handles:
//! - **Detection**: Finding cushion penetration and ball overlap after a tick
//! - **Resolution**: Clamping, reflecting and exchanging velocities
//!
//! ## Discrete Overlap Test
//!
//! Collisions are found after the position step, by checking whether a ball
//! has already crossed a cushion plane or overlaps another ball.
//!
//! ```text
//!  tick n        tick n+1
//!    ●──────────────●●     overlap found at n+1
//!                 ←─┘      roll both balls back one step, exchange radials
//! ```
//!
//! Cushion contacts are resolved before ball contacts within a tick.

pub mod detection;
pub mod resolution;

pub use detection::*;
pub use resolution::*;
