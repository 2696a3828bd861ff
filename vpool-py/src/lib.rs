//! Python bindings for the vpool billiards physics core.
//!
//! Provides a simple Python API for a renderer or notebook to drive:
//!
//! ```python
//! from vpool_physics import Table, Vec3
//!
//! table = Table()
//! table.aim(0.0, 0.0)          # pointer position on the table plane
//!
//! while table.step():
//!     for pos in table.ball_positions():
//!         draw_ball(pos.x, pos.z)
//!
//! print("win!" if table.is_win() else "again")
//! ```

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use vpool_core::config::{ConfigError, ConfigLoader, PhysicsConfig};
use vpool_core::rest::Motion;
use vpool_core::simulation::{NullSink, Simulation};
use vpool_core::types::Vec3 as CoreVec3;

/// 3D vector for positions and velocities.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec3 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
    #[pyo3(get, set)]
    pub z: f64,
}

#[pymethods]
impl Vec3 {
    #[new]
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn __repr__(&self) -> String {
        format!("Vec3({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }

    fn magnitude(&self) -> f64 {
        CoreVec3::from(*self).magnitude()
    }

    fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl From<CoreVec3> for Vec3 {
    fn from(v: CoreVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3> for CoreVec3 {
    fn from(v: Vec3) -> Self {
        CoreVec3::new(v.x, v.y, v.z)
    }
}

fn config_error(err: ConfigError) -> PyErr {
    match err {
        ConfigError::IoError(e) => PyIOError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// The billiards table.
///
/// Wraps one simulation: launch the cue, step until rest, read positions.
#[pyclass]
pub struct Table {
    sim: Simulation,
}

#[pymethods]
impl Table {
    /// Create a table with the standard rack and constants.
    #[new]
    fn new() -> Self {
        Self {
            sim: Simulation::default(),
        }
    }

    /// Create a table using a YAML preset from `<base>/physics/<name>.yaml`.
    #[staticmethod]
    fn from_preset(base: &str, name: &str) -> PyResult<Self> {
        let config = ConfigLoader::new(base)
            .load_physics(name)
            .map_err(config_error)?;
        Ok(Self {
            sim: Simulation::new(config),
        })
    }

    /// Names of the presets available under `base`.
    #[staticmethod]
    fn list_presets(base: &str) -> PyResult<Vec<String>> {
        ConfigLoader::new(base).list_physics().map_err(config_error)
    }

    /// Ticks since the last launch.
    #[getter]
    fn ticks(&self) -> u64 {
        self.sim.ticks()
    }

    /// Simulated seconds since the last launch.
    #[getter]
    fn time(&self) -> f64 {
        self.sim.time()
    }

    /// Seconds per tick, for pacing the display.
    #[getter]
    fn time_step(&self) -> f64 {
        self.sim.config().time_step
    }

    /// Launch the cue ball with an explicit velocity.
    fn launch(&mut self, vx: f64, vy: f64, vz: f64) {
        self.sim.launch(CoreVec3::new(vx, vy, vz));
    }

    /// Launch the cue ball toward a pointer position on the table plane.
    ///
    /// Returns the launch velocity used.
    fn aim(&mut self, x: f64, z: f64) -> Vec3 {
        let velocity = self.sim.aim(CoreVec3::new(x, 0.0, z));
        self.sim.launch(velocity);
        velocity.into()
    }

    /// Advance one tick. Returns True while the balls are still moving.
    fn step(&mut self) -> bool {
        self.sim.tick() == Motion::Moving
    }

    /// Run the current shot until rest. Returns the number of ticks.
    fn run_shot(&mut self) -> u64 {
        self.sim.run_shot(&mut NullSink).ticks
    }

    fn at_rest(&self) -> bool {
        self.sim.is_at_rest()
    }

    /// Positions of all balls, cue ball first.
    fn ball_positions(&self) -> Vec<Vec3> {
        self.sim.positions().into_iter().map(Vec3::from).collect()
    }

    /// Velocities of all balls, cue ball first.
    fn ball_velocities(&self) -> Vec<Vec3> {
        self.sim
            .state()
            .velocities()
            .into_iter()
            .map(Vec3::from)
            .collect()
    }

    /// Ball radii, cue ball first.
    fn ball_radii(&self) -> Vec<f64> {
        self.sim.state().balls.iter().map(|b| b.radius).collect()
    }

    /// Display colour name per ball: "white", "blue" or "orange".
    fn ball_colors(&self) -> Vec<String> {
        self.sim
            .state()
            .balls
            .iter()
            .map(|b| format!("{:?}", b.id.color()).to_lowercase())
            .collect()
    }

    /// Goal rectangle as (center_x, center_z, length, width).
    fn goal_region(&self) -> (f64, f64, f64, f64) {
        let goal = self.sim.state().table.goal;
        (goal.center.x, goal.center.z, goal.length, goal.width)
    }

    /// Cushion half-extents as (half_x, half_z).
    fn boundary(&self) -> (f64, f64) {
        let boundary = self.sim.state().table.boundary;
        (boundary.half_x, boundary.half_z)
    }

    /// True once every target ball sits inside the goal region.
    fn is_win(&self) -> bool {
        self.sim.is_win()
    }

    /// Re-rack the balls.
    fn reset(&mut self) {
        self.sim.reset();
    }

    /// Get current state as dict for easy inspection.
    fn state_dict(&self) -> PyResult<PyObject> {
        Python::with_gil(|py| {
            let dict = pyo3::types::PyDict::new(py);
            let config: &PhysicsConfig = self.sim.config();
            dict.set_item("ticks", self.sim.ticks())?;
            dict.set_item("time", self.sim.time())?;
            dict.set_item("at_rest", self.sim.is_at_rest())?;
            dict.set_item("win", self.sim.is_win())?;
            dict.set_item("friction_coefficient", config.friction_coefficient)?;
            dict.set_item("min_velocity", config.min_velocity)?;
            let positions: Vec<(f64, f64, f64)> = self
                .sim
                .positions()
                .iter()
                .map(|p| (p.x, p.y, p.z))
                .collect();
            dict.set_item("positions", positions)?;
            Ok(dict.into())
        })
    }
}

/// Python module definition.
#[pymodule]
fn vpool_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec3>()?;
    m.add_class::<Table>()?;
    Ok(())
}
