//! Solver trait and configuration.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default rotation set about the vertical axis, in degrees.
pub const DEFAULT_ROTATION_ANGLES: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

/// Configuration for the placement engine.
///
/// The grid step and rotation set are discretisations of a continuous search,
/// not physical limits; tests shrink them for fast exhaustive runs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Resolution of the (x, y) scan in mm.
    pub grid_step: f64,

    /// Rotation angles about the vertical axis, in degrees. Must contain 0.
    pub rotation_angles: Vec<f64>,

    /// Headroom below the ceiling: stacking levels above
    /// `height - ceiling_margin` are not offered as candidates.
    pub ceiling_margin: f64,

    /// Tie-break weight applied to the candidate's z (k1).
    pub height_weight: f64,

    /// Tie-break weight applied to floor increment × item height (k2).
    pub volume_weight: f64,

    /// Maximum depth of a contiguous stack of seating items.
    pub max_seating_stack: usize,

    /// Number of entries in the cyclic render palette.
    pub palette_size: usize,

    /// Float tolerance in mm for contact and overlap tests.
    pub tolerance: f64,

    /// Scan the orientations of one item in parallel.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_step: 25.0,
            rotation_angles: DEFAULT_ROTATION_ANGLES.to_vec(),
            ceiling_margin: 50.0,
            height_weight: 0.01,
            volume_weight: 1e-9,
            max_seating_stack: 2,
            palette_size: 10,
            tolerance: 1e-6,
            parallel: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scan grid resolution.
    pub fn with_grid_step(mut self, step: f64) -> Self {
        self.grid_step = step;
        self
    }

    /// Sets the rotation angle set (degrees).
    pub fn with_rotation_angles(mut self, angles: impl Into<Vec<f64>>) -> Self {
        self.rotation_angles = angles.into();
        self
    }

    /// Sets the ceiling headroom.
    pub fn with_ceiling_margin(mut self, margin: f64) -> Self {
        self.ceiling_margin = margin;
        self
    }

    /// Sets the score tie-break weights (k1 on z, k2 on added volume).
    pub fn with_score_weights(mut self, height_weight: f64, volume_weight: f64) -> Self {
        self.height_weight = height_weight;
        self.volume_weight = volume_weight;
        self
    }

    /// Sets the seating stack depth limit.
    pub fn with_max_seating_stack(mut self, depth: usize) -> Self {
        self.max_seating_stack = depth;
        self
    }

    /// Sets the palette length.
    pub fn with_palette_size(mut self, size: usize) -> Self {
        self.palette_size = size;
        self
    }

    /// Enables or disables the parallel orientation scan.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks the configuration for inconsistent values.
    pub fn validate(&self) -> Result<()> {
        if !(self.grid_step.is_finite() && self.grid_step > 0.0) {
            return Err(Error::ConfigError(format!(
                "grid step must be positive, got {}",
                self.grid_step
            )));
        }
        if self.rotation_angles.is_empty() {
            return Err(Error::ConfigError("rotation set is empty".into()));
        }
        if !self.rotation_angles.iter().any(|a| *a == 0.0) {
            return Err(Error::ConfigError(
                "rotation set must contain the identity angle 0".into(),
            ));
        }
        if self.rotation_angles.iter().any(|a| !a.is_finite()) {
            return Err(Error::ConfigError("rotation angles must be finite".into()));
        }
        if !(self.ceiling_margin >= 0.0) {
            return Err(Error::ConfigError(format!(
                "ceiling margin cannot be negative, got {}",
                self.ceiling_margin
            )));
        }
        if !(self.height_weight >= 0.0 && self.volume_weight >= 0.0) {
            return Err(Error::ConfigError("score weights cannot be negative".into()));
        }
        if self.max_seating_stack == 0 {
            return Err(Error::ConfigError(
                "seating stack limit must be at least 1".into(),
            ));
        }
        if self.palette_size == 0 {
            return Err(Error::ConfigError("palette cannot be empty".into()));
        }
        if !(self.tolerance >= 0.0) {
            return Err(Error::ConfigError("tolerance cannot be negative".into()));
        }
        Ok(())
    }
}

/// Progress callback for planning runs.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information emitted while items are processed.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Number of items processed so far (placed or not).
    pub items_processed: usize,
    /// Number of items accepted into the arrangement so far.
    pub items_placed: usize,
    /// Total number of non-degenerate items in the run.
    pub total_items: usize,
    /// Running floor area of the arrangement in m².
    pub floor_area_m2: f64,
    /// Id of the item processed last, if any.
    pub last_item: Option<String>,
    /// Current phase description.
    pub phase: String,
    /// Whether the planner is still running.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a new progress record.
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Sets the item counters.
    pub fn with_items(mut self, processed: usize, placed: usize, total: usize) -> Self {
        self.items_processed = processed;
        self.items_placed = placed;
        self.total_items = total;
        self
    }

    /// Sets the running floor area.
    pub fn with_floor_area(mut self, floor_area_m2: f64) -> Self {
        self.floor_area_m2 = floor_area_m2;
        self
    }

    /// Sets the last processed item.
    pub fn with_last_item(mut self, id: impl Into<String>) -> Self {
        self.last_item = Some(id.into());
        self
    }

    /// Sets the phase description.
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Marks the run as finished.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }

    /// Fraction of items processed (0.0 to 1.0).
    pub fn progress_fraction(&self) -> f64 {
        if self.total_items > 0 {
            self.items_processed as f64 / self.total_items as f64
        } else {
            1.0
        }
    }
}

/// Trait for load planners.
pub trait Solver {
    /// The item type this solver places.
    type Item;
    /// The container type items are placed into.
    type Container;
    /// The result of one run.
    type Output;

    /// Computes a placement for `items` inside `container`.
    fn solve(&self, items: &[Self::Item], container: &Self::Container) -> Result<Self::Output>;

    /// Same as [`Solver::solve`], reporting progress after each item.
    fn solve_with_progress(
        &self,
        items: &[Self::Item],
        container: &Self::Container,
        callback: ProgressCallback,
    ) -> Result<Self::Output>;
}
