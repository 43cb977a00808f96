//! The container (truck bed).

use loadplan_core::{Error, Result, AABB3D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fixed rectangular loading volume. Placements live in
/// `[0, length) × [0, width) × [0, height)` (mm).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container {
    /// Extent along x in mm.
    pub length: f64,
    /// Extent along y in mm.
    pub width: f64,
    /// Extent along z in mm.
    pub height: f64,
}

impl Container {
    /// Creates a new container with the given dimensions.
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// The reference truck bed: 4200 × 2025 × 2025 mm.
    pub fn reference() -> Self {
        Self::new(4200.0, 2025.0, 2025.0)
    }

    /// Returns the floor area in mm².
    pub fn floor_area(&self) -> f64 {
        self.length * self.width
    }

    /// Returns the volume in mm³.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Returns the container as a bounding volume.
    pub fn bounds(&self) -> AABB3D<f64> {
        AABB3D::from_origin_size([0.0; 3], [self.length, self.width, self.height])
    }

    /// Checks whether `volume` lies inside the container, up to `tol`.
    pub fn contains(&self, volume: &AABB3D<f64>, tol: f64) -> bool {
        volume.min_x >= -tol
            && volume.min_y >= -tol
            && volume.min_z >= -tol
            && volume.max_x <= self.length + tol
            && volume.max_y <= self.width + tol
            && volume.max_z <= self.height + tol
    }

    /// Validates the container dimensions.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidContainer(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::reference()
    }
}
