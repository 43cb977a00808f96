//! Placement records and the finished arrangement.

use crate::cargo::CargoId;
use crate::container::Container;
use crate::orientation::Orientation;
use loadplan_core::{bounding_area, AABB2D, AABB3D};
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const MM2_PER_M2: f64 = 1e6;
const MM3_PER_M3: f64 = 1e9;

/// One accepted cargo item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Id of the placed cargo item.
    pub cargo_id: CargoId,
    /// Lower corner of the bounding volume in mm.
    pub position: Point3<f64>,
    /// Pose the item was placed in.
    pub orientation: Orientation,
    /// Index into a cyclic render palette. Cosmetic only.
    pub color_index: usize,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(cargo_id: impl Into<CargoId>, position: Point3<f64>, orientation: Orientation) -> Self {
        Self {
            cargo_id: cargo_id.into(),
            position,
            orientation,
            color_index: 0,
        }
    }

    /// Sets the palette index.
    pub fn with_color_index(mut self, index: usize) -> Self {
        self.color_index = index;
        self
    }

    /// Floor rectangle covered by the item.
    pub fn footprint(&self) -> AABB2D<f64> {
        self.orientation
            .footprint_at(self.position.x, self.position.y)
    }

    /// Bounding volume of the item.
    pub fn bounds(&self) -> AABB3D<f64> {
        self.orientation
            .volume_at(self.position.x, self.position.y, self.position.z)
    }

    /// Height of the item's top face.
    pub fn top(&self) -> f64 {
        self.position.z + self.orientation.height
    }
}

/// Aggregate figures for an arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrangementStats {
    /// Product of the maximum extents reached on each axis, in m³.
    pub occupied_volume_m3: f64,
    /// Area of the rectangle enclosing every footprint, in m².
    pub floor_area_m2: f64,
    /// `floor_area / container floor area · 100`.
    pub floor_utilization_pct: f64,
    /// Largest x reached, in mm.
    pub max_extent_x: f64,
    /// Largest y reached, in mm.
    pub max_extent_y: f64,
    /// Largest z reached, in mm.
    pub max_extent_z: f64,
}

impl ArrangementStats {
    /// Computes statistics over `placements`.
    pub fn compute(placements: &[Placement], container: &Container) -> Self {
        if placements.is_empty() {
            return Self::default();
        }

        let (max_x, max_y, max_z) = placements.iter().map(Placement::bounds).fold(
            (0.0_f64, 0.0_f64, 0.0_f64),
            |(x, y, z), b| (x.max(b.max_x), y.max(b.max_y), z.max(b.max_z)),
        );
        let footprints: Vec<_> = placements.iter().map(Placement::footprint).collect();
        let floor_area = bounding_area(&footprints);

        Self {
            occupied_volume_m3: max_x * max_y * max_z / MM3_PER_M3,
            floor_area_m2: floor_area / MM2_PER_M2,
            floor_utilization_pct: floor_area / container.floor_area() * 100.0,
            max_extent_x: max_x,
            max_extent_y: max_y,
            max_extent_z: max_z,
        }
    }
}

/// Result of one planning run.
///
/// Only placed items appear in `placements`. Items for which no admissible
/// position existed are listed in `unplaced`; this is an expected outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Arrangement {
    /// Accepted placements in loading order.
    pub placements: Vec<Placement>,
    /// Aggregate statistics.
    pub stats: ArrangementStats,
    /// Ids of non-degenerate items left out, in loading order.
    pub unplaced: Vec<CargoId>,
}

impl Arrangement {
    /// Returns the number of placed items.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns true if every non-degenerate item was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Looks up the placement of a cargo item.
    pub fn get(&self, cargo_id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.cargo_id == cargo_id)
    }
}
