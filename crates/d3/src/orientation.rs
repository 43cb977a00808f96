//! Orientation generation.
//!
//! An orientation assigns the three native extents of an item to the x, y and
//! z axes (one of six permutations) and then turns the item about the vertical
//! axis by one of a discrete set of angles. Turned footprints are replaced by
//! their axis-aligned bounding rectangle.

use crate::cargo::Cargo;
use loadplan_core::{rotated_extent, AABB2D, AABB3D, DEFAULT_ROTATION_ANGLES};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis permutations as (x source, y source, z source) indices into
/// `[length, width, height]`. The identity comes first.
const AXIS_PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2], // Original
    [0, 2, 1], // Tipped onto the long side
    [1, 0, 2], // Turned 90° in plane
    [1, 2, 0], // Tipped onto the end, turned
    [2, 0, 1], // Tipped onto the end
    [2, 1, 0], // Tipped onto the long side, turned
];

/// Index of the native height extent.
const NATIVE_HEIGHT: usize = 2;

/// One admissible pose of a cargo item.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Orientation {
    /// Extent along x after permutation and turn.
    pub effective_length: f64,
    /// Extent along y after permutation and turn.
    pub effective_width: f64,
    /// Vertical extent.
    pub height: f64,
    /// Turn about the vertical axis, in degrees.
    pub rotation_angle: f64,
    /// True when the native height axis is no longer vertical.
    pub is_height_flipped: bool,
    /// Native extent index feeding the x, y and z axes.
    pub axes: [usize; 3],
}

impl Orientation {
    /// Floor rectangle of the item with its lower corner at `(x, y)`.
    pub fn footprint_at(&self, x: f64, y: f64) -> AABB2D<f64> {
        AABB2D::from_origin_size(x, y, self.effective_length, self.effective_width)
    }

    /// Bounding volume of the item with its lower corner at `(x, y, z)`.
    pub fn volume_at(&self, x: f64, y: f64, z: f64) -> AABB3D<f64> {
        AABB3D::from_origin_size(
            [x, y, z],
            [self.effective_length, self.effective_width, self.height],
        )
    }

    /// Floor area of the bounding rectangle.
    pub fn footprint_area(&self) -> f64 {
        self.effective_length * self.effective_width
    }
}

/// Generates all orientations of `cargo` using the default rotation set.
pub fn generate_orientations(cargo: &Cargo) -> Vec<Orientation> {
    generate_orientations_with(cargo, &DEFAULT_ROTATION_ANGLES)
}

/// Generates all orientations of `cargo` for the given rotation angles.
///
/// General cargo gets every permutation (48 poses with eight angles); seating
/// only the two permutations that keep the native height vertical (16 poses).
/// The first pose is always the untouched item at 0°.
pub fn generate_orientations_with(cargo: &Cargo, angles: &[f64]) -> Vec<Orientation> {
    let extents = cargo.extents();
    let seating = cargo.category().is_seating();

    let mut orientations = Vec::with_capacity(AXIS_PERMUTATIONS.len() * angles.len().max(1));
    for axes in AXIS_PERMUTATIONS {
        let flipped = axes[2] != NATIVE_HEIGHT;
        if seating && flipped {
            continue;
        }
        let (l, w, h) = (extents[axes[0]], extents[axes[1]], extents[axes[2]]);
        for &angle in angles {
            let (effective_length, effective_width) = rotated_extent(l, w, angle);
            orientations.push(Orientation {
                effective_length,
                effective_width,
                height: h,
                rotation_angle: angle,
                is_height_flipped: flipped,
                axes,
            });
        }
    }

    if orientations.is_empty() {
        // Only reachable with an empty angle set.
        orientations.push(Orientation {
            effective_length: extents[0],
            effective_width: extents[1],
            height: extents[2],
            rotation_angle: 0.0,
            is_height_flipped: false,
            axes: AXIS_PERMUTATIONS[0],
        });
    }

    orientations
}
