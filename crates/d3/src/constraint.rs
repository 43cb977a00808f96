//! Admissibility of a candidate placement.
//!
//! [`ConstraintValidator::check`] runs once per scanned grid cell, so it only
//! ever walks the already-placed list: O(n) in the number of placed items and
//! no nested search. Seating stack depth is stored on each [`PlacedCargo`]
//! when it is committed so the chain never has to be walked again.

use crate::arrangement::Placement;
use crate::cargo::{Cargo, CargoCategory};
use crate::container::Container;
use crate::orientation::Orientation;
use loadplan_core::{Config, AABB2D, AABB3D};
use nalgebra::Point3;

/// A cargo item with its category resolved once, up front.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedCargo<'a> {
    /// The caller's cargo record.
    pub cargo: &'a Cargo,
    /// Stacking category.
    pub category: CargoCategory,
}

impl<'a> ClassifiedCargo<'a> {
    /// Classifies `cargo`.
    pub fn new(cargo: &'a Cargo) -> Self {
        Self {
            cargo,
            category: cargo.category(),
        }
    }
}

/// An accepted placement together with the facts later checks need.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCargo {
    /// The output record.
    pub placement: Placement,
    /// Weight in kg.
    pub weight: f64,
    /// Stacking category.
    pub category: CargoCategory,
    /// Depth of the contiguous seating stack ending at this item (0 for
    /// general cargo, 1 for a seating item on the floor or on general cargo).
    pub seating_depth: usize,
}

impl PlacedCargo {
    /// Builds a placed record from a resolved candidate.
    pub fn new(
        item: ClassifiedCargo<'_>,
        position: Point3<f64>,
        orientation: Orientation,
        support: &Support,
    ) -> Self {
        Self {
            placement: Placement::new(item.cargo.id.clone(), position, orientation),
            weight: item.cargo.weight,
            category: item.category,
            seating_depth: support.seating_depth,
        }
    }

    /// Sets the palette index of the underlying placement.
    pub fn with_color_index(mut self, index: usize) -> Self {
        self.placement.color_index = index;
        self
    }

    /// Floor rectangle.
    pub fn footprint(&self) -> AABB2D<f64> {
        self.placement.footprint()
    }

    /// Bounding volume.
    pub fn bounds(&self) -> AABB3D<f64> {
        self.placement.bounds()
    }

    /// Height of the top face.
    pub fn top(&self) -> f64 {
        self.placement.top()
    }
}

/// Why a candidate was rejected. Indices refer to the placed list passed to
/// [`ConstraintValidator::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The item would stick out of the container.
    OutOfBounds,
    /// The item would intersect an already placed item.
    Collision {
        /// Index of the intersected item.
        with: usize,
    },
    /// The item would end up directly beneath an already placed item.
    Wedged {
        /// Index of the item resting on the candidate.
        above: usize,
    },
    /// Nothing has its top at the candidate's base height under the footprint.
    Unsupported,
    /// The item is heavier than one of its supporters.
    Overweight {
        /// Index of the lighter supporter.
        supporter: usize,
    },
    /// A seating item would rest on general cargo.
    SeatingOnGeneral {
        /// Index of the general supporter.
        supporter: usize,
    },
    /// General cargo would rest on a seating item.
    GeneralOnSeating {
        /// Index of the seating supporter.
        supporter: usize,
    },
    /// The seating stack would grow past the configured limit.
    SeatingStackTooDeep {
        /// Depth the stack would reach.
        depth: usize,
    },
}

/// Support facts for an admissible candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Support {
    /// Indices of the items directly beneath; empty on the floor.
    pub supporters: Vec<usize>,
    /// Seating stack depth the candidate would have.
    pub seating_depth: usize,
}

/// Checks candidates against bounds, collisions, support, weight ordering and
/// seating rules.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintValidator<'a> {
    container: &'a Container,
    config: &'a Config,
}

impl<'a> ConstraintValidator<'a> {
    /// Creates a validator for one container and configuration.
    pub fn new(container: &'a Container, config: &'a Config) -> Self {
        Self { container, config }
    }

    /// Returns true if the candidate passes every check.
    pub fn is_valid(
        &self,
        position: Point3<f64>,
        orientation: &Orientation,
        item: ClassifiedCargo<'_>,
        placed: &[PlacedCargo],
    ) -> bool {
        self.check(position, orientation, item, placed).is_ok()
    }

    /// Runs the checks in order and reports the first failure.
    pub fn check(
        &self,
        position: Point3<f64>,
        orientation: &Orientation,
        item: ClassifiedCargo<'_>,
        placed: &[PlacedCargo],
    ) -> Result<Support, Violation> {
        let tol = self.config.tolerance;
        let volume = orientation.volume_at(position.x, position.y, position.z);

        if !self.container.contains(&volume, tol) {
            return Err(Violation::OutOfBounds);
        }

        if let Some(with) = placed.iter().position(|p| p.bounds().overlaps(&volume, tol)) {
            return Err(Violation::Collision { with });
        }

        // Committed items keep exactly the supporters they were checked against.
        let footprint = volume.footprint();
        if let Some(above) = placed.iter().position(|p| {
            (p.placement.position.z - volume.max_z).abs() <= tol
                && p.footprint().overlaps(&footprint, tol)
        }) {
            return Err(Violation::Wedged { above });
        }

        let seating = item.category.is_seating();
        if position.z <= tol {
            return Ok(Support {
                supporters: Vec::new(),
                seating_depth: usize::from(seating),
            });
        }

        let supporters: Vec<usize> = placed
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                (p.top() - position.z).abs() <= tol && p.footprint().overlaps(&footprint, tol)
            })
            .map(|(i, _)| i)
            .collect();
        if supporters.is_empty() {
            return Err(Violation::Unsupported);
        }

        if let Some(&supporter) = supporters
            .iter()
            .find(|&&i| item.cargo.weight > placed[i].weight)
        {
            return Err(Violation::Overweight { supporter });
        }

        let seating_depth = if seating {
            if let Some(&supporter) = supporters
                .iter()
                .find(|&&i| !placed[i].category.is_seating())
            {
                return Err(Violation::SeatingOnGeneral { supporter });
            }
            let depth = 1 + supporters
                .iter()
                .map(|&i| placed[i].seating_depth)
                .max()
                .unwrap_or(0);
            if depth > self.config.max_seating_stack {
                return Err(Violation::SeatingStackTooDeep { depth });
            }
            depth
        } else {
            if let Some(&supporter) = supporters
                .iter()
                .find(|&&i| placed[i].category.is_seating())
            {
                return Err(Violation::GeneralOnSeating { supporter });
            }
            0
        };

        Ok(Support {
            supporters,
            seating_depth,
        })
    }
}
