//! Exhaustive grid search for the placement of one cargo item.
//!
//! For every orientation, every candidate Z level and every grid cell the
//! candidate is run through the [`ConstraintValidator`]; survivors are scored
//! and the best one wins. The search is brute force over a bounded
//! discretisation; there is no analytic placement.
//!
//! # Score
//!
//! ```text
//! score = floor_area(placed ∪ {candidate}) + k1·z + k2·(floor_increment · height)
//! ```
//!
//! `floor_area` is the area of the rectangle enclosing every footprint.
//! `k1` and `k2` are small and only break ties, so the priority is: smallest
//! enclosing floor, then lowest level, then least added volume. Upright poses
//! rank ahead of tipped ones regardless of score; an item is only laid on its
//! side when no upright position exists.

use crate::cargo::Cargo;
use crate::constraint::{ClassifiedCargo, ConstraintValidator, PlacedCargo, Violation};
use crate::container::Container;
use crate::orientation::{generate_orientations_with, Orientation};
use loadplan_core::{Config, AABB2D};
use nalgebra::Point3;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Returns the ascending, deduplicated Z levels worth trying: the floor plus
/// every placed top at or below `container.height - margin`.
pub fn candidate_levels(
    placed: &[PlacedCargo],
    container: &Container,
    margin: f64,
    tol: f64,
) -> Vec<f64> {
    let ceiling = container.height - margin;
    let mut levels = vec![0.0];
    levels.extend(
        placed
            .iter()
            .map(PlacedCargo::top)
            .filter(|top| *top <= ceiling + tol),
    );
    levels.sort_by(f64::total_cmp);
    levels.dedup_by(|later, earlier| (*later - *earlier).abs() <= tol);
    levels
}

/// An admissible position with its score.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    position: Point3<f64>,
    orientation: usize,
    flipped: bool,
    score: f64,
    /// (orientation, level, row, column) scan order; resolves exact ties the
    /// same way in serial and parallel scans.
    sequence: (usize, usize, usize, usize),
}

impl Candidate {
    fn rank(&self, other: &Self) -> Ordering {
        self.flipped
            .cmp(&other.flipped)
            .then(self.score.total_cmp(&other.score))
            .then(self.sequence.cmp(&other.sequence))
    }

    fn better(self, other: Self) -> Self {
        if other.rank(&self) == Ordering::Less {
            other
        } else {
            self
        }
    }
}

/// Per-item search state shared by every orientation scan.
struct PlacementSearch<'a> {
    item: ClassifiedCargo<'a>,
    placed: &'a [PlacedCargo],
    container: &'a Container,
    config: &'a Config,
    validator: ConstraintValidator<'a>,
    levels: Vec<f64>,
    /// Enclosing rectangle of the placed footprints, if any.
    floor: Option<AABB2D<f64>>,
}

impl<'a> PlacementSearch<'a> {
    fn new(
        item: ClassifiedCargo<'a>,
        placed: &'a [PlacedCargo],
        container: &'a Container,
        config: &'a Config,
    ) -> Self {
        let floor = placed
            .iter()
            .map(PlacedCargo::footprint)
            .reduce(|acc, f| acc.union(&f));
        Self {
            item,
            placed,
            container,
            config,
            validator: ConstraintValidator::new(container, config),
            levels: candidate_levels(placed, container, config.ceiling_margin, config.tolerance),
            floor,
        }
    }

    fn score(&self, footprint: &AABB2D<f64>, z: f64, height: f64) -> f64 {
        let (before, after) = match &self.floor {
            Some(floor) => (floor.area(), floor.union(footprint).area()),
            None => (0.0, footprint.area()),
        };
        let increment = after - before;
        after + self.config.height_weight * z + self.config.volume_weight * (increment * height)
    }

    /// Best admissible candidate for one orientation.
    fn scan(&self, index: usize, orientation: &Orientation) -> Option<Candidate> {
        let tol = self.config.tolerance;
        let step = self.config.grid_step;
        let max_x = self.container.length - orientation.effective_length + tol;
        let max_y = self.container.width - orientation.effective_width + tol;
        let max_z = self.container.height - orientation.height + tol;
        if max_x < 0.0 || max_y < 0.0 || max_z < 0.0 {
            return None;
        }

        let mut best: Option<Candidate> = None;
        for (level, &z) in self.levels.iter().enumerate() {
            if z > max_z {
                break;
            }
            // Cells past max_x/max_y would fail the bounds check anyway.
            let mut row = 0;
            while (row as f64) * step <= max_y && (row as f64) * step < self.container.width {
                let y = row as f64 * step;
                let mut col = 0;
                while (col as f64) * step <= max_x && (col as f64) * step < self.container.length {
                    let x = col as f64 * step;
                    let position = Point3::new(x, y, z);
                    match self
                        .validator
                        .check(position, orientation, self.item, self.placed)
                    {
                        Ok(_) => {
                            let footprint = orientation.footprint_at(x, y);
                            let candidate = Candidate {
                                position,
                                orientation: index,
                                flipped: orientation.is_height_flipped,
                                score: self.score(&footprint, z, orientation.height),
                                sequence: (index, level, row, col),
                            };
                            best = Some(match best {
                                Some(current) => current.better(candidate),
                                None => candidate,
                            });
                            col += 1;
                        }
                        // Every cell left of the blocker's far edge overlaps it too.
                        Err(Violation::Collision { with }) => {
                            let far_edge = self.placed[with].bounds().max_x - tol;
                            col = (col + 1).max((far_edge / step).ceil() as usize);
                        }
                        Err(_) => col += 1,
                    }
                }
                row += 1;
            }
        }
        best
    }
}

/// Finds the best admissible placement for `cargo`, or `None` if no grid
/// cell at any level admits it in any orientation.
///
/// `placed` is only read. The returned record carries palette index 0; the
/// caller assigns the real one when committing it.
pub fn place_one(
    cargo: &Cargo,
    placed: &[PlacedCargo],
    container: &Container,
    config: &Config,
) -> Option<PlacedCargo> {
    let item = ClassifiedCargo::new(cargo);
    let orientations = generate_orientations_with(cargo, &config.rotation_angles);
    let search = PlacementSearch::new(item, placed, container, config);

    let best = if config.parallel {
        orientations
            .par_iter()
            .enumerate()
            .filter_map(|(i, o)| search.scan(i, o))
            .reduce_with(Candidate::better)
    } else {
        orientations
            .iter()
            .enumerate()
            .filter_map(|(i, o)| search.scan(i, o))
            .reduce(Candidate::better)
    }?;

    let orientation = orientations[best.orientation];
    let support = search
        .validator
        .check(best.position, &orientation, item, placed)
        .ok()?;
    Some(PlacedCargo::new(item, best.position, orientation, &support))
}
