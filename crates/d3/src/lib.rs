//! # Loadplan 3D
//!
//! Greedy 3D cargo placement for a truck bed.
//!
//! Cargo items are sorted (seating first, then by weight, then by volume) and
//! placed one at a time. For each item every orientation, every candidate Z
//! level and every grid cell is checked against the placement rules; the
//! admissible candidate that keeps the occupied floor smallest wins and is
//! never moved again.
//!
//! ## Features
//!
//! - Six axis permutations × eight vertical turns per item (seating stays upright)
//! - Collision, support, weight ordering and seating stacking rules
//! - Deterministic results with a rayon-parallel orientation scan
//! - Independent [`audit`](audit::audit) of finished arrangements
//!
//! ## Example
//!
//! ```
//! use loadplan_d3::{Cargo, Container, LoadPlanner};
//! use loadplan_core::Config;
//!
//! let cargo = vec![
//!     Cargo::new("crate-1", 1000.0, 800.0, 600.0, 50.0),
//!     Cargo::new("chair-1", 500.0, 500.0, 900.0, 8.0).with_category_hint("Chair"),
//! ];
//! let planner = LoadPlanner::new(Config::default().with_grid_step(100.0));
//! let arrangement = planner
//!     .compute_arrangement(&cargo, &Container::reference())
//!     .unwrap();
//! assert_eq!(arrangement.placed_count(), 2);
//! ```

pub mod arrangement;
pub mod audit;
pub mod cargo;
pub mod constraint;
pub mod container;
pub mod orientation;
pub mod planner;
pub mod search;

// Re-exports
pub use arrangement::{Arrangement, ArrangementStats, Placement};
pub use audit::{audit, AuditIssue, AuditReport};
pub use cargo::{Cargo, CargoCategory, CargoId, SEATING_KEYWORDS};
pub use constraint::{ClassifiedCargo, ConstraintValidator, PlacedCargo, Support, Violation};
pub use container::Container;
pub use orientation::{generate_orientations, generate_orientations_with, Orientation};
pub use planner::{compute_arrangement, loading_order, LoadPlanner};
pub use search::{candidate_levels, place_one};
pub use loadplan_core::{Config, Error, ProgressCallback, ProgressInfo, Result, Solver};
