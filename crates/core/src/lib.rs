//! # loadplan core
//!
//! Shared types for the loadplan cargo placement engine.
//!
//! This crate holds everything the placement algorithms build on but that does
//! not itself place anything:
//!
//! - **Errors**: [`Error`], [`Result`]
//! - **Geometry primitives**: [`AABB2D`], [`AABB3D`], [`rotated_extent`],
//!   [`bounding_area`]
//! - **Configuration**: [`Config`] with builder-style setters
//! - **Solver seam**: [`Solver`], [`ProgressInfo`], [`ProgressCallback`]
//!
//! ## Configuration
//!
//! ```rust
//! use loadplan_core::Config;
//!
//! let config = Config::new()
//!     .with_grid_step(50.0)
//!     .with_rotation_angles(vec![0.0, 90.0])
//!     .with_parallel(false);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod geometry;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use geometry::{bounding_area, rotated_extent, AABB2D, AABB3D};
pub use solver::{Config, ProgressCallback, ProgressInfo, Solver, DEFAULT_ROTATION_ANGLES};
