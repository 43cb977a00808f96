//! Axis-aligned box primitives and rotated footprint math.
//!
//! Every placed cargo item is represented by the axis-aligned bounding box of
//! its rotated footprint. Collision, support and floor-area computations all
//! work on these boxes, so they must stay cheap: no allocation and no trig
//! outside [`rotated_extent`].

use nalgebra::RealField;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snap threshold for `|sin|`/`|cos|` so that 90° multiples give exact extents.
const TRIG_SNAP: f64 = 1e-12;

/// Axis-aligned rectangle in the floor (x, y) plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AABB2D<S> {
    /// Minimum x coordinate.
    pub min_x: S,
    /// Minimum y coordinate.
    pub min_y: S,
    /// Maximum x coordinate.
    pub max_x: S,
    /// Maximum y coordinate.
    pub max_y: S,
}

impl<S: RealField + Copy> AABB2D<S> {
    /// Creates a new rectangle from min/max coordinates.
    pub fn new(min_x: S, min_y: S, max_x: S, max_y: S) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a rectangle from its lower corner and extents.
    pub fn from_origin_size(x: S, y: S, length: S, width: S) -> Self {
        Self::new(x, y, x + length, y + width)
    }

    /// Returns the extent along x.
    pub fn width(&self) -> S {
        self.max_x - self.min_x
    }

    /// Returns the extent along y.
    pub fn height(&self) -> S {
        self.max_y - self.min_y
    }

    /// Returns the area of the rectangle.
    pub fn area(&self) -> S {
        self.width() * self.height()
    }

    /// Returns the smallest rectangle enclosing both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Checks for interior overlap. Rectangles that only share an edge do not
    /// overlap; `tol` absorbs float noise on shared edges.
    pub fn overlaps(&self, other: &Self, tol: S) -> bool {
        self.min_x < other.max_x - tol
            && other.min_x < self.max_x - tol
            && self.min_y < other.max_y - tol
            && other.min_y < self.max_y - tol
    }

    /// Returns the area shared by the two rectangles (zero when disjoint).
    pub fn intersection_area(&self, other: &Self) -> S {
        let dx = (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(S::zero());
        let dy = (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(S::zero());
        dx * dy
    }

    /// Checks whether `inner` lies within this rectangle, up to `tol`.
    pub fn contains(&self, inner: &Self, tol: S) -> bool {
        inner.min_x >= self.min_x - tol
            && inner.min_y >= self.min_y - tol
            && inner.max_x <= self.max_x + tol
            && inner.max_y <= self.max_y + tol
    }
}

/// Axis-aligned bounding volume.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AABB3D<S> {
    /// Minimum x coordinate.
    pub min_x: S,
    /// Minimum y coordinate.
    pub min_y: S,
    /// Minimum z coordinate.
    pub min_z: S,
    /// Maximum x coordinate.
    pub max_x: S,
    /// Maximum y coordinate.
    pub max_y: S,
    /// Maximum z coordinate.
    pub max_z: S,
}

impl<S: RealField + Copy> AABB3D<S> {
    /// Creates a new box from min/max coordinates.
    pub fn new(min_x: S, min_y: S, min_z: S, max_x: S, max_y: S, max_z: S) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Creates a box from its lower corner and extents.
    pub fn from_origin_size(origin: [S; 3], size: [S; 3]) -> Self {
        Self::new(
            origin[0],
            origin[1],
            origin[2],
            origin[0] + size[0],
            origin[1] + size[1],
            origin[2] + size[2],
        )
    }

    /// Returns the floor projection.
    pub fn footprint(&self) -> AABB2D<S> {
        AABB2D::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Returns the volume of the box.
    pub fn volume(&self) -> S {
        (self.max_x - self.min_x) * (self.max_y - self.min_y) * (self.max_z - self.min_z)
    }

    /// Checks for interior overlap on all three axes.
    pub fn overlaps(&self, other: &Self, tol: S) -> bool {
        self.min_z < other.max_z - tol
            && other.min_z < self.max_z - tol
            && self.footprint().overlaps(&other.footprint(), tol)
    }
}

/// Computes the axis-aligned extents of an `length × width` rectangle rotated
/// by `angle_deg` about the vertical axis.
///
/// `effective_length = l·|cos θ| + w·|sin θ|`, `effective_width = l·|sin θ| + w·|cos θ|`.
pub fn rotated_extent(length: f64, width: f64, angle_deg: f64) -> (f64, f64) {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let sin = snap_unit(sin.abs());
    let cos = snap_unit(cos.abs());
    (length * cos + width * sin, length * sin + width * cos)
}

fn snap_unit(v: f64) -> f64 {
    if v < TRIG_SNAP {
        0.0
    } else if v > 1.0 - TRIG_SNAP {
        1.0
    } else {
        v
    }
}

/// Area of the rectangle enclosing all given footprints; zero for none.
///
/// This over-approximates the occupied floor whenever the layout is not
/// rectangular (an L-shape counts its empty corner).
pub fn bounding_area<'a, S, I>(footprints: I) -> S
where
    S: RealField + Copy,
    I: IntoIterator<Item = &'a AABB2D<S>>,
{
    footprints
        .into_iter()
        .copied()
        .reduce(|acc, f| acc.union(&f))
        .map(|r| r.area())
        .unwrap_or_else(S::zero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotated_extent_right_angles_are_exact() {
        assert_eq!(rotated_extent(1000.0, 800.0, 0.0), (1000.0, 800.0));
        assert_eq!(rotated_extent(1000.0, 800.0, 90.0), (800.0, 1000.0));
        assert_eq!(rotated_extent(1000.0, 800.0, 180.0), (1000.0, 800.0));
        assert_eq!(rotated_extent(1000.0, 800.0, 270.0), (800.0, 1000.0));
    }

    #[test]
    fn test_rotated_extent_diagonal() {
        let (l, w) = rotated_extent(100.0, 100.0, 45.0);
        let expected = 200.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(l, expected, epsilon = 1e-9);
        assert_relative_eq!(w, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_touching_rectangles_do_not_overlap() {
        let a = AABB2D::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let b = AABB2D::from_origin_size(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b, 1e-6));
        assert!(!b.overlaps(&a, 1e-6));

        let c = AABB2D::from_origin_size(9.0, 9.0, 5.0, 5.0);
        assert!(a.overlaps(&c, 1e-6));
        assert_relative_eq!(a.intersection_area(&c), 1.0);
    }

    #[test]
    fn test_aabb3d_overlap_requires_vertical_intersection() {
        let low = AABB3D::from_origin_size([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]);
        let stacked = AABB3D::from_origin_size([0.0, 0.0, 10.0], [10.0, 10.0, 10.0]);
        let sunk = AABB3D::from_origin_size([5.0, 5.0, 5.0], [10.0, 10.0, 10.0]);
        assert!(!low.overlaps(&stacked, 1e-6));
        assert!(low.overlaps(&sunk, 1e-6));
        assert_relative_eq!(low.volume(), 1000.0);
    }

    #[test]
    fn test_bounding_area() {
        let empty: Vec<AABB2D<f64>> = Vec::new();
        assert_eq!(bounding_area(&empty), 0.0);

        // L-shape: the proxy counts the empty corner.
        let l_shape = vec![
            AABB2D::from_origin_size(0.0, 0.0, 20.0, 10.0),
            AABB2D::from_origin_size(0.0, 10.0, 10.0, 10.0),
        ];
        assert_relative_eq!(bounding_area(&l_shape), 400.0);
    }

    #[test]
    fn test_contains() {
        let outer = AABB2D::from_origin_size(0.0, 0.0, 100.0, 50.0);
        assert!(outer.contains(&AABB2D::from_origin_size(50.0, 0.0, 50.0, 50.0), 1e-6));
        assert!(!outer.contains(&AABB2D::from_origin_size(60.0, 0.0, 50.0, 50.0), 1e-6));
    }
}
