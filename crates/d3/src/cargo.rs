//! Cargo items and their stacking category.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a cargo item.
pub type CargoId = String;

/// Keywords that mark an item as seating furniture (matched case-insensitively
/// as substrings of the category hint).
pub const SEATING_KEYWORDS: [&str; 3] = ["chair", "armchair", "stool"];

/// Stacking category derived from the free-text hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CargoCategory {
    /// Chairs and similar: never tipped, only stacked on seating, at most
    /// two high.
    Seating,
    /// Everything else.
    #[default]
    General,
}

impl CargoCategory {
    /// Classifies a free-text hint.
    pub fn classify(hint: Option<&str>) -> Self {
        let Some(hint) = hint else {
            return Self::General;
        };
        let hint = hint.to_lowercase();
        if SEATING_KEYWORDS.iter().any(|k| hint.contains(k)) {
            Self::Seating
        } else {
            Self::General
        }
    }

    /// Returns true for seating furniture.
    pub fn is_seating(self) -> bool {
        matches!(self, Self::Seating)
    }
}

/// A rectangular item to be loaded.
///
/// Dimensions are native extents in mm; `height` is the axis that is vertical
/// when the item stands the way it was entered. Weight is in kg.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cargo {
    /// Unique identifier.
    pub id: CargoId,
    /// Native length in mm.
    pub length: f64,
    /// Native width in mm.
    pub width: f64,
    /// Native height in mm.
    pub height: f64,
    /// Weight in kg.
    pub weight: f64,
    /// Optional free-text label such as a product name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category_hint: Option<String>,
}

impl Cargo {
    /// Creates a new cargo item.
    pub fn new(id: impl Into<CargoId>, length: f64, width: f64, height: f64, weight: f64) -> Self {
        Self {
            id: id.into(),
            length,
            width,
            height,
            weight,
            category_hint: None,
        }
    }

    /// Sets the category hint.
    pub fn with_category_hint(mut self, hint: impl Into<String>) -> Self {
        self.category_hint = Some(hint.into());
        self
    }

    /// Returns the stacking category.
    pub fn category(&self) -> CargoCategory {
        CargoCategory::classify(self.category_hint.as_deref())
    }

    /// Returns the native extents `[length, width, height]`.
    pub fn extents(&self) -> [f64; 3] {
        [self.length, self.width, self.height]
    }

    /// Returns the volume in mm³.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Returns true for placeholder rows: any dimension or the weight is
    /// non-positive or not a number.
    pub fn is_degenerate(&self) -> bool {
        self.extents()
            .iter()
            .chain(std::iter::once(&self.weight))
            .any(|v| !(v.is_finite() && *v > 0.0))
    }
}
