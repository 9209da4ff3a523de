//! Item and truck records.
//!
//! Coordinates use a y-up convention: gravity acts toward −y, so `h` is an
//! item's height and `truck.h` is the loading height of the cargo space.
//! `w` spans x and `d` spans z.

use crate::error::{Error, Result};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for an item.
pub type ItemId = String;

/// Default truck weight capacity in kg.
pub const DEFAULT_MAX_WEIGHT: f64 = 12_000.0;

/// A rectangular box to be loaded.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Unique identifier. Deserialization also accepts the field name `sku`.
    #[cfg_attr(feature = "serde", serde(alias = "sku"))]
    pub id: ItemId,
    /// Width (x extent).
    pub w: f64,
    /// Height (y extent).
    pub h: f64,
    /// Depth (z extent).
    pub d: f64,
    /// Weight in kg.
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: f64,
    /// Loading priority; higher values are packed earlier by the heuristic
    /// seed ordering.
    #[cfg_attr(feature = "serde", serde(default = "default_priority"))]
    pub priority: i32,
}

#[cfg(feature = "serde")]
fn default_weight() -> f64 {
    1.0
}

#[cfg(feature = "serde")]
fn default_priority() -> i32 {
    1
}

impl Item {
    /// Creates a new item with weight 1.0 and priority 1.
    pub fn new(id: impl Into<ItemId>, w: f64, h: f64, d: f64) -> Self {
        Self {
            id: id.into(),
            w,
            h,
            d,
            weight: 1.0,
            priority: 1,
        }
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the volume of this item.
    pub fn volume(&self) -> f64 {
        self.w * self.h * self.d
    }

    /// Returns the six axis-aligned orientations as (x, y, z) extents.
    ///
    /// The order is fixed; the placer resolves ties between orientations by
    /// taking the first feasible one.
    pub fn orientations(&self) -> [Vector3<f64>; 6] {
        let (w, h, d) = (self.w, self.h, self.d);
        [
            Vector3::new(w, h, d),
            Vector3::new(w, d, h),
            Vector3::new(h, w, d),
            Vector3::new(h, d, w),
            Vector3::new(d, w, h),
            Vector3::new(d, h, w),
        ]
    }

    /// Validates dimensions and weight.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidItem {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        for extent in [self.w, self.h, self.d] {
            if !extent.is_finite() || extent <= 0.0 {
                return Err(invalid("dimensions must be positive and finite"));
            }
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(invalid("weight must be non-negative and finite"));
        }
        Ok(())
    }
}

/// The cargo space to fill.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Truck {
    /// Width (x extent).
    pub w: f64,
    /// Height (y extent).
    pub h: f64,
    /// Depth (z extent).
    pub d: f64,
    /// Total weight capacity in kg.
    #[cfg_attr(feature = "serde", serde(default = "default_max_weight"))]
    pub max_weight: f64,
}

#[cfg(feature = "serde")]
fn default_max_weight() -> f64 {
    DEFAULT_MAX_WEIGHT
}

impl Truck {
    /// Creates a truck with the default weight capacity of 12000 kg.
    pub fn new(w: f64, h: f64, d: f64) -> Self {
        Self {
            w,
            h,
            d,
            max_weight: DEFAULT_MAX_WEIGHT,
        }
    }

    /// Sets the weight capacity.
    pub fn with_max_weight(mut self, max_weight: f64) -> Self {
        self.max_weight = max_weight;
        self
    }

    /// Returns the cargo volume.
    pub fn volume(&self) -> f64 {
        self.w * self.h * self.d
    }

    /// Validates dimensions and capacity.
    ///
    /// A zero-volume truck is accepted; packing it yields zero utilization
    /// with every item unplaced.
    pub fn validate(&self) -> Result<()> {
        for extent in [self.w, self.h, self.d] {
            if !extent.is_finite() || extent < 0.0 {
                return Err(Error::InvalidTruck(
                    "dimensions must be non-negative and finite".to_string(),
                ));
            }
        }
        if !self.max_weight.is_finite() || self.max_weight < 0.0 {
            return Err(Error::InvalidTruck(
                "max_weight must be non-negative and finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_defaults() {
        let item = Item::new("A", 1.0, 2.0, 3.0);
        assert_eq!(item.weight, 1.0);
        assert_eq!(item.priority, 1);
        assert!((item.volume() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_item_builder() {
        let item = Item::new("A", 1.0, 1.0, 1.0)
            .with_weight(4.5)
            .with_priority(3);
        assert_eq!(item.weight, 4.5);
        assert_eq!(item.priority, 3);
    }

    #[test]
    fn test_orientations_are_permutations() {
        let item = Item::new("A", 1.0, 2.0, 3.0);
        let orientations = item.orientations();
        assert_eq!(orientations.len(), 6);

        // First orientation is the input as-is.
        assert_eq!(orientations[0], Vector3::new(1.0, 2.0, 3.0));

        for dims in &orientations {
            let mut sorted = [dims.x, dims.y, dims.z];
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(sorted, [1.0, 2.0, 3.0]);
        }
    }

    #[test]
    fn test_item_validate_rejects_bad_dimensions() {
        assert!(Item::new("A", 0.0, 1.0, 1.0).validate().is_err());
        assert!(Item::new("A", 1.0, -1.0, 1.0).validate().is_err());
        assert!(Item::new("A", 1.0, 1.0, f64::NAN).validate().is_err());
        assert!(Item::new("A", 1.0, 1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_item_validate_rejects_negative_weight() {
        assert!(Item::new("A", 1.0, 1.0, 1.0)
            .with_weight(-0.1)
            .validate()
            .is_err());
        assert!(Item::new("A", 1.0, 1.0, 1.0)
            .with_weight(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_truck_default_capacity() {
        let truck = Truck::new(2.4, 2.6, 12.0);
        assert_eq!(truck.max_weight, 12_000.0);
        assert!((truck.volume() - 2.4 * 2.6 * 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_truck_zero_volume_is_valid() {
        assert!(Truck::new(0.0, 0.0, 0.0).validate().is_ok());
        assert!(Truck::new(-1.0, 1.0, 1.0).validate().is_err());
        assert!(Truck::new(1.0, 1.0, 1.0)
            .with_max_weight(-1.0)
            .validate()
            .is_err());
    }
}
