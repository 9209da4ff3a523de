//! Load plan results.

use crate::geometry::ItemId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Final position and oriented extents of one placed item.
///
/// `(w, h, d)` is some permutation of the item's input extents; the chosen
/// orientation is implicit in it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Item identifier.
    pub id: ItemId,
    /// x of the lower-front-left corner.
    pub x: f64,
    /// y of the lower-front-left corner (0 = truck floor).
    pub y: f64,
    /// z of the lower-front-left corner.
    pub z: f64,
    /// Extent along x.
    pub w: f64,
    /// Extent along y.
    pub h: f64,
    /// Extent along z.
    pub d: f64,
}

impl Placement {
    /// Returns the placed volume.
    pub fn volume(&self) -> f64 {
        self.w * self.h * self.d
    }
}

/// Result of packing one ordering, or the best ordering found by the GA.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackResult {
    /// Placements, in the order the items were committed.
    pub placed: Vec<Placement>,
    /// Ids of items that could not be placed, in rejection order.
    pub unplaced: Vec<ItemId>,
    /// Total volume of placed items.
    pub used_volume: f64,
    /// Total volume of all input items, placed or not.
    pub total_volume: f64,
    /// `used_volume / truck_volume`, or 0 for a zero-volume truck.
    pub utilization: f64,
    /// Total weight of placed items.
    pub total_weight: f64,
}

impl PackResult {
    /// Creates an empty, all-zero result.
    pub fn new() -> Self {
        Self {
            placed: Vec::new(),
            unplaced: Vec::new(),
            used_volume: 0.0,
            total_volume: 0.0,
            utilization: 0.0,
            total_weight: 0.0,
        }
    }

    /// Returns true if every item was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Returns the number of placed items.
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Returns the number of unplaced items.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }

    /// Returns the utilization as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.utilization * 100.0)
    }
}

impl Default for PackResult {
    fn default() -> Self {
        Self::new()
    }
}
