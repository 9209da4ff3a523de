//! Axis-aligned boxes and the geometric predicates used during placement.

use crate::geometry::Truck;
use nalgebra::{Point3, Vector3};

/// Axis-aligned box: lower-front-left corner plus positive extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Lower-front-left corner.
    pub origin: Point3<f64>,
    /// Extents along (x, y, z).
    pub size: Vector3<f64>,
}

fn overlap_1d(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    (a1.min(b1) - a0.max(b0)).max(0.0)
}

impl Aabb {
    /// Creates a new box.
    pub fn new(origin: Point3<f64>, size: Vector3<f64>) -> Self {
        Self { origin, size }
    }

    /// Returns the upper-back-right corner.
    pub fn max(&self) -> Point3<f64> {
        self.origin + self.size
    }

    /// Returns the volume.
    pub fn volume(&self) -> f64 {
        self.size.x * self.size.y * self.size.z
    }

    /// Returns the y coordinate of the top face.
    pub fn top_y(&self) -> f64 {
        self.origin.y + self.size.y
    }

    /// Checks whether two boxes overlap. Touching faces do not count as
    /// overlap; boxes are disjoint iff they are separated on at least one
    /// axis.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        let sep_x = a_max.x <= other.origin.x || b_max.x <= self.origin.x;
        let sep_y = a_max.y <= other.origin.y || b_max.y <= self.origin.y;
        let sep_z = a_max.z <= other.origin.z || b_max.z <= self.origin.z;
        !(sep_x || sep_y || sep_z)
    }

    /// Checks containment within the truck. Comparisons are exact: a box
    /// flush with a wall fits, anything beyond it does not.
    pub fn inside_truck(&self, truck: &Truck) -> bool {
        let max = self.max();
        self.origin.x >= 0.0
            && self.origin.y >= 0.0
            && self.origin.z >= 0.0
            && max.x <= truck.w
            && max.y <= truck.h
            && max.z <= truck.d
    }

    /// Returns the area of the xz (horizontal) overlap between this box and
    /// another, ignoring their y extents.
    pub fn overlap_area_xz(&self, other: &Aabb) -> f64 {
        let a_max = self.max();
        let b_max = other.max();
        let ox = overlap_1d(self.origin.x, a_max.x, other.origin.x, b_max.x);
        let oz = overlap_1d(self.origin.z, a_max.z, other.origin.z, b_max.z);
        ox * oz
    }

    /// Checks whether the point (px, pz) lies within the xz overlap of this
    /// box and another, with `tol` slack on every edge.
    pub fn point_in_overlap_xz(&self, px: f64, pz: f64, other: &Aabb, tol: f64) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        let x0 = self.origin.x.max(other.origin.x);
        let x1 = a_max.x.min(b_max.x);
        let z0 = self.origin.z.max(other.origin.z);
        let z1 = a_max.z.min(b_max.z);
        (px + tol) >= x0 && (px - tol) <= x1 && (pz + tol) >= z0 && (pz - tol) <= z1
    }
}
