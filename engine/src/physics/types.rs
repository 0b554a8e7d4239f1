//! Physics type re-exports from glam
//!
//! This module provides the core mathematical types used throughout
//! the collision code, re-exported from the glam library, plus the
//! axis-aligned box shared by shapes and queries.

pub use glam::{Affine3A, Vec2, Vec3};

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in shape-local space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Builds a box from its minimum corner and extent.
    pub fn from_position_size(position: Vec3, size: Vec3) -> Self {
        Self {
            min: position,
            max: position + size,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the corner furthest along `direction`.
    ///
    /// Components with a non-positive direction pick the minimum side.
    pub fn support(&self, direction: Vec3) -> Vec3 {
        Vec3::new(
            if direction.x > 0.0 { self.max.x } else { self.min.x },
            if direction.y > 0.0 { self.max.y } else { self.min.y },
            if direction.z > 0.0 { self.max.z } else { self.min.z },
        )
    }

    /// The eight corners, min corner first.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounding box of this box after an affine transform.
    pub fn transformed(&self, transform: &Affine3A) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in self.corners() {
            let p = transform.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    /// Projects the box onto the axis `normal`, returning `(min, max)`.
    pub fn project_range(&self, normal: Vec3) -> (f32, f32) {
        let center = self.center().dot(normal);
        let half = self.size() * 0.5;
        let radius = (half * normal).abs().element_sum();
        (center - radius, center + radius)
    }

    /// Moves the box by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}
