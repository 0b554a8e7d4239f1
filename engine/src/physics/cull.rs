//! Region Culling
//!
//! Enumerates the terrain triangles under an axis-aligned box for contact
//! generation. The box is quantized to vertex indices, padded by one cell on
//! every side so triangles straddling the box edges are kept, and every quad
//! in the range is emitted as its two triangles. This is a bounded local scan;
//! the chunk accelerator is not consulted.

use std::ops::{ControlFlow, Range};

use crate::physics::height_field::{HeightField, HeightSamples};
use crate::physics::triangle::Triangle;
use crate::physics::types::{Aabb, Vec3};

/// Quad index ranges selected by a cull box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub x: Range<i32>,
    pub z: Range<i32>,
}

impl CellRange {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.z.is_empty()
    }

    /// Number of quads in the range.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.x.len() * self.z.len()
        }
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        self.x.contains(&x) && self.z.contains(&z)
    }
}

/// Borrowed view of a height field answering box queries.
#[derive(Clone, Copy, Debug)]
pub struct RegionCuller<'a, S = Vec<f32>> {
    field: &'a HeightField<S>,
}

impl<'a, S: HeightSamples> RegionCuller<'a, S> {
    pub fn new(field: &'a HeightField<S>) -> Self {
        Self { field }
    }

    /// Nearest vertex index of a local-space point, clamped to the field.
    ///
    /// Rounds half away from zero.
    fn vertex_index(&self, local: Vec3) -> (i32, i32) {
        let size = self.field.aabb().size();
        let inv = self.field.inv_cell_size();
        let x = local.x.clamp(0.0, size.x) * inv;
        let z = local.z.clamp(0.0, size.z) * inv;
        (x.round() as i32, z.round() as i32)
    }

    /// Quads whose triangles may overlap `aabb` (object space).
    ///
    /// Boxes that do not touch the field footprint select nothing.
    pub fn cell_range(&self, aabb: &Aabb) -> CellRange {
        let empty = CellRange { x: 0..0, z: 0..0 };
        if !self.field.has_surface() {
            return empty;
        }

        let footprint = self.field.aabb();
        if aabb.max.x < footprint.min.x
            || aabb.min.x > footprint.max.x
            || aabb.max.z < footprint.min.z
            || aabb.min.z > footprint.max.z
        {
            return empty;
        }

        let local = aabb.translated(self.field.local_origin());
        let (min_x, min_z) = self.vertex_index(local.min);
        let (max_x, max_z) = self.vertex_index(local.max);

        // Pad by one cell to catch boxes falling between grid points.
        let start_x = (min_x - 1).max(0);
        let start_z = (min_z - 1).max(0);
        let end_x = (max_x + 1).min(self.field.cells_x());
        let end_z = (max_z + 1).min(self.field.cells_z());

        CellRange {
            x: start_x..end_x.max(start_x),
            z: start_z..end_z.max(start_z),
        }
    }

    /// Feeds every candidate triangle under `aabb` to `accept`, row by row,
    /// triangle A before B in each quad.
    ///
    /// Returns `Break` if `accept` stopped the enumeration.
    pub fn cull<F>(&self, aabb: &Aabb, mut accept: F) -> ControlFlow<()>
    where
        F: FnMut(&Triangle) -> ControlFlow<()>,
    {
        let range = self.cell_range(aabb);
        for z in range.z.clone() {
            for x in range.x.clone() {
                for tri in Triangle::quad_pair(self.field, x, z) {
                    accept(&tri)?;
                }
            }
        }
        ControlFlow::Continue(())
    }
}
