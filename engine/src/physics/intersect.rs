//! Segment Casts
//!
//! Resolves the first point where an object-space segment meets the terrain
//! surface. Dispatch, cheapest first:
//!
//! 1. Begin and end quantize to the same quad: test that quad only.
//! 2. No chunk accelerator (or disabled for this query): walk the fine grid.
//! 3. Horizontal length shorter than one chunk: walk the fine grid.
//! 4. Otherwise walk the chunk grid and descend into the fine grid only for
//!    chunks whose height range the segment overlaps vertically.

use log::trace;

use crate::config::SegmentCastOptions;
use crate::physics::accelerator::ChunkAccelerator;
use crate::physics::height_field::{HeightField, HeightSamples};
use crate::physics::traversal::walk_grid;
use crate::physics::triangle::{SurfaceHit, Triangle};
use crate::physics::types::{Vec2, Vec3};

/// Borrowed view pairing a height field with its accelerator for queries.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceIntersector<'a, S = Vec<f32>> {
    field: &'a HeightField<S>,
    accel: &'a ChunkAccelerator,
}

impl<'a, S: HeightSamples> SurfaceIntersector<'a, S> {
    pub fn new(field: &'a HeightField<S>, accel: &'a ChunkAccelerator) -> Self {
        Self { field, accel }
    }

    /// First surface hit along `begin -> end`, both in object space.
    pub fn intersect_segment(
        &self,
        begin: Vec3,
        end: Vec3,
        options: SegmentCastOptions,
    ) -> Option<SurfaceHit> {
        if !self.field.has_surface() {
            return None;
        }

        let grid_begin = self.field.to_grid(begin);
        let grid_end = self.field.to_grid(end);
        let begin_cell = (grid_begin.x.floor() as i32, grid_begin.z.floor() as i32);
        let end_cell = (grid_end.x.floor() as i32, grid_end.z.floor() as i32);

        if begin_cell == end_cell {
            let x = begin_cell.0.clamp(0, self.field.cells_x() - 1);
            let z = begin_cell.1.clamp(0, self.field.cells_z() - 1);
            trace!("segment cast: single cell ({x}, {z})");
            return self.test_cell(x, z, begin, end, options.hit_back_faces);
        }

        if self.accel.is_empty() || !options.use_accelerator {
            trace!("segment cast: fine grid walk");
            return self.walk_cells(begin, end, begin, end, options.hit_back_faces);
        }

        let rel = end - begin;
        let length_flat_sqr = rel.x * rel.x + rel.z * rel.z;
        if length_flat_sqr < self.accel.chunk_size_sqr() {
            trace!("segment cast: shorter than a chunk, fine grid walk");
            return self.walk_cells(begin, end, begin, end, options.hit_back_faces);
        }

        trace!("segment cast: chunk grid walk");
        self.walk_chunks(begin, end, options.hit_back_faces)
    }

    /// Tests both triangles of quad `(x, z)` against the segment, A first.
    fn test_cell(&self, x: i32, z: i32, from: Vec3, to: Vec3, hit_back_faces: bool) -> Option<SurfaceHit> {
        let [a, b] = Triangle::quad_pair(self.field, x, z);
        a.intersect_segment(from, to, hit_back_faces)
            .or_else(|| b.intersect_segment(from, to, hit_back_faces))
    }

    /// Walks the quads under `walk_from -> walk_to`, testing each against the
    /// full `from -> to` segment so hits are reported on the whole segment.
    fn walk_cells(
        &self,
        walk_from: Vec3,
        walk_to: Vec3,
        from: Vec3,
        to: Vec3,
        hit_back_faces: bool,
    ) -> Option<SurfaceHit> {
        let grid_from = self.field.to_grid(walk_from);
        let grid_to = self.field.to_grid(walk_to);

        walk_grid(
            Vec2::new(grid_from.x, grid_from.z),
            Vec2::new(grid_to.x, grid_to.z),
            self.field.cells_x(),
            self.field.cells_z(),
            |span| self.test_cell(span.x, span.z, from, to, hit_back_faces),
        )
    }

    fn walk_chunks(&self, begin: Vec3, end: Vec3, hit_back_faces: bool) -> Option<SurfaceHit> {
        let inv_chunk_size = self.accel.inv_chunk_size();
        let origin = self.field.local_origin();
        let chunk_begin = (begin + origin) * inv_chunk_size;
        let chunk_end = (end + origin) * inv_chunk_size;
        let (grid_width, grid_depth) = self.accel.grid_size();
        let rel = end - begin;

        walk_grid(
            Vec2::new(chunk_begin.x, chunk_begin.z),
            Vec2::new(chunk_end.x, chunk_end.z),
            grid_width as i32,
            grid_depth as i32,
            |span| {
                let range = self.accel.chunk(span.x as usize, span.z as usize);
                let enter = begin + rel * span.enter;
                let exit = begin + rel * span.exit;

                // Over the chunk footprint, but entirely above or below it.
                if range.excludes_span(enter.y, exit.y) {
                    return None;
                }

                self.walk_cells(enter, exit, begin, end, hit_back_faces)
            },
        )
    }
}
