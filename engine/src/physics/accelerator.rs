//! Chunk Accelerator
//!
//! A coarse grid of `(min, max)` height ranges over the height field. Long
//! segment casts walk this grid first and only descend into the per-cell
//! triangle tests of chunks whose vertical range the segment overlaps.
//!
//! Each chunk range also covers one extra row and column of samples, so the
//! ranges of adjacent chunks share their boundary vertices:
//!
//! ```text
//!   Left        Right
//! 0---0---0---1---1---1
//! |   |   |   |   |   |
//! 0---0---0---1---1---1
//!           x
//! ```
//!
//! Without the shared column the Left range would be `[0, 0]` and a cast
//! hitting the slope at `x` would be culled.

use log::debug;

use crate::physics::height_field::{HeightField, HeightSamples};

/// Vertical extent of a chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeightRange {
    pub min: f32,
    pub max: f32,
}

impl HeightRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// True when both heights lie strictly on the same side of the range.
    #[inline]
    pub fn excludes_span(&self, a: f32, b: f32) -> bool {
        (a > self.max && b > self.max) || (a < self.min && b < self.min)
    }

    #[inline]
    pub fn contains(&self, height: f32) -> bool {
        height >= self.min && height <= self.max
    }
}

/// Derived per-chunk height ranges. Never patched; rebuilt on every configure.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkAccelerator {
    chunk_cells: usize,
    chunk_size: f32,
    grid_width: usize,
    grid_depth: usize,
    bounds: Vec<HeightRange>,
}

impl Default for ChunkAccelerator {
    fn default() -> Self {
        Self {
            chunk_cells: 1,
            chunk_size: 1.0,
            grid_width: 0,
            grid_depth: 0,
            bounds: Vec::new(),
        }
    }
}

impl ChunkAccelerator {
    /// Builds the chunk grid for `field`.
    ///
    /// `chunk_world_size` is the target world-space edge of a chunk. The result
    /// is empty when the grid would hold fewer than two chunks.
    pub fn build<S: HeightSamples>(field: &HeightField<S>, chunk_world_size: f32) -> Self {
        let chunk_cells = ((chunk_world_size * field.inv_cell_size()).floor() as usize).max(1);
        let chunk_size = field.cell_size() * chunk_cells as f32;

        let width = field.width();
        let depth = field.depth();
        let grid_width = width.div_ceil(chunk_cells);
        let grid_depth = depth.div_ceil(chunk_cells);

        let mut accel = Self {
            chunk_cells,
            chunk_size,
            grid_width,
            grid_depth,
            bounds: Vec::new(),
        };

        if grid_width * grid_depth < 2 {
            debug!(
                "chunk accelerator skipped: {width}x{depth} field fits in one {chunk_cells}-cell chunk"
            );
            return accel;
        }

        accel.bounds.reserve_exact(grid_width * grid_depth);
        for cz in 0..grid_depth {
            for cx in 0..grid_width {
                let (xs, zs) = accel.chunk_sample_span(cx, cz, width, depth);

                let first = field.height_at(xs.start, zs.start);
                let mut range = HeightRange::new(first, first);
                for z in zs {
                    for x in xs.clone() {
                        let h = field.height_at(x, z);
                        range.min = range.min.min(h);
                        range.max = range.max.max(h);
                    }
                }
                accel.bounds.push(range);
            }
        }

        debug!(
            "chunk accelerator built: {grid_width}x{grid_depth} chunks of {chunk_cells} cells ({chunk_size} units)"
        );
        accel
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Cells per chunk edge.
    pub fn chunk_cells(&self) -> usize {
        self.chunk_cells
    }

    /// World-space chunk edge length.
    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn chunk_size_sqr(&self) -> f32 {
        self.chunk_size * self.chunk_size
    }

    pub fn inv_chunk_size(&self) -> f32 {
        1.0 / self.chunk_size
    }

    /// Chunk grid dimensions `(width, depth)`; zero-sized when empty.
    pub fn grid_size(&self) -> (usize, usize) {
        if self.is_empty() {
            (0, 0)
        } else {
            (self.grid_width, self.grid_depth)
        }
    }

    /// Height range of chunk `(cx, cz)`.
    #[inline]
    pub fn chunk(&self, cx: usize, cz: usize) -> &HeightRange {
        &self.bounds[cz * self.grid_width + cx]
    }

    /// All chunk ranges, row-major.
    pub fn bounds(&self) -> &[HeightRange] {
        &self.bounds
    }

    /// Sample span `(x0..x_end, z0..z_end)` whose heights chunk `(cx, cz)` encloses.
    pub fn chunk_sample_span(
        &self,
        cx: usize,
        cz: usize,
        width: usize,
        depth: usize,
    ) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let x0 = cx * self.chunk_cells;
        let z0 = cz * self.chunk_cells;
        (
            x0..(x0 + self.chunk_cells + 1).min(width),
            z0..(z0 + self.chunk_cells + 1).min(depth),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(width: usize, depth: usize, cell_size: f32, f: impl Fn(usize, usize) -> f32) -> HeightField {
        let heights = (0..depth)
            .flat_map(|z| (0..width).map(move |x| (x, z)))
            .map(|(x, z)| f(x, z))
            .collect();
        HeightField::with_computed_range(heights, width, depth, cell_size).unwrap()
    }

    #[test]
    fn test_small_field_has_no_chunks() {
        let f = field(10, 10, 1.0, |_, _| 0.0);
        let accel = ChunkAccelerator::build(&f, 16.0);
        assert!(accel.is_empty());
        assert_eq!(accel.chunk_cells(), 16);
        assert_eq!(accel.grid_size(), (0, 0));
    }

    #[test]
    fn test_grid_rounds_up() {
        let f = field(33, 20, 1.0, |_, _| 0.0);
        let accel = ChunkAccelerator::build(&f, 16.0);
        assert_eq!(accel.grid_size(), (3, 2));
        assert_eq!(accel.bounds().len(), 6);
    }

    #[test]
    fn test_chunk_cells_follow_cell_size() {
        let f = field(40, 40, 2.5, |_, _| 0.0);
        let accel = ChunkAccelerator::build(&f, 16.0);
        assert_eq!(accel.chunk_cells(), 6);
        assert!((accel.chunk_size() - 15.0).abs() < 1e-6);

        // Cells larger than a chunk still get one cell per chunk
        let f = field(4, 4, 20.0, |_, _| 0.0);
        let accel = ChunkAccelerator::build(&f, 16.0);
        assert_eq!(accel.chunk_cells(), 1);
        assert_eq!(accel.grid_size(), (4, 4));
    }

    #[test]
    fn test_ranges_share_boundary_column() {
        // Plateau starts exactly at the first column of the second chunk
        let f = field(8, 2, 1.0, |x, _| if x >= 4 { 1.0 } else { 0.0 });
        let accel = ChunkAccelerator::build(&f, 4.0);
        assert_eq!(accel.grid_size(), (2, 1));
        assert_eq!(*accel.chunk(0, 0), HeightRange::new(0.0, 1.0));
        assert_eq!(*accel.chunk(1, 0), HeightRange::new(1.0, 1.0));
    }

    #[test]
    fn test_ranges_enclose_every_sample() {
        let f = field(37, 29, 1.0, |x, z| ((x * 7 + z * 13) % 11) as f32 - 5.0);
        let accel = ChunkAccelerator::build(&f, 8.0);
        let (gw, gd) = accel.grid_size();
        for cz in 0..gd {
            for cx in 0..gw {
                let range = accel.chunk(cx, cz);
                let (xs, zs) = accel.chunk_sample_span(cx, cz, f.width(), f.depth());
                for z in zs.clone() {
                    for x in xs.clone() {
                        assert!(range.contains(f.height_at(x, z)), "chunk ({cx}, {cz}) misses ({x}, {z})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_excludes_span() {
        let range = HeightRange::new(-1.0, 2.0);
        assert!(range.excludes_span(3.0, 5.0));
        assert!(range.excludes_span(-4.0, -1.5));
        assert!(!range.excludes_span(3.0, -3.0));
        assert!(!range.excludes_span(0.0, 0.5));
    }
}
