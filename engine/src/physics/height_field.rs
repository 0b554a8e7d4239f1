//! Height Field
//!
//! A regular grid of height samples interpreted as a terrain surface with two
//! triangles per grid quad. Samples are stored row-major (`index = z * width + x`)
//! behind the [`HeightSamples`] trait so float arrays and scaled 8-bit maps
//! share one implementation of every query.
//!
//! # Coordinate spaces
//!
//! - **Object space**: the field's bounding box is centered on the origin
//!   horizontally. Vertex `(x, z)` sits at
//!   `((x - (width-1)/2) * cell_size, h, (z - (depth-1)/2) * cell_size)`.
//! - **Local space**: object space plus [`HeightField::local_origin`], which puts
//!   vertex `(0, 0)` at the horizontal origin. The vertical axis is never shifted.
//! - **Grid space**: local space divided by the cell size; integer coordinates
//!   are grid lines.

use crate::config::MIN_CELL_SIZE;
use crate::error::InvalidArgument;
use crate::physics::types::{Aabb, Vec3};

/// Read access to a flat, row-major buffer of height samples.
pub trait HeightSamples {
    /// Number of samples in the buffer.
    fn len(&self) -> usize;

    /// Height of the sample at `index`. Panics if out of range.
    fn sample(&self, index: usize) -> f32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scans every sample and returns `(min, max)`, or `None` when empty.
    fn range(&self) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        let first = self.sample(0);
        let mut range = (first, first);
        for i in 1..self.len() {
            let h = self.sample(i);
            range.0 = range.0.min(h);
            range.1 = range.1.max(h);
        }
        Some(range)
    }
}

impl HeightSamples for Vec<f32> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn sample(&self, index: usize) -> f32 {
        self[index]
    }
}

/// 8-bit height samples multiplied by a uniform height scale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScaledBytes {
    bytes: Vec<u8>,
    scale: f32,
}

impl ScaledBytes {
    pub fn new(bytes: Vec<u8>, scale: f32) -> Self {
        Self { bytes, scale }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl HeightSamples for ScaledBytes {
    #[inline]
    fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    fn sample(&self, index: usize) -> f32 {
        f32::from(self.bytes[index]) * self.scale
    }
}

/// A validated height grid with its derived placement data.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField<S = Vec<f32>> {
    heights: S,
    width: usize,
    depth: usize,
    cell_size: f32,
    inv_cell_size: f32,
    min_height: f32,
    max_height: f32,
    local_origin: Vec3,
}

impl<S: HeightSamples> HeightField<S> {
    /// Validates and builds a field with a precomputed height range.
    ///
    /// `min_height`/`max_height` only size the bounding box; they are not
    /// checked against the samples.
    pub fn new(
        heights: S,
        width: usize,
        depth: usize,
        cell_size: f32,
        min_height: f32,
        max_height: f32,
    ) -> Result<Self, InvalidArgument> {
        validate(heights.len(), width, depth, cell_size)?;
        if min_height > max_height {
            return Err(InvalidArgument::InvertedHeightRange {
                min: min_height,
                max: max_height,
            });
        }

        // Center the horizontal extent on the origin; keep heights as-is.
        let extent = Vec3::new(
            (width - 1) as f32 * cell_size,
            max_height - min_height,
            (depth - 1) as f32 * cell_size,
        );
        let local_origin = Vec3::new(extent.x * 0.5, 0.0, extent.z * 0.5);

        Ok(Self {
            heights,
            width,
            depth,
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            min_height,
            max_height,
            local_origin,
        })
    }

    /// Builds a field, scanning the samples for the height range.
    pub fn with_computed_range(
        heights: S,
        width: usize,
        depth: usize,
        cell_size: f32,
    ) -> Result<Self, InvalidArgument> {
        validate(heights.len(), width, depth, cell_size)?;
        let (min, max) = heights.range().unwrap_or((0.0, 0.0));
        Self::new(heights, width, depth, cell_size, min, max)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn inv_cell_size(&self) -> f32 {
        self.inv_cell_size
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Offset from object space to local space.
    pub fn local_origin(&self) -> Vec3 {
        self.local_origin
    }

    pub fn samples(&self) -> &S {
        &self.heights
    }

    /// Number of quads along X.
    pub fn cells_x(&self) -> i32 {
        self.width as i32 - 1
    }

    /// Number of quads along Z.
    pub fn cells_z(&self) -> i32 {
        self.depth as i32 - 1
    }

    /// A 1-wide or 1-deep field has no surface and produces no triangles.
    pub fn has_surface(&self) -> bool {
        self.width >= 2 && self.depth >= 2
    }

    /// Raw sample lookup.
    #[inline]
    pub fn height_at(&self, x: usize, z: usize) -> f32 {
        debug_assert!(x < self.width && z < self.depth, "height_at({x}, {z}) out of range");
        self.heights.sample(z * self.width + x)
    }

    /// Object-space position of grid vertex `(x, z)`.
    ///
    /// Callers guarantee `0 <= x < width` and `0 <= z < depth`.
    #[inline]
    pub fn point_at(&self, x: i32, z: i32) -> Vec3 {
        let px = (x as f32 - 0.5 * (self.width - 1) as f32) * self.cell_size;
        let pz = (z as f32 - 0.5 * (self.depth - 1) as f32) * self.cell_size;
        Vec3::new(px, self.height_at(x as usize, z as usize), pz)
    }

    /// Bounds-checked [`point_at`](Self::point_at).
    pub fn try_point_at(&self, x: i32, z: i32) -> Option<Vec3> {
        if x < 0 || z < 0 || x as usize >= self.width || z as usize >= self.depth {
            return None;
        }
        Some(self.point_at(x, z))
    }

    /// Object-space bounding box.
    pub fn aabb(&self) -> Aabb {
        let position = Vec3::new(0.0, self.min_height, 0.0) - self.local_origin;
        let size = Vec3::new(
            (self.width - 1) as f32 * self.cell_size,
            self.max_height - self.min_height,
            (self.depth - 1) as f32 * self.cell_size,
        );
        Aabb::from_position_size(position, size)
    }

    /// Converts an object-space point to grid space.
    #[inline]
    pub fn to_grid(&self, point: Vec3) -> Vec3 {
        (point + self.local_origin) * self.inv_cell_size
    }
}

fn validate(len: usize, width: usize, depth: usize, cell_size: f32) -> Result<(), InvalidArgument> {
    if width == 0 || depth == 0 {
        return Err(InvalidArgument::ZeroDimension { width, depth });
    }
    let expected = width * depth;
    if len != expected {
        return Err(InvalidArgument::DimensionMismatch {
            width,
            depth,
            expected,
            got: len,
        });
    }
    if !cell_size.is_finite() {
        return Err(InvalidArgument::NonFiniteCellSize(cell_size));
    }
    if cell_size < MIN_CELL_SIZE {
        return Err(InvalidArgument::CellSizeTooSmall {
            cell_size,
            min: MIN_CELL_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, depth: usize) -> Vec<f32> {
        (0..width * depth).map(|i| i as f32).collect()
    }

    #[test]
    fn test_point_at_centers_field() {
        let field = HeightField::new(ramp(3, 3), 3, 3, 2.0, 0.0, 8.0).unwrap();
        assert_eq!(field.point_at(0, 0), Vec3::new(-2.0, 0.0, -2.0));
        assert_eq!(field.point_at(1, 1), Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(field.point_at(2, 1), Vec3::new(2.0, 5.0, 0.0));
        assert_eq!(field.local_origin(), Vec3::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn test_row_major_indexing() {
        let field = HeightField::with_computed_range(ramp(4, 2), 4, 2, 1.0).unwrap();
        assert_eq!(field.height_at(3, 0), 3.0);
        assert_eq!(field.height_at(0, 1), 4.0);
        assert_eq!(field.min_height(), 0.0);
        assert_eq!(field.max_height(), 7.0);
    }

    #[test]
    fn test_try_point_at_bounds() {
        let field = HeightField::with_computed_range(ramp(2, 2), 2, 2, 1.0).unwrap();
        assert!(field.try_point_at(1, 1).is_some());
        assert!(field.try_point_at(2, 0).is_none());
        assert!(field.try_point_at(0, -1).is_none());
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            HeightField::new(ramp(2, 2), 2, 3, 1.0, 0.0, 1.0),
            Err(InvalidArgument::DimensionMismatch { expected: 6, got: 4, .. })
        ));
        assert!(matches!(
            HeightField::new(Vec::new(), 0, 3, 1.0, 0.0, 1.0),
            Err(InvalidArgument::ZeroDimension { .. })
        ));
        assert!(matches!(
            HeightField::new(ramp(2, 2), 2, 2, 0.05, 0.0, 1.0),
            Err(InvalidArgument::CellSizeTooSmall { .. })
        ));
        assert!(matches!(
            HeightField::new(ramp(2, 2), 2, 2, f32::NAN, 0.0, 1.0),
            Err(InvalidArgument::NonFiniteCellSize(_))
        ));
        assert!(matches!(
            HeightField::new(ramp(2, 2), 2, 2, 1.0, 2.0, 1.0),
            Err(InvalidArgument::InvertedHeightRange { .. })
        ));
    }

    #[test]
    fn test_aabb_is_centered() {
        let field = HeightField::new(vec![0.0; 5 * 3], 5, 3, 1.0, -1.0, 3.0).unwrap();
        let aabb = field.aabb();
        assert_eq!(aabb.min, Vec3::new(-2.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_scaled_bytes_samples() {
        let samples = ScaledBytes::new(vec![0, 10, 255, 4], 0.5);
        assert_eq!(samples.sample(1), 5.0);
        assert_eq!(samples.range(), Some((0.0, 127.5)));

        let field = HeightField::with_computed_range(samples, 2, 2, 1.0).unwrap();
        assert_eq!(field.point_at(1, 1).y, 2.0);
    }

    #[test]
    fn test_single_row_has_no_surface() {
        let field = HeightField::with_computed_range(vec![1.0, 2.0, 3.0], 3, 1, 1.0).unwrap();
        assert!(!field.has_surface());
        assert_eq!(field.cells_z(), 0);
    }
}
