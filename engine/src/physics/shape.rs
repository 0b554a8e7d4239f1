//! Height Map Shape
//!
//! The owner of a configured [`HeightField`] and its [`ChunkAccelerator`].
//! Reconfiguration is all-or-nothing: the new field and accelerator are built
//! off to the side and swapped in only when validation succeeds.
//!
//! Queries borrow the shape immutably, so any number of readers may query
//! concurrently. Reconfiguring needs `&mut self`; callers that share a shape
//! across threads serialize writers themselves (e.g. an `RwLock`).

use std::ops::ControlFlow;

use log::debug;

use crate::config::{CollisionConfig, SegmentCastOptions};
use crate::data::HeightMapData;
use crate::error::{HeightMapError, InvalidArgument};
use crate::physics::accelerator::ChunkAccelerator;
use crate::physics::cull::{CellRange, RegionCuller};
use crate::physics::debug_mesh::DebugLines;
use crate::physics::height_field::{HeightField, HeightSamples};
use crate::physics::intersect::SurfaceIntersector;
use crate::physics::triangle::{SurfaceHit, Triangle};
use crate::physics::types::{Aabb, Affine3A, Vec3};

/// Terrain collision shape.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMapShape<S = Vec<f32>> {
    field: Option<HeightField<S>>,
    accelerator: ChunkAccelerator,
    config: CollisionConfig,
}

static_assertions::assert_impl_all!(HeightMapShape: Send, Sync);
static_assertions::assert_impl_all!(HeightMapShape<crate::physics::height_field::ScaledBytes>: Send, Sync);

impl<S> Default for HeightMapShape<S> {
    fn default() -> Self {
        Self {
            field: None,
            accelerator: ChunkAccelerator::default(),
            config: CollisionConfig::default(),
        }
    }
}

impl<S: HeightSamples> HeightMapShape<S> {
    /// An unconfigured shape. It has no surface until [`configure`](Self::configure).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CollisionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replaces the height field and rebuilds the accelerator.
    ///
    /// On error nothing changes.
    pub fn configure(
        &mut self,
        heights: S,
        width: usize,
        depth: usize,
        cell_size: f32,
        min_height: f32,
        max_height: f32,
    ) -> Result<(), InvalidArgument> {
        let field = HeightField::new(heights, width, depth, cell_size, min_height, max_height)?;
        self.install(field);
        Ok(())
    }

    /// [`configure`](Self::configure) with the height range scanned from `heights`.
    pub fn configure_computed(
        &mut self,
        heights: S,
        width: usize,
        depth: usize,
        cell_size: f32,
    ) -> Result<(), InvalidArgument> {
        let field = HeightField::with_computed_range(heights, width, depth, cell_size)?;
        self.install(field);
        Ok(())
    }

    fn install(&mut self, field: HeightField<S>) {
        let accelerator = ChunkAccelerator::build(&field, self.config.chunk_world_size);
        debug!(
            "height map configured: {}x{} samples, cell size {}, heights [{}, {}], {} chunks",
            field.width(),
            field.depth(),
            field.cell_size(),
            field.min_height(),
            field.max_height(),
            accelerator.bounds().len()
        );
        self.field = Some(field);
        self.accelerator = accelerator;
    }

    pub fn is_configured(&self) -> bool {
        self.field.is_some()
    }

    pub fn field(&self) -> Option<&HeightField<S>> {
        self.field.as_ref()
    }

    pub fn accelerator(&self) -> &ChunkAccelerator {
        &self.accelerator
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Chunk grid dimensions, `(0, 0)` without an accelerator.
    pub fn chunk_grid_size(&self) -> (usize, usize) {
        self.accelerator.grid_size()
    }

    /// Cells per chunk edge.
    pub fn chunk_cells(&self) -> usize {
        self.accelerator.chunk_cells()
    }

    /// Query view over the current field, if any.
    pub fn intersector(&self) -> Option<SurfaceIntersector<'_, S>> {
        self.field
            .as_ref()
            .map(|field| SurfaceIntersector::new(field, &self.accelerator))
    }

    pub fn culler(&self) -> Option<RegionCuller<'_, S>> {
        self.field.as_ref().map(RegionCuller::new)
    }

    /// First hit along `begin -> end` using the shape's default options.
    pub fn intersect_segment(&self, begin: Vec3, end: Vec3) -> Option<SurfaceHit> {
        self.intersect_segment_with(begin, end, self.config.segment_options())
    }

    pub fn intersect_segment_with(
        &self,
        begin: Vec3,
        end: Vec3,
        options: SegmentCastOptions,
    ) -> Option<SurfaceHit> {
        self.intersector()?.intersect_segment(begin, end, options)
    }

    /// Feeds the triangles under `aabb` to `accept` until it breaks.
    pub fn cull<F>(&self, aabb: &Aabb, accept: F) -> ControlFlow<()>
    where
        F: FnMut(&Triangle) -> ControlFlow<()>,
    {
        match self.culler() {
            Some(culler) => culler.cull(aabb, accept),
            None => ControlFlow::Continue(()),
        }
    }

    /// Quads a cull over `aabb` would visit.
    pub fn cell_range(&self, aabb: &Aabb) -> CellRange {
        self.culler()
            .map(|culler| culler.cell_range(aabb))
            .unwrap_or(CellRange { x: 0..0, z: 0..0 })
    }

    /// Object-space bounds; a zero box when unconfigured.
    pub fn aabb(&self) -> Aabb {
        self.field.as_ref().map(HeightField::aabb).unwrap_or_default()
    }

    pub fn support(&self, direction: Vec3) -> Vec3 {
        self.aabb().support(direction)
    }

    /// Interval covered by the shape on axis `normal` once placed by `transform`.
    pub fn project_range(&self, normal: Vec3, transform: &Affine3A) -> (f32, f32) {
        self.aabb().transformed(transform).project_range(normal)
    }

    /// Box approximation of the inertia tensor diagonal.
    pub fn moment_of_inertia(&self, mass: f32) -> Vec3 {
        let e = self.aabb().size() * 0.5;
        Vec3::new(
            (mass / 3.0) * (e.y * e.y + e.z * e.z),
            (mass / 3.0) * (e.x * e.x + e.z * e.z),
            (mass / 3.0) * (e.x * e.x + e.y * e.y),
        )
    }

    pub fn enclosing_radius(&self) -> f32 {
        match &self.field {
            Some(field) => Vec3::new(
                field.width() as f32 * field.cell_size(),
                field.max_height() - field.min_height(),
                field.depth() as f32 * field.cell_size(),
            )
            .length(),
            None => 0.0,
        }
    }

    pub fn debug_lines(&self) -> DebugLines {
        self.field
            .as_ref()
            .map(DebugLines::from_field)
            .unwrap_or_default()
    }
}

impl HeightMapShape {
    /// Snapshot of the current configuration.
    pub fn data(&self) -> Option<HeightMapData> {
        let field = self.field.as_ref()?;
        Some(
            HeightMapData::new(field.width(), field.depth(), field.samples().clone())
                .with_cell_size(field.cell_size())
                .with_height_range(field.min_height(), field.max_height()),
        )
    }

    /// Configures from a data record. The height range is rescanned from the
    /// new samples unless the record carries one.
    pub fn set_data(&mut self, data: HeightMapData) -> Result<(), HeightMapError> {
        let (min, max) = data.height_range()?;
        self.configure(data.heights, data.width, data.depth, data.cell_size, min, max)?;
        Ok(())
    }

    /// Builds a configured shape straight from a data record.
    pub fn from_data(data: HeightMapData, config: CollisionConfig) -> Result<Self, HeightMapError> {
        let mut shape = Self::with_config(config);
        shape.set_data(data)?;
        Ok(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, depth: usize) -> Vec<f32> {
        (0..width * depth).map(|i| (i % width) as f32).collect()
    }

    #[test]
    fn test_unconfigured_shape_is_inert() {
        let shape: HeightMapShape = HeightMapShape::new();
        assert!(!shape.is_configured());
        assert!(shape.intersect_segment(Vec3::Y, -Vec3::Y).is_none());
        assert_eq!(shape.cull(&Aabb::new(Vec3::splat(-1.0), Vec3::ONE), |_| ControlFlow::Break(())), ControlFlow::Continue(()));
        assert_eq!(shape.aabb(), Aabb::default());
        assert_eq!(shape.enclosing_radius(), 0.0);
        assert!(shape.debug_lines().vertices.is_empty());
        assert!(shape.data().is_none());
    }

    #[test]
    fn test_failed_configure_keeps_previous_field() {
        let mut shape = HeightMapShape::new();
        shape.configure_computed(ramp(4, 4), 4, 4, 1.0).unwrap();
        let before = shape.clone();

        let err = shape.configure_computed(vec![0.0; 5], 3, 3, 1.0).unwrap_err();
        assert!(matches!(err, InvalidArgument::DimensionMismatch { expected: 9, got: 5, .. }));
        assert_eq!(shape, before);

        let err = shape.configure(vec![0.0; 4], 2, 2, 1.0, 2.0, 1.0).unwrap_err();
        assert!(matches!(err, InvalidArgument::InvertedHeightRange { .. }));
        assert_eq!(shape, before);
    }

    #[test]
    fn test_configure_is_idempotent() {
        let heights: Vec<f32> = (0..48 * 48).map(|i| ((i * 37) % 11) as f32 * 0.25).collect();
        let mut once = HeightMapShape::with_config(CollisionConfig { chunk_world_size: 8.0, ..Default::default() });
        once.configure_computed(heights.clone(), 48, 48, 1.0).unwrap();

        let mut twice = once.clone();
        twice.configure_computed(heights, 48, 48, 1.0).unwrap();

        let bits = |s: &HeightMapShape| -> Vec<(u32, u32)> {
            s.accelerator().bounds().iter().map(|r| (r.min.to_bits(), r.max.to_bits())).collect()
        };
        assert!(!once.accelerator().is_empty());
        assert_eq!(bits(&once), bits(&twice));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_aabb_is_centered() {
        let mut shape = HeightMapShape::new();
        shape.configure(vec![0.0; 15], 5, 3, 2.0, -1.0, 3.0).unwrap();
        let aabb = shape.aabb();
        assert_eq!(aabb.min, Vec3::new(-4.0, -1.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 3.0, 2.0));
        assert_eq!(shape.support(Vec3::new(1.0, -1.0, 1.0)), Vec3::new(4.0, -1.0, 2.0));
    }

    #[test]
    fn test_project_range_follows_transform() {
        let mut shape = HeightMapShape::new();
        shape.configure(vec![0.0; 9], 3, 3, 1.0, 0.0, 2.0).unwrap();
        let moved = Affine3A::from_translation(Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(shape.project_range(Vec3::Y, &moved), (10.0, 12.0));
        assert_eq!(shape.project_range(Vec3::X, &Affine3A::IDENTITY), (-1.0, 1.0));
    }

    #[test]
    fn test_inertia_and_radius() {
        let mut shape = HeightMapShape::new();
        shape.configure(vec![0.0; 9], 3, 3, 1.0, 0.0, 2.0).unwrap();
        // Half extents (1, 1, 1)
        assert_eq!(shape.moment_of_inertia(3.0), Vec3::splat(2.0));
        assert!((shape.enclosing_radius() - Vec3::new(3.0, 2.0, 3.0).length()).abs() < 1e-6);
    }

    #[test]
    fn test_data_round_trip() {
        let mut shape: HeightMapShape = HeightMapShape::new();
        let data = HeightMapData::new(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).with_cell_size(0.5);
        shape.set_data(data).unwrap();

        let snapshot = shape.data().unwrap();
        assert_eq!((snapshot.width, snapshot.depth, snapshot.cell_size), (3, 2, 0.5));
        assert_eq!(snapshot.min_height, Some(1.0));
        assert_eq!(snapshot.max_height, Some(6.0));

        let copy = HeightMapShape::from_data(snapshot, CollisionConfig::default()).unwrap();
        assert_eq!(copy, shape);
    }

    #[test]
    fn test_set_data_rejects_bad_cell_size() {
        let mut shape: HeightMapShape = HeightMapShape::new();
        let err = shape
            .set_data(HeightMapData::new(2, 2, vec![0.0; 4]).with_cell_size(0.01))
            .unwrap_err();
        assert!(matches!(
            err,
            HeightMapError::InvalidArgument(InvalidArgument::CellSizeTooSmall { .. })
        ));
        assert!(!shape.is_configured());
    }

    #[test]
    fn test_back_faces_follow_config() {
        let mut shape = HeightMapShape::with_config(CollisionConfig { hit_back_faces: true, ..Default::default() });
        shape.configure_computed(vec![0.0; 4], 2, 2, 1.0).unwrap();
        let hit = shape
            .intersect_segment(Vec3::new(0.2, -1.0, 0.1), Vec3::new(0.2, 1.0, 0.1))
            .expect("back face reported");
        assert!((hit.normal + Vec3::Y).length() < 1e-6);

        let opts = SegmentCastOptions { hit_back_faces: false, ..Default::default() };
        assert!(shape
            .intersect_segment_with(Vec3::new(0.2, -1.0, 0.1), Vec3::new(0.2, 1.0, 0.1), opts)
            .is_none());
    }
}
