//! Physics module for terrain collision
//!
//! This module provides heightfield collision queries built from scratch
//! without an external physics library: segment casts against the terrain
//! surface and box culling for contact generation.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**. Heights and cell sizes share the same unit.
//!
//! # Submodules
//!
//! - [`types`] - Math types re-exported from glam, plus [`Aabb`]
//! - [`height_field`] - Validated height grid, generic over sample storage
//! - [`accelerator`] - Per-chunk height ranges for long casts
//! - [`traversal`] - Grid walker shared by the fine and chunk passes
//! - [`triangle`] - Quad split and segment/triangle test
//! - [`intersect`] - Segment cast dispatch
//! - [`cull`] - Box to triangle enumeration
//! - [`shape`] - [`HeightMapShape`], owner of a field and its accelerator
//! - [`byte_map`] - 8-bit height map resource
//! - [`debug_mesh`] - Wireframe export

pub mod accelerator;
pub mod byte_map;
pub mod cull;
pub mod debug_mesh;
pub mod height_field;
pub mod intersect;
pub mod shape;
pub mod traversal;
pub mod triangle;
pub mod types;

// Re-export commonly used types at the physics module level
pub use accelerator::{ChunkAccelerator, HeightRange};
pub use byte_map::ByteHeightMap;
pub use cull::{CellRange, RegionCuller};
pub use debug_mesh::{DebugLines, LineVertex};
pub use height_field::{HeightField, HeightSamples, ScaledBytes};
pub use intersect::SurfaceIntersector;
pub use shape::HeightMapShape;
pub use traversal::{CellSpan, walk_grid};
pub use triangle::{SurfaceHit, Triangle};
pub use types::{Aabb, Affine3A, Vec2, Vec3};
