//! Heightmap Collision Library
//!
//! Collision queries against regular-grid terrain. A [`HeightMapShape`] owns a
//! validated [`HeightField`] and a coarse [`ChunkAccelerator`], and answers:
//!
//! - segment casts: the first point where a segment meets the surface
//! - box culls: every terrain triangle that may touch an axis-aligned box
//!
//! # Modules
//!
//! - [`physics`] - Height field, accelerator, traversal and queries
//! - [`data`] - Serializable height map records (JSON, images)
//! - [`config`] - Collision tuning and per-query options
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```
//! use std::ops::ControlFlow;
//! use heightmap_collision::{Aabb, HeightMapShape, Vec3};
//!
//! let mut shape = HeightMapShape::new();
//! shape.configure_computed(vec![0.0; 4], 2, 2, 1.0).unwrap();
//!
//! // Cast straight down through the middle
//! let hit = shape
//!     .intersect_segment(Vec3::new(-1.0, 10.0, -1.0), Vec3::new(1.0, -10.0, 1.0))
//!     .unwrap();
//! assert!(hit.position.length() < 1e-5);
//!
//! // Collect triangles near the origin
//! let mut count = 0;
//! let _ = shape.cull(&Aabb::new(Vec3::splat(-0.1), Vec3::splat(0.1)), |_| {
//!     count += 1;
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(count, 2);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod physics;

// Re-export the main entry points at crate level for convenience
pub use config::{CollisionConfig, SegmentCastOptions};
pub use data::HeightMapData;
pub use error::{HeightMapError, InvalidArgument};
pub use physics::{
    Aabb, ByteHeightMap, ChunkAccelerator, DebugLines, HeightField, HeightMapShape, SurfaceHit,
    Triangle,
};
pub use physics::types::{Affine3A, Vec2, Vec3};
