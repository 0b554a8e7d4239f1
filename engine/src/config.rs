//! Collision Configuration
//!
//! Tuning knobs shared by every height map shape. `Default` matches the
//! values the terrain pipeline has always used.

use serde::{Deserialize, Serialize};

/// Smallest accepted distance between adjacent height samples.
pub const MIN_CELL_SIZE: f32 = 0.1;

/// Default world-space edge length of one accelerator chunk.
pub const DEFAULT_CHUNK_WORLD_SIZE: f32 = 16.0;

/// Epsilon used for the grid walker and degenerate segment checks.
pub const CMP_EPSILON: f32 = 0.00001;

/// Shape-wide collision settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Target world-space edge length of an accelerator chunk. The chunk
    /// cell count is `floor(chunk_world_size / cell_size)`, at least 1.
    pub chunk_world_size: f32,
    /// Whether segment casts report hits on triangle back faces by default.
    pub hit_back_faces: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            chunk_world_size: DEFAULT_CHUNK_WORLD_SIZE,
            hit_back_faces: false,
        }
    }
}

impl CollisionConfig {
    /// Default options for segment casts issued against a shape using this config.
    pub fn segment_options(&self) -> SegmentCastOptions {
        SegmentCastOptions {
            hit_back_faces: self.hit_back_faces,
            use_accelerator: true,
        }
    }
}

/// Per-query options for [`crate::HeightMapShape::intersect_segment_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentCastOptions {
    /// Report hits where the segment enters a triangle from below.
    pub hit_back_faces: bool,
    /// Allow the chunk accelerator to prune long casts. Disabling it forces
    /// the fine per-cell walk, which must yield the same answer.
    pub use_accelerator: bool,
}

impl Default for SegmentCastOptions {
    fn default() -> Self {
        Self {
            hit_back_faces: false,
            use_accelerator: true,
        }
    }
}
