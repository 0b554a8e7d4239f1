//! Debug Line Mesh
//!
//! Wireframe export of a height field for visualization: every grid edge
//! along X, along Z, and the split diagonal of each quad, as endpoint pairs.
//! Vertices are plain `#[repr(C)]` data so they can be uploaded as-is.

use bytemuck::{Pod, Zeroable};

use crate::physics::height_field::{HeightField, HeightSamples};
use crate::physics::types::Vec3;

/// One endpoint of a debug line.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

static_assertions::assert_eq_size!(LineVertex, [f32; 3]);

impl From<Vec3> for LineVertex {
    fn from(v: Vec3) -> Self {
        Self { position: v.to_array() }
    }
}

/// Line-list vertices; consecutive pairs form one line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DebugLines {
    pub vertices: Vec<LineVertex>,
}

impl DebugLines {
    /// Number of vertices needed for a `width` x `depth` field.
    pub fn vertex_count(width: usize, depth: usize) -> usize {
        if width == 0 || depth == 0 {
            return 0;
        }
        let (w, d) = (width, depth);
        (w - 1) * d * 2 + w * (d - 1) * 2 + (w - 1) * (d - 1) * 2
    }

    /// Builds the wireframe of `field` in object space.
    pub fn from_field<S: HeightSamples>(field: &HeightField<S>) -> Self {
        let (w, d) = (field.width() as i32, field.depth() as i32);
        let mut vertices = Vec::with_capacity(Self::vertex_count(field.width(), field.depth()));

        for z in 0..d {
            for x in 0..w {
                let p = field.point_at(x, z);
                for (dx, dz) in [(1, 0), (0, 1), (1, 1)] {
                    if let Some(q) = field.try_point_at(x + dx, z + dz) {
                        vertices.push(p.into());
                        vertices.push(q.into());
                    }
                }
            }
        }

        Self { vertices }
    }

    pub fn line_count(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Iterates lines as `(start, end)`.
    pub fn lines(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.vertices
            .chunks_exact(2)
            .map(|pair| (Vec3::from_array(pair[0].position), Vec3::from_array(pair[1].position)))
    }

    /// Raw vertex bytes for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
