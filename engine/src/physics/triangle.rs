//! Terrain Triangles
//!
//! Each grid quad `(x, z)` is split along the diagonal `(x, z)-(x+1, z+1)`:
//!
//! ```text
//!  (x,z+1) ------ (x+1,z+1)
//!     |  B      /    |
//!     |      /    A  |
//!  (x,z) -------- (x+1,z)
//! ```
//!
//! - A = `{(x,z), (x+1,z), (x+1,z+1)}`
//! - B = `{(x+1,z+1), (x,z+1), (x,z)}`
//!
//! The face normal is `(v2 - v0) x (v1 - v0)`, which points along +Y for
//! both triangles of a flat quad.

use crate::config::CMP_EPSILON;
use crate::physics::height_field::{HeightField, HeightSamples};
use crate::physics::types::Vec3;

/// A terrain triangle with its unit face normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub normal: Vec3,
}

/// Where a segment meets the terrain surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// Hit position in the segment's space.
    pub position: Vec3,
    /// Unit face normal, facing against the segment.
    pub normal: Vec3,
    /// Parameter along the segment, `begin + (end - begin) * fraction`.
    pub fraction: f32,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal = (v2 - v0).cross(v1 - v0).normalize_or_zero();
        Self { v0, v1, v2, normal }
    }

    /// The two triangles of quad `(x, z)`, A first.
    ///
    /// Callers guarantee `0 <= x < width-1` and `0 <= z < depth-1`.
    #[inline]
    pub fn quad_pair<S: HeightSamples>(field: &HeightField<S>, x: i32, z: i32) -> [Self; 2] {
        let p00 = field.point_at(x, z);
        let p10 = field.point_at(x + 1, z);
        let p11 = field.point_at(x + 1, z + 1);
        let p01 = field.point_at(x, z + 1);
        [Self::new(p00, p10, p11), Self::new(p11, p01, p00)]
    }

    /// Segment/triangle test (Möller–Trumbore over `from -> to`).
    ///
    /// Hits at the very start of the segment are ignored. A hit on the back of
    /// the face is only reported when `hit_back_faces` is set, with the normal
    /// flipped to face the segment.
    pub fn intersect_segment(&self, from: Vec3, to: Vec3, hit_back_faces: bool) -> Option<SurfaceHit> {
        let rel = to - from;
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;

        let h = rel.cross(e2);
        let a = e1.dot(h);
        if a.abs() < CMP_EPSILON {
            return None; // Parallel to the face
        }

        let f = 1.0 / a;
        let s = from - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(e1);
        let v = f * rel.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * e2.dot(q);
        if t <= CMP_EPSILON || t > 1.0 {
            return None;
        }

        let mut normal = self.normal;
        if normal.dot(rel) > 0.0 {
            if !hit_back_faces {
                return None;
            }
            normal = -normal;
        }

        Some(SurfaceHit {
            position: from + rel * t,
            normal,
            fraction: t,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_quad() -> [Triangle; 2] {
        let field = HeightField::new(vec![0.0; 4], 2, 2, 1.0, 0.0, 0.0).unwrap();
        Triangle::quad_pair(&field, 0, 0)
    }

    #[test]
    fn test_flat_quad_normals_point_up() {
        for tri in flat_quad() {
            assert!((tri.normal - Vec3::Y).length() < 1e-6, "normal {:?}", tri.normal);
        }
    }

    #[test]
    fn test_quad_pair_shares_diagonal() {
        let [a, b] = flat_quad();
        assert_eq!(a.v0, b.v2);
        assert_eq!(a.v2, b.v0);
        assert_eq!(a.v0, Vec3::new(-0.5, 0.0, -0.5));
        assert_eq!(a.v2, Vec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn test_segment_hits_front_face() {
        let [a, _] = flat_quad();
        let hit = a
            .intersect_segment(Vec3::new(0.25, 1.0, -0.25), Vec3::new(0.25, -1.0, -0.25), false)
            .expect("segment crosses triangle A");
        assert!((hit.position - Vec3::new(0.25, 0.0, -0.25)).length() < 1e-6);
        assert!((hit.fraction - 0.5).abs() < 1e-6);
        assert_eq!(hit.normal, a.normal);
    }

    #[test]
    fn test_back_face_needs_opt_in() {
        let [a, _] = flat_quad();
        let from = Vec3::new(0.25, -1.0, -0.25);
        let to = Vec3::new(0.25, 1.0, -0.25);
        assert!(a.intersect_segment(from, to, false).is_none());

        let hit = a.intersect_segment(from, to, true).expect("back face hit");
        assert!((hit.normal + Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_segment_ending_above_misses() {
        let [a, _] = flat_quad();
        assert!(a
            .intersect_segment(Vec3::new(0.25, 2.0, -0.25), Vec3::new(0.25, 0.5, -0.25), false)
            .is_none());
    }

    #[test]
    fn test_segment_outside_footprint_misses() {
        let [a, b] = flat_quad();
        // Over B's half of the quad
        let from = Vec3::new(-0.25, 1.0, 0.25);
        let to = Vec3::new(-0.25, -1.0, 0.25);
        assert!(a.intersect_segment(from, to, false).is_none());
        assert!(b.intersect_segment(from, to, false).is_some());
    }

    #[test]
    fn test_parallel_segment_misses() {
        let [a, _] = flat_quad();
        assert!(a
            .intersect_segment(Vec3::new(-1.0, 0.0, -0.25), Vec3::new(1.0, 0.0, -0.25), true)
            .is_none());
    }
}
