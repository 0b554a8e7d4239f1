//! Grid Traversal
//!
//! Amanatides & Woo style DDA over a 2D grid of unit cells. The walker visits
//! every cell crossed by the horizontal projection of a segment, in order,
//! and hands each one to a caller-supplied test. The same walker drives both
//! the fine per-quad grid and the coarse chunk grid; only the coordinate
//! scale and the test differ.
//!
//! Coordinates are in grid units: integer values are grid lines and cell
//! `(x, z)` spans `[x, x+1] x [z, z+1]`.

use crate::config::CMP_EPSILON;
use crate::physics::types::Vec2;

/// A cell visited by [`walk_grid`] and the part of the segment inside it.
///
/// `enter` and `exit` are fractions of the segment, in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSpan {
    pub x: i32,
    pub z: i32,
    pub enter: f32,
    pub exit: f32,
}

#[inline]
fn step_sign(component: f32) -> i32 {
    if component > CMP_EPSILON {
        1
    } else if component < -CMP_EPSILON {
        -1
    } else {
        0
    }
}

/// Per-axis walker state.
struct Axis {
    cell: i32,
    step: i32,
    delta: f32,
    cross: f32,
}

impl Axis {
    fn new(start: f32, dir: f32, cells: i32) -> Self {
        let step = step_sign(dir);
        let delta = if step != 0 { 1.0 / dir.abs() } else { f32::INFINITY };
        let mut cross = match step {
            1 => (start.ceil() - start) * delta,
            -1 => (start - start.floor()) * delta,
            _ => f32::INFINITY,
        };
        let mut cell = start.floor();

        // Starting on a grid line (or within epsilon of one): the first
        // crossing is a full cell away, and the current cell is the one ahead
        // of the line in the walk direction.
        if cross.abs() < CMP_EPSILON {
            cross += delta;
            cell = start.round();
            if step == -1 {
                cell -= 1.0;
            }
        }

        // Clamp in float space; far-away starts do not fit an i32.
        let clamped = cell.clamp(0.0, (cells - 1) as f32);
        if step != 0 {
            cross += delta * step as f32 * (clamped - cell);
        }

        Self {
            cell: clamped as i32,
            step,
            delta,
            cross,
        }
    }

    #[inline]
    fn advance(&mut self) -> f32 {
        self.cell += self.step;
        let dist = self.cross;
        self.cross += self.delta;
        dist
    }

    #[inline]
    fn outside(&self, cells: i32) -> bool {
        self.cell < 0 || self.cell >= cells
    }
}

/// Walks the cells of a `cells_x` by `cells_z` grid crossed by `begin -> end`.
///
/// `visit` is called for each cell in order along the segment; the walk stops
/// at the first `Some` it returns, at the cell containing `end`, or when the
/// walk leaves the grid. The starting cell is clamped into the grid, so a
/// segment starting outside still begins at the nearest edge cell.
///
/// A segment with no horizontal extent visits its single cell with the span
/// `[0, 1]`.
pub fn walk_grid<T, F>(begin: Vec2, end: Vec2, cells_x: i32, cells_z: i32, mut visit: F) -> Option<T>
where
    F: FnMut(CellSpan) -> Option<T>,
{
    if cells_x <= 0 || cells_z <= 0 {
        return None;
    }

    let delta = end - begin;
    let length = delta.length();
    let dir = if length < CMP_EPSILON { Vec2::ZERO } else { delta / length };
    let inv_length = if length < CMP_EPSILON { 0.0 } else { 1.0 / length };

    let fraction = |d: f32| {
        if d >= length {
            1.0
        } else {
            (d * inv_length).clamp(0.0, 1.0)
        }
    };
    let span = |x: i32, z: i32, from: f32, to: f32| {
        if inv_length == 0.0 {
            CellSpan { x, z, enter: 0.0, exit: 1.0 }
        } else {
            CellSpan {
                x,
                z,
                enter: fraction(from),
                exit: fraction(to),
            }
        }
    };

    let mut ax = Axis::new(begin.x, dir.x, cells_x);
    let mut az = Axis::new(begin.y, dir.y, cells_z);
    let mut dist = 0.0_f32;

    loop {
        let prev = dist;
        let (x, z) = (ax.cell, az.cell);

        dist = if ax.cross < az.cross { ax.advance() } else { az.advance() };

        if dist > length {
            return visit(span(x, z, prev, length));
        }

        if let Some(hit) = visit(span(x, z, prev, dist)) {
            return Some(hit);
        }

        // `end` sits exactly on the line just crossed.
        if dist >= length {
            return None;
        }

        if ax.outside(cells_x) || az.outside(cells_z) {
            return None;
        }
    }
}
