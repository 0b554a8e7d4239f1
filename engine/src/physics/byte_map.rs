//! Byte Height Map
//!
//! An editable 8-bit height map resource. Each byte is multiplied by a
//! uniform height scale, so a 128x128 map costs 16 KiB instead of 64 KiB.
//! Setters silently ignore out-of-range values and keep the previous state.

use log::warn;

use crate::config::{CollisionConfig, MIN_CELL_SIZE};
use crate::error::InvalidArgument;
use crate::physics::debug_mesh::DebugLines;
use crate::physics::height_field::{HeightField, ScaledBytes};
use crate::physics::shape::HeightMapShape;

/// Smallest accepted height scale.
pub const MIN_HEIGHT_SCALE: f32 = 0.001;

const DEFAULT_SIZE: usize = 128;

#[derive(Clone, Debug, PartialEq)]
pub struct ByteHeightMap {
    width: usize,
    depth: usize,
    cell_size: f32,
    height_scale: f32,
    data: Vec<u8>,
    min_byte: u8,
    max_byte: u8,
}

impl Default for ByteHeightMap {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

impl ByteHeightMap {
    /// A flat, zero-filled map. Zero dimensions are raised to 1.
    pub fn new(width: usize, depth: usize) -> Self {
        let (width, depth) = (width.max(1), depth.max(1));
        Self {
            width,
            depth,
            cell_size: 1.0,
            height_scale: 1.0,
            data: vec![0; width * depth],
            min_byte: 0,
            max_byte: 0,
        }
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

    pub fn height_scale(&self) -> f32 {
        self.height_scale
    }

    pub fn map_data(&self) -> &[u8] {
        &self.data
    }

    pub fn min_height(&self) -> f32 {
        f32::from(self.min_byte) * self.height_scale
    }

    pub fn max_height(&self) -> f32 {
        f32::from(self.max_byte) * self.height_scale
    }

    /// Scaled height of sample `(x, z)`.
    pub fn height_at(&self, x: usize, z: usize) -> Option<f32> {
        if x >= self.width || z >= self.depth {
            return None;
        }
        Some(f32::from(self.data[z * self.width + x]) * self.height_scale)
    }

    /// Changes the sample count along X, keeping the buffer prefix.
    pub fn set_width(&mut self, width: usize) {
        if width == 0 {
            warn!("ignoring zero height map width");
            return;
        }
        self.width = width;
        self.resize();
    }

    /// Changes the sample count along Z, keeping the buffer prefix.
    pub fn set_depth(&mut self, depth: usize) {
        if depth == 0 {
            warn!("ignoring zero height map depth");
            return;
        }
        self.depth = depth;
        self.resize();
    }

    pub fn set_cell_size(&mut self, cell_size: f32) {
        if cell_size.is_nan() || cell_size < MIN_CELL_SIZE {
            warn!("ignoring cell size {cell_size}, minimum is {MIN_CELL_SIZE}");
            return;
        }
        self.cell_size = cell_size;
    }

    pub fn set_height_scale(&mut self, height_scale: f32) {
        if height_scale.is_nan() || height_scale < MIN_HEIGHT_SCALE {
            warn!("ignoring height scale {height_scale}, minimum is {MIN_HEIGHT_SCALE}");
            return;
        }
        self.height_scale = height_scale;
    }

    /// Replaces every sample. Returns `false` and changes nothing unless
    /// `bytes.len() == width * depth`.
    pub fn set_map_data(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() != self.width * self.depth {
            warn!(
                "ignoring {} bytes of height data for a {}x{} map",
                bytes.len(),
                self.width,
                self.depth
            );
            return false;
        }
        self.data.clear();
        self.data.extend_from_slice(bytes);
        self.update_range();
        true
    }

    fn resize(&mut self) {
        self.data.resize(self.width * self.depth, 0);
        self.update_range();
    }

    fn update_range(&mut self) {
        self.min_byte = self.data.iter().copied().min().unwrap_or(0);
        self.max_byte = self.data.iter().copied().max().unwrap_or(0);
    }

    fn samples(&self) -> ScaledBytes {
        ScaledBytes::new(self.data.clone(), self.height_scale)
    }

    /// Validated field over a copy of the current samples.
    pub fn to_field(&self) -> Result<HeightField<ScaledBytes>, InvalidArgument> {
        HeightField::new(
            self.samples(),
            self.width,
            self.depth,
            self.cell_size,
            self.min_height(),
            self.max_height(),
        )
    }

    /// A collision shape configured from the current samples.
    pub fn to_shape(&self, config: CollisionConfig) -> Result<HeightMapShape<ScaledBytes>, InvalidArgument> {
        let mut shape = HeightMapShape::with_config(config);
        shape.configure(
            self.samples(),
            self.width,
            self.depth,
            self.cell_size,
            self.min_height(),
            self.max_height(),
        )?;
        Ok(shape)
    }

    pub fn debug_lines(&self) -> Result<DebugLines, InvalidArgument> {
        Ok(DebugLines::from_field(&self.to_field()?))
    }
}
