//! Height Map Data
//!
//! The serializable configuration record accepted by [`crate::HeightMapShape`]:
//! grid dimensions, cell size, row-major heights and an optional precomputed
//! height range. Loads from JSON files and from single-channel height images.

use std::path::Path;

use image::DynamicImage;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{HeightMapError, InvalidArgument};
use crate::physics::height_field::HeightSamples;

fn default_cell_size() -> f32 {
    1.0
}

/// Configuration input for a height map shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightMapData {
    /// Samples along X (at least 1).
    pub width: usize,
    /// Samples along Z (at least 1).
    pub depth: usize,
    /// Distance between adjacent samples (at least 0.1).
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    /// Row-major samples, `heights[z * width + x]`.
    pub heights: Vec<f32>,
    /// Precomputed lowest sample. Used only together with `max_height`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f32>,
    /// Precomputed highest sample. Used only together with `min_height`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f32>,
}

impl HeightMapData {
    /// Data with a cell size of 1 and no precomputed range.
    pub fn new(width: usize, depth: usize, heights: Vec<f32>) -> Self {
        Self {
            width,
            depth,
            cell_size: default_cell_size(),
            heights,
            min_height: None,
            max_height: None,
        }
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_height_range(mut self, min_height: f32, max_height: f32) -> Self {
        self.min_height = Some(min_height);
        self.max_height = Some(max_height);
        self
    }

    /// The height range to configure with: the precomputed pair when both are
    /// present, otherwise a scan of `heights`.
    pub fn height_range(&self) -> Result<(f32, f32), InvalidArgument> {
        let (min, max) = match (self.min_height, self.max_height) {
            (Some(min), Some(max)) => (min, max),
            _ => self.heights.range().unwrap_or((0.0, 0.0)),
        };
        if min > max {
            return Err(InvalidArgument::InvertedHeightRange { min, max });
        }
        Ok((min, max))
    }

    pub fn from_json(json: &str) -> Result<Self, HeightMapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, HeightMapError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a JSON height map from disk.
    pub fn load(path: &Path) -> Result<Self, HeightMapError> {
        let text = std::fs::read_to_string(path)?;
        let data = Self::from_json(&text)?;
        debug!(
            "loaded {}x{} height map from {}",
            data.width,
            data.depth,
            path.display()
        );
        Ok(data)
    }

    /// Writes the data as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), HeightMapError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Converts a height image, one sample per pixel.
    ///
    /// Float images contribute their red channel unchanged. 8- and 16-bit
    /// grayscale images are normalized to `[0, 1]`. Color integer images are
    /// rejected since they have no single height interpretation.
    pub fn from_image(image: &DynamicImage, cell_size: f32) -> Result<Self, HeightMapError> {
        let width = image.width() as usize;
        let depth = image.height() as usize;

        let heights: Vec<f32> = match image {
            DynamicImage::ImageRgb32F(buf) => buf.pixels().map(|p| p.0[0]).collect(),
            DynamicImage::ImageRgba32F(buf) => buf.pixels().map(|p| p.0[0]).collect(),
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_) => image.to_luma32f().into_raw(),
            other => return Err(HeightMapError::UnsupportedImageFormat(other.color())),
        };

        Ok(Self::new(width, depth, heights).with_cell_size(cell_size))
    }

    /// Opens and converts a height image file.
    pub fn load_image(path: &Path, cell_size: f32) -> Result<Self, HeightMapError> {
        let image = image::open(path)?;
        Self::from_image(&image, cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb, Rgb32FImage};

    #[test]
    fn test_json_defaults() {
        let data = HeightMapData::from_json(r#"{"width": 2, "depth": 1, "heights": [1.0, -2.0]}"#).unwrap();
        assert_eq!(data.cell_size, 1.0);
        assert_eq!(data.min_height, None);
        assert_eq!(data.height_range().unwrap(), (-2.0, 1.0));
    }

    #[test]
    fn test_json_round_trip_keeps_range() {
        let data = HeightMapData::new(2, 2, vec![0.0, 1.0, 2.0, 3.0])
            .with_cell_size(0.5)
            .with_height_range(-1.0, 4.0);
        let back = HeightMapData::from_json(&data.to_json().unwrap()).unwrap();
        assert_eq!(back, data);
        assert_eq!(back.height_range().unwrap(), (-1.0, 4.0));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let data = HeightMapData::new(1, 1, vec![0.0]).with_height_range(3.0, 1.0);
        assert!(matches!(
            data.height_range(),
            Err(InvalidArgument::InvertedHeightRange { .. })
        ));
    }

    #[test]
    fn test_half_range_falls_back_to_scan() {
        let mut data = HeightMapData::new(3, 1, vec![5.0, 7.0, 6.0]);
        data.min_height = Some(0.0);
        assert_eq!(data.height_range().unwrap(), (5.0, 7.0));
    }

    #[test]
    fn test_bad_json_is_reported() {
        assert!(matches!(
            HeightMapData::from_json("{\"width\": 2"),
            Err(HeightMapError::Json(_))
        ));
    }

    #[test]
    fn test_float_image_uses_red_channel() {
        let img: Rgb32FImage = ImageBuffer::from_fn(3, 2, |x, y| Rgb([x as f32 + 10.0 * y as f32, 99.0, 99.0]));
        let data = HeightMapData::from_image(&DynamicImage::ImageRgb32F(img), 2.0).unwrap();
        assert_eq!((data.width, data.depth), (3, 2));
        assert_eq!(data.heights, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(data.cell_size, 2.0);
    }

    #[test]
    fn test_gray_image_is_normalized() {
        let img = ImageBuffer::from_fn(2, 1, |x, _| Luma([if x == 0 { 0u8 } else { 255u8 }]));
        let data = HeightMapData::from_image(&DynamicImage::ImageLuma8(img), 1.0).unwrap();
        assert_eq!(data.heights, vec![0.0, 1.0]);
    }

    #[test]
    fn test_color_image_rejected() {
        let img = DynamicImage::new_rgb8(2, 2);
        assert!(matches!(
            HeightMapData::from_image(&img, 1.0),
            Err(HeightMapError::UnsupportedImageFormat(_))
        ));
    }
}
