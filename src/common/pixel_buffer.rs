use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::common::color::Rgba;
use crate::error::AnalysisError;

pub const BYTES_PER_PIXEL: usize = 4;

/// A single pixel position in buffer space, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Immutable row-major RGBA8 pixel grid.
///
/// The byte slice is reference counted so clones are cheap and a buffer can
/// be moved onto a blocking worker while the UI keeps its own handle.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl PixelBuffer {
    /// Wraps raw RGBA bytes, checking that `data.len() == width * height * 4`.
    pub fn new(width: u32, height: u32, data: impl Into<Arc<[u8]>>) -> Result<Self, AnalysisError> {
        let data = data.into();
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL));

        if expected != Some(data.len()) {
            return Err(AnalysisError::InvalidBuffer {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_pixel(width: u32, height: u32, pixel: Rgba) -> Self {
        let len = width as usize * height as usize;
        let data: Vec<u8> = std::iter::repeat_n(pixel.to_array(), len)
            .flatten()
            .collect();
        Self {
            width,
            height,
            data: data.into(),
        }
    }

    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw().into(),
        }
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        Self::from_rgba_image(image.to_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    pub fn out_of_range(&self, x: i64, y: i64) -> AnalysisError {
        AnalysisError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Reads the pixel at `(x, y)`, failing instead of clamping when the
    /// coordinate is off the grid.
    pub fn rgba_at(&self, x: u32, y: u32) -> Result<Rgba, AnalysisError> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_range(x as i64, y as i64));
        }
        Ok(self.rgba_unchecked(x, y))
    }

    pub(crate) fn rgba_unchecked(&self, x: u32, y: u32) -> Rgba {
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = &self.data[offset..offset + BYTES_PER_PIXEL];
        Rgba::new(px[0], px[1], px[2], px[3])
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba as ImageRgba};

    #[test]
    fn rejects_short_buffer() {
        let err = PixelBuffer::new(2, 2, vec![0u8; 15]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidBuffer {
                expected: Some(16),
                actual: 15
            }
        );
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        let err = PixelBuffer::new(u32::MAX, u32::MAX, vec![0u8; 4]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidBuffer { actual: 4, .. }));
    }

    #[test]
    fn empty_grid_is_valid() {
        let buffer = PixelBuffer::new(0, 0, Vec::<u8>::new()).unwrap();
        assert_eq!(buffer.pixel_count(), 0);
        assert_eq!(buffer.pixels().count(), 0);
    }

    #[test]
    fn reads_row_major_offsets() {
        let bytes: Vec<u8> = (0..24).collect();
        let buffer = PixelBuffer::new(3, 2, bytes).unwrap();
        assert_eq!(buffer.rgba_at(1, 0).unwrap(), Rgba::new(4, 5, 6, 7));
        assert_eq!(buffer.rgba_at(0, 1).unwrap(), Rgba::new(12, 13, 14, 15));
        assert_eq!(buffer.rgba_at(2, 1).unwrap(), Rgba::new(20, 21, 22, 23));
    }

    #[test]
    fn out_of_bounds_read_fails() {
        let buffer = PixelBuffer::from_pixel(3, 2, Rgba::new(1, 1, 1, 255));
        assert!(matches!(
            buffer.rgba_at(3, 0),
            Err(AnalysisError::OutOfRange { x: 3, y: 0, width: 3, height: 2 })
        ));
        assert!(buffer.rgba_at(0, 2).is_err());
    }

    #[test]
    fn converts_from_image_crate_buffer() {
        let img = ImageBuffer::<ImageRgba<u8>, Vec<u8>>::from_pixel(4, 3, ImageRgba([9, 8, 7, 6]));
        let buffer = PixelBuffer::from_rgba_image(img);
        assert_eq!(buffer.dimensions(), (4, 3));
        assert!(buffer.pixels().all(|px| px == Rgba::new(9, 8, 7, 6)));
    }

    #[test]
    fn clones_share_bytes() {
        let buffer = PixelBuffer::from_pixel(16, 16, Rgba::new(1, 2, 3, 255));
        let clone = buffer.clone();
        assert!(Arc::ptr_eq(&buffer.data, &clone.data));
    }
}
