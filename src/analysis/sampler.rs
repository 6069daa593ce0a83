use crate::common::{Color, PixelBuffer};
use crate::error::AnalysisError;

/// Exact color of the pixel at `(x, y)`. Off-grid coordinates fail with
/// `OutOfRange`.
pub fn sample_pixel(buffer: &PixelBuffer, x: u32, y: u32) -> Result<Color, AnalysisError> {
    Ok(buffer.rgba_at(x, y)?.color)
}
