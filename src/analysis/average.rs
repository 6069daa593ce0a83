use serde::{Deserialize, Serialize};

use crate::common::{Color, PixelBuffer};
use crate::error::AnalysisError;

/// What to do when the averaging window hangs over the buffer edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Average only the pixels of the window that lie inside the buffer.
    #[default]
    Clip,
    /// Fail with `OutOfRange` if any window pixel lies outside the buffer.
    Reject,
}

/// Mean color of the `(2 * inset + 1)^2` square centered on `(x, y)`.
///
/// Channel means are rounded half away from zero. The center must be on the
/// grid under either policy; `policy` only governs the rest of the window.
pub fn average_color(
    buffer: &PixelBuffer,
    x: u32,
    y: u32,
    inset: u32,
    policy: EdgePolicy,
) -> Result<Color, AnalysisError> {
    let (cx, cy, inset) = (x as i64, y as i64, inset as i64);
    if !buffer.contains(cx, cy) {
        return Err(buffer.out_of_range(cx, cy));
    }

    let (mut x0, mut y0) = (cx - inset, cy - inset);
    let (mut x1, mut y1) = (cx + inset, cy + inset);

    match policy {
        EdgePolicy::Reject => {
            if !buffer.contains(x0, y0) {
                return Err(buffer.out_of_range(x0, y0));
            }
            if !buffer.contains(x1, y1) {
                return Err(buffer.out_of_range(x1, y1));
            }
        }
        EdgePolicy::Clip => {
            x0 = x0.max(0);
            y0 = y0.max(0);
            x1 = x1.min(buffer.width() as i64 - 1);
            y1 = y1.min(buffer.height() as i64 - 1);
        }
    }

    let mut sums = [0u64; 3];
    for py in y0..=y1 {
        for px in x0..=x1 {
            let color = buffer.rgba_unchecked(px as u32, py as u32).color;
            sums[0] += color.r as u64;
            sums[1] += color.g as u64;
            sums[2] += color.b as u64;
        }
    }

    // the center is always inside, so the window is never empty
    let samples = ((x1 - x0 + 1) * (y1 - y0 + 1)) as u64;
    let [r, g, b] = sums.map(|sum| round_mean(sum, samples));
    Ok(Color::new(r, g, b))
}

fn round_mean(sum: u64, samples: u64) -> u8 {
    ((sum + samples / 2) / samples) as u8
}
