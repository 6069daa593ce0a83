use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::exclusion::ColorExclusion;
use crate::common::{Color, PixelBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantColor {
    pub color: Color,
    pub count: u64,
}

/// Exact-color frequency table over the eligible pixels of a buffer.
///
/// Colors iterate in the order they were first seen during the row-major
/// scan. The leader is tracked while counting: it only changes hands when
/// another color's count becomes strictly greater, so among colors tied at
/// the maximum the one that reached that count first wins.
#[derive(Debug, Clone, Default)]
pub struct ColorHistogram {
    counts: IndexMap<Color, u64>,
    leader: Option<DominantColor>,
    eligible_pixels: u64,
    skipped_transparent: u64,
    skipped_excluded: u64,
}

impl ColorHistogram {
    pub fn scan<E>(buffer: &PixelBuffer, exclusion: &E) -> Self
    where
        E: ColorExclusion + ?Sized,
    {
        let mut histogram = Self::default();
        for px in buffer.pixels() {
            if px.is_transparent() {
                histogram.skipped_transparent += 1;
                continue;
            }
            if exclusion.is_excluded(px.color) {
                histogram.skipped_excluded += 1;
                continue;
            }
            histogram.record(px.color);
        }
        histogram
    }

    fn record(&mut self, color: Color) {
        self.eligible_pixels += 1;
        let count = self.counts.entry(color).or_insert(0);
        *count += 1;

        let leading = self.leader.map_or(0, |leader| leader.count);
        if *count > leading {
            self.leader = Some(DominantColor {
                color,
                count: *count,
            });
        }
    }

    pub fn dominant(&self) -> Option<DominantColor> {
        self.leader
    }

    /// Colors with their counts, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, u64)> + '_ {
        self.counts.iter().map(|(color, count)| (*color, *count))
    }

    /// The `n` most frequent colors, most frequent first. Equal counts keep
    /// first-seen order, which can differ from the tie-break of `dominant`.
    pub fn top(&self, n: usize) -> Vec<DominantColor> {
        let mut ranked: Vec<DominantColor> = self
            .iter()
            .map(|(color, count)| DominantColor { color, count })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }

    pub fn distinct_colors(&self) -> usize {
        self.counts.len()
    }

    pub fn eligible_pixels(&self) -> u64 {
        self.eligible_pixels
    }

    pub fn skipped_transparent(&self) -> u64 {
        self.skipped_transparent
    }

    pub fn skipped_excluded(&self) -> u64 {
        self.skipped_excluded
    }
}

/// Most frequent color among pixels that are neither fully transparent nor
/// excluded, or `None` when no pixel qualifies.
///
/// Ties go to the color that first reached the winning count while scanning
/// rows top to bottom, left to right.
pub fn dominant_color<E>(buffer: &PixelBuffer, exclusion: &E) -> Option<DominantColor>
where
    E: ColorExclusion + ?Sized,
{
    ColorHistogram::scan(buffer, exclusion).dominant()
}
