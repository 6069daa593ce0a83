use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{ColorHistogram, DominantColor};

/// Whole-image analysis produced once per loaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    image_id: Uuid,
    dominant: Option<DominantColor>,
    eligible_pixels: u64,
    distinct_colors: usize,
    analyzed_at: DateTime<Utc>,
}

impl ImageAnalysis {
    pub fn from_histogram(image_id: Uuid, histogram: &ColorHistogram) -> Self {
        Self {
            image_id,
            dominant: histogram.dominant(),
            eligible_pixels: histogram.eligible_pixels(),
            distinct_colors: histogram.distinct_colors(),
            analyzed_at: Utc::now(),
        }
    }

    pub fn empty(image_id: Uuid) -> Self {
        Self::from_histogram(image_id, &ColorHistogram::default())
    }

    pub fn image_id(&self) -> Uuid {
        self.image_id
    }

    /// `None` when every pixel was transparent or excluded.
    pub fn dominant(&self) -> Option<DominantColor> {
        self.dominant
    }

    pub fn eligible_pixels(&self) -> u64 {
        self.eligible_pixels
    }

    pub fn distinct_colors(&self) -> usize {
        self.distinct_colors
    }

    pub fn analyzed_at(&self) -> DateTime<Utc> {
        self.analyzed_at
    }
}
