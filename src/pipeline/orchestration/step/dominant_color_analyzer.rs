use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::analysis::{ColorExclusion, ColorHistogram, Whitish};
use crate::error::AppError;
use crate::pipeline::context::{DecodedState, ImageContext};
use crate::pipeline::domain::ImageAnalysis;
use crate::pipeline::orchestration::processing_pipeline::AnalyzerStep;

const TOP_COLORS_LOGGED: usize = 3;

/// Runs the dominant-color scan on the blocking pool so a large image never
/// stalls the UI thread.
pub struct DominantColorAnalyzer {
    exclusion: Arc<dyn ColorExclusion>,
}

impl DominantColorAnalyzer {
    pub fn new(exclusion: impl ColorExclusion + 'static) -> Self {
        Self {
            exclusion: Arc::new(exclusion),
        }
    }
}

impl Default for DominantColorAnalyzer {
    fn default() -> Self {
        Self::new(Whitish::default())
    }
}

#[async_trait]
impl AnalyzerStep for DominantColorAnalyzer {
    async fn analyze(&self, ctx: &ImageContext<DecodedState>) -> Result<ImageAnalysis, AppError> {
        let buffer = ctx.buffer().clone();
        let exclusion = self.exclusion.clone();

        let histogram =
            tokio::task::spawn_blocking(move || ColorHistogram::scan(&buffer, exclusion.as_ref()))
                .await
                .map_err(|e| AppError::Pipeline(format!("Dominant color scan failed: {e}")))?;

        let analysis = ImageAnalysis::from_histogram(ctx.image().id(), &histogram);
        match analysis.dominant() {
            Some(dominant) => info!(
                "Dominant color: {} ({} of {} eligible pixels)",
                dominant.color,
                dominant.count,
                analysis.eligible_pixels()
            ),
            None => info!("Dominant color: none, every pixel is transparent or excluded"),
        }
        debug!(
            "Skipped {} transparent and {} excluded pixels; most frequent: {:?}",
            histogram.skipped_transparent(),
            histogram.skipped_excluded(),
            histogram.top(TOP_COLORS_LOGGED)
        );
        Ok(analysis)
    }

    fn name(&self) -> &'static str {
        "DominantColorAnalyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::NoExclusion;
    use crate::common::{Color, LoadedImage, PixelBuffer, Rgba};

    fn context_of(bytes: Vec<u8>, width: u32, height: u32) -> ImageContext<DecodedState> {
        ImageContext::new(LoadedImage::new(
            "test",
            PixelBuffer::new(width, height, bytes).unwrap(),
        ))
    }

    #[tokio::test]
    async fn finds_the_non_white_majority() {
        let bytes = [
            [10u8, 10, 10, 255],
            [10, 10, 10, 255],
            [0, 0, 0, 255],
            [255, 255, 255, 255],
        ]
        .concat();
        let ctx = context_of(bytes, 2, 2);
        let analysis = DominantColorAnalyzer::default().analyze(&ctx).await.unwrap();
        let dominant = analysis.dominant().unwrap();
        assert_eq!(dominant.color, Color::new(10, 10, 10));
        assert_eq!(dominant.count, 2);
        assert_eq!(analysis.eligible_pixels(), 3);
        assert_eq!(analysis.distinct_colors(), 2);
        assert_eq!(analysis.image_id(), ctx.image().id());
    }

    #[tokio::test]
    async fn exclusion_is_configurable() {
        let ctx = ImageContext::new(LoadedImage::new(
            "white",
            PixelBuffer::from_pixel(3, 3, Rgba::new(255, 255, 255, 255)),
        ));
        let analysis = DominantColorAnalyzer::new(NoExclusion).analyze(&ctx).await.unwrap();
        assert_eq!(analysis.dominant().unwrap().color, Color::new(255, 255, 255));
    }
}
