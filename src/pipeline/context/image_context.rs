use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::common::{LoadedImage, PixelBuffer};
use crate::pipeline::context::metrics::ImageMetrics;
use crate::pipeline::context::state::{AnalyzedState, DecodedState, ProcessingState};
use crate::pipeline::domain::image_analysis::ImageAnalysis;

// ImageContext with compile-time stage tracking via the state parameter
pub struct ImageContext<S> {
    image: Arc<LoadedImage>,
    metrics: ImageMetrics,
    processing_start: Instant,
    state: S,
}

impl<S: ProcessingState> ImageContext<S> {
    pub fn image(&self) -> &LoadedImage {
        &self.image
    }

    pub fn shared_image(&self) -> Arc<LoadedImage> {
        self.image.clone()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        self.image.buffer()
    }

    pub fn metrics(&self) -> &ImageMetrics {
        &self.metrics
    }

    pub fn elapsed(&self) -> Duration {
        self.processing_start.elapsed()
    }

    pub fn stage(&self) -> &'static str {
        S::state_name()
    }
}

impl ImageContext<DecodedState> {
    pub fn new(image: LoadedImage) -> Self {
        Self {
            image: Arc::new(image),
            metrics: ImageMetrics::new(),
            processing_start: Instant::now(),
            state: DecodedState,
        }
    }

    pub fn with_decode_duration(mut self, duration: Duration) -> Self {
        self.metrics.record_decode_duration(duration);
        self
    }

    pub fn into_analyzed(mut self, analysis: ImageAnalysis) -> ImageContext<AnalyzedState> {
        self.metrics.record_analysis_duration(self.elapsed());
        ImageContext::<AnalyzedState> {
            image: self.image,
            metrics: self.metrics,
            processing_start: self.processing_start,
            state: AnalyzedState { analysis },
        }
    }
}

impl ImageContext<AnalyzedState> {
    pub fn analysis(&self) -> &ImageAnalysis {
        &self.state.analysis
    }
}

impl<S: ProcessingState> std::fmt::Debug for ImageContext<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageContext")
            .field("stage", &S::state_name())
            .field("image", &self.image.id())
            .field("source", &self.image.source())
            .field("metrics", &self.metrics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Rgba;

    #[test]
    fn moves_from_decoded_to_analyzed() {
        let image = LoadedImage::new("a", PixelBuffer::from_pixel(2, 2, Rgba::new(1, 2, 3, 255)));
        let id = image.id();
        let decoded = ImageContext::new(image).with_decode_duration(Duration::from_millis(3));
        assert_eq!(decoded.stage(), "Decoded");

        let analyzed = decoded.into_analyzed(ImageAnalysis::empty(id));
        assert_eq!(analyzed.stage(), "Analyzed");
        assert_eq!(analyzed.image().id(), id);
        assert_eq!(analyzed.metrics().decode_duration(), Some(Duration::from_millis(3)));
        assert!(analyzed.metrics().analysis_duration().is_some());
    }

    #[test]
    fn debug_names_stage_and_source() {
        let ctx = ImageContext::new(LoadedImage::new(
            "cat.png",
            PixelBuffer::from_pixel(1, 1, Rgba::new(0, 0, 0, 255)),
        ));
        let printed = format!("{:?}", ctx);
        assert!(printed.contains("Decoded"));
        assert!(printed.contains("cat.png"));

        let result: Result<ImageContext<DecodedState>, crate::error::AppError> =
            Err(crate::error::AppError::Pipeline("boom".to_string()));
        assert!(matches!(result.unwrap_err(), crate::error::AppError::Pipeline(_)));
    }
}
