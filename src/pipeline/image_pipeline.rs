use std::time::Instant;
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::intake::{ImageInput, ImageLoader};
use crate::pipeline::context::{AnalyzedState, DecodedState, ImageContext};
use crate::pipeline::orchestration::ProcessingPipeline;

/// Decode stage followed by analyze stage. Either stage can be driven on its
/// own, which is what the UI does so it can show the image before the
/// dominant color is known.
pub struct ImagePipeline {
    loader: ImageLoader,
    processing: ProcessingPipeline,
}

impl ImagePipeline {
    pub fn new(loader: ImageLoader, processing: ProcessingPipeline) -> Self {
        Self { loader, processing }
    }

    #[instrument(skip_all, fields(input = %input.name()))]
    pub async fn decode(
        &mut self,
        input: ImageInput,
    ) -> Result<ImageContext<DecodedState>, AppError> {
        let start = Instant::now();
        let image = self.loader.load(input).await?;
        let duration = start.elapsed();
        debug!("Decode stage took {}us", duration.as_micros());
        Ok(ImageContext::new(image).with_decode_duration(duration))
    }

    pub async fn analyze(
        &mut self,
        context: ImageContext<DecodedState>,
    ) -> Result<ImageContext<AnalyzedState>, AppError> {
        self.processing.process(context).await
    }

    pub async fn run(&mut self, input: ImageInput) -> Result<ImageContext<AnalyzedState>, AppError> {
        let decoded = self.decode(input).await?;
        self.analyze(decoded).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Color;
    use crate::config::AnalysisSettings;
    use crate::pipeline::pipeline_factory::PipelineFactory;
    use image::{ImageBuffer, ImageFormat, Rgba as ImageRgba};
    use std::io::Cursor;
    use std::sync::Arc;

    fn png_input(img: ImageBuffer<ImageRgba<u8>, Vec<u8>>) -> ImageInput {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        ImageInput::Bytes {
            name: "generated.png".to_string(),
            bytes: Arc::from(out.into_inner()),
        }
    }

    #[tokio::test]
    async fn decode_then_analyze() {
        // mostly white with a 3x3 teal patch and a transparent row
        let mut img = ImageBuffer::from_pixel(10, 10, ImageRgba([255u8, 255, 255, 255]));
        for y in 2..5 {
            for x in 2..5 {
                img.put_pixel(x, y, ImageRgba([0, 128, 128, 255]));
            }
        }
        for x in 0..10 {
            img.put_pixel(x, 9, ImageRgba([1, 1, 1, 0]));
        }

        let mut pipeline = AnalysisSettings::default().build().unwrap();
        let analyzed = pipeline.run(png_input(img)).await.unwrap();

        let dominant = analyzed.analysis().dominant().unwrap();
        assert_eq!(dominant.color, Color::new(0, 128, 128));
        assert_eq!(dominant.count, 9);
        assert_eq!(analyzed.image().source(), "generated.png");
        assert!(analyzed.metrics().decode_duration().is_some());
    }

    #[tokio::test]
    async fn stages_run_independently() {
        let img = ImageBuffer::from_pixel(4, 4, ImageRgba([250u8, 250, 250, 255]));
        let mut pipeline = AnalysisSettings::default().build().unwrap();

        let decoded = pipeline.decode(png_input(img)).await.unwrap();
        assert_eq!(decoded.buffer().dimensions(), (4, 4));

        let analyzed = pipeline.analyze(decoded).await.unwrap();
        assert!(analyzed.analysis().dominant().is_none());
    }

    #[tokio::test]
    async fn undecodable_input_fails_in_decode_stage() {
        let mut pipeline = AnalysisSettings::default().build().unwrap();
        let err = pipeline
            .decode(ImageInput::Bytes {
                name: "bad".to_string(),
                bytes: Arc::from(vec![0u8, 1, 2, 3]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Load(_)));
    }
}
