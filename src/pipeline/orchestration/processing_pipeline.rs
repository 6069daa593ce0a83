use async_trait::async_trait;
use std::time::Duration;
use tower::timeout::TimeoutLayer;
use tower::util::BoxService;
use tower::{BoxError, Service, ServiceBuilder, ServiceExt};
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::pipeline::context::{AnalyzedState, DecodedState, ImageContext};
use crate::pipeline::domain::ImageAnalysis;
use crate::pipeline::orchestration::service::analyzer_service::AnalyzerService;

/// The analyze stage: turns a decoded image into its whole-image analysis.
#[async_trait]
pub trait AnalyzerStep: Send + Sync {
    async fn analyze(&self, ctx: &ImageContext<DecodedState>) -> Result<ImageAnalysis, AppError>;
    fn name(&self) -> &'static str;
}

type AnalyzerBoxService =
    BoxService<ImageContext<DecodedState>, ImageContext<AnalyzedState>, BoxError>;

pub struct ProcessingPipeline {
    analyzer_name: &'static str,
    analyzer_step: AnalyzerBoxService,
}

impl ProcessingPipeline {
    pub fn builder() -> ProcessingPipelineBuilder {
        ProcessingPipelineBuilder::default()
    }

    pub fn analyzer_name(&self) -> &'static str {
        self.analyzer_name
    }

    #[instrument(skip_all, fields(analyzer = self.analyzer_name, image = %context.image().id()))]
    pub async fn process(
        &mut self,
        context: ImageContext<DecodedState>,
    ) -> Result<ImageContext<AnalyzedState>, AppError> {
        let analyzed = self
            .analyzer_step
            .ready()
            .await
            .map_err(AppError::from_boxed)?
            .call(context)
            .await
            .map_err(AppError::from_boxed)?;

        debug!(
            "Analysis finished in {:?}",
            analyzed.metrics().analysis_duration()
        );
        Ok(analyzed)
    }
}

#[derive(Default)]
pub struct ProcessingPipelineBuilder {
    analyzer: Option<Box<dyn AnalyzerStep>>,
    analyzer_timeout: Option<Duration>,
}

impl ProcessingPipelineBuilder {
    pub fn analyzer(mut self, analyzer: Box<dyn AnalyzerStep>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// `None` lets the analyzer run as long as it needs.
    pub fn analyzer_timeout(mut self, analyzer_timeout: Option<Duration>) -> Self {
        self.analyzer_timeout = analyzer_timeout;
        self
    }

    pub fn build(self) -> Result<ProcessingPipeline, AppError> {
        let analyzer = self
            .analyzer
            .ok_or(AppError::Pipeline("Analyzer not set".to_string()))?;
        let analyzer_name = analyzer.name();

        let analyzer_service = ServiceBuilder::new()
            .option_layer(self.analyzer_timeout.map(TimeoutLayer::new))
            .service(AnalyzerService::new(analyzer));

        Ok(ProcessingPipeline {
            analyzer_name,
            analyzer_step: BoxService::new(analyzer_service),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{LoadedImage, PixelBuffer, Rgba};

    struct SlowAnalyzer;

    #[async_trait]
    impl AnalyzerStep for SlowAnalyzer {
        async fn analyze(
            &self,
            ctx: &ImageContext<DecodedState>,
        ) -> Result<ImageAnalysis, AppError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(ImageAnalysis::empty(ctx.image().id()))
        }

        fn name(&self) -> &'static str {
            "SlowAnalyzer"
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl AnalyzerStep for FailingAnalyzer {
        async fn analyze(
            &self,
            _ctx: &ImageContext<DecodedState>,
        ) -> Result<ImageAnalysis, AppError> {
            Err(AppError::Pipeline("no luck".to_string()))
        }

        fn name(&self) -> &'static str {
            "FailingAnalyzer"
        }
    }

    fn context() -> ImageContext<DecodedState> {
        ImageContext::new(LoadedImage::new(
            "test",
            PixelBuffer::from_pixel(4, 4, Rgba::new(9, 9, 9, 255)),
        ))
    }

    #[test]
    fn build_requires_an_analyzer() {
        assert!(matches!(
            ProcessingPipeline::builder().build(),
            Err(AppError::Pipeline(_))
        ));
    }

    #[tokio::test]
    async fn runs_without_timeout() {
        let mut pipeline = ProcessingPipeline::builder()
            .analyzer(Box::new(SlowAnalyzer))
            .build()
            .unwrap();
        let ctx = context();
        let id = ctx.image().id();
        let analyzed = pipeline.process(ctx).await.unwrap();
        assert_eq!(analyzed.analysis().image_id(), id);
        assert_eq!(pipeline.analyzer_name(), "SlowAnalyzer");
    }

    #[tokio::test]
    async fn timeout_surfaces_as_pipeline_error() {
        let mut pipeline = ProcessingPipeline::builder()
            .analyzer(Box::new(SlowAnalyzer))
            .analyzer_timeout(Some(Duration::from_millis(5)))
            .build()
            .unwrap();
        let err = pipeline.process(context()).await.unwrap_err();
        assert!(matches!(err, AppError::Pipeline(msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn analyzer_errors_keep_their_type() {
        let mut pipeline = ProcessingPipeline::builder()
            .analyzer(Box::new(FailingAnalyzer))
            .analyzer_timeout(Some(Duration::from_secs(5)))
            .build()
            .unwrap();
        let err = pipeline.process(context()).await.unwrap_err();
        assert!(matches!(err, AppError::Pipeline(msg) if msg == "no luck"));
    }
}
