use crate::config::AnalysisSettings;
use crate::error::AppError;
use crate::intake::ImageLoader;
use crate::pipeline::image_pipeline::ImagePipeline;
use crate::pipeline::orchestration::{DominantColorAnalyzer, ProcessingPipeline};

pub trait PipelineFactory {
    fn build(&self) -> Result<ImagePipeline, AppError>;
}

impl PipelineFactory for AnalysisSettings {
    fn build(&self) -> Result<ImagePipeline, AppError> {
        let processing = ProcessingPipeline::builder()
            .analyzer(Box::new(DominantColorAnalyzer::new(self.exclusion())))
            .analyzer_timeout(self.analysis_timeout())
            .build()?;
        Ok(ImagePipeline::new(ImageLoader::new(), processing))
    }
}
