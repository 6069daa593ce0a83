pub mod processing_pipeline;
pub mod service;
pub mod step;

pub use processing_pipeline::{AnalyzerStep, ProcessingPipeline, ProcessingPipelineBuilder};
pub use service::analyzer_service::AnalyzerService;
pub use step::dominant_color_analyzer::DominantColorAnalyzer;
