pub mod context;
pub mod domain;
pub mod image_pipeline;
pub mod orchestration;
pub mod pipeline_factory;

pub use context::{AnalyzedState, DecodedState, ImageContext};
pub use domain::ImageAnalysis;
pub use image_pipeline::ImagePipeline;
pub use pipeline_factory::PipelineFactory;
