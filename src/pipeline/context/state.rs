use crate::pipeline::domain::image_analysis::ImageAnalysis;

// Markers to track how far an image has travelled through the pipeline
pub struct DecodedState;
pub struct AnalyzedState {
    pub(super) analysis: ImageAnalysis,
}

pub trait ProcessingState: 'static {
    fn state_name() -> &'static str;
}

impl ProcessingState for DecodedState {
    fn state_name() -> &'static str {
        "Decoded"
    }
}

impl ProcessingState for AnalyzedState {
    fn state_name() -> &'static str {
        "Analyzed"
    }
}
