use std::time::Duration;

/// Timings collected while an image moves through the pipeline
#[derive(Debug, Clone, Default)]
pub struct ImageMetrics {
    decode_duration: Option<Duration>,
    analysis_duration: Option<Duration>,
}

impl ImageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_decode_duration(&mut self, duration: Duration) {
        self.decode_duration = Some(duration);
    }

    pub fn record_analysis_duration(&mut self, duration: Duration) {
        self.analysis_duration = Some(duration);
    }

    pub fn decode_duration(&self) -> Option<Duration> {
        self.decode_duration
    }

    pub fn analysis_duration(&self) -> Option<Duration> {
        self.analysis_duration
    }
}
