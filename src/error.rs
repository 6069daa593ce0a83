use std::path::PathBuf;

use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Load Error: {0}")]
    Load(#[from] LoadError),
    #[error("Analysis Error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("Pipeline Error: {0}")]
    Pipeline(String),
    #[error("UI Error: {0}")]
    Ui(String),
}

impl AppError {
    /// Converts a boxed error coming out of a tower stack, keeping our own
    /// error if that is what was boxed.
    pub fn from_boxed(error: tower::BoxError) -> Self {
        match error.downcast::<AppError>() {
            Ok(app_error) => *app_error,
            Err(other) if other.is::<tower::timeout::error::Elapsed>() => {
                AppError::Pipeline("analysis timed out".to_string())
            }
            Err(other) => AppError::Pipeline(other.to_string()),
        }
    }
}

// Pixel analysis error type. Empty dominant-color scans are not errors, they
// come back as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} pixel grid")]
    OutOfRange {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },
    #[error("Pixel buffer holds {actual} bytes, expected {}", describe_expected(.expected))]
    InvalidBuffer {
        expected: Option<usize>,
        actual: usize,
    },
}

fn describe_expected(expected: &Option<usize>) -> String {
    match expected {
        Some(len) => len.to_string(),
        None => "more than usize::MAX".to_string(),
    }
}

// Image intake error type
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Decoded image is not a valid pixel buffer: {0}")]
    Buffer(#[from] AnalysisError),
    #[error("Decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_app_error_round_trips() {
        let boxed: tower::BoxError = Box::new(AppError::Ui("gone".to_string()));
        assert!(matches!(AppError::from_boxed(boxed), AppError::Ui(msg) if msg == "gone"));
    }

    #[test]
    fn boxed_foreign_error_becomes_pipeline_error() {
        let boxed: tower::BoxError = "boom".into();
        assert!(matches!(AppError::from_boxed(boxed), AppError::Pipeline(msg) if msg == "boom"));
    }

    #[test]
    fn invalid_buffer_overflow_message() {
        let err = AnalysisError::InvalidBuffer {
            expected: None,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Pixel buffer holds 3 bytes, expected more than usize::MAX"
        );
    }
}
