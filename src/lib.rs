pub mod analysis;
pub mod app;
pub mod common;
pub mod config;
pub mod error;
pub mod intake;
pub mod pipeline;

pub use analysis::{DominantColor, EdgePolicy, average_color, dominant_color, sample_pixel};
pub use common::{Color, Coordinate, PixelBuffer};
pub use error::{AnalysisError, AppError, LoadError};
