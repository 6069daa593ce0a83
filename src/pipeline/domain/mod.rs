pub mod image_analysis;

pub use image_analysis::ImageAnalysis;
