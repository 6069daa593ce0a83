//! Pixel analysis over RGBA buffers: point sampling, windowed averaging and
//! dominant-color extraction. Everything here is pure and never logs.

pub mod average;
pub mod dominant;
pub mod exclusion;
pub mod sampler;

pub use average::{EdgePolicy, average_color};
pub use dominant::{ColorHistogram, DominantColor, dominant_color};
pub use exclusion::{ColorExclusion, DEFAULT_WHITISH_THRESHOLD, NoExclusion, Whitish};
pub use sampler::sample_pixel;
