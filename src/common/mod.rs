pub mod color;
pub mod display_mapping;
pub mod loaded_image;
pub mod pixel_buffer;

pub use color::{Color, Rgba};
pub use display_mapping::DisplayMapping;
pub use loaded_image::LoadedImage;
pub use pixel_buffer::{Coordinate, PixelBuffer};
