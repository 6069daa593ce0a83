use serde::{Deserialize, Serialize};
use std::fmt;

/// Exact 8-bit RGB triple. Equality is component-wise, which makes it usable
/// as a histogram key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(px: image::Rgb<u8>) -> Self {
        Self::new(px[0], px[1], px[2])
    }
}

// CSS functional notation.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// A color read straight out of a buffer, with its alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub color: Color,
    pub alpha: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, alpha: u8) -> Self {
        Self {
            color: Color::new(r, g, b),
            alpha,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha == 0
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.color.r, self.color.g, self.color.b, self.alpha]
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_like_css_rgb() {
        assert_eq!(Color::new(10, 200, 3).to_string(), "rgb(10, 200, 3)");
    }

    #[test]
    fn hex_is_zero_padded() {
        assert_eq!(Color::new(0, 15, 255).to_hex(), "#000fff");
    }

    #[test]
    fn serializes_channels_by_name() {
        let json = serde_json::to_value(Color::new(1, 2, 3)).unwrap();
        assert_eq!(json, serde_json::json!({ "r": 1, "g": 2, "b": 3 }));
    }
}
