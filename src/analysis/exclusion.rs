use crate::common::Color;

pub const DEFAULT_WHITISH_THRESHOLD: u8 = 200;

/// Predicate deciding which colors the dominant-color scan ignores.
pub trait ColorExclusion: Send + Sync {
    fn is_excluded(&self, color: Color) -> bool;
}

impl<F> ColorExclusion for F
where
    F: Fn(Color) -> bool + Send + Sync,
{
    fn is_excluded(&self, color: Color) -> bool {
        self(color)
    }
}

/// Excludes colors whose three channels are all strictly above `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Whitish {
    pub threshold: u8,
}

impl Whitish {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

impl Default for Whitish {
    fn default() -> Self {
        Self::new(DEFAULT_WHITISH_THRESHOLD)
    }
}

impl ColorExclusion for Whitish {
    fn is_excluded(&self, color: Color) -> bool {
        color.r > self.threshold && color.g > self.threshold && color.b > self.threshold
    }
}

/// Counts every opaque-enough color.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusion;

impl ColorExclusion for NoExclusion {
    fn is_excluded(&self, _color: Color) -> bool {
        false
    }
}
