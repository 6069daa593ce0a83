use crate::common::pixel_buffer::Coordinate;

/// Where a buffer is drawn on screen, used to turn pointer positions into
/// buffer-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    pub origin: (f32, f32),
    pub displayed_size: (f32, f32),
    pub native_size: (u32, u32),
}

impl DisplayMapping {
    pub fn new(origin: (f32, f32), displayed_size: (f32, f32), native_size: (u32, u32)) -> Self {
        Self {
            origin,
            displayed_size,
            native_size,
        }
    }

    /// Size to draw an image of `native_size` inside a square canvas.
    /// Without `preserve_aspect` the image is stretched to fill the square.
    pub fn fit_to_canvas(native_size: (u32, u32), canvas: f32, preserve_aspect: bool) -> (f32, f32) {
        let (w, h) = native_size;
        if !preserve_aspect || w == 0 || h == 0 {
            return (canvas, canvas);
        }
        let scale = canvas / w.max(h) as f32;
        (w as f32 * scale, h as f32 * scale)
    }

    /// Maps a screen position to the pixel under it, or `None` when the
    /// position is not over the drawn image.
    pub fn to_buffer_space(&self, pos: (f32, f32)) -> Option<Coordinate> {
        let (native_w, native_h) = self.native_size;
        let (shown_w, shown_h) = self.displayed_size;
        if native_w == 0 || native_h == 0 || shown_w <= 0.0 || shown_h <= 0.0 {
            return None;
        }

        let local_x = pos.0 - self.origin.0;
        let local_y = pos.1 - self.origin.1;
        if !(0.0..shown_w).contains(&local_x) || !(0.0..shown_h).contains(&local_y) {
            return None;
        }

        let x = (local_x * native_w as f32 / shown_w).floor() as u32;
        let y = (local_y * native_h as f32 / shown_h).floor() as u32;

        // float error can land exactly on the far edge
        Some(Coordinate::new(x.min(native_w - 1), y.min(native_h - 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_mapping_at_native_size() {
        let mapping = DisplayMapping::new((10.0, 20.0), (100.0, 50.0), (100, 50));
        assert_eq!(mapping.to_buffer_space((10.0, 20.0)), Some(Coordinate::new(0, 0)));
        assert_eq!(mapping.to_buffer_space((45.5, 31.9)), Some(Coordinate::new(35, 11)));
    }

    #[test]
    fn scales_down_large_images() {
        // 2000x1000 image shown in a 500x250 rect
        let mapping = DisplayMapping::new((0.0, 0.0), (500.0, 250.0), (2000, 1000));
        assert_eq!(mapping.to_buffer_space((250.0, 125.0)), Some(Coordinate::new(1000, 500)));
        assert_eq!(mapping.to_buffer_space((499.99, 249.99)), Some(Coordinate::new(1999, 999)));
    }

    #[test]
    fn scales_up_small_images() {
        let mapping = DisplayMapping::new((0.0, 0.0), (500.0, 500.0), (2, 2));
        assert_eq!(mapping.to_buffer_space((249.0, 0.0)), Some(Coordinate::new(0, 0)));
        assert_eq!(mapping.to_buffer_space((250.0, 499.0)), Some(Coordinate::new(1, 1)));
    }

    #[test]
    fn outside_the_rect_is_none() {
        let mapping = DisplayMapping::new((10.0, 10.0), (100.0, 100.0), (10, 10));
        assert_eq!(mapping.to_buffer_space((9.9, 50.0)), None);
        assert_eq!(mapping.to_buffer_space((50.0, 110.0)), None);
        assert_eq!(mapping.to_buffer_space((110.0, 50.0)), None);
    }

    #[test]
    fn fits_preserving_aspect() {
        assert_eq!(DisplayMapping::fit_to_canvas((1000, 500), 500.0, true), (500.0, 250.0));
        assert_eq!(DisplayMapping::fit_to_canvas((100, 400), 500.0, true), (125.0, 500.0));
        assert_eq!(DisplayMapping::fit_to_canvas((1000, 500), 500.0, false), (500.0, 500.0));
    }
}
