use egui::{Sense, TextureHandle, vec2};

use crate::app::views::View;
use crate::common::{Coordinate, DisplayMapping};

/// Draws the loaded image inside a fixed square canvas and reports which
/// buffer pixel the pointer is over or clicked on.
pub struct CanvasView<'a> {
    texture: &'a TextureHandle,
    native_size: (u32, u32),
    canvas_size: f32,
    preserve_aspect: bool,
    hovered: Option<Coordinate>,
    clicked: Option<Coordinate>,
}

impl<'a> CanvasView<'a> {
    pub fn new(texture: &'a TextureHandle, native_size: (u32, u32), canvas_size: f32) -> Self {
        Self {
            texture,
            native_size,
            canvas_size,
            preserve_aspect: true,
            hovered: None,
            clicked: None,
        }
    }

    pub fn preserve_aspect(mut self, preserve_aspect: bool) -> Self {
        self.preserve_aspect = preserve_aspect;
        self
    }

    pub fn hovered(&self) -> Option<Coordinate> {
        self.hovered
    }

    pub fn clicked(&self) -> Option<Coordinate> {
        self.clicked
    }
}

impl View for CanvasView<'_> {
    fn draw(&mut self, ui: &mut egui::Ui) {
        let (w, h) =
            DisplayMapping::fit_to_canvas(self.native_size, self.canvas_size, self.preserve_aspect);
        let response = ui.add(
            egui::Image::new(self.texture)
                .fit_to_exact_size(vec2(w, h))
                .sense(Sense::click()),
        );

        let rect = response.rect;
        let mapping = DisplayMapping::new(
            (rect.min.x, rect.min.y),
            (rect.width(), rect.height()),
            self.native_size,
        );

        self.hovered = response
            .hover_pos()
            .and_then(|pos| mapping.to_buffer_space((pos.x, pos.y)));

        self.clicked = if response.clicked() {
            response
                .interact_pointer_pos()
                .and_then(|pos| mapping.to_buffer_space((pos.x, pos.y)))
        } else {
            None
        };
    }
}
