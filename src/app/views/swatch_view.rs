use egui::{Color32, Sense, vec2};

use crate::app::views::View;
use crate::common::Color;

const SWATCH_SIZE: f32 = 64.0;

/// A titled color box with its `rgb(...)` and hex text.
pub struct SwatchView {
    title: String,
    color: Option<Color>,
    note: Option<String>,
}

impl SwatchView {
    pub fn new(title: impl Into<String>, color: Option<Color>) -> Self {
        Self {
            title: title.into(),
            color,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl View for SwatchView {
    fn draw(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.heading(&self.title);

            let (rect, _) = ui.allocate_exact_size(vec2(SWATCH_SIZE, SWATCH_SIZE), Sense::hover());
            match self.color {
                Some(color) => {
                    ui.painter()
                        .rect_filled(rect, 4.0, Color32::from_rgb(color.r, color.g, color.b));
                    ui.label(color.to_string());
                    ui.horizontal(|ui| {
                        ui.monospace(color.to_hex());
                        if ui.small_button("Copy").clicked() {
                            ui.ctx().copy_text(color.to_hex());
                        }
                    });
                }
                None => {
                    ui.painter()
                        .rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);
                    ui.label("-");
                }
            }

            if let Some(note) = &self.note {
                ui.small(note);
            }
        });
    }
}
