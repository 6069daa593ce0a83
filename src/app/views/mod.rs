pub mod canvas_view;
pub mod swatch_view;

pub trait View {
    fn draw(&mut self, ui: &mut egui::Ui);
}
