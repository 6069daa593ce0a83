use egui::{ColorImage, TextureHandle, TextureOptions};
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError as MpscTryRecvError;
use tracing::{debug, error, info, warn};

use crate::analysis::{average_color, sample_pixel};
use crate::app::state::{DominantStatus, ImageSummary, PickedColor, PickerAction, PickerState};
use crate::app::views::View;
use crate::app::views::canvas_view::CanvasView;
use crate::app::views::swatch_view::SwatchView;
use crate::common::{Coordinate, LoadedImage};
use crate::config::Settings;
use crate::error::AppError;
use crate::intake::ImageInput;
use crate::pipeline::{ImageAnalysis, PipelineFactory};

const TITLE: &str = "Color Picker";
const MAX_LOGGED_ERRORS: usize = 100;

/// Progress of one background load. `generation` identifies the `load` call
/// that produced it; only the latest generation is applied.
pub enum UiUpdate {
    Decoded {
        generation: u64,
        image: LoadedImage,
    },
    Analyzed {
        generation: u64,
        analysis: ImageAnalysis,
    },
    Failed {
        generation: u64,
        error: AppError,
    },
}

impl UiUpdate {
    pub fn generation(&self) -> u64 {
        match self {
            UiUpdate::Decoded { generation, .. }
            | UiUpdate::Analyzed { generation, .. }
            | UiUpdate::Failed { generation, .. } => *generation,
        }
    }
}

pub struct PickerApp {
    settings: Settings,
    runtime: Handle,
    egui_ctx: egui::Context,
    state: PickerState,
    image: Option<LoadedImage>,
    texture: Option<TextureHandle>,
    path_input: String,
    ui_update_tx: mpsc::Sender<UiUpdate>,
    ui_update_rx: mpsc::Receiver<UiUpdate>,
    load_generation: u64,
    errors: VecDeque<AppError>,
}

impl PickerApp {
    pub fn new(settings: Settings, runtime: Handle, egui_ctx: egui::Context) -> Self {
        let (ui_update_tx, ui_update_rx) = mpsc::channel::<UiUpdate>(16);
        Self {
            settings,
            runtime,
            egui_ctx,
            state: PickerState::default(),
            image: None,
            texture: None,
            path_input: String::new(),
            ui_update_tx,
            ui_update_rx,
            load_generation: 0,
            errors: VecDeque::new(),
        }
    }

    /// Must be called from inside the tokio runtime; the window blocks the
    /// calling thread until it is closed.
    pub fn start_gui(settings: Settings, initial_image: Option<PathBuf>) -> Result<(), AppError> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(
                    settings.ui.window_width,
                    settings.ui.window_height,
                ))
                .with_title(TITLE)
                .with_drag_and_drop(true),
            ..Default::default()
        };

        let runtime = Handle::current();

        eframe::run_native(
            TITLE,
            options,
            Box::new(move |cc| {
                let mut app = PickerApp::new(settings, runtime, cc.egui_ctx.clone());
                if let Some(path) = initial_image {
                    app.path_input = path.display().to_string();
                    app.load(ImageInput::Path(path));
                }
                Ok(Box::new(app))
            }),
        )
        .map_err(|e| AppError::Ui(e.to_string()))
    }

    fn dispatch(&mut self, action: PickerAction) {
        self.state = self.state.apply(action);
    }

    fn report(&mut self, err: AppError) {
        error!("{}", err);
        self.dispatch(PickerAction::Failed(err.to_string()));
        self.log_error(err);
    }

    fn report_load_failure(&mut self, err: AppError) {
        error!("{}", err);
        self.dispatch(PickerAction::LoadFailed(err.to_string()));
        self.log_error(err);
    }

    fn log_error(&mut self, err: AppError) {
        if self.errors.len() == MAX_LOGGED_ERRORS {
            self.errors.pop_front();
        }
        self.errors.push_back(err);
    }

    /// Kicks off decode then analyze on the runtime. Results come back
    /// through `ui_update_rx`.
    fn load(&mut self, input: ImageInput) {
        let mut pipeline = match self.settings.analysis.build() {
            Ok(pipeline) => pipeline,
            Err(e) => {
                self.report_load_failure(e);
                return;
            }
        };

        self.load_generation += 1;
        let generation = self.load_generation;
        info!("Loading image {} (load #{})", input.name(), generation);
        let tx = self.ui_update_tx.clone();
        let ctx = self.egui_ctx.clone();

        self.runtime.spawn(async move {
            let decoded = match pipeline.decode(input).await {
                Ok(decoded) => decoded,
                Err(error) => {
                    publish(&tx, &ctx, UiUpdate::Failed { generation, error }).await;
                    return;
                }
            };
            let image = decoded.image().clone();
            publish(&tx, &ctx, UiUpdate::Decoded { generation, image }).await;

            let update = match pipeline.analyze(decoded).await {
                Ok(analyzed) => UiUpdate::Analyzed {
                    generation,
                    analysis: analyzed.analysis().clone(),
                },
                Err(error) => UiUpdate::Failed { generation, error },
            };
            publish(&tx, &ctx, update).await;
        });
    }

    fn clear(&mut self) {
        // results still in flight belong to the cleared image
        self.load_generation += 1;
        self.image = None;
        self.texture = None;
        self.dispatch(PickerAction::Cleared);
    }

    fn handle_update(&mut self, ctx: &egui::Context, update: UiUpdate) {
        if update.generation() != self.load_generation {
            debug!(
                "Dropping result of load #{}, latest is #{}",
                update.generation(),
                self.load_generation
            );
            return;
        }

        match update {
            UiUpdate::Decoded { image, .. } => {
                let buffer = image.buffer();
                let color_image = ColorImage::from_rgba_unmultiplied(
                    [buffer.width() as usize, buffer.height() as usize],
                    buffer.as_bytes(),
                );
                self.texture =
                    Some(ctx.load_texture("picker_image", color_image, TextureOptions::NEAREST));
                self.dispatch(PickerAction::ImageLoaded(ImageSummary::from(&image)));
                self.image = Some(image);
            }
            UiUpdate::Analyzed { analysis, .. } => {
                if let Some(image) = &self.image {
                    let ready_after = analysis.analyzed_at() - image.loaded_at();
                    debug!(
                        "Dominant color for {} ready {}ms after decode",
                        image.source(),
                        ready_after.num_milliseconds()
                    );
                }
                self.dispatch(PickerAction::DominantComputed {
                    image_id: analysis.image_id(),
                    dominant: analysis.dominant(),
                });
            }
            UiUpdate::Failed { error, .. } => self.report_load_failure(error),
        }
    }

    fn on_hover(&mut self, at: Coordinate) {
        if self.state.pixel_color.map(|picked| picked.at) == Some(at) {
            return;
        }
        let Some(image) = &self.image else {
            return;
        };
        let buffer = image.buffer();
        let sampled = sample_pixel(buffer, at.x, at.y)
            .and_then(|color| Ok((color, buffer.rgba_at(at.x, at.y)?.is_transparent())));
        match sampled {
            Ok((color, transparent)) => self.dispatch(PickerAction::PixelSampled(PickedColor {
                at,
                color,
                transparent,
            })),
            Err(e) => self.report(e.into()),
        }
    }

    fn on_click(&mut self, at: Coordinate) {
        let Some(image) = &self.image else {
            return;
        };
        let analysis = &self.settings.analysis;
        match average_color(
            image.buffer(),
            at.x,
            at.y,
            analysis.average_inset,
            analysis.edge_policy,
        ) {
            Ok(color) => {
                debug!("Average around ({}, {}): {}", at.x, at.y, color);
                self.dispatch(PickerAction::AverageComputed(PickedColor {
                    at,
                    color,
                    transparent: false,
                }));
            }
            Err(e) => self.report(e.into()),
        }
    }

    fn take_dropped_file(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if let Some(path) = file.path {
            self.path_input = path.display().to_string();
            self.load(ImageInput::Path(path));
        } else if let Some(bytes) = file.bytes {
            self.load(ImageInput::Bytes {
                name: file.name,
                bytes,
            });
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.heading(TITLE);
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Image path:");
            let edit = ui.text_edit_singleline(&mut self.path_input);
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (ui.button("Load").clicked() || submitted) && !self.path_input.trim().is_empty() {
                let path = PathBuf::from(self.path_input.trim());
                self.load(ImageInput::Path(path));
            }
            if ui.button("Clear").clicked() {
                self.clear();
            }
            if ui.button("Copy state as JSON").clicked() {
                match self.state.to_json() {
                    Ok(json) => ui.ctx().copy_text(json),
                    Err(e) => warn!("Could not serialize picker state: {}", e),
                }
            }
            ui.label("or drop an image onto the window");
        });
    }

    fn draw_swatches(&self, ui: &mut egui::Ui) {
        let pixel = self.state.pixel_color;
        let mut pixel_view = SwatchView::new("Pixel Color", pixel.map(|p| p.color));
        if let Some(p) = pixel {
            pixel_view = pixel_view.with_note(if p.transparent {
                format!("at ({}, {}), transparent", p.at.x, p.at.y)
            } else {
                format!("at ({}, {})", p.at.x, p.at.y)
            });
        }
        pixel_view.draw(ui);

        let average = self.state.average_color;
        let mut average_view = SwatchView::new(
            format!("Average Color ({}px inset)", self.settings.analysis.average_inset),
            average.map(|a| a.color),
        );
        if let Some(a) = average {
            average_view = average_view.with_note(format!("around ({}, {})", a.at.x, a.at.y));
        }
        average_view.draw(ui);

        let (dominant, note) = match self.state.dominant {
            DominantStatus::NotComputed => (None, None),
            DominantStatus::Pending => (None, Some("computing...".to_string())),
            DominantStatus::Found(found) => (Some(found.color), Some(format!("{} pixels", found.count))),
            DominantStatus::Empty => (None, Some("no non-white opaque pixels".to_string())),
        };
        let mut dominant_view = SwatchView::new("Dominant Color (excluding white)", dominant);
        if let Some(note) = note {
            dominant_view = dominant_view.with_note(note);
        }
        dominant_view.draw(ui);
    }
}

async fn publish(tx: &mpsc::Sender<UiUpdate>, ctx: &egui::Context, update: UiUpdate) {
    if tx.send(update).await.is_err() {
        warn!("UI update receiver dropped, discarding pipeline result");
        return;
    }
    ctx.request_repaint();
}

impl eframe::App for PickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        loop {
            match self.ui_update_rx.try_recv() {
                Ok(update) => self.handle_update(ctx, update),
                Err(MpscTryRecvError::Empty) => break,
                Err(MpscTryRecvError::Disconnected) => {
                    error!("UI update receiver disconnected");
                    break;
                }
            }
        }

        self.take_dropped_file(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("error_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Error Log");
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for error in self.errors.iter().rev() {
                        ui.label(format!("[ERROR] {}", error));
                    }
                });
            });

        egui::SidePanel::right("swatches")
            .resizable(false)
            .show(ctx, |ui| {
                self.draw_swatches(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (Some(texture), Some(summary)) = (self.texture.clone(), self.state.image.clone())
            else {
                ui.heading("Add image:");
                return;
            };

            ui.heading("Your Image:");
            ui.label(format!("{} ({}x{})", summary.source, summary.width, summary.height));

            let mut canvas = CanvasView::new(
                &texture,
                (summary.width, summary.height),
                self.settings.ui.canvas_size,
            )
            .preserve_aspect(self.settings.ui.preserve_aspect);
            canvas.draw(ui);

            if let Some(at) = canvas.hovered() {
                self.on_hover(at);
            }
            if let Some(at) = canvas.clicked() {
                self.on_click(at);
            }
        });
    }
}
