use std::path::PathBuf;

use color_picker::app::PickerApp;
use color_picker::config::Settings;
use color_picker::error::AppError;
use tracing::{Level, info};

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = Settings::load()?;
    init_logging(settings.logging.max_level()?);

    let initial_image = std::env::args().nth(1).map(PathBuf::from);
    info!("Starting color picker");
    PickerApp::start_gui(settings, initial_image)
}
