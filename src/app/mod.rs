pub mod picker_app;
pub mod state;
pub mod views;

pub use picker_app::{PickerApp, UiUpdate};
pub use state::{DominantStatus, PickedColor, PickerAction, PickerState};
