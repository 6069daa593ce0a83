use serde::Serialize;
use uuid::Uuid;

use crate::analysis::DominantColor;
use crate::common::{Color, Coordinate, LoadedImage};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummary {
    pub id: Uuid,
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl From<&LoadedImage> for ImageSummary {
    fn from(image: &LoadedImage) -> Self {
        Self {
            id: image.id(),
            source: image.source().to_string(),
            width: image.buffer().width(),
            height: image.buffer().height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PickedColor {
    pub at: Coordinate,
    pub color: Color,
    pub transparent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DominantStatus {
    NotComputed,
    Pending,
    Found(DominantColor),
    /// Every pixel was transparent or excluded.
    Empty,
}

/// Discrete things the user or the pipeline did.
#[derive(Debug, Clone)]
pub enum PickerAction {
    ImageLoaded(ImageSummary),
    PixelSampled(PickedColor),
    AverageComputed(PickedColor),
    DominantComputed {
        image_id: Uuid,
        dominant: Option<DominantColor>,
    },
    /// The background load or analysis of the current image failed.
    LoadFailed(String),
    /// A pointer interaction failed; background work is unaffected.
    Failed(String),
    Cleared,
}

/// Everything the picker shows, as one immutable record. Each action yields
/// a new record; nothing is mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickerState {
    pub image: Option<ImageSummary>,
    pub pixel_color: Option<PickedColor>,
    pub average_color: Option<PickedColor>,
    pub dominant: DominantStatus,
    pub last_error: Option<String>,
}

impl Default for PickerState {
    fn default() -> Self {
        Self {
            image: None,
            pixel_color: None,
            average_color: None,
            dominant: DominantStatus::NotComputed,
            last_error: None,
        }
    }
}

impl PickerState {
    pub fn apply(&self, action: PickerAction) -> PickerState {
        match action {
            PickerAction::ImageLoaded(summary) => PickerState {
                image: Some(summary),
                dominant: DominantStatus::Pending,
                ..PickerState::default()
            },
            PickerAction::PixelSampled(picked) => PickerState {
                pixel_color: Some(picked),
                ..self.clone()
            },
            PickerAction::AverageComputed(picked) => PickerState {
                average_color: Some(picked),
                ..self.clone()
            },
            PickerAction::DominantComputed { image_id, dominant } => {
                if self.current_image_id() != Some(image_id) {
                    // result for an image that has since been replaced
                    return self.clone();
                }
                PickerState {
                    dominant: match dominant {
                        Some(found) => DominantStatus::Found(found),
                        None => DominantStatus::Empty,
                    },
                    ..self.clone()
                }
            }
            PickerAction::LoadFailed(message) => PickerState {
                last_error: Some(message),
                dominant: match self.dominant {
                    DominantStatus::Pending => DominantStatus::NotComputed,
                    other => other,
                },
                ..self.clone()
            },
            PickerAction::Failed(message) => PickerState {
                last_error: Some(message),
                ..self.clone()
            },
            PickerAction::Cleared => PickerState::default(),
        }
    }

    pub fn current_image_id(&self) -> Option<Uuid> {
        self.image.as_ref().map(|image| image.id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
