use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::common::pixel_buffer::PixelBuffer;

/// A decoded image handed out by the intake layer.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    id: Uuid,
    source: String,
    buffer: PixelBuffer,
    loaded_at: DateTime<Utc>,
}

impl LoadedImage {
    pub fn new(source: impl Into<String>, buffer: PixelBuffer) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            buffer,
            loaded_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
