use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::common::{LoadedImage, PixelBuffer};
use crate::error::LoadError;

/// Something the user handed us that should decode to an image.
#[derive(Debug, Clone)]
pub enum ImageInput {
    Path(PathBuf),
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl ImageInput {
    pub fn name(&self) -> String {
        match self {
            ImageInput::Path(path) => path.display().to_string(),
            ImageInput::Bytes { name, .. } => name.clone(),
        }
    }
}

/// Decodes user images into RGBA pixel buffers. Decoding runs on the
/// blocking pool.
#[derive(Debug, Clone, Default)]
pub struct ImageLoader;

impl ImageLoader {
    pub fn new() -> Self {
        Self
    }

    pub async fn load(&self, input: ImageInput) -> Result<LoadedImage, LoadError> {
        match input {
            ImageInput::Path(path) => self.load_path(path).await,
            ImageInput::Bytes { name, bytes } => self.load_bytes(name, bytes).await,
        }
    }

    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadedImage, LoadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read {} bytes", bytes.len());
        self.load_bytes(path.display().to_string(), bytes).await
    }

    pub async fn load_bytes(
        &self,
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<LoadedImage, LoadError> {
        let name = name.into();
        let bytes = bytes.into();
        let buffer = tokio::task::spawn_blocking(move || decode(&bytes)).await??;
        debug!(
            "Decoded '{}' into {}x{} buffer",
            name,
            buffer.width(),
            buffer.height()
        );
        Ok(LoadedImage::new(name, buffer))
    }
}

pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, LoadError> {
    let image = image::load_from_memory(bytes)?;
    Ok(PixelBuffer::from_image(&image))
}
