use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Decoded RGBA8 texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureData {
    /// Single texel, used where a model has no map of its own
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            data: rgba.to_vec(),
        }
    }

    /// Flat tangent-space normal (0, 0, 1)
    pub fn flat_normal() -> Self {
        Self::solid([128, 128, 255, 255])
    }

    pub fn white() -> Self {
        Self::solid([255; 4])
    }
}

/// Loads any image format the `image` crate decodes, converted to RGBA8
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureData> {
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("Failed to load texture: {:?}", path))?
        .to_rgba8();

    let (width, height) = image.dimensions();
    info!("Loaded texture {:?}: {}x{}", path, width, height);

    Ok(TextureData {
        width,
        height,
        data: image.into_raw(),
    })
}
