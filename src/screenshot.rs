use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use glium::texture::{RawImage2d, Texture2d};
use image::RgbaImage;

/// File name of a screenshot taken at the given time
pub fn screenshot_path(dir: &Path, time: DateTime<Local>) -> PathBuf {
    dir.join(time.format("trace_%F_%H%M%S.png").to_string())
}

/// Build an image from bottom-up RGBA rows as read from OpenGL
pub fn to_image(width: u32, height: u32, data: Vec<u8>) -> Result<RgbaImage> {
    let image = RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| anyhow!("Pixel data does not match {}x{} image", width, height))?;
    Ok(image::imageops::flip_vertical(&image))
}

/// Read the trace image back from the GPU and write it as a PNG
pub fn save(texture: &Texture2d, dir: &Path) -> Result<PathBuf> {
    let raw: RawImage2d<'_, u8> = texture.read();
    let image = to_image(raw.width, raw.height, raw.data.into_owned())?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let path = screenshot_path(dir, Local::now());
    image
        .save(&path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(path)
}
