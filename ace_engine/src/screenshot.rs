//! Screenshot encoding.
//!
//! The backend reads the framebuffer as tightly packed RGB rows, bottom row
//! first (OpenGL origin). These helpers name the file, flip the rows and
//! write a PNG.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use image::{ImageFormat, RgbImage};

use crate::error::{Error, Result};

/// `<custom>.png`, or `screenshot_<unix_time>.png` when no name is given
pub fn screenshot_file_name(custom_name: Option<&str>, unix_time: u64) -> PathBuf {
    match custom_name {
        Some(name) => PathBuf::from(format!("{}.png", name)),
        None => PathBuf::from(format!("screenshot_{}.png", unix_time)),
    }
}

/// Current time in whole seconds since the Unix epoch
pub fn unix_time_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Reverse the row order of a tightly packed image
pub fn flip_rows(pixels: &[u8], width: u32, height: u32, channels: u32) -> Vec<u8> {
    let stride = (width * channels) as usize;
    if stride == 0 {
        return Vec::new();
    }
    pixels
        .chunks_exact(stride)
        .take(height as usize)
        .rev()
        .flat_map(|row| row.iter().copied())
        .collect()
}

/// Write bottom-up RGB pixels as a top-down PNG
pub fn write_screenshot_png(path: &Path, width: u32, height: u32, rgb_bottom_up: &[u8]) -> Result<()> {
    let expected = width as usize * height as usize * 3;
    if rgb_bottom_up.len() != expected {
        return Err(Error::InvalidResource(format!(
            "screenshot buffer is {} bytes, expected {} for {}x{} RGB",
            rgb_bottom_up.len(),
            expected,
            width,
            height
        )));
    }

    let top_down = flip_rows(rgb_bottom_up, width, height, 3);
    let image = RgbImage::from_raw(width, height, top_down).ok_or_else(|| {
        Error::InvalidResource(format!("invalid screenshot dimensions {}x{}", width, height))
    })?;

    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
#[path = "screenshot_tests.rs"]
mod tests;
