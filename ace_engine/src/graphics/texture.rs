/// Texture - a 2D image file uploaded to one GPU texture.
///
/// Images are always expanded to RGBA8 and uploaded with an sRGB internal
/// format, REPEAT wrapping and LINEAR filtering. The GPU texture is released
/// on drop, and only if a load succeeded.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::{engine_error, engine_info};
use super::device::{GraphicsDevice, TextureDesc, TextureFilter, TextureFormat, TextureHandle, TextureWrap};

const LOG_SOURCE: &str = "ace::Texture";

pub struct Texture {
    device: Rc<dyn GraphicsDevice>,
    handle: Option<TextureHandle>,
    width: u32,
    height: u32,
    channels: u8,
    /// Unit of the last `bind`, cleared by `unbind`
    bound_unit: Cell<u32>,
}

impl Texture {
    pub fn new(device: Rc<dyn GraphicsDevice>) -> Self {
        Self {
            device,
            handle: None,
            width: 0,
            height: 0,
            channels: 0,
            bound_unit: Cell::new(0),
        }
    }

    /// Convenience: `new` followed by `load_from_file_default`
    pub fn from_file(device: Rc<dyn GraphicsDevice>, path: impl AsRef<Path>) -> Result<Self> {
        let mut texture = Self::new(device);
        texture.load_from_file_default(path)?;
        Ok(texture)
    }

    /// Load with vertical flip on (image row 0 at the bottom, as GL samples it)
    pub fn load_from_file_default(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load_from_file(path, true)
    }

    /// Decode `path` and upload it.
    ///
    /// On failure the texture keeps its previous state. Loading into an
    /// already loaded texture releases the previous GPU texture first.
    ///
    /// # Errors
    ///
    /// `Error::ImageLoad` if the file is missing or cannot be decoded, or the
    /// device error if texture creation fails.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>, flip_vertically: bool) -> Result<()> {
        let path = path.as_ref();

        let image = image::open(path).map_err(|e| {
            engine_error!(LOG_SOURCE, "Could not load texture {}: {}", path.display(), e);
            Error::ImageLoad(format!("{}: {}", path.display(), e))
        })?;

        let channels = image.color().channel_count();
        let mut rgba = image.into_rgba8();
        if flip_vertically {
            image::imageops::flip_vertical_in_place(&mut rgba);
        }
        let (width, height) = rgba.dimensions();

        let desc = TextureDesc {
            width,
            height,
            format: TextureFormat::R8G8B8A8_SRGB,
            wrap: TextureWrap::Repeat,
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
        };
        let handle = self.device.create_texture(&desc, rgba.as_raw())?;

        if let Some(previous) = self.handle.replace(handle) {
            self.device.delete_texture(previous);
        }
        self.width = width;
        self.height = height;
        self.channels = channels;

        engine_info!(
            LOG_SOURCE,
            "Loaded texture {} ({}x{}, {} channels, expanded to 4)",
            path.display(),
            width,
            height,
            channels
        );
        Ok(())
    }

    /// Bind to texture unit `unit`
    pub fn bind(&self, unit: u32) {
        self.bound_unit.set(unit);
        self.device.bind_texture(unit, self.handle);
    }

    /// Unbind the unit used by the last `bind` (unit 0 if never bound)
    pub fn unbind(&self) {
        self.device.bind_texture(self.bound_unit.get(), None);
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel count of the source image (before RGBA expansion)
    pub fn channels(&self) -> u8 {
        self.channels
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.device.delete_texture(handle);
        }
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
