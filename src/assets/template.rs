use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::{
    error::{CertError, CertResult},
    math::premultiply_rgba8_in_place,
};

/// Decoded certificate template at native resolution.
///
/// Pixels are stored once as premultiplied RGBA8 and shared read-only for the whole run.
#[derive(Clone)]
pub struct Template {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes_len", &self.rgba8_premul.len())
            .finish()
    }
}

impl Template {
    /// Decode any raster format supported by `image` (PNG, JPEG, ...).
    pub fn from_bytes(bytes: &[u8]) -> CertResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode template image")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.into_raw())
    }

    /// Read and decode a template image from disk.
    pub fn from_path(path: impl AsRef<Path>) -> CertResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read template '{}'", path.display()))?;
        Self::from_bytes(&bytes)
    }

    /// Build a template from straight-alpha RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> CertResult<Self> {
        if width == 0 || height == 0 {
            return Err(CertError::invalid_geometry(format!(
                "template must be at least 1x1 pixels (got {width}x{height})"
            )));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba.len() != expected {
            return Err(CertError::validation(format!(
                "template byte length {} does not match {width}x{height} RGBA8",
                rgba.len()
            )));
        }

        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }

    /// Native width in pixels.
    pub fn native_width(&self) -> u32 {
        self.width
    }

    /// Native height in pixels.
    pub fn native_height(&self) -> u32 {
        self.height
    }

    /// Row-major premultiplied RGBA8 pixels.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/template.rs"]
mod tests;
