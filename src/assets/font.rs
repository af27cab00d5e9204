use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{CertError, CertResult};

/// Font file used to draw names, with the family name it registers under.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<Vec<u8>>,
    family: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    /// Validate TrueType/OpenType bytes and detect their primary family name.
    pub fn from_bytes(bytes: Vec<u8>) -> CertResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let family = register_font(&mut font_ctx, &bytes)?;
        Ok(Self {
            bytes: Arc::new(bytes),
            family,
        })
    }

    /// Read a `.ttf`/`.otf`/`.ttc` file.
    pub fn from_path(path: impl AsRef<Path>) -> CertResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }

    /// Family name detected from the font data.
    pub fn family(&self) -> &str {
        &self.family
    }
}

/// Register `bytes` with `font_ctx` and return the first family name it provides.
pub(crate) fn register_font(
    font_ctx: &mut parley::FontContext,
    bytes: &[u8],
) -> CertResult<String> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| CertError::validation("no font families registered from font bytes"))?;

    font_ctx
        .collection
        .family_name(family_id)
        .map(str::to_string)
        .ok_or_else(|| CertError::validation("registered font family has no name"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
