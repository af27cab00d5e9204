//! Preview-to-native coordinate transform.
//!
//! The editor shows the template downscaled; the user drops the text anchor and picks a font size
//! against that preview. Rendering happens at native resolution, so both have to be scaled by
//! `native_width / visual_width` before the batch starts.
//!
//! A single uniform factor is used for X, Y and the font size. If the preview is displayed with a
//! different aspect ratio than the template (non-uniform stretching), vertical placement will be
//! off by the aspect error; this matches how anchors are captured in the editor.

use crate::{
    assets::{color::parse_hex_color, template::Template},
    foundation::{
        core::{AnchorPoint, PreviewGeometry},
        error::{CertError, CertResult},
    },
};

/// User-facing text styling, expressed in preview pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in preview pixels.
    pub font_size: f64,
    /// Text color as `#RRGGBB` (or `#RGB` / `#RRGGBBAA`).
    pub color_hex: String,
    /// Requested font family. Empty means the loaded font's own family.
    pub font_family: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 40.0,
            color_hex: "#000000".to_string(),
            font_family: String::new(),
        }
    }
}

impl TextStyle {
    /// Check the font size and color before a run starts.
    pub fn validate(&self) -> CertResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(CertError::validation(format!(
                "font size must be finite and > 0 (got {})",
                self.font_size
            )));
        }
        parse_hex_color(&self.color_hex)?;
        Ok(())
    }
}

/// Fully resolved per-run text placement at native resolution.
///
/// Identical for every row of a run; only the drawn string changes.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSpec {
    /// Font size in native pixels.
    pub font_size_native: u32,
    /// Text color as given in [`TextStyle::color_hex`].
    pub color_hex: String,
    /// Requested font family (may be empty).
    pub font_family: String,
    /// Horizontal center of the text box in native pixels.
    pub center_x_native: f64,
    /// Vertical middle of the text box in native pixels.
    pub center_y_native: f64,
}

/// `native_width / visual_width`.
///
/// Always derived from the *visual* preview width: the anchor was captured in on-screen
/// coordinates, and the backing-store width would be wrong on scaled displays.
pub fn scale_factor(native_width: u32, geometry: &PreviewGeometry) -> CertResult<f64> {
    if native_width == 0 {
        return Err(CertError::invalid_geometry("template native width is zero"));
    }
    geometry.validate()?;
    Ok(f64::from(native_width) / geometry.visual_width)
}

/// Map a preview-space anchor and font size to native resolution.
pub fn compute_render_spec(
    template: &Template,
    anchor: AnchorPoint,
    geometry: &PreviewGeometry,
    style: &TextStyle,
) -> CertResult<RenderSpec> {
    let scale = scale_factor(template.native_width(), geometry)?;
    style.validate()?;
    if !anchor.x.is_finite() || !anchor.y.is_finite() {
        return Err(CertError::invalid_geometry(format!(
            "anchor point must be finite (got {}, {})",
            anchor.x, anchor.y
        )));
    }

    let font_size_native = (style.font_size * scale).round();
    if font_size_native < 1.0 {
        return Err(CertError::validation(format!(
            "font size {} scales to {font_size_native} native pixels",
            style.font_size
        )));
    }

    let spec = RenderSpec {
        font_size_native: font_size_native as u32,
        color_hex: style.color_hex.clone(),
        font_family: style.font_family.clone(),
        center_x_native: anchor.x * scale,
        center_y_native: anchor.y * scale,
    };
    tracing::debug!(
        scale,
        native_width = template.native_width(),
        visual_width = geometry.visual_width,
        font_size_native = spec.font_size_native,
        center_x = spec.center_x_native,
        center_y = spec.center_y_native,
        "resolved native text placement"
    );
    Ok(spec)
}

#[cfg(test)]
#[path = "../tests/unit/transform.rs"]
mod tests;
