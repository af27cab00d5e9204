use crate::foundation::error::{CertError, CertResult};

pub use kurbo::Point;

/// Center of the text glyph box in preview-canvas pixel space.
///
/// Anchors are captured against the on-screen (visual) preview, so they are only meaningful
/// together with the [`PreviewGeometry`] they were captured on.
pub type AnchorPoint = Point;

/// Size of the preview canvas: backing-store pixels versus on-screen rendered size.
///
/// The two differ whenever the display scales the canvas (high-DPI screens, CSS sizing). The
/// visual size is the one the anchor point was captured in and therefore the one the transform
/// uses.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PreviewGeometry {
    /// Backing-store width in pixels.
    pub canvas_pixel_width: u32,
    /// Backing-store height in pixels.
    pub canvas_pixel_height: u32,
    /// Rendered on-screen width.
    pub visual_width: f64,
    /// Rendered on-screen height.
    pub visual_height: f64,
}

impl PreviewGeometry {
    /// Widest preview the interactive editor shows before downscaling the template.
    pub const DEFAULT_MAX_WIDTH: u32 = 800;

    /// Preview displayed 1:1 (visual size equals backing-store size).
    pub fn unscaled(width: u32, height: u32) -> Self {
        Self {
            canvas_pixel_width: width,
            canvas_pixel_height: height,
            visual_width: f64::from(width),
            visual_height: f64::from(height),
        }
    }

    /// Preview sizing used by the editor: templates wider than `max_width` are downscaled to
    /// exactly `max_width` (height rounded, aspect kept); narrower ones are shown at native size.
    pub fn fit(native_width: u32, native_height: u32, max_width: u32) -> CertResult<Self> {
        if native_width == 0 || native_height == 0 {
            return Err(CertError::invalid_geometry(format!(
                "template must be at least 1x1 pixels (got {native_width}x{native_height})"
            )));
        }
        if max_width == 0 {
            return Err(CertError::invalid_geometry(
                "preview max width must be non-zero",
            ));
        }

        if native_width <= max_width {
            return Ok(Self::unscaled(native_width, native_height));
        }

        let scale = f64::from(max_width) / f64::from(native_width);
        let height = (f64::from(native_height) * scale).round().max(1.0) as u32;
        Ok(Self::unscaled(max_width, height))
    }

    /// Return a copy with a different on-screen size (backing store unchanged).
    pub fn with_visual_size(self, visual_width: f64, visual_height: f64) -> Self {
        Self {
            visual_width,
            visual_height,
            ..self
        }
    }

    /// Visual center, the editor's initial anchor position.
    pub fn visual_center(&self) -> AnchorPoint {
        Point::new(self.visual_width / 2.0, self.visual_height / 2.0)
    }

    /// Check that the visual size can be divided by.
    pub fn validate(&self) -> CertResult<()> {
        if !self.visual_width.is_finite() || self.visual_width <= 0.0 {
            return Err(CertError::invalid_geometry(format!(
                "preview visual width must be finite and > 0 (got {})",
                self.visual_width
            )));
        }
        if !self.visual_height.is_finite() || self.visual_height <= 0.0 {
            return Err(CertError::invalid_geometry(format!(
                "preview visual height must be finite and > 0 (got {})",
                self.visual_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
