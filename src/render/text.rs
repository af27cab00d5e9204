use crate::{
    assets::{
        color::TextBrushRgba8,
        font::{FontFace, register_font},
    },
    foundation::error::{CertError, CertResult},
};

/// Stateful helper for building single-line Parley layouts.
///
/// The loaded font is registered next to the system collection, so a requested family resolves
/// against installed fonts first and falls back to the loaded one. The contexts are kept across
/// rows so shaping caches survive the whole batch.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered_family: String,
}

impl TextLayoutEngine {
    pub(crate) fn new(font: &FontFace) -> CertResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let registered_family = register_font(&mut font_ctx, font.bytes())?;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            registered_family,
        })
    }

    pub(crate) fn registered_family(&self) -> &str {
        &self.registered_family
    }

    /// Whether `family` names a font the collection can resolve.
    pub(crate) fn has_family(&mut self, family: &str) -> bool {
        let family = family.trim().trim_matches(['"', '\'']);
        family == self.registered_family
            || self.font_ctx.collection.family_by_name(family).is_some()
    }

    #[cfg(test)]
    pub(crate) fn register_additional(&mut self, font: &FontFace) -> CertResult<String> {
        register_font(&mut self.font_ctx, font.bytes())
    }

    /// CSS-style family list: the requested stack first, the registered font as the fallback.
    fn font_stack_source(&self, requested: &str) -> String {
        let requested = requested.trim();
        let registered = format!("\"{}\"", self.registered_family);
        if requested.is_empty() || requested.trim_matches(['"', '\'']) == self.registered_family
        {
            registered
        } else {
            format!("{requested}, {registered}")
        }
    }

    /// Shape `text` as one unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        family: &str,
        brush: TextBrushRgba8,
    ) -> CertResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CertError::render("text size must be finite and > 0"));
        }

        let stack = self.font_stack_source(family);
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(stack)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
