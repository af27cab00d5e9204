use std::{collections::HashMap, sync::Arc};

use image::ImageEncoder as _;

use crate::{
    assets::{color::parse_hex_color, font::FontFace, template::Template},
    foundation::{
        error::{CertError, CertResult},
        math::unpremultiply_rgba8_into,
    },
    render::{backend::RenderBackend, text::TextLayoutEngine},
    transform::RenderSpec,
};

/// CPU backend: one `vello_cpu` context and one native-resolution pixmap reused for every row.
///
/// The template is converted to a paint once at construction; rows never re-decode it.
pub struct CpuBackend {
    width: u16,
    height: u16,
    template_paint: vello_cpu::Image,
    /// Fonts resolved by shaping, keyed by blob id and collection index.
    fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
    checked_family: Option<String>,
    text_engine: TextLayoutEngine,
    ctx: vello_cpu::RenderContext,
    surface: vello_cpu::Pixmap,
    straight_rgba: Vec<u8>,
}

impl CpuBackend {
    /// Allocate the reusable surface at the template's native size.
    pub fn new(template: &Template, font: &FontFace) -> CertResult<Self> {
        let (width, height) = surface_size(template)?;
        let pixmap = pixmap_from_premul_bytes(template.rgba8_premul(), width, height)?;
        let template_paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let text_engine = TextLayoutEngine::new(font)?;
        tracing::debug!(
            width,
            height,
            family = text_engine.registered_family(),
            "allocated cpu render surface"
        );

        Ok(Self {
            width,
            height,
            template_paint,
            fonts: HashMap::new(),
            checked_family: None,
            text_engine,
            ctx: vello_cpu::RenderContext::new(width, height),
            surface: vello_cpu::Pixmap::new(width, height),
            straight_rgba: Vec::new(),
        })
    }

    /// Clear the surface and draw template + centered text into it.
    fn compose(&mut self, text: &str, spec: &RenderSpec) -> CertResult<()> {
        let brush = parse_hex_color(&spec.color_hex)?;
        self.check_family(&spec.font_family);
        let layout = self.text_engine.layout_line(
            text,
            spec.font_size_native as f32,
            &spec.font_family,
            brush,
        )?;

        clear_pixmap_to_transparent(&mut self.surface);

        let ctx = &mut self.ctx;
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(self.template_paint.clone());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));

        // Center/middle anchoring: the layout box is centered on the anchor.
        let origin_x = spec.center_x_native - f64::from(layout.width()) / 2.0;
        let origin_y = spec.center_y_native - f64::from(layout.height()) / 2.0;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin_x, origin_y)));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                let shaped_run = run.run();
                let shaped = shaped_run.font();
                let font = resolved_font(
                    &mut self.fonts,
                    shaped.data.id(),
                    shaped.index,
                    shaped.data.data(),
                );
                ctx.glyph_run(font)
                    .font_size(shaped_run.font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.surface);
        Ok(())
    }

    fn check_family(&mut self, family: &str) {
        if family.trim().is_empty() || self.checked_family.as_deref() == Some(family) {
            return;
        }
        if !self.text_engine.has_family(family) {
            tracing::warn!(
                requested = family,
                fallback = self.text_engine.registered_family(),
                "font family not found, drawing with the loaded font"
            );
        }
        self.checked_family = Some(family.to_string());
    }

    /// Encode the current surface as an RGBA8 PNG.
    fn encode_png(&mut self) -> CertResult<Vec<u8>> {
        unpremultiply_rgba8_into(self.surface.data_as_u8_slice(), &mut self.straight_rgba);

        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new_with_quality(
            &mut out,
            image::codecs::png::CompressionType::Default,
            image::codecs::png::FilterType::Adaptive,
        )
        .write_image(
            &self.straight_rgba,
            u32::from(self.width),
            u32::from(self.height),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| CertError::render(format!("encode png: {e}")))?;
        Ok(out)
    }
}

impl RenderBackend for CpuBackend {
    fn render_certificate(&mut self, text: &str, spec: &RenderSpec) -> CertResult<Vec<u8>> {
        self.compose(text, spec)?;
        self.encode_png()
    }
}

fn surface_size(template: &Template) -> CertResult<(u16, u16)> {
    let w: u16 = template.native_width().try_into().map_err(|_| {
        CertError::invalid_geometry(format!(
            "template width {} exceeds the {} px render limit",
            template.native_width(),
            u16::MAX
        ))
    })?;
    let h: u16 = template.native_height().try_into().map_err(|_| {
        CertError::invalid_geometry(format!(
            "template height {} exceeds the {} px render limit",
            template.native_height(),
            u16::MAX
        ))
    })?;
    Ok((w, h))
}

fn resolved_font<'a>(
    cache: &'a mut HashMap<(u64, u32), vello_cpu::peniko::FontData>,
    blob_id: u64,
    index: u32,
    bytes: &[u8],
) -> &'a vello_cpu::peniko::FontData {
    cache.entry((blob_id, index)).or_insert_with(|| {
        vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.to_vec()), index)
    })
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u16,
    height: u16,
) -> CertResult<vello_cpu::Pixmap> {
    if bytes.len() != usize::from(width) * usize::from(height) * 4 {
        return Err(CertError::render("pixmap byte len mismatch"));
    }
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        width,
        height,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
