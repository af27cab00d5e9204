use crate::{
    assets::{font::FontFace, template::Template},
    foundation::error::CertResult,
    transform::RenderSpec,
};

/// A renderer that turns one name into one encoded certificate image.
///
/// Per-call contract: clear the surface, draw the template at native size, draw `text` centered
/// on `(spec.center_x_native, spec.center_y_native)`, encode. Implementations may reuse a single
/// surface across calls because the returned bytes are fully detached from it before the next
/// call clears it. A backend is single-owner; rendering rows concurrently requires one backend
/// (and one surface) per worker.
pub trait RenderBackend {
    /// Composite and encode one certificate, returning PNG bytes.
    fn render_certificate(&mut self, text: &str, spec: &RenderSpec) -> CertResult<Vec<u8>>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

/// Create a rendering backend for one run.
pub fn create_backend(
    kind: BackendKind,
    template: &Template,
    font: &FontFace,
) -> CertResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            template, font,
        )?)),
    }
}
