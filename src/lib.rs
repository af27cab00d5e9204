//! certibatch renders one certificate per name from a single image template and packs them into a
//! ZIP archive.
//!
//! # Pipeline overview
//!
//! 1. **Load**: template image, name table (CSV) and font file.
//! 2. **Transform**: the anchor point and font size chosen on a down-scaled preview are mapped to
//!    native resolution once per run ([`compute_render_spec`]).
//! 3. **Render**: [`BatchRenderer`] pulls one row at a time, redraws template + name on a single
//!    reusable surface and encodes it to PNG.
//! 4. **Archive**: each certificate is streamed into an [`ArchiveSink`] (a DEFLATE ZIP for
//!    [`generate_archive`]) and released before the next row is drawn.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce identical render specs and file names.
//! - **Bounded memory**: at most one rendered certificate is alive at a time.
//! - **Premultiplied RGBA8** internally; PNG output is straight alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod assets;
mod data;
mod encode;
mod foundation;
mod render;
mod session;

/// Preview-to-native coordinate transform.
pub mod transform;

pub use assets::color::{TextBrushRgba8, parse_hex_color};
pub use assets::font::FontFace;
pub use assets::template::Template;
pub use data::table::{DataRow, NAME_COLUMN_HINTS, Table, select_name_column};
pub use encode::archive::{DEFLATE_LEVEL, ZipArchiveSink};
pub use encode::naming::{
    FALLBACK_STEM, MAX_STEM_LEN, archive_file_name, certificate_file_name, sanitize_stem,
};
pub use encode::sink::{ArchiveSink, InMemorySink};
pub use foundation::core::{AnchorPoint, Point, PreviewGeometry};
pub use foundation::error::{CertError, CertResult};
pub use render::backend::{BackendKind, RenderBackend, create_backend};
pub use render::batch::{BatchRenderer, RenderedCertificate, RunStats};
pub use render::cpu::CpuBackend;
pub use session::job::JobFile;
pub use session::progress::{CancelToken, NoProgress, Phase, Progress, ProgressReporter};
pub use session::run::{
    BatchJob, PREVIEW_SAMPLE_TEXT, RunConfig, RunInputs, RunOutput, generate_archive,
    render_preview, run_batch,
};
pub use transform::{RenderSpec, TextStyle, compute_render_spec, scale_factor};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
mod test_support;
