use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::{font::FontFace, template::Template},
    data::table::{DataRow, Table},
    encode::{archive::ZipArchiveSink, naming::archive_file_name, sink::ArchiveSink},
    foundation::{
        core::{AnchorPoint, PreviewGeometry},
        error::{CertError, CertResult},
    },
    render::{
        backend::{BackendKind, RenderBackend, create_backend},
        batch::{BatchRenderer, RunStats},
    },
    session::progress::{CancelToken, Phase, Progress, ProgressReporter},
    transform::{RenderSpec, TextStyle, compute_render_spec},
};

/// Sample text drawn by [`render_preview`] when none is given.
pub const PREVIEW_SAMPLE_TEXT: &str = "NAMA PESERTA";

/// Raw, possibly incomplete inputs for one run. Turned into a [`RunConfig`] by
/// [`RunConfig::new`].
#[derive(Clone, Debug, Default)]
pub struct RunInputs {
    /// Decoded certificate template.
    pub template: Option<Template>,
    /// Parsed name table.
    pub table: Option<Table>,
    /// Font used to draw names.
    pub font: Option<FontFace>,
    /// Column to read names from. `None` auto-selects.
    pub name_column: Option<String>,
    /// Text anchor in preview space. `None` uses the preview center.
    pub anchor: Option<AnchorPoint>,
    /// Preview the anchor was captured on. `None` uses [`PreviewGeometry::fit`] with
    /// [`PreviewGeometry::DEFAULT_MAX_WIDTH`].
    pub preview: Option<PreviewGeometry>,
    /// Text styling in preview pixels.
    pub style: TextStyle,
}

/// Validated, immutable configuration for one run.
///
/// Built once before the first row; the anchor and render spec are frozen for the whole batch.
#[derive(Clone, Debug)]
pub struct RunConfig {
    template: Template,
    table: Table,
    font: FontFace,
    name_column: String,
    anchor: AnchorPoint,
    preview: PreviewGeometry,
    style: TextStyle,
    render_spec: RenderSpec,
}

impl RunConfig {
    /// Run the pre-flight checks and resolve defaults.
    pub fn new(inputs: RunInputs) -> CertResult<Self> {
        let template = inputs
            .template
            .ok_or_else(|| CertError::missing_input("no template image loaded"))?;
        let table = inputs
            .table
            .ok_or_else(|| CertError::missing_input("no data file loaded"))?;
        if table.is_empty() {
            return Err(CertError::missing_input("data file has no rows"));
        }
        let name_column = table.resolve_name_column(inputs.name_column.as_deref())?;
        let font = inputs
            .font
            .ok_or_else(|| CertError::missing_input("no font loaded"))?;

        let (preview, anchor, render_spec) =
            resolve_placement(&template, inputs.anchor, inputs.preview, &inputs.style)?;

        Ok(Self {
            template,
            table,
            font,
            name_column,
            anchor,
            preview,
            style: inputs.style,
            render_spec,
        })
    }

    /// Template image.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Name table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Font used to draw names.
    pub fn font(&self) -> &FontFace {
        &self.font
    }

    /// Resolved name column.
    pub fn name_column(&self) -> &str {
        &self.name_column
    }

    /// Frozen anchor in preview space.
    pub fn anchor(&self) -> AnchorPoint {
        self.anchor
    }

    /// Preview geometry the anchor refers to.
    pub fn preview(&self) -> PreviewGeometry {
        self.preview
    }

    /// Text styling in preview pixels.
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Native-resolution placement shared by every row.
    pub fn render_spec(&self) -> &RenderSpec {
        &self.render_spec
    }

    /// Borrowed view consumed by [`run_batch`].
    pub fn batch_job(&self) -> BatchJob<'_> {
        BatchJob {
            rows: self.table.rows(),
            name_column: &self.name_column,
            spec: &self.render_spec,
        }
    }
}

/// Row-level inputs of a batch: what to draw and where.
#[derive(Clone, Copy, Debug)]
pub struct BatchJob<'a> {
    /// Rows in input order.
    pub rows: &'a [DataRow],
    /// Column holding the names.
    pub name_column: &'a str,
    /// Native placement for every row.
    pub spec: &'a RenderSpec,
}

/// Result of [`generate_archive`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutput {
    /// Path of the finished archive.
    pub archive_path: PathBuf,
    /// Row counters.
    pub stats: RunStats,
}

fn resolve_placement(
    template: &Template,
    anchor: Option<AnchorPoint>,
    preview: Option<PreviewGeometry>,
    style: &TextStyle,
) -> CertResult<(PreviewGeometry, AnchorPoint, RenderSpec)> {
    let preview = match preview {
        Some(p) => p,
        None => PreviewGeometry::fit(
            template.native_width(),
            template.native_height(),
            PreviewGeometry::DEFAULT_MAX_WIDTH,
        )?,
    };
    let anchor = anchor.unwrap_or_else(|| preview.visual_center());
    let spec = compute_render_spec(template, anchor, &preview, style)?;
    Ok((preview, anchor, spec))
}

/// Drive one batch into `sink`.
///
/// Reports `Initializing` before the first row, `Processing` after every rendered certificate,
/// then `Archiving` and `Done` (both at `total`) around finalization. `cancel` is checked between rows; a cancelled run returns
/// [`CertError::Cancelled`] without finalizing the sink.
#[tracing::instrument(
    skip_all,
    fields(rows = job.rows.len(), column = job.name_column)
)]
pub fn run_batch<S: ArchiveSink>(
    job: BatchJob<'_>,
    backend: &mut dyn RenderBackend,
    mut sink: S,
    progress: &mut dyn ProgressReporter,
    cancel: &CancelToken,
) -> CertResult<(S::Output, RunStats)> {
    let total = job.rows.len();
    progress.report(Progress::new(0, total, Phase::Initializing));

    let stats = {
        let mut batch =
            BatchRenderer::run(job.rows, job.name_column, job.spec, backend, &mut *progress);
        loop {
            if cancel.is_cancelled() {
                tracing::warn!(processed = batch.stats().processed(), "run cancelled");
                return Err(CertError::Cancelled);
            }
            let Some(cert) = batch.next() else {
                break;
            };
            sink.add(cert)?;
        }
        batch.stats()
    };

    progress.report(Progress::new(total, total, Phase::Archiving));
    let output = sink.finish()?;
    progress.report(Progress::new(total, total, Phase::Done));

    if stats.rendered == 0 {
        tracing::warn!(total_rows = total, "no certificates were rendered");
    }
    tracing::info!(
        total_rows = stats.total_rows,
        rendered = stats.rendered,
        skipped = stats.skipped,
        failed = stats.failed,
        "batch complete"
    );
    Ok((output, stats))
}

/// Render every row into `certificates_<timestamp>.zip` inside `out_dir`.
///
/// Existing archives are never overwritten; a name already taken gets a `_2`, `_3`, ... suffix.
/// The archive is written under a `.part` name and renamed once finalized; on any error
/// (including cancellation) the partial file is removed.
#[tracing::instrument(skip_all, fields(out_dir = %out_dir.display()))]
pub fn generate_archive(
    config: &RunConfig,
    out_dir: &Path,
    progress: &mut dyn ProgressReporter,
    cancel: &CancelToken,
) -> CertResult<RunOutput> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory '{}'", out_dir.display()))?;

    let archive_path = unique_archive_path(out_dir, chrono::Utc::now());
    let part_path = part_path_for(&archive_path);

    let mut backend = create_backend(BackendKind::Cpu, config.template(), config.font())?;

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&part_path)
        .map_err(|e| CertError::archive(format!("create '{}': {e}", part_path.display())))?;
    let mut part_guard = PartialFileGuard(Some(part_path.clone()));

    let sink = ZipArchiveSink::new(std::io::BufWriter::new(file));
    let (writer, stats) =
        run_batch(config.batch_job(), backend.as_mut(), sink, progress, cancel)?;
    drop(writer);

    std::fs::rename(&part_path, &archive_path).map_err(|e| {
        CertError::archive(format!(
            "move '{}' to '{}': {e}",
            part_path.display(),
            archive_path.display()
        ))
    })?;
    part_guard.0 = None;

    tracing::info!(archive = %archive_path.display(), "archive written");
    Ok(RunOutput {
        archive_path,
        stats,
    })
}

/// First free `certificates_<timestamp>[_N].zip` in `out_dir`: neither it nor its `.part` exists.
fn unique_archive_path(out_dir: &Path, at: chrono::DateTime<chrono::Utc>) -> PathBuf {
    let base = archive_file_name(at);
    let stem = base.strip_suffix(".zip").unwrap_or(&base);
    let mut candidate = out_dir.join(&base);
    let mut n = 2u32;
    while candidate.exists() || part_path_for(&candidate).exists() {
        candidate = out_dir.join(format!("{stem}_{n}.zip"));
        n += 1;
    }
    candidate
}

fn part_path_for(archive_path: &Path) -> PathBuf {
    archive_path.with_extension("zip.part")
}

/// Render a single certificate with sample text so the anchor can be checked before a run.
pub fn render_preview(
    template: &Template,
    font: &FontFace,
    anchor: Option<AnchorPoint>,
    preview: Option<PreviewGeometry>,
    style: &TextStyle,
    text: &str,
) -> CertResult<Vec<u8>> {
    let (_, _, spec) = resolve_placement(template, anchor, preview, style)?;
    let mut backend = create_backend(BackendKind::Cpu, template, font)?;
    backend.render_certificate(text, &spec)
}

struct PartialFileGuard(Option<PathBuf>);

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/run.rs"]
mod tests;
