use std::iter::FusedIterator;

use crate::{
    data::table::DataRow,
    encode::naming::certificate_file_name,
    render::backend::RenderBackend,
    session::progress::{Phase, Progress, ProgressReporter},
    transform::RenderSpec,
};

/// One encoded certificate, ready to hand to an archive sink.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedCertificate {
    /// Archive member name, `cert_{seq:03}_{stem}.png`.
    pub filename: String,
    /// PNG bytes.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for RenderedCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedCertificate")
            .field("filename", &self.filename)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Per-run row counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Rows in the input table.
    pub total_rows: usize,
    /// Rows that produced a certificate.
    pub rendered: usize,
    /// Rows without a usable name.
    pub skipped: usize,
    /// Rows whose compositing or encoding failed.
    pub failed: usize,
}

impl RunStats {
    /// Rows visited so far.
    pub fn processed(&self) -> usize {
        self.rendered + self.skipped + self.failed
    }
}

/// Lazy per-row renderer.
///
/// Each call to [`Iterator::next`] visits rows until one yields a certificate (or the rows run
/// out), so the caller controls pacing and at most one rendered image exists at a time. Sequence
/// numbers count rendered rows only: skipped and failed rows leave no gap.
///
/// Progress is reported once per rendered certificate, with `current` equal to its sequence
/// number. Skipped and failed rows are not reported.
pub struct BatchRenderer<'a> {
    rows: std::slice::Iter<'a, DataRow>,
    name_column: &'a str,
    spec: &'a RenderSpec,
    backend: &'a mut dyn RenderBackend,
    progress: &'a mut dyn ProgressReporter,
    stats: RunStats,
}

impl<'a> BatchRenderer<'a> {
    /// Start a batch over `rows`, reading names from `name_column`.
    pub fn run(
        rows: &'a [DataRow],
        name_column: &'a str,
        spec: &'a RenderSpec,
        backend: &'a mut dyn RenderBackend,
        progress: &'a mut dyn ProgressReporter,
    ) -> Self {
        Self {
            rows: rows.iter(),
            name_column,
            spec,
            backend,
            progress,
            stats: RunStats {
                total_rows: rows.len(),
                ..RunStats::default()
            },
        }
    }

    /// Counters for the rows visited so far.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    fn report_rendered(&mut self) {
        self.progress.report(Progress::new(
            self.stats.rendered,
            self.stats.total_rows,
            Phase::Processing,
        ));
    }
}

impl Iterator for BatchRenderer<'_> {
    type Item = RenderedCertificate;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(row) = self.rows.next() {
            let row_no = self.stats.processed() + 1;
            let name = match row.get(self.name_column) {
                Some(name) if !name.is_empty() => name.as_str(),
                _ => {
                    tracing::warn!(
                        row = row_no,
                        column = self.name_column,
                        "skipping row without a name"
                    );
                    self.stats.skipped += 1;
                    continue;
                }
            };

            match self.backend.render_certificate(name, self.spec) {
                Ok(bytes) => {
                    self.stats.rendered += 1;
                    let filename = certificate_file_name(self.stats.rendered, name);
                    tracing::debug!(row = row_no, %filename, bytes = bytes.len(), "rendered row");
                    self.report_rendered();
                    return Some(RenderedCertificate { filename, bytes });
                }
                Err(err) => {
                    tracing::warn!(row = row_no, name, error = %err, "failed to render row");
                    self.stats.failed += 1;
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.rows.len()))
    }
}

impl FusedIterator for BatchRenderer<'_> {}

#[cfg(test)]
#[path = "../../tests/unit/render/batch.rs"]
mod tests;
