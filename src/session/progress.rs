use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Stage of a run, reported alongside the row counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Inputs validated, no row processed yet.
    Initializing,
    /// Rows are being rendered.
    Processing,
    /// All rows visited, archive is being finalized.
    Archiving,
    /// Archive written.
    Done,
}

impl Phase {
    /// Human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Processing => "Processing",
            Self::Archiving => "Archiving",
            Self::Done => "Done",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One progress update: `current` of `total` rows in `phase`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Rows visited so far.
    pub current: usize,
    /// Rows in the input table.
    pub total: usize,
    /// Current stage.
    pub phase: Phase,
}

impl Progress {
    /// Build a progress update.
    pub fn new(current: usize, total: usize, phase: Phase) -> Self {
        Self {
            current,
            total,
            phase,
        }
    }

    /// `round(current / total * 100)`, or `None` for an empty table.
    pub fn percent(&self) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        Some((self.current as f64 / self.total as f64 * 100.0).round() as u32)
    }
}

/// Receiver of progress updates.
///
/// Called on the rendering thread after every row; a reporter that redraws UI or checks timers
/// runs between rows, never while a row is being drawn.
pub trait ProgressReporter {
    /// Handle one update.
    fn report(&mut self, progress: Progress);
}

impl<F> ProgressReporter for F
where
    F: FnMut(Progress),
{
    fn report(&mut self, progress: Progress) {
        self(progress)
    }
}

/// Reporter that discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _progress: Progress) {}
}

/// Shared cancellation flag, checked between rows.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect at the next row boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/progress.rs"]
mod tests;
