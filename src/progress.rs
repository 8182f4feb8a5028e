//! Progress reporting: the observer seam used by the extractor, plus a tracing-based
//! observer and an indicatif byte-progress bar.

use crate::streaming::ExtractionState;
use indicatif::{ProgressBar, ProgressStyle};

/// When the extractor calls `on_progress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressCadence {
    EveryScanned(u64),
    EveryAccepted(u64),
}

impl Default for ProgressCadence {
    fn default() -> Self {
        Self::EveryScanned(5000)
    }
}

impl ProgressCadence {
    /// True when the record just processed should trigger a report.
    pub fn is_due(self, state: &ExtractionState, just_accepted: bool) -> bool {
        match self {
            Self::EveryScanned(n) => n > 0 && state.scanned % n == 0,
            Self::EveryAccepted(n) => just_accepted && n > 0 && state.accepted % n == 0,
        }
    }
}

/// Advisory side channel; nothing here can influence which records are accepted.
pub trait ProgressObserver {
    fn on_progress(&mut self, _state: &ExtractionState, _bytes_read: u64) {}
    fn on_finish(&mut self, _state: &ExtractionState, _bytes_read: u64) {}
}

/// Observer that reports nothing.
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Observer that emits `tracing` events.
#[derive(Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, state: &ExtractionState, _bytes_read: u64) {
        tracing::info!("Processed {} records, extracted {}/{}", state.scanned, state.accepted, state.target);
    }
    fn on_finish(&mut self, state: &ExtractionState, bytes_read: u64) {
        if state.is_complete() {
            tracing::info!("Target of {} posts reached!", state.target);
        }
        tracing::debug!("scan finished: {} records, {} bytes read", state.scanned, bytes_read);
    }
}

/// Records every report; handy in tests and for callers that aggregate themselves.
#[derive(Debug, Default)]
pub struct CollectProgress {
    pub reports: Vec<ExtractionState>,
    pub finished: Option<ExtractionState>,
}

impl ProgressObserver for CollectProgress {
    fn on_progress(&mut self, state: &ExtractionState, _bytes_read: u64) {
        self.reports.push(*state);
    }
    fn on_finish(&mut self, state: &ExtractionState, _bytes_read: u64) {
        self.finished = Some(*state);
    }
}

pub fn make_progress_bar_labeled(total_bytes: u64, label: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    let style = ProgressStyle::with_template(
        "{spinner:.green} {prefix} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
         {bytes_per_sec}  elapsed: {elapsed_precise}  {msg}"
    )
    .expect("static progress template")
    .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    if let Some(label) = label {
        pb.set_prefix(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Byte-based bar over the input file; counters go into the bar message.
pub struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    pub fn new(total_bytes: u64, label: Option<&str>) -> Self {
        Self { pb: make_progress_bar_labeled(total_bytes, label) }
    }
}

impl ProgressObserver for BarProgress {
    fn on_progress(&mut self, state: &ExtractionState, bytes_read: u64) {
        self.pb.set_position(bytes_read);
        self.pb.set_message(format!("scanned {}  extracted {}/{}", state.scanned, state.accepted, state.target));
    }
    fn on_finish(&mut self, state: &ExtractionState, bytes_read: u64) {
        self.pb.set_position(bytes_read);
        self.pb.finish_with_message(format!("done: scanned {}  extracted {}", state.scanned, state.accepted));
    }
}

/// Fan a report out to several observers.
pub struct Fanout<'a>(pub Vec<&'a mut dyn ProgressObserver>);

impl ProgressObserver for Fanout<'_> {
    fn on_progress(&mut self, state: &ExtractionState, bytes_read: u64) {
        for o in self.0.iter_mut() { o.on_progress(state, bytes_read); }
    }
    fn on_finish(&mut self, state: &ExtractionState, bytes_read: u64) {
        for o in self.0.iter_mut() { o.on_finish(state, bytes_read); }
    }
}
