//! Streaming primitives: the one-pass, early-exit record extractor and its run state.

use crate::error::{ExtractError, Result};
use crate::filters::RecordFilter;
use crate::progress::{ProgressCadence, ProgressObserver};
use crate::record::Record;
use crate::rows::{open_source, RowReader};
use std::io::BufRead;
use std::path::Path;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

/// Run-scoped counters. `accepted <= target` at all times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractionState {
    pub scanned: u64,
    pub accepted: u64,
    pub target: u64,
}

impl ExtractionState {
    pub fn new(target: u64) -> Self {
        Self { scanned: 0, accepted: 0, target }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.accepted >= self.target
    }
}

/// Accepted records in stream order plus the final counters.
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub state: ExtractionState,
}

impl Extraction {
    pub fn scanned(&self) -> u64 {
        self.state.scanned
    }
    pub fn accepted(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Cooperative cancellation shared between the scan and whoever wants to stop it.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Single forward pass over `<row/>` records with a hard stop at `target` accepted.
///
/// The scan never pulls another record once the target is met, so a permissive
/// filter on a huge dump only costs the prefix it actually needs.
pub struct StreamingExtractor<'f> {
    filter: &'f RecordFilter,
    target: u64,
    cadence: ProgressCadence,
    cancel: Option<CancelFlag>,
}

impl<'f> StreamingExtractor<'f> {
    pub fn new(filter: &'f RecordFilter, target: u64) -> Self {
        Self { filter, target, cadence: ProgressCadence::default(), cancel: None }
    }

    pub fn cadence(mut self, cadence: ProgressCadence) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Extract from an already-open byte stream. Progress bytes are reader positions.
    pub fn extract<R: BufRead>(&self, source: R, observer: &mut dyn ProgressObserver) -> Result<Extraction> {
        let mut rows = RowReader::new(source);
        self.run(&mut rows, |r| r.position(), observer)
    }

    /// Extract from a file (plain XML or `.zst`). Progress bytes are bytes read from disk.
    pub fn extract_path(
        &self,
        path: &Path,
        read_buf_bytes: usize,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Extraction> {
        let counter = Arc::new(AtomicU64::new(0));
        let src = open_source(path, read_buf_bytes, counter.clone())?;
        let mut rows = RowReader::with_origin(src, path);
        tracing::debug!("streaming {} (target {})", path.display(), self.target);
        self.run(&mut rows, |_| counter.load(Ordering::Relaxed), observer)
    }

    fn run<R: BufRead>(
        &self,
        rows: &mut RowReader<R>,
        bytes_read: impl Fn(&RowReader<R>) -> u64,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Extraction> {
        let mut state = ExtractionState::new(self.target);
        let mut records = Vec::with_capacity(self.target.min(4096) as usize);

        while !state.is_complete() {
            if let Some(flag) = &self.cancel {
                if flag.is_cancelled() {
                    tracing::warn!("extraction cancelled after {} records", state.scanned);
                    return Err(ExtractError::Cancelled { scanned: state.scanned, accepted: state.accepted });
                }
            }

            let Some(rec) = rows.next_row()? else { break };
            state.scanned += 1;

            // rejected records are dropped here, before the next pull
            let accepted = self.filter.accept(&rec);
            if accepted {
                records.push(rec);
                state.accepted += 1;
            }

            if self.cadence.is_due(&state, accepted) {
                observer.on_progress(&state, bytes_read(&*rows));
            }
        }

        if state.is_complete() {
            tracing::info!("target of {} records reached after scanning {}", state.target, state.scanned);
        } else {
            tracing::info!("end of input: {} of {} records extracted ({} scanned)", state.accepted, state.target, state.scanned);
        }
        observer.on_finish(&state, bytes_read(&*rows));

        Ok(Extraction { records, state })
    }
}
