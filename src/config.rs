use crate::output::OutputFormat;
use crate::progress::ProgressCadence;
use crate::streaming::CancelFlag;
use std::path::{Path, PathBuf};

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub input: PathBuf,
    pub limit: u64,                      // target number of accepted records
    pub format: OutputFormat,
    pub progress: bool,                  // show progress bar
    pub progress_label: Option<String>,  // optional label for progress bar
    pub cadence: ProgressCadence,
    pub cancel: Option<CancelFlag>,

    // IO tuning
    pub read_buffer_bytes: usize,        // BufReader capacity
    pub write_buffer_bytes: usize,       // BufWriter capacity
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("Posts.xml"),
            limit: 10,
            format: OutputFormat::default(),
            progress: true,
            progress_label: None,
            cadence: ProgressCadence::default(),
            cancel: None,

            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl ExtractOptions {
    pub fn with_input(mut self, path: impl AsRef<Path>) -> Self {
        self.input = path.as_ref().to_path_buf();
        self
    }
    pub fn with_limit(mut self, n: u64) -> Self {
        self.limit = n;
        self
    }
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_cadence(mut self, cadence: ProgressCadence) -> Self {
        self.cadence = cadence;
        self
    }
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    // IO buffers tuning
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}
