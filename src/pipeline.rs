use crate::config::ExtractOptions;
use crate::error::{ExtractError, Result};
use crate::filters::RecordFilter;
use crate::output::{write_output, OutputFormat};
use crate::progress::{BarProgress, LogProgress, ProgressCadence, ProgressObserver};
use crate::query::{AcceptedAnswer, FilterConfig, PostTypes};
use crate::report::{post_type_breakdown, RunReport};
use crate::streaming::{CancelFlag, Extraction, StreamingExtractor};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Clone, Default)]
pub struct PostExtractor {
    pub(crate) opts: ExtractOptions,
}

impl PostExtractor {
    pub fn new() -> Self {
        Self { opts: ExtractOptions::default() }
    }

    // -------- Builder methods --------
    pub fn input(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_input(path); self }
    pub fn limit(mut self, n: u64) -> Self { self.opts = self.opts.with_limit(n); self }
    pub fn format(mut self, format: OutputFormat) -> Self { self.opts = self.opts.with_format(format); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn cadence(mut self, cadence: ProgressCadence) -> Self { self.opts = self.opts.with_cadence(cadence); self }
    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self { self.opts = self.opts.with_cancel_flag(flag); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }

    pub fn options(&self) -> &ExtractOptions {
        &self.opts
    }

    /// Enter filter mode. Starts from the default filter (questions and answers, no other constraint).
    pub fn scan(self) -> ScanPlan {
        ScanPlan { etl: self, filter: FilterConfig::default() }
    }
}

// ----------------- ScanPlan -----------------

pub struct ScanPlan {
    etl: PostExtractor,
    filter: FilterConfig,
}

impl ScanPlan {
    /// Replace the whole filter configuration.
    pub fn filter(mut self, cfg: FilterConfig) -> Self { self.filter = cfg; self }

    pub fn questions_only(mut self) -> Self { self.filter.post_types = PostTypes::questions(); self }
    pub fn answers_only(mut self) -> Self { self.filter.post_types = PostTypes::answers(); self }
    pub fn any_type(mut self) -> Self { self.filter.post_types = PostTypes::Any; self }
    pub fn post_types<I, S>(mut self, ids: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> {
        self.filter.post_types = PostTypes::of(ids); self
    }

    pub fn min_score(mut self, v: i64) -> Self { self.filter.min_score = Some(v); self }
    pub fn max_score(mut self, v: i64) -> Self { self.filter.max_score = Some(v); self }
    pub fn min_views(mut self, v: i64) -> Self { self.filter.min_views = Some(v); self }
    pub fn min_answers(mut self, v: i64) -> Self { self.filter.min_answers = Some(v); self }
    pub fn accepted_answer(mut self, a: AcceptedAnswer) -> Self { self.filter.accepted_answer = a; self }
    pub fn has_accepted(self) -> Self { self.accepted_answer(AcceptedAnswer::Required) }
    pub fn no_accepted(self) -> Self { self.accepted_answer(AcceptedAnswer::Forbidden) }

    pub fn include_tags<I, S>(mut self, tags: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> {
        self.filter.tags_include = tags.into_iter().map(Into::into).collect(); self
    }
    pub fn exclude_tags<I, S>(mut self, tags: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> {
        self.filter.tags_exclude = tags.into_iter().map(Into::into).collect(); self
    }

    pub fn min_year(mut self, y: i32) -> Self { self.filter.min_year = Some(y); self }
    pub fn max_year(mut self, y: i32) -> Self { self.filter.max_year = Some(y); self }
    pub fn years<I: IntoIterator<Item = i32>>(mut self, years: I) -> Self {
        self.filter.specific_years = years.into_iter().collect(); self
    }

    /// Attach a cancellation flag after entering filter mode.
    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.etl.opts = self.etl.opts.with_cancel_flag(flag);
        self
    }

    pub fn filter_config(&self) -> &FilterConfig {
        &self.filter
    }

    /// All configuration checks; runs before the input is touched.
    pub fn validate(&self) -> Result<()> {
        if self.etl.opts.limit == 0 {
            return Err(ExtractError::invalid("number of posts must be greater than 0"));
        }
        self.filter.validate()
    }

    /// Run the scan with the observer implied by the options (bar or log lines).
    pub fn extract(self) -> Result<Extraction> {
        if self.etl.opts.progress {
            let total = fs::metadata(&self.etl.opts.input).map(|m| m.len()).unwrap_or(0);
            let mut bar = BarProgress::new(total, self.etl.opts.progress_label.as_deref());
            self.extract_with(&mut bar)
        } else {
            self.extract_with(&mut LogProgress)
        }
    }

    /// Run the scan reporting to `observer`. Zero accepted records is `NoMatches`.
    pub fn extract_with(self, observer: &mut dyn ProgressObserver) -> Result<Extraction> {
        self.validate()?;
        let opts = &self.etl.opts;
        tracing::info!("Extracting {} posts from '{}'", opts.limit, opts.input.display());
        tracing::debug!("filter: {:?}", self.filter);

        let filter = RecordFilter::new(self.filter);
        let mut extractor = StreamingExtractor::new(&filter, opts.limit).cadence(opts.cadence);
        if let Some(flag) = &opts.cancel {
            extractor = extractor.cancel_flag(flag.clone());
        }

        let extraction = extractor.extract_path(&opts.input, opts.read_buffer_bytes, observer)?;
        if extraction.is_empty() {
            return Err(ExtractError::NoMatches { scanned: extraction.scanned() });
        }
        Ok(extraction)
    }

    /// Extract, then persist in the configured format at `out_path`.
    pub fn extract_to(self, out_path: &Path) -> Result<RunReport> {
        let format = self.etl.opts.format;
        let write_buf = self.etl.opts.write_buffer_bytes;
        let cancel = self.etl.opts.cancel.clone();
        let extraction = self.extract()?;
        finish_run(extraction, format, out_path, write_buf, cancel)
    }

    /// Same as `extract_to` with an explicit observer.
    pub fn extract_to_with(self, out_path: &Path, observer: &mut dyn ProgressObserver) -> Result<RunReport> {
        let format = self.etl.opts.format;
        let write_buf = self.etl.opts.write_buffer_bytes;
        let cancel = self.etl.opts.cancel.clone();
        let extraction = self.extract_with(observer)?;
        finish_run(extraction, format, out_path, write_buf, cancel)
    }
}

fn finish_run(
    extraction: Extraction,
    format: OutputFormat,
    out_path: &Path,
    write_buf: usize,
    cancel: Option<CancelFlag>,
) -> Result<RunReport> {
    let scanned = extraction.scanned();
    let accepted = extraction.accepted();
    let breakdown = post_type_breakdown(&extraction.records);

    let written = match write_output(format, extraction.into_records(), out_path, write_buf, cancel.as_ref()) {
        Err(ExtractError::WriteFailure { source, .. })
            if source.kind() == io::ErrorKind::Interrupted && cancel.as_ref().is_some_and(CancelFlag::is_cancelled) =>
        {
            tracing::warn!("extraction cancelled before '{}' was written", out_path.display());
            return Err(ExtractError::Cancelled { scanned, accepted: accepted as u64 });
        }
        other => other?,
    };
    let output_bytes = fs::metadata(out_path).map(|m| m.len()).unwrap_or(0);
    tracing::info!("wrote {} records to '{}'", written, out_path.display());

    Ok(RunReport { output: out_path.to_path_buf(), format, scanned, accepted, written, output_bytes, breakdown })
}
