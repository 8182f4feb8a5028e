mod config;
mod date;
mod error;
mod record;
mod tags;

mod query;
mod filters;
mod rows;
mod streaming;
mod progress;

mod output;
mod report;
mod util;
mod pipeline;

pub mod cli;

pub use crate::config::ExtractOptions;
pub use crate::date::{current_year, extract_year, EARLIEST_DUMP_YEAR};
pub use crate::error::{ExtractError, Result};
pub use crate::record::{Record, ANSWER, DEFAULT_POST_TYPE, QUESTION};
pub use crate::tags::{joined_tags, tag_list, tag_set};

pub use crate::query::{AcceptedAnswer, FilterConfig, PostTypes};
pub use crate::filters::{matches_record, RecordFilter};
pub use crate::rows::{open_source, RowReader};
pub use crate::streaming::{CancelFlag, Extraction, ExtractionState, StreamingExtractor};

// Progress observers (injected into the extractor).
pub use crate::progress::{BarProgress, CollectProgress, Fanout, LogProgress, NoProgress, ProgressCadence, ProgressObserver};

pub use crate::output::{
    collapse_whitespace, escape_attr, write_output, EchoFormatter, JsonlFormatter, OutputFormat, OutputFormatter,
    TopicsFormatter,
};
pub use crate::report::{post_type_breakdown, post_type_name, RunReport, UNKNOWN_POST_TYPE};
pub use crate::pipeline::{PostExtractor, ScanPlan};

// Robust file ops and tracing setup, for binaries embedding the library.
pub use crate::util::{
    cancel_on_interrupt, create_with_backoff, init_tracing_once, open_with_backoff, replace_file_atomic_backoff,
};
