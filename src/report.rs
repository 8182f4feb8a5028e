//! Run summary: counters, output size, and the post-type breakdown printed in verbose mode.

use crate::output::OutputFormat;
use crate::record::{Record, ANSWER, QUESTION};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Breakdown key for records without a `PostTypeId` attribute.
pub const UNKNOWN_POST_TYPE: &str = "Unknown";

/// Accepted records per raw `PostTypeId`.
pub fn post_type_breakdown(records: &[Record]) -> BTreeMap<String, u64> {
    let mut m = BTreeMap::new();
    for r in records {
        *m.entry(r.get_or("PostTypeId", UNKNOWN_POST_TYPE).to_string()).or_insert(0) += 1;
    }
    m
}

pub fn post_type_name(id: &str) -> String {
    match id {
        QUESTION => "Questions".to_string(),
        ANSWER => "Answers".to_string(),
        UNKNOWN_POST_TYPE => UNKNOWN_POST_TYPE.to_string(),
        other => format!("Type {other}"),
    }
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub scanned: u64,
    pub accepted: usize,
    pub written: usize,
    pub output_bytes: u64,
    pub breakdown: BTreeMap<String, u64>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Extraction Summary:")?;
        writeln!(f, "  Total records processed: {}", self.scanned)?;
        writeln!(f, "  Posts extracted: {}", self.accepted)?;
        if self.written != self.accepted {
            writeln!(f, "  Elements written: {}", self.written)?;
        }
        writeln!(f, "  Post type breakdown:")?;
        for (id, n) in &self.breakdown {
            writeln!(f, "    {}: {}", post_type_name(id), n)?;
        }
        write!(f, "Output file size: {:.1} KB", self.output_bytes as f64 / 1024.0)
    }
}
