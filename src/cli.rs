//! Command-line interface for the extractor.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::output::OutputFormat;
use crate::pipeline::{PostExtractor, ScanPlan};
use crate::progress::ProgressCadence;
use crate::query::AcceptedAnswer;
use crate::error::ExtractError;
use crate::streaming::CancelFlag;
use crate::util::{cancel_on_interrupt, init_tracing_once};

/// Extract and filter posts from a Stack Exchange XML dump.
#[derive(Parser, Debug)]
#[command(name = "se-extract")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  se-extract Posts.xml 10
  se-extract Posts.xml 20 --questions-only --min-score 5 -f topics
  se-extract Posts.xml 15 --include-tags calculus,algebra --min-answers 2
  se-extract Posts.xml 25 --exclude-tags homework --min-views 1000
  se-extract Posts.xml 30 --min-year 2020 --max-year 2023
  se-extract Posts.xml.zst 15 --years 2015,2018,2022 --questions-only")]
pub struct Cli {
    /// Path to the input dump (plain XML or .zst)
    pub input_file: PathBuf,

    /// Number of posts to extract
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub num_posts: u64,

    /// Output file (default depends on the format)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Echo)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Log a progress line every N scanned records (with --no-progress)
    #[arg(long, default_value_t = 5000)]
    pub progress_every: u64,

    /// Extract only questions (PostTypeId=1)
    #[arg(long, conflicts_with_all = ["answers_only", "any_type"])]
    pub questions_only: bool,

    /// Extract only answers (PostTypeId=2)
    #[arg(long, conflicts_with = "any_type")]
    pub answers_only: bool,

    /// Do not filter on post type at all
    #[arg(long)]
    pub any_type: bool,

    /// Minimum score threshold
    #[arg(long, allow_negative_numbers = true)]
    pub min_score: Option<i64>,

    /// Maximum score threshold
    #[arg(long, allow_negative_numbers = true)]
    pub max_score: Option<i64>,

    /// Minimum number of answers (questions only)
    #[arg(long)]
    pub min_answers: Option<i64>,

    /// Minimum view count (questions only)
    #[arg(long)]
    pub min_views: Option<i64>,

    /// Only questions with an accepted answer
    #[arg(long, conflicts_with = "no_accepted")]
    pub has_accepted: bool,

    /// Only questions without an accepted answer
    #[arg(long)]
    pub no_accepted: bool,

    /// Include posts with any of these tags (comma-separated, questions only)
    #[arg(long, value_delimiter = ',')]
    pub include_tags: Vec<String>,

    /// Exclude posts with any of these tags (comma-separated, questions only)
    #[arg(long, value_delimiter = ',')]
    pub exclude_tags: Vec<String>,

    /// Minimum post year (e.g. 2015)
    #[arg(long)]
    pub min_year: Option<i32>,

    /// Maximum post year (e.g. 2023)
    #[arg(long)]
    pub max_year: Option<i32>,

    /// Specific years only (comma-separated, e.g. 2015,2018,2022)
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["min_year", "max_year"])]
    pub years: Vec<i32>,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from(self.format.default_output()))
    }

    /// Translate parsed arguments into a configured scan.
    pub fn to_plan(&self) -> ScanPlan {
        let mut plan = PostExtractor::new()
            .input(&self.input_file)
            .limit(self.num_posts)
            .format(self.format)
            .progress(!self.no_progress)
            .progress_label("Scanning")
            .cadence(ProgressCadence::EveryScanned(self.progress_every))
            .scan();

        if self.questions_only {
            plan = plan.questions_only();
        } else if self.answers_only {
            plan = plan.answers_only();
        } else if self.any_type {
            plan = plan.any_type();
        }
        if let Some(v) = self.min_score { plan = plan.min_score(v); }
        if let Some(v) = self.max_score { plan = plan.max_score(v); }
        if let Some(v) = self.min_answers { plan = plan.min_answers(v); }
        if let Some(v) = self.min_views { plan = plan.min_views(v); }
        plan = plan.accepted_answer(AcceptedAnswer::from_flags(self.has_accepted, self.no_accepted));
        if !self.include_tags.is_empty() { plan = plan.include_tags(self.include_tags.iter().cloned()); }
        if !self.exclude_tags.is_empty() { plan = plan.exclude_tags(self.exclude_tags.iter().cloned()); }
        if let Some(y) = self.min_year { plan = plan.min_year(y); }
        if let Some(y) = self.max_year { plan = plan.max_year(y); }
        if !self.years.is_empty() { plan = plan.years(self.years.iter().copied()); }
        plan
    }

    fn print_config(&self) {
        println!("Input file: {}", self.input_file.display());
        println!("Extracting {} posts...", self.num_posts);
        if self.questions_only {
            println!("Filter: Questions only");
        } else if self.answers_only {
            println!("Filter: Answers only");
        }
        if let Some(v) = self.min_score { println!("Filter: Minimum score >= {v}"); }
        if let Some(v) = self.max_score { println!("Filter: Maximum score <= {v}"); }
        if !self.include_tags.is_empty() { println!("Filter: Include tags: {}", self.include_tags.join(",")); }
        if !self.exclude_tags.is_empty() { println!("Filter: Exclude tags: {}", self.exclude_tags.join(",")); }
        if self.min_year.is_some() || self.max_year.is_some() {
            let show = |y: Option<i32>| y.map(|y| y.to_string()).unwrap_or_else(|| "any".into());
            println!("Filter: Years: {} to {}", show(self.min_year), show(self.max_year));
        } else if !self.years.is_empty() {
            let mut ys = self.years.clone();
            ys.sort_unstable();
            println!("Filter: Years {ys:?}");
        }
    }
}

/// Message printed when a user interrupt stops the run.
pub const CANCELLED_MESSAGE: &str = "Operation cancelled by user";

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing_once(if cli.verbose { "debug" } else { "info" });

    let cancel = CancelFlag::new();
    if let Err(e) = cancel_on_interrupt(cancel.clone()) {
        tracing::warn!("Ctrl-C will terminate without cleanup: {e}");
    }
    execute_with(&cli, cancel)
}

/// Execute a parsed command line.
pub fn execute(cli: &Cli) -> Result<()> {
    execute_with(cli, CancelFlag::new())
}

/// Execute a parsed command line, stopping early once `cancel` is raised.
pub fn execute_with(cli: &Cli, cancel: CancelFlag) -> Result<()> {
    if cli.verbose {
        cli.print_config();
    }

    let output = cli.output_path();
    let report = cli
        .to_plan()
        .cancel_flag(cancel)
        .extract_to(&output)
        .with_context(|| format!("extracting from '{}'", cli.input_file.display()))?;

    println!("Successfully extracted {} posts to '{}'", report.accepted, output.display());
    if cli.verbose {
        println!();
        println!("{report}");
    }
    Ok(())
}

/// Line printed to stderr for a failed run.
pub fn failure_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ExtractError>() {
        Some(ExtractError::Cancelled { .. }) => CANCELLED_MESSAGE.to_string(),
        _ => format!("Error: {err:#}"),
    }
}
