//! # Rewrite Command
//!
//! This module implements the single relicense command: canonicalize the
//! license header of every selected file under a directory.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::config::{Config, load_config};
use crate::diff::DiffManager;
use crate::header::CanonicalHeader;
use crate::info_log;
use crate::license_detection::DEFAULT_ATTRIBUTION;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{
  CategorizedReports, print_all_files_ok, print_blank_line, print_failed_files, print_hint, print_inserted_files,
  print_replaced_files, print_start_message, print_summary,
};
use crate::processor::{Processor, ProcessorConfig};
use crate::report::{FileReport, ProcessingSummary, ReportFormat, ReportGenerator};
use crate::scanner::{DEFAULT_OPEN_TAG, HeaderSearch};

/// Arguments for the rewrite command
#[derive(Args, Debug, Default)]
pub struct RewriteArgs {
  /// Directory to process recursively (a single file is also accepted)
  #[arg(value_name = "DIRECTORY")]
  pub directory: PathBuf,

  /// File extensions to process, without the leading dot (e.g. cpp h php)
  #[arg(value_name = "EXTENSIONS", required = true, num_args = 1..)]
  pub extensions: Vec<String>,

  /// File holding the canonical header text [default: built-in Apache-2.0
  /// header]
  #[arg(long, short = 'f', value_name = "FILE")]
  pub header_file: Option<PathBuf>,

  /// Phrase that marks an existing license header (case-insensitive)
  #[arg(long, value_name = "PHRASE")]
  pub attribution: Option<String>,

  /// Open tag that must stay in front of the header in tagged files
  #[arg(long, value_name = "MARKER")]
  pub open_tag: Option<String>,

  /// Extensions handled as the tagged dialect (repeatable) [default: php]
  #[arg(long, value_name = "EXT")]
  pub tagged_ext: Vec<String>,

  /// How the end of an existing header is located [default: independent]
  #[arg(long, value_name = "MODE", value_enum)]
  pub header_search: Option<HeaderSearch>,

  /// Dry run: report the files that would change without writing them
  #[arg(long)]
  pub check: bool,

  /// Show a diff of every change
  #[arg(long)]
  pub show_diff: bool,

  /// Save the diff of every change to a file
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// File patterns to ignore (supports glob patterns)
  #[arg(long, short = 'i')]
  pub ignore: Vec<String>,

  /// Path to config file (default: .relicense.toml in DIRECTORY)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Generate a JSON report and save it to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Generate a CSV report and save it to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_csv: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl RewriteArgs {
  /// Validate the arguments and return an error if invalid
  fn validate(&self) -> Result<(), String> {
    if self.attribution.as_deref().is_some_and(|a| a.trim().is_empty()) {
      return Err("--attribution cannot be empty".to_string());
    }
    if self.open_tag.as_deref().is_some_and(|t| t.is_empty()) {
      return Err("--open-tag cannot be empty".to_string());
    }
    if self.extensions.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
      return Err("At least one non-empty extension is required".to_string());
    }
    Ok(())
  }
}

/// Settings after merging CLI flags over the config file.
struct Settings {
  header: CanonicalHeader,
  attribution: String,
  open_tag: String,
  tagged_extensions: Vec<String>,
  header_search: HeaderSearch,
  ignore_patterns: Vec<String>,
}

impl Settings {
  /// CLI flags win over config values, config values over built-in defaults.
  fn resolve(args: &RewriteArgs, config: Option<Config>) -> Result<Self> {
    let config = config.unwrap_or_default();

    let header_file = args.header_file.clone().or(config.header_file);
    let header = match header_file {
      Some(path) => CanonicalHeader::load(&path)
        .with_context(|| format!("Failed to load header from {}", path.display()))?,
      None => CanonicalHeader::default(),
    };

    let tagged_extensions = if args.tagged_ext.is_empty() {
      config.tagged_extensions.unwrap_or_else(|| vec!["php".to_string()])
    } else {
      args.tagged_ext.clone()
    };

    let mut ignore_patterns = config.ignore;
    ignore_patterns.extend(args.ignore.iter().cloned());

    Ok(Self {
      header,
      attribution: args
        .attribution
        .clone()
        .or(config.attribution)
        .unwrap_or_else(|| DEFAULT_ATTRIBUTION.to_string()),
      open_tag: args
        .open_tag
        .clone()
        .or(config.open_tag)
        .unwrap_or_else(|| DEFAULT_OPEN_TAG.to_string()),
      tagged_extensions,
      header_search: args.header_search.or(config.header_search).unwrap_or_default(),
      ignore_patterns,
    })
  }
}

/// Run the rewrite command with the given arguments.
///
/// Exits the process with status 1 when any file failed, or when `--check`
/// finds files that would change.
pub fn run_rewrite(args: RewriteArgs) -> Result<()> {
  if let Err(e) = args.validate() {
    eprintln!("ERROR: {e}");
    process::exit(1);
  }

  // Initialize tracing subscriber for structured logging
  init_tracing(args.quiet, args.verbose);

  // Set verbose mode for output formatting and info_log! macro
  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let root = args.directory.clone();
  let config = load_config(args.config.as_deref(), &root, args.no_config)?;
  if config.is_some() {
    debug!("Using configuration file");
  }

  let settings = Settings::resolve(&args, config)?;
  debug!(
    "Header: {} lines, attribution: {:?}, open tag: {:?}, tagged: {:?}, search: {:?}",
    settings.header.line_count(),
    settings.attribution,
    settings.open_tag,
    settings.tagged_extensions,
    settings.header_search
  );

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff.clone());
  diff_manager.init()?;

  let check_only = args.check;
  let processor = Processor::new(ProcessorConfig {
    header: settings.header,
    attribution: settings.attribution,
    open_tag: settings.open_tag,
    tagged_extensions: settings.tagged_extensions,
    header_search: settings.header_search,
    check_only,
    ignore_patterns: settings.ignore_patterns,
    diff_manager: Some(diff_manager),
    ..ProcessorConfig::new(root, args.extensions.clone())
  })?;

  let collected = processor.collect()?;
  print_start_message(collected.candidates.len(), check_only);

  let start_time = Instant::now();
  let outcome = processor.process_collected(collected);
  let elapsed = start_time.elapsed();

  let reports = outcome.reports;
  let summary = ProcessingSummary::from_reports(&reports, elapsed);
  let display_root = display_root(processor.root());

  print_results(&reports, &summary, display_root, check_only);
  write_reports(&args, &reports, &summary);

  if summary.failed > 0 || (check_only && summary.changed() > 0) {
    process::exit(1);
  }

  Ok(())
}

/// Paths are listed relative to the directory being processed.
fn display_root(root: &Path) -> &Path {
  if root.is_file() {
    root.parent().unwrap_or(root)
  } else {
    root
  }
}

fn print_results(reports: &[FileReport], summary: &ProcessingSummary, root: &Path, check_only: bool) {
  let categorized = CategorizedReports::from_reports(reports);

  print_blank_line();

  if !categorized.replaced.is_empty() {
    print_replaced_files(&categorized.replaced, root, check_only);
  }
  if !categorized.inserted.is_empty() {
    if !categorized.replaced.is_empty() {
      print_blank_line();
    }
    print_inserted_files(&categorized.inserted, root, check_only);
  }

  if !categorized.failed.is_empty() {
    if categorized.has_changes() {
      print_blank_line();
    }
    print_failed_files(&categorized.failed, root);
  } else if !categorized.has_changes() {
    print_all_files_ok();
  }

  print_blank_line();
  print_summary(summary);

  if check_only && categorized.has_changes() {
    print_blank_line();
    print_hint("Run without --check to write the canonical header.");
  }
}

fn write_reports(args: &RewriteArgs, reports: &[FileReport], summary: &ProcessingSummary) {
  let requested = [
    (ReportFormat::Json, args.report_json.as_deref()),
    (ReportFormat::Csv, args.report_csv.as_deref()),
  ];

  for (format, output_path) in requested {
    let Some(output_path) = output_path else {
      continue;
    };
    let report_generator = ReportGenerator::new(format, output_path);
    if let Err(e) = report_generator.generate(reports, summary) {
      eprintln!("Error generating {} report: {:#}", format, e);
    } else {
      info_log!("Generated {} report at {}", format, output_path.display());
    }
  }
}
