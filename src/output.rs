//! # Output Module
//!
//! This module centralizes all user-facing output for relicense.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! More detail with `-v`, silence with `-q`. In quiet mode the changed and
//! failed lists degrade to bare paths so they can be piped.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::processor::display_relative;
use crate::report::{FileAction, FileReport, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Success
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Header replaced
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Processing N files..." or "Checking N files..." message.
pub fn print_start_message(file_count: usize, check_only: bool) {
  if is_quiet() {
    return;
  }

  let verb = if check_only { "Checking" } else { "Processing" };
  println!("{} {} {}...", verb, file_count, plural(file_count));
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Reports grouped by the action taken.
pub struct CategorizedReports<'a> {
  pub replaced: Vec<&'a FileReport>,
  pub inserted: Vec<&'a FileReport>,
  pub failed: Vec<&'a FileReport>,
  pub unchanged: Vec<&'a FileReport>,
  pub skipped: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  /// Categorize a slice of file reports.
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut categorized = Self {
      replaced: Vec::new(),
      inserted: Vec::new(),
      failed: Vec::new(),
      unchanged: Vec::new(),
      skipped: Vec::new(),
    };

    for report in reports {
      let bucket = match report.action {
        FileAction::Replaced => &mut categorized.replaced,
        FileAction::Inserted => &mut categorized.inserted,
        FileAction::Failed => &mut categorized.failed,
        FileAction::Unchanged => &mut categorized.unchanged,
        FileAction::Skipped => &mut categorized.skipped,
      };
      bucket.push(report);
    }

    categorized
  }

  pub fn has_changes(&self) -> bool {
    !self.replaced.is_empty() || !self.inserted.is_empty()
  }
}

/// Print the files whose header was (or would be) replaced.
pub fn print_replaced_files(files: &[&FileReport], root: &Path, check_only: bool) {
  let verb = if check_only { "Would replace" } else { "Replaced" };
  let header = format!(
    "{} {} header in {} {}:",
    symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()),
    verb,
    files.len(),
    plural(files.len())
  );
  print_file_list(&header, files, root, false);
}

/// Print the files that received (or would receive) a new header.
pub fn print_inserted_files(files: &[&FileReport], root: &Path, check_only: bool) {
  let verb = if check_only { "Would insert" } else { "Inserted" };
  let header = format!(
    "{} {} header in {} {}:",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    verb,
    files.len(),
    plural(files.len())
  );
  print_file_list(&header, files, root, false);
}

/// Print the files that could not be processed, with the error.
pub fn print_failed_files(files: &[&FileReport], root: &Path) {
  let header = format!(
    "{} Failed to process {} {}:",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    files.len(),
    plural(files.len())
  );
  print_file_list(&header, files, root, true);
}

fn print_file_list(header: &str, files: &[&FileReport], root: &Path, with_detail: bool) {
  if files.is_empty() {
    return;
  }

  if is_quiet() {
    // Bare paths for scripting
    for file in files {
      println!("{}", display_relative(&file.path, root));
    }
    return;
  }

  println!("{}", header);

  let count = files.len();
  let limit = if is_verbose() { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    let display_path = display_relative(&file.path, root);
    match file.detail.as_deref() {
      Some(detail) if with_detail => println!(
        "  {} ({})",
        display_path,
        detail.if_supports_color(Stream::Stdout, |s| s.dimmed())
      ),
      _ => println!("  {}", display_path),
    }
  }

  if count > limit {
    println!("  ... and {} more (use -v to see all)", count - limit);
  }
}

/// Print the success message when every file already carries the header.
pub fn print_all_files_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All files carry the canonical header.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the processing summary.
///
/// Format: "Summary: X replaced, Y inserted, Z unchanged, W failed, V skipped"
/// In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary) {
  if is_quiet() {
    return;
  }

  let failed_str = if summary.failed > 0 {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  let mut summary_line = format!(
    "Summary: {} replaced, {} inserted, {} unchanged, {} failed, {} skipped",
    summary.replaced.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.inserted.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.unchanged.if_supports_color(Stream::Stdout, |s| s.cyan()),
    failed_str,
    summary.skipped.if_supports_color(Stream::Stdout, |s| s.dimmed()),
  );

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{}", summary_line);
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

const fn plural(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}
