//! # Report Module
//!
//! This module provides functionality for generating reports of header
//! processing in JSON or CSV form.
//!
//! It captures information about each candidate file, including its dialect,
//! the action taken and any error, and can output this information in the
//! requested format.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::scanner::Dialect;

/// Information about a processed file for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// Dialect the file was processed as
  pub dialect: Dialect,
  /// Action taken on the file (or that would be taken in check mode)
  pub action: FileAction,
  /// Error message or skip reason, if any
  #[serde(skip_serializing_if = "Option::is_none")]
  pub detail: Option<String>,
}

impl FileReport {
  pub fn new(path: impl Into<PathBuf>, dialect: Dialect, action: FileAction) -> Self {
    Self {
      path: path.into(),
      dialect,
      action,
      detail: None,
    }
  }

  pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
    self.detail = Some(detail.into());
    self
  }
}

/// Possible actions taken on a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
  /// An existing header was replaced with the canonical one
  Replaced,
  /// A header was inserted (after the open tag or at the top)
  Inserted,
  /// The file already carried the canonical header exactly
  Unchanged,
  /// The file could not be read or written
  Failed,
  /// The file matched an ignore pattern
  Skipped,
}

impl FileAction {
  /// Whether the file content differs (or would differ) after processing.
  pub const fn is_change(self) -> bool {
    matches!(self, Self::Replaced | Self::Inserted)
  }
}

impl std::fmt::Display for FileAction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FileAction::Replaced => write!(f, "replaced"),
      FileAction::Inserted => write!(f, "inserted"),
      FileAction::Unchanged => write!(f, "unchanged"),
      FileAction::Failed => write!(f, "failed"),
      FileAction::Skipped => write!(f, "skipped"),
    }
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// JSON format for machine readability
  Json,
  /// CSV format for spreadsheet compatibility
  Csv,
}

impl std::fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ReportFormat::Json => write!(f, "JSON"),
      ReportFormat::Csv => write!(f, "CSV"),
    }
  }
}

/// Error returned when parsing a string into a ReportFormat fails
#[derive(Debug, thiserror::Error)]
#[error("Invalid report format: {0}")]
pub struct ParseReportFormatError(pub String);

impl std::str::FromStr for ReportFormat {
  type Err = ParseReportFormatError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "json" => Ok(ReportFormat::Json),
      "csv" => Ok(ReportFormat::Csv),
      _ => Err(ParseReportFormatError(s.to_string())),
    }
  }
}

/// Report Generator for creating header reports
pub struct ReportGenerator<'a> {
  /// Format of the report to generate
  format: ReportFormat,
  /// Path where the report will be saved
  output_path: &'a Path,
}

impl<'a> ReportGenerator<'a> {
  /// Create a new report generator
  ///
  /// # Parameters
  ///
  /// * `format` - The format to use for the report
  /// * `output_path` - The path where the report will be saved
  pub const fn new(format: ReportFormat, output_path: &'a Path) -> Self {
    Self { format, output_path }
  }

  /// Generate a report from a collection of file reports
  ///
  /// # Returns
  ///
  /// `Ok(())` if the report was generated successfully, or an error if the
  /// report couldn't be generated or written to disk.
  pub fn generate(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
    let content = match self.format {
      ReportFormat::Json => Self::generate_json(files, summary)?,
      ReportFormat::Csv => Self::generate_csv(files, summary),
    };

    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write report to {}", self.output_path.display()))
  }

  fn generate_json(files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
    let report = serde_json::json!({
      "summary": summary,
      "files": files,
    });

    Ok(serde_json::to_string_pretty(&report)?)
  }

  fn generate_csv(files: &[FileReport], summary: &ProcessingSummary) -> String {
    let mut csv = String::new();

    csv.push_str("file_path,dialect,action,notes\n");

    for file in files {
      let path = file.path.to_string_lossy().replace(',', "%2C"); // Escape commas in path
      let note = file
        .detail
        .as_deref()
        .map(|d| d.replace(',', "%2C").replace('\n', " "))
        .unwrap_or_default();

      csv.push_str(&format!("{},{},{},{}\n", path, file.dialect, file.action, note));
    }

    csv.push_str("\n# Summary\n");
    csv.push_str(&format!("Total files,{}\n", summary.total_files));
    csv.push_str(&format!("Headers replaced,{}\n", summary.replaced));
    csv.push_str(&format!("Headers inserted,{}\n", summary.inserted));
    csv.push_str(&format!("Unchanged,{}\n", summary.unchanged));
    csv.push_str(&format!("Failed,{}\n", summary.failed));
    csv.push_str(&format!("Skipped,{}\n", summary.skipped));
    csv.push_str(&format!(
      "Processing time (seconds),{:.2}\n",
      summary.processing_time.as_secs_f64()
    ));
    csv.push_str(&format!("Generated on,{}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));

    csv
  }
}

/// Summary of the processing results
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  /// Total number of files reported
  pub total_files: usize,
  /// Number of headers replaced
  pub replaced: usize,
  /// Number of headers inserted
  pub inserted: usize,
  /// Number of files already canonical
  pub unchanged: usize,
  /// Number of files that failed
  pub failed: usize,
  /// Number of files skipped by ignore patterns
  pub skipped: usize,
  /// Total processing time
  #[serde(skip_serializing)]
  pub processing_time: std::time::Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// Timestamp when the report was generated
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<i64>,
}

impl ProcessingSummary {
  /// Create a new ProcessingSummary initialized to zero
  pub fn new(processing_time: std::time::Duration) -> Self {
    Self {
      total_files: 0,
      replaced: 0,
      inserted: 0,
      unchanged: 0,
      failed: 0,
      skipped: 0,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Some(Local::now().timestamp()),
    }
  }

  /// Create a ProcessingSummary from a collection of FileReports
  pub fn from_reports(files: &[FileReport], processing_time: std::time::Duration) -> Self {
    let mut summary = Self::new(processing_time);

    summary.total_files = files.len();

    for file in files {
      match file.action {
        FileAction::Replaced => summary.replaced += 1,
        FileAction::Inserted => summary.inserted += 1,
        FileAction::Unchanged => summary.unchanged += 1,
        FileAction::Failed => summary.failed += 1,
        FileAction::Skipped => summary.skipped += 1,
      }
    }

    summary
  }

  /// Number of files whose content changed or would change.
  pub const fn changed(&self) -> usize {
    self.replaced + self.inserted
  }
}
