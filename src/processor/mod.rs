//! # Processor Module
//!
//! This module drives the batch: it collects candidate files, runs the
//! rewrite engine over each and writes the results back.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and writing operations
//! - [`content_transformer`] - The rewrite engine (replace or insert headers)
//! - [`file_collector`] - Directory traversal and candidate selection
//!
//! The [`Processor`] struct is the main entry point for all file operations,
//! orchestrating the submodules to provide a cohesive API.

mod content_transformer;
mod file_collector;
mod file_io;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
pub use content_transformer::{ContentTransformer, Rewrite, RewriteAction};
pub use file_collector::{Candidate, Collected, FileCollector, LICENSEIGNORE_FILENAME, display_relative};
pub use file_io::FileIO;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::diff::DiffManager;
use crate::file_filter::{ExtensionFilter, IgnoreFilter};
use crate::header::CanonicalHeader;
use crate::license_detection::{AttributionDetector, DEFAULT_ATTRIBUTION, LicenseDetector};
use crate::report::{FileAction, FileReport};
use crate::scanner::{DEFAULT_OPEN_TAG, HeaderSearch};
use crate::verbose_log;

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  /// Directory (or single file) to process
  pub root: PathBuf,
  /// Extensions that make a file a candidate
  pub extensions: Vec<String>,

  pub header: CanonicalHeader,
  pub attribution: String,
  pub open_tag: String,
  pub tagged_extensions: Vec<String>,
  pub header_search: HeaderSearch,

  // Behavior flags
  pub check_only: bool,

  // Optional components
  pub ignore_patterns: Vec<String>,
  pub diff_manager: Option<DiffManager>,
  pub license_detector: Option<Arc<dyn LicenseDetector>>,
}

impl ProcessorConfig {
  /// Creates a new ProcessorConfig with required fields and sensible defaults.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     check_only: true,
  ///     ..ProcessorConfig::new(root, vec!["php".to_string()])
  /// }
  /// ```
  pub fn new(root: PathBuf, extensions: Vec<String>) -> Self {
    Self {
      root,
      extensions,
      header: CanonicalHeader::default(),
      attribution: DEFAULT_ATTRIBUTION.to_string(),
      open_tag: DEFAULT_OPEN_TAG.to_string(),
      tagged_extensions: vec!["php".to_string()],
      header_search: HeaderSearch::default(),
      check_only: false,
      ignore_patterns: vec![],
      diff_manager: None,
      license_detector: None,
    }
  }
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct ProcessOutcome {
  /// One report per candidate or ignored file, sorted by path.
  pub reports: Vec<FileReport>,
}

impl ProcessOutcome {
  /// Whether any file changed (or would change in check mode).
  pub fn has_changes(&self) -> bool {
    self.reports.iter().any(|r| r.action.is_change())
  }

  pub fn has_failures(&self) -> bool {
    self.reports.iter().any(|r| r.action == FileAction::Failed)
  }
}

/// Processor for canonicalizing license headers in a source tree.
///
/// The `Processor` is responsible for:
/// - Collecting candidate files under the root
/// - Running the rewrite engine over each file
/// - Writing changed files back (or only reporting them in check mode)
/// - Showing diffs when requested
/// - Collecting report data about processed files
///
/// A failure on one file is recorded in its report and does not stop the
/// remaining files from being processed.
pub struct Processor {
  file_collector: FileCollector,

  content_transformer: ContentTransformer,

  /// Whether to only check for headers without modifying files
  check_only: bool,

  /// Manager for handling diff creation and rendering
  diff_manager: DiffManager,
}

impl Processor {
  /// Batch size for processing files to reduce overhead.
  const BATCH_SIZE: usize = 8;

  /// Creates a new processor with the specified configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  /// - Any of the ignore patterns are invalid
  /// - The attribution phrase cannot be compiled
  pub fn new(config: ProcessorConfig) -> Result<Self> {
    let ignore_filter = IgnoreFilter::from_patterns(&config.root, &config.ignore_patterns)?;
    let extension_filter = ExtensionFilter::new(&config.extensions);
    if extension_filter.is_empty() {
      return Err(anyhow::anyhow!("At least one file extension must be selected"));
    }

    let license_detector: Arc<dyn LicenseDetector> = match config.license_detector {
      Some(detector) => detector,
      None => Arc::new(AttributionDetector::new(&config.attribution)?),
    };

    let content_transformer = ContentTransformer::new(
      config.header,
      license_detector,
      config.open_tag,
      config.header_search,
    );

    let file_collector = FileCollector::new(
      config.root,
      extension_filter,
      ignore_filter,
      config.tagged_extensions,
    );

    Ok(Self {
      file_collector,
      content_transformer,
      check_only: config.check_only,
      diff_manager: config.diff_manager.unwrap_or_else(|| DiffManager::new(false, None)),
    })
  }

  pub fn root(&self) -> &Path {
    self.file_collector.root()
  }

  /// Collects the candidate files without processing them.
  pub fn collect(&self) -> Result<Collected> {
    self.file_collector.collect()
  }

  /// Collects and processes all candidate files under the root.
  ///
  /// # Errors
  ///
  /// Returns an error only if the root itself cannot be accessed. Per-file
  /// failures are reported in the outcome.
  pub fn process(&self) -> Result<ProcessOutcome> {
    let collected = self.collect()?;
    Ok(self.process_collected(collected))
  }

  /// Processes files from a pre-collected list.
  pub fn process_collected(&self, collected: Collected) -> ProcessOutcome {
    let mut reports: Vec<FileReport> = collected
      .skipped
      .into_iter()
      .map(|(candidate, reason)| {
        FileReport::new(candidate.path, candidate.dialect, FileAction::Skipped).with_detail(reason)
      })
      .collect();

    let candidates = collected.candidates;
    if candidates.is_empty() {
      debug!("No files to process");
      return ProcessOutcome { reports };
    }

    let process_start = std::time::Instant::now();
    debug!(
      "Processing {} files in batches of {}",
      candidates.len(),
      Self::BATCH_SIZE
    );

    let batch_results: Vec<Vec<(FileReport, Option<String>)>> = candidates
      .par_chunks(Self::BATCH_SIZE)
      .map(|batch| batch.iter().map(|candidate| self.process_candidate(candidate)).collect())
      .collect();

    let mut processed: Vec<(FileReport, Option<String>)> = batch_results.into_iter().flatten().collect();
    processed.sort_by(|a, b| a.0.path.cmp(&b.0.path));

    // Saved once, after the batch, so the diff file follows path order
    if let Err(e) = self
      .diff_manager
      .save_diffs(processed.iter().filter_map(|(_, diff)| diff.as_deref()))
    {
      eprintln!("Warning: Failed to save diffs: {:#}", e);
    }

    reports.extend(processed.into_iter().map(|(report, _)| report));
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    debug!(
      "Processed {} files in {}ms",
      reports.len(),
      process_start.elapsed().as_millis()
    );

    ProcessOutcome { reports }
  }

  /// Processes one candidate, turning any error into a `Failed` report.
  fn process_candidate(&self, candidate: &Candidate) -> (FileReport, Option<String>) {
    match self.process_file(candidate) {
      Ok((action, diff)) => (FileReport::new(&candidate.path, candidate.dialect, action), diff),
      Err(e) => {
        eprintln!("Error processing {}: {:#}", candidate.path.display(), e);
        let report =
          FileReport::new(&candidate.path, candidate.dialect, FileAction::Failed).with_detail(format!("{:#}", e));
        (report, None)
      }
    }
  }

  /// Reads, transforms and (unless in check mode) writes a single file.
  ///
  /// The read handle is closed before the transformation runs and the write
  /// only starts once the new content is complete.
  ///
  /// Returns the action taken and, when diff output is enabled and the file
  /// changed, the rendered diff.
  pub fn process_file(&self, candidate: &Candidate) -> Result<(FileAction, Option<String>)> {
    let path = &candidate.path;
    let content = FileIO::read_full_content(path)?;

    let rewrite = self.content_transformer.transform(&content, candidate.dialect);
    trace!("{}: {:?}", path.display(), rewrite.action);

    if rewrite.content == content {
      verbose_log!("Unchanged: {}", path.display());
      return Ok((FileAction::Unchanged, None));
    }

    let action = if rewrite.action.is_insert() {
      FileAction::Inserted
    } else {
      FileAction::Replaced
    };

    let diff = self
      .diff_manager
      .is_enabled()
      .then(|| self.diff_manager.display_diff(path, &content, &rewrite.content));

    if !self.check_only {
      FileIO::write_file(path, &rewrite.content)?;
      verbose_log!("Header {}: {}", action, path.display());
    }

    Ok((action, diff))
  }

  /// Checks if the content already carries a license header.
  pub fn has_license(&self, content: &str) -> bool {
    self.content_transformer.has_license(content)
  }
}
