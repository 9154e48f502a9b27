//! # File Collector Module
//!
//! This module walks the target tree and turns it into the candidate list the
//! rewrite engine runs over: one path plus its dialect per eligible file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use tracing::{debug, trace};

use crate::file_filter::{ExtensionFilter, FileFilter, IgnoreFilter};
use crate::scanner::Dialect;

/// Name of the per-directory ignore file, gitignore syntax.
pub const LICENSEIGNORE_FILENAME: &str = ".licenseignore";

/// A file selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub path: PathBuf,
  pub dialect: Dialect,
}

/// Output of a collection pass.
#[derive(Debug, Default)]
pub struct Collected {
  /// Files to run the engine over, sorted by path.
  pub candidates: Vec<Candidate>,
  /// Files with a selected extension that an ignore pattern excluded.
  pub skipped: Vec<(Candidate, String)>,
}

/// File collector for directory traversal and candidate selection.
///
/// The `FileCollector` handles:
/// - Walking the root recursively (`.licenseignore` files are honoured)
/// - Keeping files whose extension is selected
/// - Dropping files matched by ignore patterns
/// - Classifying each remaining file as native or tagged
pub struct FileCollector {
  /// Root of the tree to process
  root: PathBuf,
  extension_filter: ExtensionFilter,
  ignore_filter: IgnoreFilter,
  tagged_extensions: Vec<String>,
}

impl FileCollector {
  /// Creates a new FileCollector.
  ///
  /// # Parameters
  ///
  /// * `root` - Directory (or single file) to process
  /// * `extension_filter` - Extensions that make a file a candidate
  /// * `ignore_filter` - Glob patterns excluding candidates
  /// * `tagged_extensions` - Extensions classified as the tagged dialect
  pub fn new(
    root: PathBuf,
    extension_filter: ExtensionFilter,
    ignore_filter: IgnoreFilter,
    tagged_extensions: Vec<String>,
  ) -> Self {
    Self {
      root,
      extension_filter,
      ignore_filter,
      tagged_extensions,
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Collects all candidate files under the root.
  ///
  /// # Errors
  ///
  /// Returns an error if the root does not exist. Unreadable entries below
  /// the root are logged and skipped.
  pub fn collect(&self) -> Result<Collected> {
    let metadata = fs::metadata(&self.root)
      .with_context(|| format!("Failed to access directory: {}", self.root.display()))?;

    let files = if metadata.is_file() {
      vec![self.root.clone()]
    } else {
      self.traverse_directory(&self.root)
    };

    let mut collected = Collected::default();
    for path in files {
      if !self.extension_filter.should_process(&path)?.should_process {
        continue;
      }

      let dialect = Dialect::classify(&path, &self.tagged_extensions);
      let result = self.ignore_filter.should_process(&path)?;
      if !result.should_process {
        trace!("Skipping: {} (matches ignore pattern)", path.display());
        let reason = result.reason.unwrap_or_else(|| "Matches ignore pattern".to_string());
        collected.skipped.push((Candidate { path, dialect }, reason));
        continue;
      }

      collected.candidates.push(Candidate { path, dialect });
    }

    collected.candidates.sort_by(|a, b| a.path.cmp(&b.path));
    collected.skipped.sort_by(|a, b| a.0.path.cmp(&b.0.path));

    debug!(
      "Selected {} candidate files ({} ignored)",
      collected.candidates.len(),
      collected.skipped.len()
    );

    Ok(collected)
  }

  /// Traverses a directory recursively and collects all regular files.
  ///
  /// Hidden files are included; only `.licenseignore` files prune the walk.
  /// Directory symlinks are not followed. A symlink to a file is kept unless
  /// its target is also collected under the root.
  fn traverse_directory(&self, dir: &Path) -> Vec<PathBuf> {
    let mut all_files = Vec::with_capacity(1000);
    let mut linked_files = Vec::new();

    debug!("Scanning directory: {}", dir.display());
    let start_time = std::time::Instant::now();

    let walker = WalkBuilder::new(dir)
      .standard_filters(false)
      .follow_links(false)
      .add_custom_ignore_filename(LICENSEIGNORE_FILENAME)
      .build();

    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          eprintln!("Error reading directory entry: {}", e);
          continue;
        }
      };

      if entry.file_type().is_some_and(|ft| ft.is_file()) {
        all_files.push(entry.into_path());
      } else if entry.path_is_symlink() && entry.path().is_file() {
        linked_files.push(entry.into_path());
      }
    }

    if !linked_files.is_empty() {
      let targets: HashSet<PathBuf> = all_files.iter().filter_map(|path| fs::canonicalize(path).ok()).collect();
      for link in linked_files {
        match fs::canonicalize(&link) {
          Ok(target) if targets.contains(&target) => {
            trace!("Skipping: {} (links to a collected file)", link.display());
          }
          Ok(_) => all_files.push(link),
          Err(e) => eprintln!("Error resolving symlink {}: {}", link.display(), e),
        }
      }
    }

    debug!(
      "Found {} files in {}ms",
      all_files.len(),
      start_time.elapsed().as_millis()
    );

    all_files
  }
}

/// Makes `path` relative to `base` for display, falling back to the path
/// itself.
pub fn display_relative(path: &Path, base: &Path) -> String {
  if let Ok(stripped) = path.strip_prefix(base)
    && !stripped.as_os_str().is_empty()
  {
    return stripped.display().to_string();
  }

  if path.is_absolute()
    && base.is_absolute()
    && let Some(rel_path) = pathdiff::diff_paths(path, base)
  {
    return rel_path.display().to_string();
  }

  path.display().to_string()
}
