//! # Processor API tests
//!
//! Runs the batch processor over scratch trees and checks the rewritten files.

mod common;

use std::fs;

use anyhow::Result;
use common::{OLD_HEADER, create_mixed_tree, read_file, write_file};
use relicense::header::{CanonicalHeader, DEFAULT_HEADER};
use relicense::processor::{Processor, ProcessorConfig};
use relicense::report::FileAction;
use relicense::scanner::{Dialect, HeaderSearch};
use tempfile::tempdir;

fn extensions(exts: &[&str]) -> Vec<String> {
  exts.iter().map(|e| e.to_string()).collect()
}

fn action_for(outcome: &relicense::processor::ProcessOutcome, suffix: &str) -> Option<FileAction> {
  outcome
    .reports
    .iter()
    .find(|r| r.path.ends_with(suffix))
    .map(|r| r.action)
}

#[test]
fn test_process_mixed_tree() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  create_mixed_tree(root)?;

  let processor = Processor::new(ProcessorConfig::new(root.to_path_buf(), extensions(&["c", "cpp", "h", "php"])))?;
  let outcome = processor.process()?;

  assert_eq!(outcome.reports.len(), 5);
  assert_eq!(action_for(&outcome, "native/src/fresh.cpp"), Some(FileAction::Inserted));
  assert_eq!(action_for(&outcome, "native/src/stale.h"), Some(FileAction::Replaced));
  assert_eq!(action_for(&outcome, "native/src/canonical.c"), Some(FileAction::Unchanged));
  assert_eq!(action_for(&outcome, "php/Elastic/Fresh.php"), Some(FileAction::Inserted));
  assert_eq!(action_for(&outcome, "php/Elastic/Stale.php"), Some(FileAction::Replaced));
  assert!(outcome.has_changes());
  assert!(!outcome.has_failures());

  assert_eq!(
    read_file(root, "native/src/fresh.cpp")?,
    format!("{}\n#include \"a.h\"\n\nint main() {{ return 0; }}\n", DEFAULT_HEADER)
  );
  assert_eq!(
    read_file(root, "native/src/stale.h")?,
    format!("{}#pragma once\n", DEFAULT_HEADER)
  );
  assert_eq!(
    read_file(root, "php/Elastic/Fresh.php")?,
    format!("<?php\n\n{}\nnamespace Elastic;\n", DEFAULT_HEADER)
  );
  assert_eq!(
    read_file(root, "php/Elastic/Stale.php")?,
    format!("<?php\n\n{}declare(strict_types=1);\n", DEFAULT_HEADER)
  );
  assert_eq!(read_file(root, "notes.txt")?, "not a source file\n");

  let php = outcome
    .reports
    .iter()
    .find(|r| r.path.ends_with("Fresh.php"))
    .map(|r| r.dialect);
  assert_eq!(php, Some(Dialect::Tagged));
  Ok(())
}

#[test]
fn test_second_run_is_a_fixed_point() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  create_mixed_tree(root)?;

  let config = || ProcessorConfig::new(root.to_path_buf(), extensions(&["c", "cpp", "h", "php"]));
  Processor::new(config())?.process()?;
  let first: Vec<String> = ["native/src/fresh.cpp", "native/src/stale.h", "php/Elastic/Fresh.php"]
    .iter()
    .map(|f| read_file(root, f))
    .collect::<Result<_>>()?;

  let outcome = Processor::new(config())?.process()?;
  assert!(!outcome.has_changes());
  assert!(outcome.reports.iter().all(|r| r.action == FileAction::Unchanged));

  let second: Vec<String> = ["native/src/fresh.cpp", "native/src/stale.h", "php/Elastic/Fresh.php"]
    .iter()
    .map(|f| read_file(root, f))
    .collect::<Result<_>>()?;
  assert_eq!(first, second);
  Ok(())
}

#[test]
fn test_check_only_writes_nothing() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  create_mixed_tree(root)?;
  let before = read_file(root, "native/src/fresh.cpp")?;

  let processor = Processor::new(ProcessorConfig {
    check_only: true,
    ..ProcessorConfig::new(root.to_path_buf(), extensions(&["cpp"]))
  })?;
  let outcome = processor.process()?;

  assert_eq!(outcome.reports.len(), 1);
  assert_eq!(outcome.reports[0].action, FileAction::Inserted);
  assert_eq!(read_file(root, "native/src/fresh.cpp")?, before);
  Ok(())
}

#[test]
fn test_failure_does_not_stop_the_batch() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "a.c", "int a;\n")?;
  fs::write(root.join("b.c"), [0xff, 0xfe, 0x00, 0x41])?;
  write_file(root, "c.c", "int c;\n")?;

  let processor = Processor::new(ProcessorConfig::new(root.to_path_buf(), extensions(&["c"])))?;
  let outcome = processor.process()?;

  assert!(outcome.has_failures());
  assert_eq!(action_for(&outcome, "a.c"), Some(FileAction::Inserted));
  assert_eq!(action_for(&outcome, "b.c"), Some(FileAction::Failed));
  assert_eq!(action_for(&outcome, "c.c"), Some(FileAction::Inserted));

  let failed = outcome
    .reports
    .iter()
    .find(|r| r.action == FileAction::Failed)
    .and_then(|r| r.detail.clone())
    .unwrap_or_default();
  assert!(failed.contains("Failed to read file"));

  assert!(read_file(root, "c.c")?.starts_with("/*"));
  assert_eq!(fs::read(root.join("b.c"))?, vec![0xff, 0xfe, 0x00, 0x41]);
  Ok(())
}

#[test]
fn test_ignore_patterns_report_skipped_files() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "src/App.php", "<?php\n")?;
  write_file(root, "vendor/lib/Dep.php", "<?php\n")?;

  let processor = Processor::new(ProcessorConfig {
    ignore_patterns: vec!["vendor".to_string()],
    ..ProcessorConfig::new(root.to_path_buf(), extensions(&["php"]))
  })?;
  let outcome = processor.process()?;

  assert_eq!(action_for(&outcome, "src/App.php"), Some(FileAction::Inserted));
  assert_eq!(action_for(&outcome, "vendor/lib/Dep.php"), Some(FileAction::Skipped));
  assert_eq!(read_file(root, "vendor/lib/Dep.php")?, "<?php\n");
  Ok(())
}

#[test]
fn test_custom_header_attribution_and_tag() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  write_file(root, "page.hh", "<?hh\necho 1;\n")?;
  write_file(root, "old.hh", "<?hh\n/* Licensed to ACME */\necho 2;\n")?;

  let processor = Processor::new(ProcessorConfig {
    header: CanonicalHeader::new("/* Licensed to ACME, 2026 */")?,
    attribution: "licensed to acme".to_string(),
    open_tag: "<?hh".to_string(),
    tagged_extensions: vec!["hh".to_string()],
    ..ProcessorConfig::new(root.to_path_buf(), extensions(&["hh"]))
  })?;
  processor.process()?;

  assert_eq!(read_file(root, "page.hh")?, "<?hh\n\n/* Licensed to ACME, 2026 */\necho 1;\n");
  assert_eq!(read_file(root, "old.hh")?, "<?hh\n/* Licensed to ACME, 2026 */\necho 2;\n");
  Ok(())
}

#[test]
fn test_paired_search_ignores_closer_before_header() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  let content = format!("int a; /* note */\n{}int b;\n", OLD_HEADER);
  write_file(root, "independent.c", &content)?;
  write_file(root, "paired.c", &content)?;

  let run = |name: &str, search: HeaderSearch| -> Result<()> {
    let processor = Processor::new(ProcessorConfig {
      header_search: search,
      ..ProcessorConfig::new(root.join(name), extensions(&["c"]))
    })?;
    processor.process()?;
    Ok(())
  };
  run("independent.c", HeaderSearch::Independent)?;
  run("paired.c", HeaderSearch::Paired)?;

  // The independent end scan stops at the closer on line 0, before the
  // header starts, so the old header survives below the new one.
  assert_eq!(
    read_file(root, "independent.c")?,
    format!("int a; /* note */\n{}{}int b;\n", DEFAULT_HEADER, OLD_HEADER)
  );
  assert_eq!(
    read_file(root, "paired.c")?,
    format!("int a; /* note */\n{}int b;\n", DEFAULT_HEADER)
  );
  Ok(())
}

#[test]
fn test_unrecognized_header_gets_a_second_header() -> Result<()> {
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  let content = "/*\n * Copyright ACME Corp. All rights reserved.\n */\nint a;\n";
  write_file(root, "acme.c", content)?;

  let processor = Processor::new(ProcessorConfig::new(root.to_path_buf(), extensions(&["c"])))?;
  let outcome = processor.process()?;

  assert_eq!(outcome.reports[0].action, FileAction::Inserted);
  assert_eq!(read_file(root, "acme.c")?, format!("{}\n{}", DEFAULT_HEADER, content));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_is_rewritten_through_the_link() -> Result<()> {
  use std::os::unix::fs::symlink;

  let temp_dir = tempdir()?;
  let shared = tempdir()?;
  let root = temp_dir.path();
  write_file(shared.path(), "shared.h", "int shared;\n")?;
  symlink(shared.path().join("shared.h"), root.join("shared.h"))?;

  let processor = Processor::new(ProcessorConfig::new(root.to_path_buf(), extensions(&["h"])))?;
  let outcome = processor.process()?;

  assert_eq!(action_for(&outcome, "shared.h"), Some(FileAction::Inserted));
  assert!(fs::symlink_metadata(root.join("shared.h"))?.file_type().is_symlink());
  assert_eq!(
    read_file(shared.path(), "shared.h")?,
    format!("{}\nint shared;\n", DEFAULT_HEADER)
  );
  Ok(())
}
