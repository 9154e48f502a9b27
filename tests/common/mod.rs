#![allow(dead_code)]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use relicense::header::DEFAULT_HEADER;

/// A stale header carrying the default attribution phrase.
pub const OLD_HEADER: &str = "/*\n * Copyright 2019 Elasticsearch B.V.\n * Licensed to Elasticsearch B.V. under the Apache License.\n */\n";

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<()> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn read_file(root: &Path, relative: &str) -> Result<String> {
  let path = root.join(relative);
  fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Populates a small mixed native/PHP tree:
///
/// - `native/src/fresh.cpp`: no header
/// - `native/src/stale.h`: old header, then code
/// - `native/src/canonical.c`: already canonical
/// - `php/Elastic/Fresh.php`: open tag, no header
/// - `php/Elastic/Stale.php`: open tag followed by the old header
/// - `notes.txt`: not selected
pub fn create_mixed_tree(root: &Path) -> Result<()> {
  write_file(root, "native/src/fresh.cpp", "#include \"a.h\"\n\nint main() { return 0; }\n")?;
  write_file(root, "native/src/stale.h", &format!("{}#pragma once\n", OLD_HEADER))?;
  write_file(root, "native/src/canonical.c", &format!("{}\nint x;\n", DEFAULT_HEADER))?;
  write_file(root, "php/Elastic/Fresh.php", "<?php\n\nnamespace Elastic;\n")?;
  write_file(
    root,
    "php/Elastic/Stale.php",
    &format!("<?php\n\n{}declare(strict_types=1);\n", OLD_HEADER),
  )?;
  write_file(root, "notes.txt", "not a source file\n")?;
  Ok(())
}
