//! # Header Module
//!
//! The canonical license header that every processed file must carry.
//!
//! The text is block-comment wrapped and dialect-agnostic: the same bytes are
//! written into native and tagged files alike.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::verbose_log;

/// Apache-2.0 header used when no header file is configured.
pub const DEFAULT_HEADER: &str = r#"/*
 * Copyright Elasticsearch B.V. and/or licensed to Elasticsearch B.V. under one
 * or more contributor license agreements. See the NOTICE file distributed with
 * this work for additional information regarding copyright
 * ownership. Elasticsearch B.V. licenses this file to you under
 * the Apache License, Version 2.0 (the "License"); you may
 * not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *  http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */
"#;

#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
  #[error("Header text is empty")]
  EmptyText,

  #[error("Header file '{0}' is empty")]
  EmptyFile(String),
}

/// Immutable canonical header text.
///
/// # Examples
///
/// ```rust
/// use relicense::header::CanonicalHeader;
///
/// let header = CanonicalHeader::default();
/// assert!(header.text().starts_with("/*"));
/// assert!(header.text().ends_with(" */\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalHeader {
  text: String,
}

impl Default for CanonicalHeader {
  fn default() -> Self {
    Self {
      text: DEFAULT_HEADER.to_string(),
    }
  }
}

impl CanonicalHeader {
  /// Wraps the given text, which is used verbatim.
  ///
  /// # Errors
  ///
  /// Returns [`HeaderError::EmptyText`] if the text is empty or whitespace only.
  pub fn new(text: impl Into<String>) -> Result<Self, HeaderError> {
    let text = text.into();
    if text.trim().is_empty() {
      return Err(HeaderError::EmptyText);
    }
    Ok(Self { text })
  }

  /// Loads header text from a file.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  /// - The file does not exist
  /// - The file cannot be read
  /// - The file content is not valid UTF-8
  /// - The file is empty
  pub fn load(path: &Path) -> Result<Self> {
    verbose_log!("Loading header from: {}", path.display());

    let text =
      fs::read_to_string(path).with_context(|| format!("Failed to read header file: {}", path.display()))?;

    if text.trim().is_empty() {
      return Err(HeaderError::EmptyFile(path.display().to_string()).into());
    }

    verbose_log!("Header content:\n{}", text);

    Ok(Self { text })
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  /// Number of lines the header occupies once written.
  pub fn line_count(&self) -> usize {
    self.text.lines().count()
  }
}
