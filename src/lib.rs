//! # relicense
//!
//! A tool that puts one canonical license header at the top of every selected
//! source file in a tree.
//!
//! Files that already carry a header (detected by an attribution phrase inside
//! a comment) get that header replaced; files without one get it inserted. In
//! tagged files such as PHP scripts the header goes after the `<?php` open tag
//! so the tag stays on the first line.
//!
//! ## Features
//!
//! * Replace stale headers and insert missing ones in a single pass
//! * Native (C, C++) and tagged (PHP) dialects
//! * Check mode that reports the files that would change
//! * Ignore patterns and `.licenseignore` files
//! * Diff output and JSON or CSV reports
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use relicense::processor::{Processor, ProcessorConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let processor = Processor::new(ProcessorConfig {
//!         check_only: true,
//!         ..ProcessorConfig::new(PathBuf::from("prod"), vec!["cpp".into(), "h".into(), "php".into()])
//!     })?;
//!
//!     let outcome = processor.process()?;
//!     if outcome.has_changes() {
//!         println!("Some files need the canonical header");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! The rewrite engine can also be used on its own:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use relicense::header::CanonicalHeader;
//! use relicense::license_detection::AttributionDetector;
//! use relicense::processor::{ContentTransformer, RewriteAction};
//! use relicense::scanner::{Dialect, HeaderSearch};
//!
//! let transformer = ContentTransformer::new(
//!     CanonicalHeader::new("/* Licensed to Elasticsearch B.V. */\n").unwrap(),
//!     Arc::new(AttributionDetector::default()),
//!     "<?php",
//!     HeaderSearch::Independent,
//! );
//!
//! let rewrite = transformer.transform("<?php\necho 1;\n", Dialect::Tagged);
//! assert_eq!(rewrite.action, RewriteAction::InsertedAfterTag);
//! assert_eq!(rewrite.content, "<?php\n\n/* Licensed to Elasticsearch B.V. */\necho 1;\n");
//! ```
//!
//! ## Modules
//!
//! * [`scanner`] - Header and open tag line searches
//! * [`license_detection`] - Existing header detection
//! * [`processor`] - The rewrite engine and the batch driver
//! * [`logging`] - Logging utilities for verbose output
//!
//! [`scanner`]: crate::scanner
//! [`license_detection`]: crate::license_detection
//! [`processor`]: crate::processor
//! [`logging`]: crate::logging

pub mod cli;
pub mod config;
pub mod diff;
pub mod file_filter;
pub mod header;
pub mod license_detection;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod scanner;
