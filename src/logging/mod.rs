//! # Logging Module
//!
//! This module provides logging utilities for relicense, including:
//! - Verbose logging that can be enabled/disabled
//! - Standard info logging with color support
//! - `tracing` subscriber setup for diagnostics
//!
//! Verbose logs go to stderr and info logs go to stdout, so the changed-file
//! lists stay pipeable.
//!
//! ## Example
//!
//! ```rust
//! use relicense::logging::{ColorMode, set_verbose};
//! use relicense::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! verbose_log!("Scanning: {}", "src/a.cpp");
//! info_log!("Inserted header in: {}", "src/a.cpp");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Logs a message to stderr if verbose mode is enabled.
///
/// Uses the same format string syntax as [`eprintln!`].
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Logs a message to stdout unless quiet mode is enabled.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

/// Prints an info message in yellow when colors are enabled.
///
/// Used by [`info_log!`]; not meant to be called directly.
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
