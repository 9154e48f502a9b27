//! # relicense
//!
//! Canonicalizes the license header of every selected source file in a tree.

use anyhow::Result;
use relicense::cli::{Cli, run_rewrite};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_rewrite(cli.rewrite_args)
}
