//! Unpack command implementation.

use crate::cli::UnpackArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use std::env;
use ziptree_core::UnpackOptions;
use ziptree_core::unpack_with_report;

pub fn execute(args: &UnpackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let dest = match &args.dest {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let options = UnpackOptions::default().with_charset(args.charset);
    let report = add_archive_context(
        unpack_with_report(&args.archive, &dest, options),
        &args.archive,
    )?;

    formatter.format_unpack_result(&args.archive, &report)?;

    Ok(())
}
