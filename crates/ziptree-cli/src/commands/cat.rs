//! Cat command implementation.
//!
//! Entry bytes go to stdout unchanged, so the output can be piped.

use crate::cli::CatArgs;
use crate::error::add_archive_context;
use anyhow::Context;
use anyhow::Result;
use std::io::Write;
use std::io::{self};
use ziptree_core::read_entry;

pub fn execute(args: &CatArgs) -> Result<()> {
    let content = add_archive_context(
        read_entry(&args.archive, &args.entry, args.charset),
        &args.archive,
    )?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&content)
        .and_then(|()| stdout.flush())
        .context("failed to write entry to stdout")?;

    Ok(())
}
