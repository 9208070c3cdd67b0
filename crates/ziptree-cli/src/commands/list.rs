//! List command implementation.

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use ziptree_core::list_entries;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let entries = add_archive_context(list_entries(&args.archive, args.charset), &args.archive)?;
    formatter.format_entry_list(&args.archive, &entries)
}
