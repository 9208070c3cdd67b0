//! Pack command implementation.

use crate::cli::PackArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use ziptree_core::PackOptions;
use ziptree_core::SourceSpec;
use ziptree_core::creation::filters::FilterConfig;
use ziptree_core::creation::filters::exclusion_filter;
use ziptree_core::pack;

pub fn execute(args: &PackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let sources: Vec<SourceSpec> = args
        .sources
        .iter()
        .map(|root| SourceSpec::new(root).with_include_root_dir(args.include_root_dir))
        .collect();

    let filter = FilterConfig::default()
        .with_include_hidden(args.include_hidden)
        .with_exclude_patterns(args.exclude.clone());
    let options = PackOptions::default()
        .with_charset(args.charset)
        .with_path_filter(exclusion_filter(filter))
        .with_follow_symlinks(args.follow_symlinks);

    let report = add_archive_context(pack(&args.output, &sources, &options), &args.output)?;

    if report.total_entries() == 0 {
        formatter.format_warning("no entries matched; the archive is empty");
    }
    formatter.format_pack_result(&args.output, &report)?;

    Ok(())
}
