//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;
use ziptree_core::Charset;

#[derive(Parser)]
#[command(name = "ziptree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack files and directories into a ZIP archive
    Pack(PackArgs),
    /// Unpack a ZIP archive into a directory
    Unpack(UnpackArgs),
    /// List archive entries in stored order
    List(ListArgs),
    /// Print the content of one archive entry
    Cat(CatArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct PackArgs {
    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Source files or directories to pack
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Keep each source directory's own name as the top-level entry segment
    #[arg(long)]
    pub include_root_dir: bool,

    /// Exclude pattern (glob, can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Include hidden files
    #[arg(long)]
    pub include_hidden: bool,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Charset every entry name must be representable in (utf-8, cp437)
    #[arg(long, default_value_t = Charset::Utf8)]
    pub charset: Charset,
}

#[derive(clap::Args)]
pub struct UnpackArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Destination directory (default: current directory)
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// Charset of entry names without a UTF-8 flag (utf-8, cp437)
    #[arg(long, default_value_t = Charset::Utf8)]
    pub charset: Charset,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Charset of entry names without a UTF-8 flag (utf-8, cp437)
    #[arg(long, default_value_t = Charset::Utf8)]
    pub charset: Charset,
}

#[derive(clap::Args)]
pub struct CatArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Entry name as shown by `list`
    #[arg(value_name = "ENTRY")]
    pub entry: String,

    /// Charset of entry names without a UTF-8 flag (utf-8, cp437)
    #[arg(long, default_value_t = Charset::Utf8)]
    pub charset: Charset,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pack_args() {
        let cli = Cli::try_parse_from([
            "ziptree",
            "pack",
            "out.zip",
            "src",
            "docs",
            "--include-root-dir",
            "-x",
            "*.tmp",
        ])
        .unwrap();
        let Commands::Pack(args) = cli.command else {
            panic!("expected pack command");
        };
        assert_eq!(args.sources.len(), 2);
        assert!(args.include_root_dir);
        assert_eq!(args.exclude, vec!["*.tmp"]);
    }

    #[test]
    fn test_parse_charset() {
        let cli = Cli::try_parse_from(["ziptree", "unpack", "a.zip", "--charset", "cp437"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Unpack(UnpackArgs {
                charset: Charset::Cp437,
                ..
            }))
        ));
    }

    #[test]
    fn test_pack_requires_source() {
        assert!(Cli::try_parse_from(["ziptree", "pack", "out.zip"]).is_err());
    }
}
