//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use nestify_common::Verbosity;

/// nestify - convert flat CSS into nested SCSS
#[derive(Parser, Debug)]
#[command(name = "nestify")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Convert one file (writes style.scss next to it)
    nestify style.css

    # Convert one file to an explicit path
    nestify style.css build/style.scss

    # Convert a directory tree into another directory
    nestify -r src/css -o src/scss

    # Preview without writing
    nestify --dry-run style.css
    nestify --diff style.css

    # Hoist repeated values and group border-*/margin-* declarations
    nestify --variables --group-properties style.css
"#)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input CSS file or directory
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file, or output directory when INPUT is a directory
    /// (default: INPUT with .css replaced by --ext)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Output directory; relative paths under INPUT are mirrored here
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output extension
    #[arg(long, value_name = "EXT", default_value = ".scss")]
    pub ext: String,

    /// Drop comments
    #[arg(long)]
    pub no_comments: bool,

    /// Keep every selector at the top level (no nesting)
    #[arg(long)]
    pub flat: bool,

    /// Maximum nesting depth
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Hoist repeated values into $auto-var-N variables
    #[arg(long)]
    pub variables: bool,

    /// Occurrences needed before a value becomes a variable
    #[arg(long, value_name = "N")]
    pub var_threshold: Option<usize>,

    /// Group prefix-* declarations into nested property blocks
    #[arg(long)]
    pub group_properties: bool,

    /// JSON file with conversion options (flags override it)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the converted SCSS instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Print a line diff instead of writing (implies --dry-run)
    #[arg(long)]
    pub diff: bool,

    /// Stop starting new files after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Worker threads (default: one per CPU)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode (errors and warnings only)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// The logger verbosity selected by `-v`/`-q`.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Whether converted files are written to disk.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        !(self.dry_run || self.diff)
    }
}
