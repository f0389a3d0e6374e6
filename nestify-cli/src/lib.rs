//! Library side of the `nestify` command.
//!
//! The binary is a thin shell over these modules:
//! - **cli** - command-line arguments
//! - **config** - JSON option files and flag overrides
//! - **batch** - planning output paths and converting files in parallel
//! - **diff** - line diffs for `--diff`

pub mod batch;
pub mod cli;
pub mod config;
pub mod diff;

pub use batch::{BatchOptions, FileReport, Job, Outcome, Plan, Summary, run_batch};
pub use cli::Cli;
pub use config::{load_config, resolve_options};
pub use diff::{DiffLine, line_diff, render_diff};
