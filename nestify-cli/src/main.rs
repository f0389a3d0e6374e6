//! nestify CLI
//!
//! Converts CSS files and directories into nested SCSS.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser;
use nestify_cli::{
    BatchOptions, Cli, FileReport, Outcome, Plan, Summary, line_diff, render_diff,
    resolve_options, run_batch,
};
use nestify_common::Logger;

fn main() {
    let cli = Cli::parse();
    let logger = Logger::new(cli.verbosity());
    let start = Instant::now();

    match run(&cli, &logger) {
        Ok(summary) if summary.failed == 0 => {
            logger.success(format!(
                "Conversion completed in {}ms!",
                start.elapsed().as_millis()
            ));
        }
        Ok(summary) => {
            logger.error(format!(
                "{} of {} file(s) failed",
                summary.failed,
                summary.converted + summary.failed + summary.skipped
            ));
            process::exit(1);
        }
        Err(error) => {
            logger.error(format!("Conversion failed: {error:#}"));
            if cli.verbose {
                eprintln!("{error:?}");
            }
            process::exit(1);
        }
    }
}

fn run(cli: &Cli, logger: &Logger) -> anyhow::Result<Summary> {
    let options = resolve_options(cli)?;
    logger.verbose(format!("Options: {options:?}"));

    let plan = Plan {
        input: &cli.input,
        output: cli.output.as_deref(),
        output_dir: cli.output_dir.as_deref(),
        recursive: cli.recursive,
        ext: &cli.ext,
    };
    let jobs = plan.jobs()?;
    if jobs.is_empty() {
        logger.warn(format!("No CSS files found in {}", cli.input.display()));
        return Ok(Summary::default());
    }
    if cli.input.is_dir() {
        logger.info(format!("Found {} CSS file(s)", jobs.len()));
    }

    let batch = BatchOptions {
        convert: options,
        dry_run: !cli.writes_files(),
        fail_fast: cli.fail_fast,
        jobs: cli.jobs,
    };
    let reports = run_batch(&jobs, &batch)?;
    for report in &reports {
        print_report(report, cli, logger);
    }

    let summary = Summary::of(&reports);
    logger.verbose(format!(
        "{} converted, {} failed, {} skipped, {} warning(s)",
        summary.converted, summary.failed, summary.skipped, summary.warnings
    ));
    Ok(summary)
}

/// Print what happened to one file.
fn print_report(report: &FileReport, cli: &Cli, logger: &Logger) {
    let input = &report.job.input;
    let output = &report.job.output;

    match &report.outcome {
        Outcome::Converted { source, conversion } => {
            for warning in &conversion.warnings {
                logger.warn(format!("{}: {warning}", input.display()));
            }
            logger.verbose(format!(
                "{}: {} anchor(s), {} variable(s)",
                input.display(),
                conversion.anchors,
                conversion.variables.len()
            ));

            if cli.diff {
                print!("{}", render_diff(input, output, &line_diff(source, &conversion.scss)));
            } else if cli.dry_run {
                logger.info(format!("Dry run - {}:", output.display()));
                print!("{}", conversion.scss);
            } else {
                logger.success(format!("{} → {}", file_name(input), file_name(output)));
            }
        }
        Outcome::Failed(error) => {
            logger.error(format!("{}: {error:#}", file_name(input)));
        }
        Outcome::Skipped => {
            logger.verbose(format!("{}: skipped", input.display()));
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
