//! Planning and running file conversions.
//!
//! A run is planned up front as a list of [`Job`]s (input and output path
//! pairs), then converted on a rayon pool. Every file gets its own anchor
//! set and tree; nothing is shared between workers except the abort flag
//! used by `--fail-fast`. Reports come back in job order.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use nestify_core::{Conversion, ConvertOptions, convert};
use rayon::prelude::*;

/// One file to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// The CSS file.
    pub input: PathBuf,
    /// Where the SCSS goes.
    pub output: PathBuf,
}

/// Where a run reads from and writes to.
#[derive(Debug, Clone, Copy)]
pub struct Plan<'a> {
    /// Input file or directory.
    pub input: &'a Path,
    /// Explicit output file (or directory, for a directory input).
    pub output: Option<&'a Path>,
    /// Output directory (`-o`).
    pub output_dir: Option<&'a Path>,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Output extension, with or without the leading dot.
    pub ext: &'a str,
}

impl Plan<'_> {
    /// Expand the plan into jobs. A directory with no CSS files gives an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not exist, a directory cannot be
    /// read, or an output path would overwrite its input.
    pub fn jobs(&self) -> Result<Vec<Job>> {
        if !self.input.exists() {
            bail!("File not found: {}", self.input.display());
        }

        let jobs = if self.input.is_dir() {
            let out_dir = self.output_dir.or(self.output);
            collect_css_files(self.input, self.recursive)?
                .into_iter()
                .map(|file| {
                    let output = match out_dir {
                        Some(dir) => {
                            let relative = file.strip_prefix(self.input).unwrap_or(file.as_path());
                            output_path(&dir.join(relative), self.ext)
                        }
                        None => output_path(&file, self.ext),
                    };
                    Job {
                        input: file,
                        output,
                    }
                })
                .collect()
        } else {
            let output = match (self.output, self.output_dir) {
                (Some(path), _) => path.to_path_buf(),
                (None, Some(dir)) => {
                    let name = self.input.file_name().map(PathBuf::from).unwrap_or_default();
                    output_path(&dir.join(name), self.ext)
                }
                (None, None) => output_path(self.input, self.ext),
            };
            vec![Job {
                input: self.input.to_path_buf(),
                output,
            }]
        };

        for job in &jobs {
            if job.input == job.output {
                bail!(
                    "Output would overwrite its input: {} (choose another --ext or output path)",
                    job.input.display()
                );
            }
        }
        Ok(jobs)
    }
}

/// `path` with its extension replaced by `ext`.
#[must_use]
pub fn output_path(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext.trim_start_matches('.'))
}

/// Every `*.css` file in `dir`, sorted. Subdirectories are searched only
/// when `recursive` is set.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn collect_css_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current)
            .with_context(|| format!("Failed to read directory: {}", current.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to read directory: {}", current.display()))?
                .path();
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if is_css(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn is_css(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
}

/// Knobs for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Options for every conversion.
    pub convert: ConvertOptions,
    /// Convert but do not write.
    pub dry_run: bool,
    /// Stop starting new files after the first failure.
    pub fail_fast: bool,
    /// Worker threads; `None` uses one per CPU.
    pub jobs: Option<usize>,
}

/// What happened to one file.
#[derive(Debug)]
pub enum Outcome {
    /// Converted (and written, unless this was a dry run).
    Converted {
        /// The CSS that was read.
        source: String,
        /// The conversion result.
        conversion: Conversion,
    },
    /// Reading, converting or writing failed.
    Failed(anyhow::Error),
    /// Not attempted because an earlier file failed under `--fail-fast`.
    Skipped,
}

/// The outcome for one job.
#[derive(Debug)]
pub struct FileReport {
    /// The job.
    pub job: Job,
    /// What happened.
    pub outcome: Outcome,
}

/// Counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Files converted.
    pub converted: usize,
    /// Files that failed.
    pub failed: usize,
    /// Files skipped after a failure.
    pub skipped: usize,
    /// Warnings across all converted files.
    pub warnings: usize,
}

impl Summary {
    /// Count the outcomes of a batch.
    #[must_use]
    pub fn of(reports: &[FileReport]) -> Self {
        reports.iter().fold(Self::default(), |mut summary, report| {
            match &report.outcome {
                Outcome::Converted { conversion, .. } => {
                    summary.converted += 1;
                    summary.warnings += conversion.warnings.len();
                }
                Outcome::Failed(_) => summary.failed += 1,
                Outcome::Skipped => summary.skipped += 1,
            }
            summary
        })
    }
}

/// Convert every job on a rayon pool. Reports are returned in job order.
///
/// # Errors
///
/// Returns an error only if the thread pool cannot be created; per-file
/// failures are reported as [`Outcome::Failed`].
pub fn run_batch(jobs: &[Job], options: &BatchOptions) -> Result<Vec<FileReport>> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = options.jobs {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    let abort = AtomicBool::new(false);
    let reports = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let outcome = if abort.load(Ordering::Relaxed) {
                    Outcome::Skipped
                } else {
                    match convert_file(job, options) {
                        Ok((source, conversion)) => Outcome::Converted { source, conversion },
                        Err(error) => {
                            if options.fail_fast {
                                abort.store(true, Ordering::Relaxed);
                            }
                            Outcome::Failed(error)
                        }
                    }
                };
                FileReport {
                    job: job.clone(),
                    outcome,
                }
            })
            .collect()
    });
    Ok(reports)
}

/// Read, convert and (unless dry-running) write one file.
fn convert_file(job: &Job, options: &BatchOptions) -> Result<(String, Conversion)> {
    let source = fs::read_to_string(&job.input)
        .with_context(|| format!("Failed to read {}", job.input.display()))?;
    let conversion = convert(&source, &options.convert)
        .with_context(|| format!("Failed to convert {}", job.input.display()))?;

    if !options.dry_run {
        let parent = job.output.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&job.output, &conversion.scss)
            .with_context(|| format!("Failed to write {}", job.output.display()))?;
    }

    Ok((source, conversion))
}
