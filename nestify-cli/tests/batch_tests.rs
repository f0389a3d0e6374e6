//! Tests for planning, batch conversion and option resolution.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use nestify_cli::batch::{collect_css_files, output_path};
use nestify_cli::{BatchOptions, Cli, Job, Outcome, Plan, Summary, load_config, resolve_options, run_batch};
use tempfile::TempDir;

/// Helper to write a file, creating parent directories
fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write file");
}

/// Helper for a plan over `input` with defaults
fn plan(input: &Path) -> Plan<'_> {
    Plan {
        input,
        output: None,
        output_dir: None,
        recursive: false,
        ext: ".scss",
    }
}

/// Helper to build a job list by hand
fn job(input: PathBuf, output: PathBuf) -> Job {
    Job { input, output }
}

// ========== Planning ==========

#[test]
fn test_output_path_replaces_extension() {
    assert_eq!(output_path(Path::new("a/style.css"), ".scss"), PathBuf::from("a/style.scss"));
    assert_eq!(output_path(Path::new("style.css"), "sass"), PathBuf::from("style.sass"));
}

#[test]
fn test_single_file_default_output() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("style.css");
    write(&input, ".a { x: 1; }");

    let jobs = plan(&input).jobs().expect("plan");
    assert_eq!(jobs, vec![job(input.clone(), dir.path().join("style.scss"))]);
}

#[test]
fn test_single_file_explicit_output() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("style.css");
    write(&input, ".a { x: 1; }");
    let target = dir.path().join("out/main.scss");

    let jobs = Plan {
        output: Some(target.as_path()),
        ..plan(&input)
    }
    .jobs()
    .expect("plan");
    assert_eq!(jobs[0].output, target);
}

#[test]
fn test_single_file_into_output_dir() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("style.css");
    write(&input, ".a { x: 1; }");
    let out = dir.path().join("build");

    let jobs = Plan {
        output_dir: Some(out.as_path()),
        ..plan(&input)
    }
    .jobs()
    .expect("plan");
    assert_eq!(jobs[0].output, out.join("style.scss"));
}

#[test]
fn test_directory_collection() {
    let dir = TempDir::new().expect("tempdir");
    write(&dir.path().join("b.css"), "");
    write(&dir.path().join("a.CSS"), "");
    write(&dir.path().join("notes.txt"), "");
    write(&dir.path().join("sub/c.css"), "");

    let flat = collect_css_files(dir.path(), false).expect("collect");
    assert_eq!(flat, vec![dir.path().join("a.CSS"), dir.path().join("b.css")]);

    let deep = collect_css_files(dir.path(), true).expect("collect");
    assert_eq!(deep.len(), 3);
    assert!(deep.contains(&dir.path().join("sub/c.css")));
}

#[test]
fn test_directory_is_mirrored_under_output_dir() {
    let dir = TempDir::new().expect("tempdir");
    let src = dir.path().join("css");
    let out = dir.path().join("scss");
    write(&src.join("a.css"), "");
    write(&src.join("nested/b.css"), "");

    let jobs = Plan {
        output_dir: Some(out.as_path()),
        recursive: true,
        ..plan(&src)
    }
    .jobs()
    .expect("plan");
    let outputs: Vec<PathBuf> = jobs.into_iter().map(|job| job.output).collect();
    assert_eq!(outputs, vec![out.join("a.scss"), out.join("nested/b.scss")]);
}

#[test]
fn test_empty_directory_plans_nothing() {
    let dir = TempDir::new().expect("tempdir");
    assert!(plan(dir.path()).jobs().expect("plan").is_empty());
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("missing.css");
    let error = plan(&missing).jobs().expect_err("missing input");
    assert!(error.to_string().contains("File not found"));
}

#[test]
fn test_overwriting_input_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("style.css");
    write(&input, "");
    let result = Plan {
        ext: "css",
        ..plan(&input)
    }
    .jobs();
    assert!(result.is_err());
}

// ========== Batch conversion ==========

#[test]
fn test_batch_writes_outputs() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("card.css");
    write(&input, ".card { color: red; } .card .title { font-weight: bold; }");
    let jobs = plan(&input).jobs().expect("plan");

    let reports = run_batch(&jobs, &BatchOptions::default()).expect("batch");
    assert!(matches!(reports[0].outcome, Outcome::Converted { .. }));

    let written = fs::read_to_string(dir.path().join("card.scss")).expect("output written");
    assert_eq!(
        written,
        ".card {\n  color: red;\n  .title {\n    font-weight: bold;\n  }\n}\n"
    );
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("card.css");
    write(&input, ".card { color: red; }");
    let jobs = plan(&input).jobs().expect("plan");

    let options = BatchOptions {
        dry_run: true,
        ..BatchOptions::default()
    };
    let reports = run_batch(&jobs, &options).expect("batch");
    assert!(!dir.path().join("card.scss").exists());
    match &reports[0].outcome {
        Outcome::Converted { source, conversion } => {
            assert_eq!(source, ".card { color: red; }");
            assert_eq!(conversion.scss, ".card {\n  color: red;\n}\n");
        }
        other => panic!("expected a conversion, got {other:?}"),
    }
}

#[test]
fn test_failures_are_counted_and_others_continue() {
    let dir = TempDir::new().expect("tempdir");
    write(&dir.path().join("a.css"), "{ color: red; }");
    write(&dir.path().join("b.css"), ".b { x: 1; }");
    let jobs = plan(dir.path()).jobs().expect("plan");

    let reports = run_batch(&jobs, &BatchOptions::default()).expect("batch");
    assert!(matches!(reports[0].outcome, Outcome::Failed(_)));
    assert!(dir.path().join("b.scss").exists());
    assert!(!dir.path().join("a.scss").exists());

    let summary = Summary::of(&reports);
    assert_eq!(
        summary,
        Summary {
            converted: 1,
            failed: 1,
            skipped: 0,
            warnings: 0,
        }
    );
}

#[test]
fn test_fail_fast_skips_remaining_files() {
    let dir = TempDir::new().expect("tempdir");
    write(&dir.path().join("a.css"), "{ color: red; }");
    write(&dir.path().join("b.css"), ".b { x: 1; }");
    write(&dir.path().join("c.css"), ".c { x: 1; }");
    let jobs = plan(dir.path()).jobs().expect("plan");

    let options = BatchOptions {
        fail_fast: true,
        jobs: Some(1),
        ..BatchOptions::default()
    };
    let summary = Summary::of(&run_batch(&jobs, &options).expect("batch"));
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 2);
    assert!(!dir.path().join("b.scss").exists());
}

#[test]
fn test_warnings_are_counted() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("w.css");
    write(&input, "@media print { .a.b .c { x: 1; } }");
    let jobs = plan(&input).jobs().expect("plan");

    let summary = Summary::of(&run_batch(&jobs, &BatchOptions::default()).expect("batch"));
    assert_eq!(summary.warnings, 1);
}

// ========== Options ==========

#[test]
fn test_config_file_and_overrides() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("nestify.json");
    write(&config, r#"{ "max-depth": 4, "variables": true, "var-threshold": 5 }"#);

    let loaded = load_config(&config).expect("config");
    assert_eq!(loaded.max_depth, Some(4));

    let config_arg = config.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from([
        "nestify",
        "style.css",
        "--config",
        config_arg.as_str(),
        "--max-depth",
        "2",
        "--no-comments",
    ])
    .expect("valid arguments");
    let options = resolve_options(&cli).expect("options");
    assert_eq!(options.max_depth, Some(2));
    assert_eq!(options.var_threshold, 5);
    assert!(options.variables);
    assert!(!options.comments);
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("bad.json");
    write(&config, r#"{ "depth": 2 }"#);
    let error = load_config(&config).expect_err("unknown key");
    assert!(format!("{error:#}").contains("Invalid config file"));
}

#[test]
fn test_flag_parsing() {
    let cli = Cli::try_parse_from(["nestify", "-r", "css", "-o", "scss", "--flat", "-j", "4"])
        .expect("valid arguments");
    assert!(cli.recursive);
    assert_eq!(cli.output_dir, Some(PathBuf::from("scss")));
    assert_eq!(cli.jobs, Some(4));
    assert_eq!(cli.ext, ".scss");
    assert!(!resolve_options(&cli).expect("options").nest);

    assert!(Cli::try_parse_from(["nestify", "a.css", "-v", "-q"]).is_err());
    assert!(!Cli::try_parse_from(["nestify", "a.css", "--diff"]).expect("valid").writes_files());
}
