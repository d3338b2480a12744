//! Integration tests for the cleanup command.
#![allow(clippy::unwrap_used)]

use scopefix::cli::{DestArgs, RangeArgs, ReportArgs};
use scopefix::commands::{run_cleanup, CleanupOptions};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SOURCE: &str = "\
fn eval_call(context: &mut Context) -> Result<Value> {
    let saved_path = context.push_function_scope(&func_def.source_path);
    if args.is_empty() {
        return Err(InterpreterError::missing_args());
    }
    for arg in args {
        if arg.is_invalid() {
            return Err(InterpreterError::bad_arg(arg));
        }
    }
    let result = evaluate(context)?;
    return Ok(result);
}
";

fn options(start: usize, end: usize, output: Option<PathBuf>) -> CleanupOptions {
    CleanupOptions {
        range: RangeArgs {
            start: Some(start),
            end: Some(end),
            ..RangeArgs::default()
        },
        dest: DestArgs {
            output,
            in_place: false,
        },
        report: ReportArgs::default(),
        permissive: false,
        cleanup_call: None,
    }
}

fn write_source(dir: &Path) -> PathBuf {
    let input = dir.join("interpreter.rs");
    std::fs::write(&input, SOURCE).unwrap();
    input
}

#[test]
fn test_cleanup_writes_to_output_path() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path());
    let output = dir.path().join("patched.rs");

    let mut buffer = Vec::new();
    let code = run_cleanup(&input, &options(1, 12, Some(output.clone())), &mut buffer).unwrap();
    assert_eq!(code, 0);

    // Input untouched, output patched.
    assert_eq!(std::fs::read_to_string(&input).unwrap(), SOURCE);
    let patched = std::fs::read_to_string(&output).unwrap();
    let cleanups = patched.matches("context.pop_function_scope(saved_path)?;").count();
    assert_eq!(cleanups, 3);
}

#[test]
fn test_cleanup_in_place() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path());

    let mut opts = options(1, 12, None);
    opts.dest.in_place = true;

    let mut buffer = Vec::new();
    run_cleanup(&input, &opts, &mut buffer).unwrap();

    let patched = std::fs::read_to_string(&input).unwrap();
    assert!(patched.contains("context.pop_function_scope(saved_path)?;"));
}

#[test]
fn test_cleanup_indentation_matches_exit_line() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path());
    let output = dir.path().join("patched.rs");

    let mut buffer = Vec::new();
    run_cleanup(&input, &options(1, 12, Some(output.clone())), &mut buffer).unwrap();

    let patched = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = patched.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.trim_start().starts_with("return ") {
            let cleanup = lines[i - 1];
            assert!(cleanup.trim_start().starts_with("context.pop_function_scope"));
            let exit_indent = &line[..line.len() - line.trim_start().len()];
            let cleanup_indent = &cleanup[..cleanup.len() - cleanup.trim_start().len()];
            assert_eq!(exit_indent, cleanup_indent);
        }
    }
}

#[test]
fn test_cleanup_window_containment() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path());
    let output = dir.path().join("patched.rs");

    // Window covers only the first return.
    let mut buffer = Vec::new();
    run_cleanup(&input, &options(3, 5, Some(output.clone())), &mut buffer).unwrap();

    let patched = std::fs::read_to_string(&output).unwrap();
    let cleanups = patched.matches("pop_function_scope").count();
    // One insertion: the original already contains one push call, no pops.
    assert_eq!(cleanups, 1);

    // Every line outside the window is byte-identical at its shifted
    // position.
    let original: Vec<&str> = SOURCE.lines().collect();
    let lines: Vec<&str> = patched.lines().collect();
    assert_eq!(lines.len(), original.len() + 1);
    assert_eq!(&lines[..2], &original[..2]);
    assert_eq!(&lines[6..], &original[5..]);
}

#[test]
fn test_cleanup_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path());
    let output = dir.path().join("patched.rs");

    let mut opts = options(1, 12, Some(output.clone()));
    opts.report.dry_run = true;

    let mut buffer = Vec::new();
    let code = run_cleanup(&input, &opts, &mut buffer).unwrap();
    assert_eq!(code, 0);

    assert!(!output.exists());
    assert_eq!(std::fs::read_to_string(&input).unwrap(), SOURCE);

    let report = String::from_utf8(buffer).unwrap();
    assert!(report.contains("[DRY-RUN]"));
    assert!(report.contains("Would insert"));
}

#[test]
fn test_cleanup_json_summary() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path());
    let output = dir.path().join("patched.rs");

    let mut opts = options(1, 12, Some(output));
    opts.report.json = true;

    let mut buffer = Vec::new();
    run_cleanup(&input, &opts, &mut buffer).unwrap();

    let summary: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(summary["cleanups_inserted"], 3);
    assert_eq!(summary["window_start"], 1);
    assert_eq!(summary["window_end"], 12);
    assert_eq!(summary["dry_run"], false);
}

#[test]
fn test_cleanup_invalid_range_aborts_before_write() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path());
    let output = dir.path().join("patched.rs");

    let mut buffer = Vec::new();
    let err = run_cleanup(&input, &options(5, 500, Some(output.clone())), &mut buffer).unwrap_err();
    assert!(err.to_string().contains("invalid line range"));
    assert!(!output.exists());
    assert_eq!(std::fs::read_to_string(&input).unwrap(), SOURCE);
}

#[test]
fn test_cleanup_zero_exits_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path());
    let output = dir.path().join("patched.rs");

    // Lines 6-10 hold the loop body; the only return there is at line 8.
    // Use lines 10-11 which have no exits.
    let mut buffer = Vec::new();
    run_cleanup(&input, &options(10, 11, Some(output.clone())), &mut buffer).unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), SOURCE);
}

#[test]
fn test_cleanup_anchor_window() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path());
    let output = dir.path().join("patched.rs");

    let opts = CleanupOptions {
        range: RangeArgs {
            start_anchor: Some("fn eval_call".to_owned()),
            end_anchor: Some("return Ok(result);".to_owned()),
            ..RangeArgs::default()
        },
        dest: DestArgs {
            output: Some(output.clone()),
            in_place: false,
        },
        report: ReportArgs::default(),
        permissive: false,
        cleanup_call: None,
    };

    let mut buffer = Vec::new();
    run_cleanup(&input, &opts, &mut buffer).unwrap();

    let patched = std::fs::read_to_string(&output).unwrap();
    assert_eq!(patched.matches("pop_function_scope").count(), 3);
}

#[test]
fn test_cleanup_not_idempotent_across_runs() {
    // Regression guard: re-running the rewriter over already-patched output
    // doubles the cleanup lines.
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path());

    let mut opts = options(1, 12, None);
    opts.dest.in_place = true;
    let mut buffer = Vec::new();
    run_cleanup(&input, &opts, &mut buffer).unwrap();

    let opts = {
        let mut o = options(1, 15, None);
        o.dest.in_place = true;
        o
    };
    let mut buffer = Vec::new();
    run_cleanup(&input, &opts, &mut buffer).unwrap();

    let patched = std::fs::read_to_string(&input).unwrap();
    assert_eq!(patched.matches("pop_function_scope").count(), 6);
}
