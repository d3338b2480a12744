use anyhow::{bail, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::cli::{DestArgs, RangeArgs, ReportArgs};
use crate::config::{Config, ScopefixConfig};
use crate::constants::DEFAULT_CLEANUP_CALL;
use crate::output;
use crate::patch::{CleanupInserter, ExitStyle, ScopeMigration, SourceBuffer, Window};

/// Options for the cleanup command.
#[derive(Debug, Default)]
pub struct CleanupOptions {
    /// Window selection.
    pub range: RangeArgs,
    /// Output destination.
    pub dest: DestArgs,
    /// Reporting options.
    pub report: ReportArgs,
    /// Match any `return` statement instead of only Ok/Err returns.
    pub permissive: bool,
    /// Cleanup call override for this run.
    pub cleanup_call: Option<String>,
}

/// Options for the migrate command.
#[derive(Debug, Default)]
pub struct MigrateOptions {
    /// Window selection.
    pub range: RangeArgs,
    /// Output destination.
    pub dest: DestArgs,
    /// Reporting options.
    pub report: ReportArgs,
    /// Rename source identifier override.
    pub from_token: Option<String>,
    /// Rename destination identifier override.
    pub to_token: Option<String>,
}

/// Summary of a cleanup run.
#[derive(Debug, Serialize)]
pub struct CleanupSummary {
    /// The patched file.
    pub file: String,
    /// First line of the window used.
    pub window_start: usize,
    /// Last line of the window used (before insertions).
    pub window_end: usize,
    /// Number of cleanup lines inserted.
    pub cleanups_inserted: usize,
    /// Whether this was a preview only.
    pub dry_run: bool,
}

/// Summary of a migrate run.
#[derive(Debug, Serialize)]
pub struct MigrateSummary {
    /// The patched file.
    pub file: String,
    /// Whether the clone-assignment anchor was found.
    pub anchor_found: bool,
    /// Whether the adjacent path-assignment line was deleted.
    pub path_assign_removed: bool,
    /// Number of comment lines pruned above the anchor.
    pub comments_pruned: usize,
    /// Number of token occurrences renamed.
    pub tokens_renamed: usize,
    /// Number of cleanup lines inserted after the migration.
    pub cleanups_inserted: usize,
    /// Whether this was a preview only.
    pub dry_run: bool,
}

/// Run the cleanup command against `input`.
///
/// # Errors
///
/// Returns an error if the window is invalid, no window was selected, or
/// file I/O fails. Nothing is written on error.
pub fn run_cleanup<W: Write>(input: &Path, options: &CleanupOptions, writer: &mut W) -> Result<i32> {
    let config = Config::load_from_path(input);
    let mut buffer = SourceBuffer::read(input)?;
    let window = resolve_window(&options.range, &buffer)?;

    let style = exit_style(options.permissive, &config.scopefix);
    let cleanup_call = options
        .cleanup_call
        .clone()
        .or_else(|| config.scopefix.cleanup_call.clone())
        .unwrap_or_else(|| DEFAULT_CLEANUP_CALL.to_owned());

    if options.report.verbose && !options.report.json {
        eprintln!("[VERBOSE] scopefix v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("[VERBOSE] Window: lines {}-{}", window.start(), window.end());
        eprintln!("[VERBOSE] Exit style: {style:?}");
        eprintln!("[VERBOSE] Cleanup call: {cleanup_call}");
        if let Some(path) = &config.config_file_path {
            eprintln!("[VERBOSE] Config: {}", path.display());
        }
        eprintln!();
    }

    let inserter = CleanupInserter::new(cleanup_call, style);
    let matches = inserter.apply(&mut buffer, &window);

    let summary = CleanupSummary {
        file: input.display().to_string(),
        window_start: window.start(),
        window_end: window.end(),
        cleanups_inserted: matches.len(),
        dry_run: options.report.dry_run,
    };

    if options.report.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        if options.report.dry_run {
            output::print_dry_run_banner(writer)?;
        }
        output::print_insertions(writer, &matches, inserter.cleanup_call(), summary.dry_run)?;
    }

    if options.report.dry_run {
        return Ok(0);
    }

    let target = options.dest.output.as_deref().unwrap_or(input);
    buffer.write_to(target)?;
    if !options.report.json {
        output::print_written(writer, target)?;
    }
    Ok(0)
}

/// Run the migrate command against `input`: structural substitution,
/// comment pruning, token rename, then cleanup insertion over the shifted
/// window.
///
/// An absent clone anchor downgrades to a warning; an ambiguous anchor is a
/// hard error and nothing is written.
///
/// # Errors
///
/// Returns an error if the window is invalid, the anchor is ambiguous, or
/// file I/O fails. Nothing is written on error.
pub fn run_migrate<W: Write>(input: &Path, options: &MigrateOptions, writer: &mut W) -> Result<i32> {
    let config = Config::load_from_path(input);
    let mut buffer = SourceBuffer::read(input)?;
    let window = resolve_window(&options.range, &buffer)?;

    let mut migration = migration_from_config(&config.scopefix);
    if let (Some(from), Some(to)) = (&options.from_token, &options.to_token) {
        migration = migration.with_tokens(from.clone(), to.clone());
    }

    if options.report.verbose && !options.report.json {
        eprintln!("[VERBOSE] scopefix v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("[VERBOSE] Window: lines {}-{}", window.start(), window.end());
        eprintln!(
            "[VERBOSE] Rename: {} -> {}",
            migration.from_token(),
            migration.to_token()
        );
        if let Some(path) = &config.config_file_path {
            eprintln!("[VERBOSE] Config: {}", path.display());
        }
        eprintln!();
    }

    let outcome = migration.apply(&mut buffer, &window)?;

    let style = exit_style(false, &config.scopefix);
    let cleanup_call = config
        .scopefix
        .cleanup_call
        .clone()
        .unwrap_or_else(|| DEFAULT_CLEANUP_CALL.to_owned());
    let inserter = CleanupInserter::new(cleanup_call, style);
    // The migration may have deleted lines; use its shifted window.
    let matches = inserter.apply(&mut buffer, &outcome.window);

    let summary = MigrateSummary {
        file: input.display().to_string(),
        anchor_found: outcome.anchor_found,
        path_assign_removed: outcome.path_assign_removed,
        comments_pruned: outcome.comments_pruned,
        tokens_renamed: outcome.tokens_renamed,
        cleanups_inserted: matches.len(),
        dry_run: options.report.dry_run,
    };

    if options.report.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        if options.report.dry_run {
            output::print_dry_run_banner(writer)?;
        }
        output::print_migration(writer, &outcome, summary.dry_run)?;
        output::print_insertions(writer, &matches, inserter.cleanup_call(), summary.dry_run)?;
    }

    if options.report.dry_run {
        return Ok(0);
    }

    let target = options.dest.output.as_deref().unwrap_or(input);
    buffer.write_to(target)?;
    if !options.report.json {
        output::print_written(writer, target)?;
    }
    Ok(0)
}

fn resolve_window(range: &RangeArgs, buffer: &SourceBuffer) -> Result<Window> {
    match (range.start, range.end, &range.start_anchor, &range.end_anchor) {
        (Some(start), Some(end), _, _) => {
            Ok(Window::from_bounds(start, end, buffer.line_count())?)
        }
        (_, _, Some(start_anchor), Some(end_anchor)) => Ok(Window::from_anchors(
            buffer.lines(),
            start_anchor,
            end_anchor,
        )?),
        _ => bail!("a window is required: pass --start/--end or --start-anchor/--end-anchor"),
    }
}

fn exit_style(permissive: bool, config: &ScopefixConfig) -> ExitStyle {
    if permissive || !config.strict_exits.unwrap_or(true) {
        ExitStyle::Permissive
    } else {
        ExitStyle::Strict
    }
}

fn migration_from_config(config: &ScopefixConfig) -> ScopeMigration {
    let mut migration = ScopeMigration::default();
    if let Some(anchor) = &config.clone_anchor {
        migration = migration.with_clone_anchor(anchor.clone());
    }
    if let Some(pattern) = &config.path_assign {
        migration = migration.with_path_assign(pattern.clone());
    }
    if let Some(lines) = &config.note_lines {
        migration = migration.with_note_lines(lines.clone());
    }
    if let Some(line) = &config.push_call {
        migration = migration.with_push_call(line.clone());
    }
    if let Some(marker) = &config.keep_marker {
        migration = migration.with_keep_marker(marker.clone());
    }
    if let (Some(from), Some(to)) = (&config.from_token, &config.to_token) {
        migration = migration.with_tokens(from.clone(), to.clone());
    }
    migration
}
