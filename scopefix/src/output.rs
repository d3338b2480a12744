use colored::Colorize;
use std::io::Write;

use crate::patch::{ExitMatch, MigrationOutcome};

/// Print one preview line per planned cleanup insertion.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_insertions<W: Write>(
    writer: &mut W,
    matches: &[ExitMatch],
    cleanup_call: &str,
    dry_run: bool,
) -> std::io::Result<()> {
    let verb = if dry_run { "Would insert" } else { "Inserted" };
    for m in matches {
        writeln!(
            writer,
            "  {verb} `{}` before the exit at line {}",
            cleanup_call.cyan(),
            m.line + 1
        )?;
    }
    if matches.is_empty() {
        writeln!(writer, "  No exit points found in the window.")?;
    }
    Ok(())
}

/// Print the human-readable migration report.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_migration<W: Write>(
    writer: &mut W,
    outcome: &MigrationOutcome,
    dry_run: bool,
) -> std::io::Result<()> {
    if let Some(line) = outcome.anchor_line {
        let verb = if dry_run { "Would replace" } else { "Replaced" };
        writeln!(
            writer,
            "  {verb} clone-assignment block with scope push at line {line}"
        )?;
        if outcome.path_assign_removed {
            writeln!(writer, "  Removed the adjacent path-assignment line")?;
        }
        if outcome.comments_pruned > 0 {
            writeln!(
                writer,
                "  Pruned {} comment line(s) above the anchor",
                outcome.comments_pruned
            )?;
        }
    } else {
        writeln!(
            writer,
            "  {} clone-assignment anchor not found; skipping structural edits \
             (already migrated?)",
            "Warning:".yellow()
        )?;
    }
    if outcome.tokens_renamed > 0 {
        writeln!(
            writer,
            "  Renamed {} token occurrence(s) in the window",
            outcome.tokens_renamed
        )?;
    }
    Ok(())
}

/// Print the dry-run banner.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_dry_run_banner<W: Write>(writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "{}", "[DRY-RUN] No files will be modified.".yellow())
}

/// Print the final write confirmation.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_written<W: Write>(writer: &mut W, path: &std::path::Path) -> std::io::Result<()> {
    writeln!(writer, "{} {}", "Patched:".green(), path.display())
}
