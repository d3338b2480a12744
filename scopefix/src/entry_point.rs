use crate::cli::{Cli, Commands};
use anyhow::Result;
use clap::Parser;

/// Runs the patcher with the given arguments.
///
/// # Errors
///
/// Returns an error if command execution fails (invalid window, ambiguous
/// anchor, or file I/O); argument errors are reported on stderr and mapped
/// to exit code 1 instead.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run scopefix with the given arguments, writing output to the specified
/// writer.
///
/// This is the testable version of `run_with_args` that allows output
/// capture.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["scopefix".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => {
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    // Let clap print help/version as intended, but captured
                    // by redirect
                    write!(writer, "{e}")?;
                    writer.flush()?;
                    return Ok(0);
                }
                _ => {
                    eprint!("{e}");
                    return Ok(1);
                }
            }
        }
    };

    match cli.command {
        Commands::Cleanup {
            input,
            range,
            dest,
            report,
            permissive,
            cleanup_call,
        } => {
            if !input.exists() {
                eprintln!("Error: The file '{}' does not exist.", input.display());
                return Ok(1);
            }
            let options = crate::commands::CleanupOptions {
                range,
                dest,
                report,
                permissive,
                cleanup_call,
            };
            crate::commands::run_cleanup(&input, &options, writer)
        }
        Commands::Migrate {
            input,
            range,
            dest,
            report,
            from_token,
            to_token,
        } => {
            if !input.exists() {
                eprintln!("Error: The file '{}' does not exist.", input.display());
                return Ok(1);
            }
            let options = crate::commands::MigrateOptions {
                range,
                dest,
                report,
                from_token,
                to_token,
            };
            crate::commands::run_migrate(&input, &options, writer)
        }
    }
}
