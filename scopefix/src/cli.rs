use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.scopefix.toml):
  Create this file next to the target source (or any parent directory)
  to override the built-in patch templates.

  [scopefix]
  # Cleanup call inserted before each return (no indentation)
  cleanup_call = \"context.pop_function_scope(saved_path)?;\"

  # Structural substitution
  clone_anchor = \"let mut function_context = context.clone();\"
  path_assign  = \"function_context.path = func_def.source_path\"
  push_call    = \"    let saved_path = context.push_function_scope(&func_def.source_path);\"
  note_lines   = [\"    // note line one\", \"    // note line two\"]

  # Backward comment pruning
  keep_marker  = \"Return paths requiring cleanup\"

  # Window rename
  from_token   = \"function_context\"
  to_token     = \"context\"

  # Only match `return Ok(..)` / `return Err(..)` exits
  strict_exits = true
";

/// Shared line-window arguments: numeric bounds or anchor substrings.
#[derive(Args, Debug, Default, Clone)]
pub struct RangeArgs {
    /// First line of the function body (1-indexed, inclusive).
    /// Cannot be combined with anchors.
    #[arg(long, requires = "end", conflicts_with_all = ["start_anchor", "end_anchor"])]
    pub start: Option<usize>,

    /// Last line of the function body (1-indexed, inclusive).
    #[arg(long, requires = "start")]
    pub end: Option<usize>,

    /// Substring of the line that opens the window.
    /// Anchors survive edits above the function; raw line numbers do not.
    #[arg(long, requires = "end_anchor")]
    pub start_anchor: Option<String>,

    /// Substring of the first line at or after the start anchor that closes
    /// the window.
    #[arg(long, requires = "start_anchor")]
    pub end_anchor: Option<String>,
}

/// Shared output destination arguments (exactly one required).
#[derive(Args, Debug, Default, Clone)]
#[group(required = true, multiple = false)]
pub struct DestArgs {
    /// Write the patched file to this path, leaving the input untouched.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Overwrite the input file in place.
    #[arg(long)]
    pub in_place: bool,
}

/// Shared reporting and verbosity arguments.
#[derive(Args, Debug, Default, Clone)]
pub struct ReportArgs {
    /// Show the edits without writing any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Output the patch summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "scopefix - line-range patcher that inserts scope cleanup before function exits",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
/// Available patching operations.
pub enum Commands {
    /// Insert a scope-release call before every exit point in the window
    Cleanup {
        /// File to patch.
        input: PathBuf,

        /// Window selection (line numbers or anchors).
        #[command(flatten)]
        range: RangeArgs,

        /// Output destination (explicit path or in-place).
        #[command(flatten)]
        dest: DestArgs,

        /// Reporting options.
        #[command(flatten)]
        report: ReportArgs,

        /// Accept any `return` statement, not only Ok/Err constructor
        /// returns.
        #[arg(long)]
        permissive: bool,

        /// Override the cleanup call template for this run.
        #[arg(long)]
        cleanup_call: Option<String>,
    },
    /// Migrate the window from a cloned context to the scope stack, then
    /// insert cleanups before every exit point
    Migrate {
        /// File to patch.
        input: PathBuf,

        /// Window selection (line numbers or anchors).
        #[command(flatten)]
        range: RangeArgs,

        /// Output destination (explicit path or in-place).
        #[command(flatten)]
        dest: DestArgs,

        /// Reporting options.
        #[command(flatten)]
        report: ReportArgs,

        /// Identifier to rename away from (default: config or built-in).
        #[arg(long, requires = "to_token")]
        from_token: Option<String>,

        /// Identifier to rename to.
        #[arg(long, requires = "from_token")]
        to_token: Option<String>,
    },
}
