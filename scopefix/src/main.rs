//! Main binary entry point for the scopefix line-range patcher.
//!
//! This binary simply delegates to the shared `entry_point::run_with_args()`
//! function to ensure consistent behavior between the CLI and tests.

use anyhow::Result;

fn main() -> Result<()> {
    let code = scopefix::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
