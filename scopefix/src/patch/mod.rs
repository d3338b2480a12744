//! Line-window patching engine.
//!
//! The engine rewrites one manually identified function body inside a source
//! file, addressed by a closed 1-indexed line window:
//! - `window` selects the lines eligible for transformation; everything
//!   outside passes through byte-identical.
//! - `exits` inserts a cleanup call before every return-style exit in the
//!   window, copying each exit line's indentation.
//! - `rename` migrates the body from a cloned-context identifier to the
//!   shared-context identifier, including the structural substitution of the
//!   clone-initialization block.
//!
//! The migration runs before the exit rewriting because it changes the line
//! count; its outcome carries the shifted window for downstream stages.

mod buffer;
mod error;
mod exits;
mod rename;
mod window;

pub use buffer::SourceBuffer;
pub use error::PatchError;
pub use exits::{CleanupInserter, ExitMatch, ExitStyle};
pub use rename::{LineClass, MigrationOutcome, ScopeMigration};
pub use window::Window;
