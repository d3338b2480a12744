use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by window validation and patch application.
///
/// All variants are terminal for a single invocation; no partial output is
/// ever written once one of these is returned.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The requested line range does not address the file.
    #[error("invalid line range {start}..={end} for a file of {line_count} lines")]
    InvalidRange {
        /// Requested first line (1-indexed, inclusive).
        start: usize,
        /// Requested last line (1-indexed, inclusive).
        end: usize,
        /// Total number of lines in the file.
        line_count: usize,
    },

    /// An anchor substring used to resolve the window was not found.
    #[error("window anchor {anchor:?} not found in input")]
    AnchorNotFound {
        /// The substring that failed to match any line.
        anchor: String,
    },

    /// More than one clone-assignment candidate inside the search sub-window.
    ///
    /// The structural substitution acts on exactly one line; two candidates
    /// mean the caller's range is wrong or the file is not what they think.
    #[error("ambiguous match: lines {first} and {second} both match the clone anchor")]
    AmbiguousMatch {
        /// Line number of the first candidate.
        first: usize,
        /// Line number of the second candidate.
        second: usize,
    },

    /// Reading or writing the target file failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        /// What was being attempted ("read", "write").
        action: &'static str,
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
