use std::fs;
use std::io::Write;
use std::path::Path;

use super::PatchError;

/// The full contents of a source file as an ordered sequence of lines.
///
/// Lines are stored without terminators and addressed 1-indexed, matching
/// how callers identify function bodies. The whole file is read into memory
/// before any transformation and written back as a whole afterward; there is
/// no streaming or partial I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    lines: Vec<String>,
    had_trailing_newline: bool,
}

impl SourceBuffer {
    /// Read a file into a line buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Io`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self, PatchError> {
        let content = fs::read_to_string(path).map_err(|source| PatchError::Io {
            action: "read",
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_content(&content))
    }

    /// Build a buffer from in-memory content.
    #[must_use]
    pub fn from_content(content: &str) -> Self {
        let had_trailing_newline = content.ends_with('\n');
        let trimmed = content.strip_suffix('\n').unwrap_or(content);
        let lines = if trimmed.is_empty() && had_trailing_newline {
            vec![String::new()]
        } else {
            trimmed.split('\n').map(str::to_owned).collect()
        };
        Self {
            lines,
            had_trailing_newline,
        }
    }

    /// Build a buffer from pre-split lines (test construction).
    #[must_use]
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            had_trailing_newline: true,
        }
    }

    /// All lines in order, without terminators.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines in the buffer.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The line at a 1-indexed position, if it exists.
    #[must_use]
    pub fn line(&self, line_no: usize) -> Option<&str> {
        if line_no == 0 {
            return None;
        }
        self.lines.get(line_no - 1).map(String::as_str)
    }

    /// Insert `text` as a new line at the 1-indexed position, pushing the
    /// current occupant and everything below it down by one.
    pub fn insert(&mut self, line_no: usize, text: String) {
        let idx = line_no.saturating_sub(1).min(self.lines.len());
        self.lines.insert(idx, text);
    }

    /// Remove the line at the 1-indexed position. Out-of-range positions are
    /// ignored.
    pub fn remove(&mut self, line_no: usize) {
        if line_no >= 1 && line_no <= self.lines.len() {
            self.lines.remove(line_no - 1);
        }
    }

    /// Replace the line at the 1-indexed position. Positions one past the
    /// end append instead, so a replacement block can run off the end of a
    /// short file without panicking.
    pub fn replace(&mut self, line_no: usize, text: String) {
        if line_no >= 1 && line_no <= self.lines.len() {
            self.lines[line_no - 1] = text;
        } else {
            self.lines.push(text);
        }
    }

    /// The full content as a single string, with the original trailing
    /// newline restored.
    #[must_use]
    pub fn contents(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.had_trailing_newline {
            out.push('\n');
        }
        out
    }

    /// Write the buffer back to `path` atomically.
    ///
    /// Content goes to a temp file in the destination directory first, then
    /// renames over the target, so a failure mid-write never leaves a
    /// truncated file behind.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Io`] if the temp file cannot be created,
    /// written, or persisted.
    pub fn write_to(&self, path: &Path) -> Result<(), PatchError> {
        let io_err = |source: std::io::Error| PatchError::Io {
            action: "write",
            path: path.to_path_buf(),
            source,
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(self.contents().as_bytes()).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}
