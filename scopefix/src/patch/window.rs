use serde::Serialize;

use super::PatchError;

/// A closed, 1-indexed interval of line numbers eligible for transformation.
///
/// Lines outside the window are never matched or mutated. Both bounds are
/// inclusive; a single-line window has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    start: usize,
    end: usize,
}

impl Window {
    /// Create a window from inclusive 1-indexed bounds, validated against
    /// the buffer length.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::InvalidRange`] if `start` is zero, `start > end`,
    /// or `end` exceeds `line_count`.
    pub fn from_bounds(start: usize, end: usize, line_count: usize) -> Result<Self, PatchError> {
        if start == 0 || start > end || end > line_count {
            return Err(PatchError::InvalidRange {
                start,
                end,
                line_count,
            });
        }
        Ok(Self { start, end })
    }

    /// Resolve a window from anchor substrings instead of raw line numbers.
    ///
    /// The first line containing `start_anchor` opens the window; the first
    /// line at or after it containing `end_anchor` closes it. Addressing a
    /// function body by its text survives edits above it, which absolute
    /// line numbers do not.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::AnchorNotFound`] naming whichever anchor failed
    /// to match.
    pub fn from_anchors(
        lines: &[String],
        start_anchor: &str,
        end_anchor: &str,
    ) -> Result<Self, PatchError> {
        let start_idx = lines
            .iter()
            .position(|l| l.contains(start_anchor))
            .ok_or_else(|| PatchError::AnchorNotFound {
                anchor: start_anchor.to_owned(),
            })?;
        let end_idx = lines[start_idx..]
            .iter()
            .position(|l| l.contains(end_anchor))
            .map(|offset| start_idx + offset)
            .ok_or_else(|| PatchError::AnchorNotFound {
                anchor: end_anchor.to_owned(),
            })?;
        Ok(Self {
            start: start_idx + 1,
            end: end_idx + 1,
        })
    }

    /// First line of the window (1-indexed, inclusive).
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Last line of the window (1-indexed, inclusive).
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Whether a 1-indexed line number falls inside the window.
    #[must_use]
    pub const fn contains(&self, line_no: usize) -> bool {
        self.start <= line_no && line_no <= self.end
    }

    /// The window covering at most the first `n` lines of this window.
    ///
    /// Used to narrow the clone-anchor search to the head of the function
    /// body, where the initialization statement lives.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        let end = self
            .start
            .saturating_add(n.saturating_sub(1))
            .min(self.end);
        Self {
            start: self.start,
            end,
        }
    }

    /// The same window with the end bound pulled in after `deleted` lines
    /// were removed inside it.
    ///
    /// Downstream stages must use the contracted window, not the original
    /// file's bounds.
    #[must_use]
    pub const fn contracted(&self, deleted: usize) -> Self {
        Self {
            start: self.start,
            end: self.end.saturating_sub(deleted),
        }
    }
}
