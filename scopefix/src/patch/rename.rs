use regex::Regex;
use serde::Serialize;

use super::{PatchError, SourceBuffer, Window};
use crate::constants::{
    DEFAULT_CLONE_ANCHOR, DEFAULT_FROM_TOKEN, DEFAULT_KEEP_MARKER, DEFAULT_NOTE_LINES,
    DEFAULT_PATH_ASSIGN, DEFAULT_PUSH_CALL, DEFAULT_TO_TOKEN,
};

/// How many lines at the head of the window are searched for the
/// clone-assignment anchor. The initialization statement lives at the top of
/// the function body, so the search never needs the whole window.
const ANCHOR_SEARCH_LINES: usize = 30;

/// Classification of a line for backward comment pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// A plain `//` comment, eligible for pruning.
    Comment,
    /// A `///` or `//!` documentation comment; never pruned.
    DocComment,
    /// A whitespace-only line.
    Blank,
    /// Anything else.
    Code,
}

impl LineClass {
    /// Classify a single line by its left-stripped prefix.
    #[must_use]
    pub fn of(line: &str) -> Self {
        let stripped = line.trim_start();
        if stripped.is_empty() {
            Self::Blank
        } else if stripped.starts_with("///") || stripped.starts_with("//!") {
            Self::DocComment
        } else if stripped.starts_with("//") {
            Self::Comment
        } else {
            Self::Code
        }
    }
}

/// What a migration run did to the window.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationOutcome {
    /// Whether the clone-assignment anchor was found and substituted.
    /// `false` usually means the file was already migrated.
    pub anchor_found: bool,
    /// 1-indexed line where the first note line now sits, after pruning.
    pub anchor_line: Option<usize>,
    /// Whether the adjacent path-assignment line was deleted.
    pub path_assign_removed: bool,
    /// Number of comment lines pruned above the anchor.
    pub comments_pruned: usize,
    /// Number of token occurrences renamed across the window.
    pub tokens_renamed: usize,
    /// Window with bounds shifted by the structural edits. Downstream stages
    /// must use this, not the original bounds.
    pub window: Window,
}

/// Migrates a function body from a cloned context to the scope stack.
///
/// Three sub-operations run in a fixed order: structural substitution of the
/// clone-assignment block, backward pruning of the explanatory comments
/// above it, then the identifier rename across the whole window. The first
/// two change the line count, so they run before anything that does
/// line-number bookkeeping.
#[derive(Debug, Clone)]
pub struct ScopeMigration {
    clone_anchor: String,
    path_assign: String,
    note_lines: [String; 2],
    push_call: String,
    keep_marker: String,
    from_token: String,
    to_token: String,
}

impl Default for ScopeMigration {
    fn default() -> Self {
        Self {
            clone_anchor: DEFAULT_CLONE_ANCHOR.to_owned(),
            path_assign: DEFAULT_PATH_ASSIGN.to_owned(),
            note_lines: [
                DEFAULT_NOTE_LINES[0].to_owned(),
                DEFAULT_NOTE_LINES[1].to_owned(),
            ],
            push_call: DEFAULT_PUSH_CALL.to_owned(),
            keep_marker: DEFAULT_KEEP_MARKER.to_owned(),
            from_token: DEFAULT_FROM_TOKEN.to_owned(),
            to_token: DEFAULT_TO_TOKEN.to_owned(),
        }
    }
}

impl ScopeMigration {
    /// Override the clone-assignment anchor text.
    #[must_use]
    pub fn with_clone_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.clone_anchor = anchor.into();
        self
    }

    /// Override the path-assignment text.
    #[must_use]
    pub fn with_path_assign(mut self, pattern: impl Into<String>) -> Self {
        self.path_assign = pattern.into();
        self
    }

    /// Override the two note lines emitted above the scope-push call.
    #[must_use]
    pub fn with_note_lines(mut self, lines: [String; 2]) -> Self {
        self.note_lines = lines;
        self
    }

    /// Override the scope-push replacement line.
    #[must_use]
    pub fn with_push_call(mut self, line: impl Into<String>) -> Self {
        self.push_call = line.into();
        self
    }

    /// Override the comment marker that stops backward pruning.
    #[must_use]
    pub fn with_keep_marker(mut self, marker: impl Into<String>) -> Self {
        self.keep_marker = marker.into();
        self
    }

    /// Override the rename source and destination identifiers.
    #[must_use]
    pub fn with_tokens(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from_token = from.into();
        self.to_token = to.into();
        self
    }

    /// The identifier this migration renames away from.
    #[must_use]
    pub fn from_token(&self) -> &str {
        &self.from_token
    }

    /// The identifier this migration renames to.
    #[must_use]
    pub fn to_token(&self) -> &str {
        &self.to_token
    }

    /// Run the migration over `window`, mutating the buffer in place.
    ///
    /// An absent anchor is not an error: the outcome reports
    /// `anchor_found = false` and only the token rename runs, so an
    /// already-migrated file passes through with its identifiers intact.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::AmbiguousMatch`] if more than one line in the
    /// search sub-window matches the clone anchor; nothing is mutated in
    /// that case.
    pub fn apply(
        &self,
        buffer: &mut SourceBuffer,
        window: &Window,
    ) -> Result<MigrationOutcome, PatchError> {
        let candidates = self.find_anchor_candidates(buffer, window);
        if candidates.len() > 1 {
            return Err(PatchError::AmbiguousMatch {
                first: candidates[0],
                second: candidates[1],
            });
        }

        let mut window = *window;
        let mut outcome = MigrationOutcome {
            anchor_found: false,
            anchor_line: None,
            path_assign_removed: false,
            comments_pruned: 0,
            tokens_renamed: 0,
            window,
        };

        if let Some(&anchor) = candidates.first() {
            outcome.anchor_found = true;
            let mut deleted = 0;

            // The anchor line and the two after it become the replacement
            // block: two note comments plus the scope-push call.
            let replacement = [
                self.note_lines[0].clone(),
                self.note_lines[1].clone(),
                self.push_call.clone(),
            ];
            for (offset, text) in replacement.into_iter().enumerate() {
                buffer.replace(anchor + offset, text);
            }

            // The line that followed the replaced block may be the now
            // redundant path assignment.
            let probe = anchor + 3;
            if buffer
                .line(probe)
                .is_some_and(|l| l.contains(&self.path_assign))
            {
                buffer.remove(probe);
                outcome.path_assign_removed = true;
                deleted += 1;
            }

            outcome.comments_pruned = self.prune_comments_above(buffer, anchor, &window);
            deleted += outcome.comments_pruned;

            outcome.anchor_line = Some(anchor - outcome.comments_pruned);
            window = window.contracted(deleted);
        }

        outcome.tokens_renamed = self.rename_tokens(buffer, &window);
        outcome.window = window;
        Ok(outcome)
    }

    fn find_anchor_candidates(&self, buffer: &SourceBuffer, window: &Window) -> Vec<usize> {
        let search = window.head(ANCHOR_SEARCH_LINES);
        (search.start()..=search.end())
            .filter(|&line_no| {
                buffer
                    .line(line_no)
                    .is_some_and(|l| l.contains(&self.clone_anchor))
            })
            .collect()
    }

    /// Delete the run of plain comment lines directly above the anchor,
    /// walking upward. One stop rule: the scan ends at the first line that
    /// is not a plain `//` comment (doc comment, blank, or code), at a line
    /// carrying the keep marker, or at the window start. Returns the number
    /// of lines deleted.
    fn prune_comments_above(
        &self,
        buffer: &mut SourceBuffer,
        anchor: usize,
        window: &Window,
    ) -> usize {
        let mut pruned = 0;
        let mut line_no = anchor.saturating_sub(1);
        while line_no >= window.start() {
            let stop = match buffer.line(line_no) {
                Some(line) => {
                    line.contains(&self.keep_marker) || LineClass::of(line) != LineClass::Comment
                }
                None => true,
            };
            if stop {
                break;
            }
            buffer.remove(line_no);
            pruned += 1;
            line_no -= 1;
        }
        pruned
    }

    /// Rename every whole-token occurrence of the source identifier inside
    /// the window. Word-boundary matching keeps longer identifiers that
    /// merely contain the token intact.
    fn rename_tokens(&self, buffer: &mut SourceBuffer, window: &Window) -> usize {
        let pattern = format!(r"\b{}\b", regex::escape(&self.from_token));
        #[allow(clippy::expect_used)]
        let re = Regex::new(&pattern).expect("escaped token pattern is always valid");

        let mut renamed = 0;
        for line_no in window.start()..=window.end() {
            let Some(line) = buffer.line(line_no) else {
                break;
            };
            let hits = re.find_iter(line).count();
            if hits > 0 {
                let replaced = re.replace_all(line, self.to_token.as_str()).into_owned();
                buffer.replace(line_no, replaced);
                renamed += hits;
            }
        }
        renamed
    }
}
