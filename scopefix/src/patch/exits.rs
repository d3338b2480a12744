use serde::Serialize;

use super::{SourceBuffer, Window};
use crate::constants::get_strict_exit_re;

/// How exit statements are recognized inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitStyle {
    /// Only `return` followed by an `Ok(` or `Err(` constructor call.
    #[default]
    Strict,
    /// Any `return ` statement regardless of the returned expression.
    Permissive,
}

/// A cleanup insertion made for one detected exit point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitMatch {
    /// 1-indexed line number where the cleanup line now sits; the exit line
    /// itself is one below.
    pub line: usize,
    /// Leading whitespace copied from the exit line onto the cleanup line.
    pub indent: String,
}

/// Inserts a cleanup call immediately before every exit point in a window.
///
/// The scan is a single forward pass. After each insertion the cursor skips
/// both the inserted line and the exit line, and the window end is pushed
/// down by one so the remaining original lines are still covered. The
/// cleanup template never starts with the `return` keyword, so an inserted
/// line can never itself match.
///
/// Re-running over already-patched output inserts a second cleanup per exit;
/// deduplication is deliberately not attempted.
#[derive(Debug, Clone)]
pub struct CleanupInserter {
    cleanup_call: String,
    style: ExitStyle,
}

impl CleanupInserter {
    /// Create an inserter for the given cleanup call (without indentation).
    #[must_use]
    pub fn new(cleanup_call: impl Into<String>, style: ExitStyle) -> Self {
        Self {
            cleanup_call: cleanup_call.into(),
            style,
        }
    }

    /// The cleanup call this inserter emits, without indentation.
    #[must_use]
    pub fn cleanup_call(&self) -> &str {
        &self.cleanup_call
    }

    /// Insert the cleanup call before every exit point inside `window`.
    ///
    /// Returns one [`ExitMatch`] per insertion, in buffer order. Lines
    /// outside the window are left byte-identical.
    pub fn apply(&self, buffer: &mut SourceBuffer, window: &Window) -> Vec<ExitMatch> {
        let mut inserted = Vec::new();
        let mut line_no = window.start();
        let mut end = window.end();

        while line_no <= end {
            let indent = match buffer.line(line_no) {
                Some(line) => {
                    let stripped = line.trim_start();
                    if self.is_exit(stripped) {
                        Some(line[..line.len() - stripped.len()].to_owned())
                    } else {
                        None
                    }
                }
                // Loop termination doubles as the out-of-bounds clamp.
                None => break,
            };

            if let Some(indent) = indent {
                let cleanup = format!("{indent}{}", self.cleanup_call);
                buffer.insert(line_no, cleanup);
                inserted.push(ExitMatch {
                    line: line_no,
                    indent,
                });
                // Skip the inserted line; the exit line moved down with it.
                line_no += 1;
                end += 1;
            }
            line_no += 1;
        }

        inserted
    }

    fn is_exit(&self, stripped: &str) -> bool {
        match self.style {
            ExitStyle::Strict => get_strict_exit_re().is_match(stripped),
            ExitStyle::Permissive => stripped.starts_with("return "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_CLEANUP_CALL;

    fn buffer(lines: &[&str]) -> SourceBuffer {
        SourceBuffer::from_lines(lines.iter().map(|s| (*s).to_owned()).collect())
    }

    fn inserter(style: ExitStyle) -> CleanupInserter {
        CleanupInserter::new(DEFAULT_CLEANUP_CALL, style)
    }

    #[test]
    fn test_inserts_before_each_exit_with_matching_indent() {
        let mut buf = buffer(&[
            "fn f() -> Result<()> {",
            "    if bad {",
            "        return Err(Error::new());",
            "    }",
            "    return Ok(());",
            "}",
        ]);
        let window = Window::from_bounds(1, 6, buf.line_count()).unwrap();
        let matches = inserter(ExitStyle::Strict).apply(&mut buf, &window);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].indent, "        ");
        assert_eq!(matches[1].indent, "    ");
        assert_eq!(
            buf.line(3),
            Some("        context.pop_function_scope(saved_path)?;")
        );
        assert_eq!(buf.line(4), Some("        return Err(Error::new());"));
        assert_eq!(
            buf.line(6),
            Some("    context.pop_function_scope(saved_path)?;")
        );
        assert_eq!(buf.line(7), Some("    return Ok(());"));
    }

    #[test]
    fn test_count_matches_exits_in_window() {
        let mut buf = buffer(&[
            "return Ok(a);",
            "    return Ok(b);",
            "    return Err(c);",
            "return Ok(d);",
        ]);
        let window = Window::from_bounds(2, 3, buf.line_count()).unwrap();
        let matches = inserter(ExitStyle::Strict).apply(&mut buf, &window);
        assert_eq!(matches.len(), 2);
        // Lines outside the window are untouched.
        assert_eq!(buf.line(1), Some("return Ok(a);"));
        assert_eq!(buf.line(6), Some("return Ok(d);"));
    }

    #[test]
    fn test_strict_rejects_bare_return() {
        let mut buf = buffer(&["    return result;", "    return Ok(result);"]);
        let window = Window::from_bounds(1, 2, buf.line_count()).unwrap();
        let matches = inserter(ExitStyle::Strict).apply(&mut buf, &window);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, 2);
    }

    #[test]
    fn test_permissive_accepts_any_return() {
        let mut buf = buffer(&["    return result;", "    returning = true;"]);
        let window = Window::from_bounds(1, 2, buf.line_count()).unwrap();
        let matches = inserter(ExitStyle::Permissive).apply(&mut buf, &window);
        // "returning" has no space after the keyword and must not match.
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, 1);
    }

    #[test]
    fn test_no_exits_leaves_window_byte_identical() {
        let original = buffer(&["let a = 1;", "let b = 2;"]);
        let mut buf = original.clone();
        let window = Window::from_bounds(1, 2, buf.line_count()).unwrap();
        let matches = inserter(ExitStyle::Strict).apply(&mut buf, &window);
        assert!(matches.is_empty());
        assert_eq!(buf, original);
    }

    #[test]
    fn test_double_application_double_inserts() {
        // Regression guard: the rewriter is NOT idempotent. A second run over
        // the same window must insert a second cleanup per exit. Do not
        // "fix" this without a version bump.
        let mut buf = buffer(&["    return Ok(());"]);
        let window = Window::from_bounds(1, 1, buf.line_count()).unwrap();
        let ins = inserter(ExitStyle::Strict);

        let first = ins.apply(&mut buf, &window);
        assert_eq!(first.len(), 1);

        let shifted = Window::from_bounds(1, 2, buf.line_count()).unwrap();
        let second = ins.apply(&mut buf, &shifted);
        assert_eq!(second.len(), 1);

        let cleanups = buf
            .lines()
            .iter()
            .filter(|l| l.contains("pop_function_scope"))
            .count();
        assert_eq!(cleanups, 2);
    }

    #[test]
    fn test_window_boundaries_exact() {
        // Exits at start-1, start, end, end+1; only the middle two receive a
        // cleanup.
        let mut buf = buffer(&[
            "    return Ok(one);",
            "    return Ok(two);",
            "    return Ok(three);",
            "    return Ok(four);",
        ]);
        let window = Window::from_bounds(2, 3, buf.line_count()).unwrap();
        let matches = inserter(ExitStyle::Strict).apply(&mut buf, &window);
        assert_eq!(matches.len(), 2);
        assert_eq!(buf.line(1), Some("    return Ok(one);"));
        assert_eq!(buf.line(6), Some("    return Ok(four);"));
        assert!(buf.line(2).unwrap().contains("pop_function_scope"));
        assert!(buf.line(4).unwrap().contains("pop_function_scope"));
    }
}
