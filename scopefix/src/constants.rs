use regex::Regex;
use std::sync::OnceLock;

/// Name of the dedicated configuration file.
pub const CONFIG_FILENAME: &str = ".scopefix.toml";

/// Cleanup call inserted before each exit point, without indentation.
pub const DEFAULT_CLEANUP_CALL: &str = "context.pop_function_scope(saved_path)?;";

/// Exact statement text identifying the clone-assignment anchor line.
pub const DEFAULT_CLONE_ANCHOR: &str = "let mut function_context = context.clone();";

/// Statement text identifying the path-assignment line removed after the
/// structural substitution.
pub const DEFAULT_PATH_ASSIGN: &str = "function_context.path = func_def.source_path";

/// The two explanatory lines emitted above the scope-push call.
pub const DEFAULT_NOTE_LINES: [&str; 2] = [
    "    // REFACTORED: Replaced context.clone() with scope push/pop",
    "    // This uses the scope stack instead of cloning the entire context (~68-247 KB per call)",
];

/// Replacement line holding the scope-push call, indentation included.
pub const DEFAULT_PUSH_CALL: &str =
    "    let saved_path = context.push_function_scope(&func_def.source_path);";

/// Comment marker that stops backward pruning; lines carrying it survive.
pub const DEFAULT_KEEP_MARKER: &str = "Return paths requiring cleanup";

/// Identifier replaced during the window rename.
pub const DEFAULT_FROM_TOKEN: &str = "function_context";

/// Identifier substituted during the window rename.
pub const DEFAULT_TO_TOKEN: &str = "context";

/// Regex matching a left-stripped strict exit statement: the `return`
/// keyword, at least one space, then a success or failure constructor call.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_strict_exit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^return\s+(Ok|Err)\(").expect("Invalid strict exit regex pattern")
    })
}
