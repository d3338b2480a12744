use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::CONFIG_FILENAME;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for scopefix.
    pub scopefix: ScopefixConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Template overrides for the patch engine. Every value falls back to the
/// built-in default when absent, so a config file only names what it
/// changes.
pub struct ScopefixConfig {
    /// Cleanup call inserted before each exit point (without indentation).
    pub cleanup_call: Option<String>,
    /// Exact text identifying the clone-assignment anchor line.
    pub clone_anchor: Option<String>,
    /// Text identifying the path-assignment line deleted after substitution.
    pub path_assign: Option<String>,
    /// The two explanatory lines emitted above the scope-push call.
    pub note_lines: Option<[String; 2]>,
    /// Full replacement line holding the scope-push call, indentation
    /// included.
    pub push_call: Option<String>,
    /// Comment marker that stops backward pruning and is never deleted.
    pub keep_marker: Option<String>,
    /// Identifier replaced during the window rename.
    pub from_token: Option<String>,
    /// Identifier substituted during the window rename.
    pub to_token: Option<String>,
    /// Restrict exit detection to `Ok`/`Err` constructor returns.
    pub strict_exits: Option<bool>,
}

impl Config {
    /// Loads configuration from the current directory upward.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// A file path starts the search in its containing directory. Missing or
    /// unparseable files fall through to the defaults.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                if let Ok(content) = fs::read_to_string(&candidate) {
                    if let Ok(mut config) = toml::from_str::<Config>(&content) {
                        config.config_file_path = Some(candidate);
                        return config;
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}
