use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::{DEFAULT_EXTENSION, HOME_ENV};

/// When files created this session are deleted automatically
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CleanupStrategy {
    #[default]
    Never,
    #[serde(alias = "onProcessExit")]
    OnProcessExit,
    #[serde(alias = "onEditorClose")]
    OnEditorClose,
}

impl CleanupStrategy {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            CleanupStrategy::Never => "never",
            CleanupStrategy::OnProcessExit => "on_process_exit",
            CleanupStrategy::OnEditorClose => "on_editor_close",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default, alias = "defaultExtension")]
    pub(crate) default_extension: Option<String>,
    #[serde(default, alias = "defaultPath")]
    pub(crate) default_path: Option<String>,
    /// Deprecated: `true` means `on_process_exit`, `false` means `never`
    #[serde(default, alias = "deleteOnExit")]
    pub(crate) delete_on_exit: Option<bool>,
    #[serde(default, alias = "cleanupStrategy")]
    pub(crate) cleanup_strategy: Option<CleanupStrategy>,
    #[serde(default)]
    pub(crate) editor: Option<String>,
    #[serde(default)]
    pub(crate) quiet: bool,
}

impl Config {
    pub(crate) fn load() -> Self {
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded config");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 0. Relocated home: $QUICKTEMP_HOME/config.toml
        if let Some(home) = std::env::var_os(HOME_ENV) {
            paths.push(PathBuf::from(home).join("config.toml"));
        }

        // 1. XDG config: ~/.config/quicktemp/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("quicktemp").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("quicktemp").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.quicktemp.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".quicktemp.toml"));
        }

        paths
    }

    /// Effective strategy: the enum wins, the legacy boolean is an alias
    pub(crate) fn cleanup_strategy(&self) -> CleanupStrategy {
        if let Some(strategy) = self.cleanup_strategy {
            return strategy;
        }
        match self.delete_on_exit {
            Some(legacy) => {
                tracing::warn!(
                    "`delete_on_exit` is deprecated, use `cleanup_strategy` instead"
                );
                if legacy {
                    CleanupStrategy::OnProcessExit
                } else {
                    CleanupStrategy::Never
                }
            }
            None => CleanupStrategy::Never,
        }
    }

    /// Configured extension with a leading dot, `.txt` when unset or blank
    pub(crate) fn default_extension(&self) -> String {
        self.default_extension
            .as_deref()
            .and_then(normalize_extension)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
    }

    /// Configured directory with `~` expanded, `None` when unset or blank
    pub(crate) fn default_path(&self) -> Option<PathBuf> {
        let raw = self.default_path.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        Some(expand_home(raw))
    }

    pub(crate) fn editor(&self) -> Option<&str> {
        self.editor.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

/// `md` -> `.md`, `.md` -> `.md`, blank -> `None`
pub(crate) fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('.') {
        Some(trimmed.to_string())
    } else {
        Some(format!(".{trimmed}"))
    }
}

/// Expand a leading `~` to the home directory
pub(crate) fn expand_home(path: &str) -> PathBuf {
    let Some(rest) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };
    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        home
    } else {
        home.join(Path::new(rest))
    }
}
