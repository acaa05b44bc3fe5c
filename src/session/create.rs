//! Entry point of the creation flow: direct creation or the interactive picker

use std::path::PathBuf;

use uuid::Uuid;

use super::materialize::{Workspace, materialize};
use super::picker::{InteractiveSession, SessionSettings, SessionState};
use crate::config::{Config, expand_home, normalize_extension};
use crate::core::{join_under, with_default_extension};
use crate::error::AppError;
use crate::host::Prompter;

/// Where to put the file for this call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum DirectoryChoice {
    /// Use `default_path` from config, falling back to the system temp dir
    #[default]
    FromConfig,
    SystemTemp,
    Explicit(String),
}

/// Arguments of one programmatic creation
#[derive(Debug, Clone, Default)]
pub(crate) struct CreateFileArgs {
    pub(crate) no_dialog: bool,
    pub(crate) filename: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) directory: DirectoryChoice,
    pub(crate) extension: Option<String>,
}

impl CreateFileArgs {
    fn named(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Bypass the picker entirely
    pub(crate) fn skips_dialog(&self) -> bool {
        self.no_dialog || self.named().is_some()
    }
}

/// A host able to run the picker until it reaches a terminal state
pub(crate) trait PickerHost: Prompter {
    fn drive(&mut self, session: &mut InteractiveSession<'_>) -> Result<(), AppError>;
}

pub(crate) fn resolve_directory(choice: &DirectoryChoice, config: &Config) -> PathBuf {
    match choice {
        DirectoryChoice::Explicit(dir) => expand_home(dir),
        DirectoryChoice::SystemTemp => std::env::temp_dir(),
        DirectoryChoice::FromConfig => config.default_path().unwrap_or_else(std::env::temp_dir),
    }
}

/// Create (or reopen) a file. `Ok(None)` means the picker was cancelled.
pub(crate) fn create_file<H: PickerHost>(
    args: &CreateFileArgs,
    config: &Config,
    mut ws: Workspace<'_>,
    host: &mut H,
) -> Result<Option<PathBuf>, AppError> {
    let extension = args
        .extension
        .as_deref()
        .and_then(normalize_extension)
        .unwrap_or_else(|| config.default_extension());
    let directory = resolve_directory(&args.directory, config);
    ws.fs.ensure_dir(&directory)?;

    if args.skips_dialog() {
        let filename = match args.named() {
            Some(name) => with_default_extension(name, &extension),
            None => format!("{}{}", Uuid::new_v4(), extension),
        };
        let path = join_under(&directory, &filename);
        let done = materialize(&mut ws, &path, args.content.as_deref(), false, host)?;
        return Ok(Some(done.path));
    }

    let settings = SessionSettings {
        directory,
        default_extension: extension,
    };
    let mut session = InteractiveSession::new(settings, ws);
    host.drive(&mut session)?;
    match session.state() {
        SessionState::Resolved(path) => Ok(Some(path.clone())),
        _ => Ok(None),
    }
}
