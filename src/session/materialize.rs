use std::path::{Path, PathBuf};

use crate::cleanup::SessionCleanupTracker;
use crate::error::AppError;
use crate::history::HistoryStore;
use crate::host::{FileSystem, Prompter};

/// The collaborators a creation needs, borrowed for one invocation
pub(crate) struct Workspace<'a> {
    pub(crate) fs: &'a dyn FileSystem,
    pub(crate) history: &'a mut HistoryStore,
    pub(crate) tracker: &'a mut SessionCleanupTracker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Created,
    /// A remembered file that had disappeared was written again
    Restored,
    Overwritten,
    AlreadyExisted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Materialized {
    pub(crate) path: PathBuf,
    pub(crate) outcome: Outcome,
}

/// Make sure `path` exists, then bump it in history.
///
/// Missing files are written (with `content` or empty) and tracked for
/// cleanup. Existing files are only overwritten when `content` is non-empty.
/// Filesystem errors abort before history is touched; a history failure after
/// the file is in place is reported but does not undo the file.
pub(crate) fn materialize(
    ws: &mut Workspace<'_>,
    path: &Path,
    content: Option<&str>,
    recreate: bool,
    prompter: &mut dyn Prompter,
) -> Result<Materialized, AppError> {
    let shown = path.to_string_lossy().into_owned();
    let content = content.filter(|c| !c.is_empty());

    let outcome = if !ws.fs.exists(path)? {
        ws.fs.write(path, content.unwrap_or(""))?;
        ws.tracker.track(&shown);
        if recreate {
            prompter.info(&format!("File restored: {shown}"));
            Outcome::Restored
        } else {
            prompter.info(&format!("File created: {shown}"));
            Outcome::Created
        }
    } else if let Some(text) = content {
        ws.fs.write(path, text)?;
        Outcome::Overwritten
    } else {
        prompter.info(&format!(
            "File already exists (was it restored or created externally?): {shown}"
        ));
        Outcome::AlreadyExisted
    };
    tracing::debug!(path = %shown, ?outcome, "materialized");

    if let Err(e) = ws.history.record_access(&shown) {
        tracing::warn!(error = %e, "history not updated");
        prompter.error(&e.to_string());
    }

    Ok(Materialized {
        path: path.to_path_buf(),
        outcome,
    })
}
