//! Session cleanup tracking
//!
//! Remembers files this process created and deletes them according to the
//! configured [`CleanupStrategy`]. A tracked path is deleted at most once:
//! membership ends as soon as the file is removed or found already gone.

use rayon::prelude::*;
use std::path::Path;

use crate::config::CleanupStrategy;
use crate::core::path_equal;
use crate::error::AppError;
use crate::history::HistoryStore;
use crate::host::FileSystem;

/// Handle for the installed editor-close listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CloseListener {
    id: u64,
}

/// Outcome of a process-exit cleanup batch
#[derive(Debug, Default)]
pub(crate) struct CleanupReport {
    pub(crate) deleted: Vec<String>,
    pub(crate) already_gone: Vec<String>,
    pub(crate) failed: Vec<(String, AppError)>,
}

impl CleanupReport {
    pub(crate) fn attempted(&self) -> usize {
        self.deleted.len() + self.already_gone.len() + self.failed.len()
    }
}

pub(crate) struct SessionCleanupTracker {
    tracked: Vec<String>,
    strategy: CleanupStrategy,
    listener: Option<CloseListener>,
    next_listener_id: u64,
}

impl SessionCleanupTracker {
    pub(crate) fn new(strategy: CleanupStrategy) -> Self {
        let mut tracker = Self {
            tracked: Vec::new(),
            strategy: CleanupStrategy::Never,
            listener: None,
            next_listener_id: 1,
        };
        tracker.apply_strategy(strategy);
        tracker
    }

    pub(crate) fn strategy(&self) -> CleanupStrategy {
        self.strategy
    }

    pub(crate) fn close_listener(&self) -> Option<CloseListener> {
        self.listener
    }

    /// Switch strategy; the close listener is torn down and re-installed as needed
    pub(crate) fn apply_strategy(&mut self, strategy: CleanupStrategy) {
        let wants_listener = strategy == CleanupStrategy::OnEditorClose;
        if strategy == self.strategy && self.listener.is_some() == wants_listener {
            return;
        }
        if let Some(old) = self.listener.take() {
            tracing::debug!(listener = old.id, "close listener removed");
        }
        self.strategy = strategy;
        if wants_listener {
            let listener = CloseListener {
                id: self.next_listener_id,
            };
            self.next_listener_id += 1;
            self.listener = Some(listener);
            tracing::debug!(listener = listener.id, "close listener installed");
        }
        tracing::debug!(strategy = strategy.as_str(), "cleanup strategy applied");
    }

    /// Record a file this process created
    pub(crate) fn track(&mut self, path: &str) {
        if !self.is_tracked(path) {
            self.tracked.push(path.to_string());
        }
    }

    /// Forget `path` without deleting it; true if it was tracked
    pub(crate) fn untrack(&mut self, path: &str) -> bool {
        let before = self.tracked.len();
        self.tracked.retain(|p| !path_equal(p, path));
        self.tracked.len() != before
    }

    pub(crate) fn is_tracked(&self, path: &str) -> bool {
        self.tracked.iter().any(|p| path_equal(p, path))
    }

    pub(crate) fn tracked(&self) -> &[String] {
        &self.tracked
    }

    /// Host event: an editor view of `path` was closed.
    ///
    /// With a listener installed and `path` tracked, deletes the file, stops
    /// tracking it and evicts it from history. Returns whether it was cleaned.
    /// A failed delete leaves the path tracked; a failed history write is
    /// only logged.
    pub(crate) fn on_document_closed(
        &mut self,
        path: &str,
        fs: &dyn FileSystem,
        history: &mut HistoryStore,
    ) -> Result<bool, AppError> {
        if self.listener.is_none() || !self.is_tracked(path) {
            return Ok(false);
        }
        let removed = fs.delete(Path::new(path))?;
        self.untrack(path);
        tracing::info!(path, removed, "cleaned up file on editor close");
        if let Err(e) = history.remove(path) {
            tracing::warn!(path, error = %e, "history not updated after cleanup");
        }
        Ok(true)
    }

    /// Process shutdown: with `on_process_exit`, delete every tracked path in
    /// parallel, wait for all of them, then clear the tracked set.
    pub(crate) fn shutdown(&mut self, fs: &dyn FileSystem) -> CleanupReport {
        let mut report = CleanupReport::default();
        if self.strategy != CleanupStrategy::OnProcessExit {
            tracing::debug!(
                strategy = self.strategy.as_str(),
                tracked = self.tracked.len(),
                "delete on exit is disabled"
            );
            return report;
        }
        if self.tracked.is_empty() {
            tracing::debug!("no files created this session to clean");
            return report;
        }

        let results: Vec<(String, Result<bool, AppError>)> = self
            .tracked
            .par_iter()
            .map(|p| (p.clone(), fs.delete(Path::new(p))))
            .collect();

        for (path, result) in results {
            match result {
                Ok(true) => {
                    tracing::info!(path = %path, "deleted temporary file on exit");
                    report.deleted.push(path);
                }
                Ok(false) => {
                    tracing::debug!(path = %path, "temporary file already gone");
                    report.already_gone.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "failed to delete temporary file on exit");
                    report.failed.push((path, e));
                }
            }
        }
        self.tracked.clear();
        report
    }

    /// Remove the close listener; the tracker stops reacting to host events
    pub(crate) fn dispose(&mut self) {
        if let Some(old) = self.listener.take() {
            tracing::debug!(listener = old.id, "close listener removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::GlobalState;
    use crate::host::OsFileSystem;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    /// Fails deletes of paths containing "locked", delegates everything else
    struct LockingFs;

    impl FileSystem for LockingFs {
        fn exists(&self, path: &Path) -> Result<bool, AppError> {
            OsFileSystem.exists(path)
        }
        fn write(&self, path: &Path, content: &str) -> Result<(), AppError> {
            OsFileSystem.write(path, content)
        }
        fn delete(&self, path: &Path) -> Result<bool, AppError> {
            if path.to_string_lossy().contains("locked") {
                return Err(AppError::Delete {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "locked"),
                });
            }
            OsFileSystem.delete(path)
        }
        fn ensure_dir(&self, path: &Path) -> Result<(), AppError> {
            OsFileSystem.ensure_dir(path)
        }
    }

    fn make_file(dir: &TempDir, name: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, "x").unwrap();
        path.to_string_lossy().into_owned()
    }

    fn history(dir: &TempDir) -> HistoryStore {
        HistoryStore::open(GlobalState::open(dir.path().join("state.json")).unwrap()).unwrap()
    }

    #[test]
    fn test_track_dedups_by_path_equality() {
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::Never);
        tracker.track("/tmp/a.txt");
        tracker.track("/tmp/./a.txt");
        assert_eq!(tracker.tracked().len(), 1);
        assert!(tracker.untrack("/tmp/x/../a.txt"));
        assert!(tracker.tracked().is_empty());
    }

    #[test]
    fn test_process_exit_deletes_and_tolerates_missing() {
        let dir = TempDir::new().unwrap();
        let a = make_file(&dir, "a.txt");
        let b = make_file(&dir, "b.txt");
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::OnProcessExit);
        tracker.track(&a);
        tracker.track(&b);
        fs::remove_file(&a).unwrap();

        let report = tracker.shutdown(&OsFileSystem);
        assert_eq!(report.deleted, vec![b.clone()]);
        assert_eq!(report.already_gone, vec![a]);
        assert!(report.failed.is_empty());
        assert!(!Path::new(&b).exists());
        assert!(tracker.tracked().is_empty());
    }

    #[test]
    fn test_process_exit_failure_does_not_block_others() {
        let dir = TempDir::new().unwrap();
        let locked = make_file(&dir, "locked.txt");
        let free = make_file(&dir, "free.txt");
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::OnProcessExit);
        tracker.track(&locked);
        tracker.track(&free);

        let report = tracker.shutdown(&LockingFs);
        assert_eq!(report.attempted(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, locked);
        assert!(!Path::new(&free).exists());
        assert!(tracker.tracked().is_empty());
    }

    #[test]
    fn test_never_strategy_keeps_files() {
        let dir = TempDir::new().unwrap();
        let a = make_file(&dir, "a.txt");
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::Never);
        tracker.track(&a);
        let report = tracker.shutdown(&OsFileSystem);
        assert_eq!(report.attempted(), 0);
        assert!(Path::new(&a).exists());
    }

    #[test]
    fn test_editor_close_deletes_tracked_and_evicts_history() {
        let dir = TempDir::new().unwrap();
        let a = make_file(&dir, "a.txt");
        let mut history = history(&dir);
        history.record_access(&a).unwrap();
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::OnEditorClose);
        tracker.track(&a);

        assert!(tracker.on_document_closed(&a, &OsFileSystem, &mut history).unwrap());
        assert!(!Path::new(&a).exists());
        assert!(!tracker.is_tracked(&a));
        assert!(history.get_all().is_empty());

        // Second close is a no-op: at most one deletion per tracked file.
        assert!(!tracker.on_document_closed(&a, &OsFileSystem, &mut history).unwrap());
    }

    #[test]
    fn test_editor_close_survives_history_write_failure() {
        let dir = TempDir::new().unwrap();
        let a = make_file(&dir, "a.txt");
        let state_dir = dir.path().join("state");
        let mut history = HistoryStore::open(GlobalState::open(state_dir.join("state.json")).unwrap()).unwrap();
        history.record_access(&a).unwrap();
        // A plain file where the state directory should go makes the flush fail.
        fs::remove_dir_all(&state_dir).unwrap();
        fs::write(&state_dir, "").unwrap();
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::OnEditorClose);
        tracker.track(&a);

        assert!(tracker.on_document_closed(&a, &OsFileSystem, &mut history).unwrap());
        assert!(!Path::new(&a).exists());
        assert!(!tracker.is_tracked(&a));
    }

    #[test]
    fn test_editor_close_delete_failure_keeps_tracking() {
        let dir = TempDir::new().unwrap();
        let locked = make_file(&dir, "locked.txt");
        let mut history = history(&dir);
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::OnEditorClose);
        tracker.track(&locked);

        let err = tracker.on_document_closed(&locked, &LockingFs, &mut history).unwrap_err();
        assert!(matches!(err, AppError::Delete { .. }));
        assert!(tracker.is_tracked(&locked));
        assert!(Path::new(&locked).exists());
    }

    #[test]
    fn test_editor_close_ignores_untracked_files() {
        let dir = TempDir::new().unwrap();
        let opened = make_file(&dir, "opened.txt");
        let mut history = history(&dir);
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::OnEditorClose);

        assert!(!tracker.on_document_closed(&opened, &OsFileSystem, &mut history).unwrap());
        assert!(Path::new(&opened).exists());
    }

    #[test]
    fn test_editor_close_without_listener_is_ignored() {
        let dir = TempDir::new().unwrap();
        let a = make_file(&dir, "a.txt");
        let mut history = history(&dir);
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::OnProcessExit);
        tracker.track(&a);

        assert!(!tracker.on_document_closed(&a, &OsFileSystem, &mut history).unwrap());
        assert!(Path::new(&a).exists());
        assert!(tracker.is_tracked(&a));
    }

    #[test]
    fn test_switching_strategy_reinstalls_single_listener() {
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::OnEditorClose);
        let first = tracker.close_listener().unwrap();

        tracker.apply_strategy(CleanupStrategy::OnEditorClose);
        assert_eq!(tracker.close_listener(), Some(first));

        tracker.apply_strategy(CleanupStrategy::OnProcessExit);
        assert_eq!(tracker.close_listener(), None);

        tracker.apply_strategy(CleanupStrategy::OnEditorClose);
        let second = tracker.close_listener().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_dispose_removes_listener() {
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::OnEditorClose);
        tracker.dispose();
        assert_eq!(tracker.close_listener(), None);
    }
}
