//! Interactive picker state machine
//!
//! `Idle -> Open -> Resolved | Cancelled`. The host feeds one [`SessionEvent`]
//! at a time; each event either leaves a fresh render (lead candidate first
//! and active, then history) or ends the session for good.

use std::path::{Path, PathBuf};

use super::materialize::{Workspace, materialize};
use crate::core::{HistoryEntry, Intent, lead_label, plan};
use crate::error::AppError;
use crate::host::Prompter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionState {
    Idle,
    Open,
    Resolved(PathBuf),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemButton {
    Remove,
    DeleteFromDisk,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    InputChanged(String),
    ItemButtonTriggered { index: usize, button: ItemButton },
    /// `selected` is the highlighted candidate, if any
    Accept { selected: Option<usize> },
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CandidateKind {
    Lead(Intent),
    History { file_path: String, was_deleted: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) label: String,
    pub(crate) description: Option<String>,
    pub(crate) kind: CandidateKind,
    pub(crate) buttons: Vec<ItemButton>,
}

impl Candidate {
    fn intent(&self) -> Intent {
        match &self.kind {
            CandidateKind::Lead(intent) => intent.clone(),
            CandidateKind::History {
                file_path,
                was_deleted,
            } => Intent::OpenOrRecreate {
                path: file_path.clone(),
                was_deleted: *was_deleted,
            },
        }
    }

    pub(crate) fn was_deleted(&self) -> bool {
        matches!(
            self.kind,
            CandidateKind::History {
                was_deleted: true,
                ..
            }
        )
    }
}

/// Where new files go and what extension they get by default
#[derive(Debug, Clone)]
pub(crate) struct SessionSettings {
    pub(crate) directory: PathBuf,
    pub(crate) default_extension: String,
}

pub(crate) struct InteractiveSession<'a> {
    settings: SessionSettings,
    ws: Workspace<'a>,
    state: SessionState,
    input: String,
    history_items: Vec<Candidate>,
    candidates: Vec<Candidate>,
    active: usize,
}

impl<'a> InteractiveSession<'a> {
    pub(crate) fn new(settings: SessionSettings, ws: Workspace<'a>) -> Self {
        Self {
            settings,
            ws,
            state: SessionState::Idle,
            input: String::new(),
            history_items: Vec::new(),
            candidates: Vec::new(),
            active: 0,
        }
    }

    pub(crate) fn state(&self) -> &SessionState {
        &self.state
    }

    pub(crate) fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub(crate) fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub(crate) fn active(&self) -> usize {
        self.active
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn placeholder(&self) -> String {
        format!(
            "Enter new filename (in {}) or select recent",
            self.settings.directory.display()
        )
    }

    /// Open the picker with an empty input. Only valid from `Idle`.
    pub(crate) fn start(&mut self) {
        if self.state != SessionState::Idle {
            tracing::debug!(state = ?self.state, "start ignored");
            return;
        }
        self.state = SessionState::Open;
        self.rebuild_history();
        self.render();
    }

    /// Process one host event. Events after the session ended are ignored.
    ///
    /// Errors are returned only when accepting fails to produce the file; the
    /// session is `Cancelled` in that case.
    pub(crate) fn handle(
        &mut self,
        event: SessionEvent,
        prompter: &mut dyn Prompter,
    ) -> Result<&SessionState, AppError> {
        if !self.is_open() {
            tracing::debug!(?event, state = ?self.state, "event after session ended");
            return Ok(&self.state);
        }
        match event {
            SessionEvent::InputChanged(text) => {
                self.input = text;
                self.render();
            }
            SessionEvent::ItemButtonTriggered { index, button } => {
                self.on_button(index, button, prompter);
            }
            SessionEvent::Accept { selected } => self.on_accept(selected, prompter)?,
            SessionEvent::Dismissed => {
                self.state = SessionState::Cancelled;
            }
        }
        Ok(&self.state)
    }

    /// Lead candidate first and active, then the cached history candidates
    fn render(&mut self) {
        let intent = plan(&self.input, &self.settings.default_extension);
        let (label, description) = lead_label(&intent, &self.settings.default_extension);
        let lead = Candidate {
            label,
            description,
            kind: CandidateKind::Lead(intent),
            buttons: Vec::new(),
        };
        self.candidates = std::iter::once(lead)
            .chain(self.history_items.iter().cloned())
            .collect();
        self.active = 0;
    }

    fn rebuild_history(&mut self) {
        let entries = self.ws.history.get_all();
        self.history_items = entries
            .iter()
            .map(|entry| self.history_candidate(entry))
            .collect();
    }

    fn history_candidate(&self, entry: &HistoryEntry) -> Candidate {
        let exists = match self.ws.fs.exists(Path::new(&entry.file_path)) {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(error = %e, "treating unreadable history entry as deleted");
                false
            }
        };
        let directory = entry.directory();
        let mut buttons = Vec::with_capacity(2);
        if exists {
            buttons.push(ItemButton::DeleteFromDisk);
        }
        buttons.push(ItemButton::Remove);
        Candidate {
            label: entry.label.clone(),
            description: Some(if exists {
                directory
            } else {
                format!("{directory} (File deleted)")
            }),
            kind: CandidateKind::History {
                file_path: entry.file_path.clone(),
                was_deleted: !exists,
            },
            buttons,
        }
    }

    fn on_button(&mut self, index: usize, button: ItemButton, prompter: &mut dyn Prompter) {
        let Some(Candidate {
            label,
            kind: CandidateKind::History { file_path, .. },
            buttons,
            ..
        }) = self.candidates.get(index).cloned()
        else {
            tracing::debug!(index, "button on a candidate without buttons");
            return;
        };
        if !buttons.contains(&button) {
            tracing::debug!(index, ?button, "button not offered for this candidate");
            return;
        }

        match button {
            ItemButton::Remove => match self.ws.history.remove(&file_path) {
                Ok(_) => prompter.info(&format!("\"{label}\" removed from history.")),
                Err(e) => prompter.error(&e.to_string()),
            },
            ItemButton::DeleteFromDisk => self.delete_from_disk(&label, &file_path, prompter),
        }
        self.rebuild_history();
        self.render();
    }

    fn delete_from_disk(&mut self, label: &str, file_path: &str, prompter: &mut dyn Prompter) {
        let path = Path::new(file_path);
        match self.ws.fs.exists(path) {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                prompter.error(&e.to_string());
                return;
            }
        }
        let question = format!("Are you sure you want to permanently delete the file \"{label}\"?");
        if !prompter.confirm(&question) {
            return;
        }
        if let Err(e) = self.ws.fs.delete(path) {
            prompter.error(&format!(
                "Failed to delete file \"{label}\" from disk. Error: {e}"
            ));
            return;
        }
        prompter.info(&format!("File \"{label}\" deleted from disk."));
        // No point cleaning it up again later.
        self.ws.tracker.untrack(file_path);
        if let Err(e) = self.ws.history.remove(file_path) {
            prompter.error(&e.to_string());
        }
    }

    fn on_accept(&mut self, selected: Option<usize>, prompter: &mut dyn Prompter) -> Result<(), AppError> {
        let intent = match selected.and_then(|i| self.candidates.get(i)) {
            Some(candidate) => Some(candidate.intent()),
            None => {
                let typed = self.input.trim();
                (!typed.is_empty()).then(|| plan(typed, &self.settings.default_extension))
            }
        };
        let Some(intent) = intent else {
            prompter.info("Operation cancelled or no input provided.");
            self.state = SessionState::Cancelled;
            return Ok(());
        };

        let path = intent.target_path(&self.settings.directory, &self.settings.default_extension);
        tracing::debug!(?intent, path = %path.display(), "accepted");
        match materialize(&mut self.ws, &path, None, intent.is_recreate(), prompter) {
            Ok(done) => {
                tracing::debug!(outcome = ?done.outcome, "session resolved");
                self.state = SessionState::Resolved(done.path);
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Cancelled;
                Err(e)
            }
        }
    }
}
