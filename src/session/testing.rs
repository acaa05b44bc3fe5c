//! Test doubles for the host collaborators

use std::collections::VecDeque;

use super::create::PickerHost;
use super::picker::{InteractiveSession, SessionEvent};
use crate::error::AppError;
use crate::host::Prompter;

#[derive(Debug, Default)]
pub(crate) struct RecordingPrompter {
    pub(crate) infos: Vec<String>,
    pub(crate) errors: Vec<String>,
    pub(crate) confirmations: Vec<String>,
    answer: bool,
}

impl RecordingPrompter {
    pub(crate) fn confirming(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }
}

impl Prompter for RecordingPrompter {
    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.confirmations.push(question.to_string());
        self.answer
    }
}

/// Feeds a fixed list of events, then dismisses
#[derive(Debug, Default)]
pub(crate) struct ScriptedHost {
    pub(crate) prompter: RecordingPrompter,
    events: VecDeque<SessionEvent>,
}

impl ScriptedHost {
    pub(crate) fn with_events(events: impl IntoIterator<Item = SessionEvent>) -> Self {
        Self {
            prompter: RecordingPrompter::default(),
            events: events.into_iter().collect(),
        }
    }
}

impl Prompter for ScriptedHost {
    fn info(&mut self, message: &str) {
        self.prompter.info(message);
    }

    fn error(&mut self, message: &str) {
        self.prompter.error(message);
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.prompter.confirm(question)
    }
}

impl PickerHost for ScriptedHost {
    fn drive(&mut self, session: &mut InteractiveSession<'_>) -> Result<(), AppError> {
        session.start();
        while session.is_open() {
            let event = self.events.pop_front().unwrap_or(SessionEvent::Dismissed);
            session.handle(event, &mut self.prompter)?;
        }
        Ok(())
    }
}
