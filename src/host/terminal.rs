//! Line-oriented terminal picker
//!
//! Renders the session to `output` and turns each input line into session
//! events. The UI goes to stderr in the binary so stdout only carries the
//! resolved path.

use std::io::{BufRead, Write};

use super::prompt::Prompter;
use crate::error::AppError;
use crate::session::{Candidate, InteractiveSession, ItemButton, PickerHost, SessionEvent};

const HELP: &str = "\
  <name>   create or open <name> (default extension added if missing)
  .<ext>   new random file with that extension
  <enter>  accept the highlighted item
  #N       accept item N
  -N       remove item N from history
  !N       delete item N from disk
  =<text>  update the input without accepting
  :q       close the picker";

#[derive(Debug, PartialEq, Eq)]
enum LineCommand {
    Events(Vec<SessionEvent>),
    Help,
}

fn parse_index(rest: &str) -> Option<usize> {
    rest.trim().parse().ok()
}

fn parse_line(line: &str, active: usize) -> LineCommand {
    let line = line.trim_end_matches(['\n', '\r']);
    let trimmed = line.trim();
    let events = match trimmed {
        "" => vec![SessionEvent::Accept {
            selected: Some(active),
        }],
        "?" => return LineCommand::Help,
        ":q" => vec![SessionEvent::Dismissed],
        _ => {
            if let Some(text) = line.strip_prefix('=') {
                vec![SessionEvent::InputChanged(text.to_string())]
            } else if let Some(index) = trimmed.strip_prefix('#').and_then(parse_index) {
                vec![SessionEvent::Accept {
                    selected: Some(index),
                }]
            } else if let Some(index) = trimmed.strip_prefix('-').and_then(parse_index) {
                vec![SessionEvent::ItemButtonTriggered {
                    index,
                    button: ItemButton::Remove,
                }]
            } else if let Some(index) = trimmed.strip_prefix('!').and_then(parse_index) {
                vec![SessionEvent::ItemButtonTriggered {
                    index,
                    button: ItemButton::DeleteFromDisk,
                }]
            } else {
                // Typing then pressing enter accepts the lead, which is always index 0.
                vec![
                    SessionEvent::InputChanged(line.to_string()),
                    SessionEvent::Accept { selected: Some(0) },
                ]
            }
        }
    };
    LineCommand::Events(events)
}

/// First index in `events` that names no current candidate
fn missing_item(events: &[SessionEvent], len: usize) -> Option<usize> {
    events.iter().find_map(|event| match event {
        SessionEvent::Accept { selected: Some(i) }
        | SessionEvent::ItemButtonTriggered { index: i, .. }
            if *i >= len =>
        {
            Some(*i)
        }
        _ => None,
    })
}

fn button_hint(buttons: &[ItemButton], index: usize) -> String {
    let hints: Vec<String> = buttons
        .iter()
        .map(|b| match b {
            ItemButton::DeleteFromDisk => format!("!{index} delete"),
            ItemButton::Remove => format!("-{index} forget"),
        })
        .collect();
    if hints.is_empty() {
        String::new()
    } else {
        format!("  [{}]", hints.join(", "))
    }
}

fn format_candidate(candidate: &Candidate, index: usize, active: bool, use_color: bool) -> String {
    let marker = if active { ">" } else { " " };
    let warning = if candidate.was_deleted() { "! " } else { "" };
    let description = candidate
        .description
        .as_deref()
        .map(|d| format!("  {d}"))
        .unwrap_or_default();
    let text = format!(
        "{marker} #{index} {warning}{}{description}{}",
        candidate.label,
        button_hint(&candidate.buttons, index)
    );
    match (use_color, active, candidate.was_deleted()) {
        (false, _, _) => text,
        (true, true, _) => format!("\x1b[1;36m{text}\x1b[0m"),
        (true, false, true) => format!("\x1b[33m{text}\x1b[0m"),
        (true, false, false) => text,
    }
}

pub(crate) struct Terminal<R, W> {
    input: R,
    output: W,
    quiet: bool,
    use_color: bool,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub(crate) fn new(input: R, output: W, quiet: bool, use_color: bool) -> Self {
        Self {
            input,
            output,
            quiet,
            use_color,
        }
    }

    /// `None` at end of input; read errors count as end of input
    fn read_line(&mut self) -> Option<String> {
        let mut buf = String::new();
        match self.input.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches(['\n', '\r']).to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read terminal input");
                None
            }
        }
    }

    fn prompt(&mut self, text: &str) {
        let _ = write!(self.output, "{text}");
        let _ = self.output.flush();
    }

    fn render(&mut self, session: &InteractiveSession<'_>) {
        let _ = writeln!(self.output);
        if !session.input().is_empty() {
            let _ = writeln!(self.output, "  input: {}", session.input());
        }
        for (index, candidate) in session.candidates().iter().enumerate() {
            let line = format_candidate(candidate, index, index == session.active(), self.use_color);
            let _ = writeln!(self.output, "{line}");
        }
        self.prompt("quicktemp> ");
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for Terminal<R, W> {
    fn info(&mut self, message: &str) {
        if !self.quiet {
            let _ = writeln!(self.output, "{message}");
        }
    }

    fn error(&mut self, message: &str) {
        let _ = writeln!(self.output, "Error: {message}");
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.prompt(&format!("{question} [y/N] "));
        matches!(
            self.read_line().map(|answer| answer.trim().to_lowercase()).as_deref(),
            Some("y" | "yes")
        )
    }
}

impl<R: BufRead, W: Write> PickerHost for Terminal<R, W> {
    fn drive(&mut self, session: &mut InteractiveSession<'_>) -> Result<(), AppError> {
        session.start();
        let _ = writeln!(self.output, "{}  (? for help)", session.placeholder());
        while session.is_open() {
            self.render(session);
            let events = match self.read_line() {
                None => vec![SessionEvent::Dismissed],
                Some(line) => match parse_line(&line, session.active()) {
                    LineCommand::Events(events) => events,
                    LineCommand::Help => {
                        let _ = writeln!(self.output, "{HELP}");
                        continue;
                    }
                },
            };
            if let Some(index) = missing_item(&events, session.candidates().len()) {
                let _ = writeln!(self.output, "No item #{index}.");
                continue;
            }
            for event in events {
                session.handle(event, self)?;
                if !session.is_open() {
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::SessionCleanupTracker;
    use crate::config::{CleanupStrategy, Config};
    use crate::history::{GlobalState, HistoryStore};
    use crate::host::OsFileSystem;
    use crate::session::{CreateFileArgs, DirectoryChoice, Workspace, create_file};
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_parse_plain_text_changes_input_then_accepts() {
        assert_eq!(
            parse_line("notes\n", 3),
            LineCommand::Events(vec![
                SessionEvent::InputChanged("notes".into()),
                SessionEvent::Accept { selected: Some(0) },
            ])
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("", 2),
            LineCommand::Events(vec![SessionEvent::Accept { selected: Some(2) }])
        );
        assert_eq!(
            parse_line("#4", 0),
            LineCommand::Events(vec![SessionEvent::Accept { selected: Some(4) }])
        );
        assert_eq!(
            parse_line("-1", 0),
            LineCommand::Events(vec![SessionEvent::ItemButtonTriggered {
                index: 1,
                button: ItemButton::Remove,
            }])
        );
        assert_eq!(
            parse_line("!2", 0),
            LineCommand::Events(vec![SessionEvent::ItemButtonTriggered {
                index: 2,
                button: ItemButton::DeleteFromDisk,
            }])
        );
        assert_eq!(
            parse_line("=-1", 0),
            LineCommand::Events(vec![SessionEvent::InputChanged("-1".into())])
        );
        assert_eq!(parse_line(":q", 0), LineCommand::Events(vec![SessionEvent::Dismissed]));
        assert_eq!(parse_line("?", 0), LineCommand::Help);
    }

    #[test]
    fn test_parse_non_numeric_prefix_is_a_name() {
        assert_eq!(
            parse_line("#todo", 0),
            LineCommand::Events(vec![
                SessionEvent::InputChanged("#todo".into()),
                SessionEvent::Accept { selected: Some(0) },
            ])
        );
    }

    #[test]
    fn test_confirm_reads_answer() {
        let mut term = Terminal::new(Cursor::new("y\nno\n"), Vec::new(), false, false);
        assert!(term.confirm("Delete?"));
        assert!(!term.confirm("Delete?"));
        assert!(!term.confirm("Delete?"));
    }

    #[test]
    fn test_quiet_suppresses_info_but_not_errors() {
        let mut term = Terminal::new(Cursor::new(""), Vec::new(), true, false);
        term.info("File created: x");
        term.error("boom");
        let out = String::from_utf8(term.into_output()).unwrap();
        assert_eq!(out, "Error: boom\n");
    }

    fn run_picker(script: &str, dir: &TempDir, history: &mut HistoryStore) -> (Option<PathBuf>, String) {
        let mut tracker = SessionCleanupTracker::new(CleanupStrategy::Never);
        let mut term = Terminal::new(Cursor::new(script.to_string()), Vec::new(), false, false);
        let args = CreateFileArgs {
            directory: DirectoryChoice::Explicit(dir.path().to_string_lossy().into_owned()),
            ..CreateFileArgs::default()
        };
        let ws = Workspace {
            fs: &OsFileSystem,
            history,
            tracker: &mut tracker,
        };
        let resolved = create_file(&args, &Config::default(), ws, &mut term).unwrap();
        (resolved, String::from_utf8(term.into_output()).unwrap())
    }

    #[test]
    fn test_drive_creates_typed_file() {
        let dir = TempDir::new().unwrap();
        let mut history = HistoryStore::open(GlobalState::open(dir.path().join("state.json")).unwrap()).unwrap();
        let (resolved, out) = run_picker("?\nnotes\n", &dir, &mut history);

        assert_eq!(resolved, Some(dir.path().join("notes.txt")));
        assert!(out.contains("> #0 New file with random name"));
        assert!(out.contains("#N       accept item N"));
        assert!(out.contains("File created:"));
    }

    #[test]
    fn test_drive_end_of_input_cancels() {
        let dir = TempDir::new().unwrap();
        let mut history = HistoryStore::open(GlobalState::open(dir.path().join("state.json")).unwrap()).unwrap();
        let (resolved, _) = run_picker("", &dir, &mut history);
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_drive_unknown_item_keeps_picker_open() {
        let dir = TempDir::new().unwrap();
        let mut history = HistoryStore::open(GlobalState::open(dir.path().join("state.json")).unwrap()).unwrap();
        let (resolved, out) = run_picker("#7\n!3\nnotes\n", &dir, &mut history);

        assert_eq!(resolved, Some(dir.path().join("notes.txt")));
        assert!(out.contains("No item #7."));
        assert!(out.contains("No item #3."));
        assert!(!out.contains("Operation cancelled"));
    }

    #[test]
    fn test_drive_absolute_name_stays_in_directory() {
        let dir = TempDir::new().unwrap();
        let mut history = HistoryStore::open(GlobalState::open(dir.path().join("state.json")).unwrap()).unwrap();
        let (resolved, _) = run_picker("/escaped\n", &dir, &mut history);

        let expected = dir.path().join("escaped.txt");
        assert_eq!(resolved, Some(expected.clone()));
        assert!(expected.exists());
        assert!(!std::path::Path::new("/escaped.txt").exists());
    }

    #[test]
    fn test_missing_item_checks_every_index() {
        let accept = |i| SessionEvent::Accept { selected: Some(i) };
        assert_eq!(missing_item(&[accept(1)], 2), None);
        assert_eq!(missing_item(&[accept(2)], 2), Some(2));
        assert_eq!(missing_item(&[SessionEvent::Accept { selected: None }], 1), None);
        assert_eq!(
            missing_item(
                &[SessionEvent::ItemButtonTriggered {
                    index: 5,
                    button: ItemButton::Remove,
                }],
                2
            ),
            Some(5)
        );
    }

    #[test]
    fn test_drive_delete_then_reopen_history() {
        let dir = TempDir::new().unwrap();
        let mut history = HistoryStore::open(GlobalState::open(dir.path().join("state.json")).unwrap()).unwrap();
        let kept = dir.path().join("kept.txt");
        let doomed = dir.path().join("doomed.txt");
        std::fs::write(&kept, "").unwrap();
        std::fs::write(&doomed, "").unwrap();
        history.record_access(&kept.to_string_lossy()).unwrap();
        history.record_access(&doomed.to_string_lossy()).unwrap();

        // doomed is #1 (most recent), kept is #2 until doomed goes away.
        let (resolved, out) = run_picker("!1\ny\n#1\n", &dir, &mut history);

        assert!(!doomed.exists());
        assert_eq!(resolved, Some(kept.clone()));
        assert!(out.contains("File \"doomed.txt\" deleted from disk."));
        assert_eq!(history.get_all().len(), 1);
    }
}
