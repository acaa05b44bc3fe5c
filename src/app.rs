use rayon::prelude::*;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::cleanup::SessionCleanupTracker;
use crate::cli::{Cli, CreateArgs, ShellArgs};
use crate::config::{CleanupStrategy, Config};
use crate::core::{HistoryEntry, basename};
use crate::error::AppError;
use crate::history::HistoryStore;
use crate::host::{FileSystem, Prompter, Terminal, open_and_wait, resolve_editor};
use crate::output::{HistoryRow, output_history_json, print_history_table};
use crate::session::{Workspace, create_file};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) config: Config,
    pub(crate) fs: &'a dyn FileSystem,
    pub(crate) history: &'a mut HistoryStore,
    pub(crate) tracker: &'a mut SessionCleanupTracker,
}

impl CommandContext<'_> {
    fn terminal(&self, quiet: bool) -> Terminal<io::StdinLock<'static>, io::Stderr> {
        Terminal::new(
            io::stdin().lock(),
            io::stderr(),
            quiet || self.config.quiet,
            self.cli.stderr_color(),
        )
    }
}

/// Print the resolved path, then hand it to the editor and wait for it to close.
///
/// Cleanup after the editor closes is reported through `prompter` and never
/// fails the command.
fn open_resolved(
    path: &Path,
    no_open: bool,
    ctx: &mut CommandContext<'_>,
    prompter: &mut dyn Prompter,
) -> Result<(), AppError> {
    println!("{}", path.display());
    let _ = io::stdout().flush();
    if no_open {
        return Ok(());
    }
    let Some(editor) = resolve_editor(ctx.config.editor()) else {
        tracing::debug!("no editor configured, path printed only");
        return Ok(());
    };
    open_and_wait(&editor, path)?;
    if let Err(e) = ctx
        .tracker
        .on_document_closed(&path.to_string_lossy(), ctx.fs, ctx.history)
    {
        tracing::warn!(path = %path.display(), error = %e, "cleanup on editor close failed");
        prompter.error(&e.to_string());
    }
    Ok(())
}

fn create_round<R: BufRead, W: Write>(
    create: &CreateArgs,
    no_dialog: bool,
    ctx: &mut CommandContext<'_>,
    terminal: &mut Terminal<R, W>,
) -> Result<bool, AppError> {
    let args = create.file_args(no_dialog);
    let ws = Workspace {
        fs: ctx.fs,
        history: &mut *ctx.history,
        tracker: &mut *ctx.tracker,
    };
    match create_file(&args, &ctx.config, ws, terminal)? {
        Some(path) => {
            open_resolved(&path, create.no_open, ctx, terminal)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub(crate) fn handle_create(
    create: &CreateArgs,
    no_dialog: bool,
    ctx: &mut CommandContext<'_>,
) -> Result<(), AppError> {
    let mut terminal = ctx.terminal(create.quiet);
    create_round(create, no_dialog, ctx, &mut terminal)?;
    Ok(())
}

/// Reopen the picker after every editor close until the user dismisses it.
///
/// Configuration is re-read before each round so a changed cleanup strategy
/// takes effect without restarting.
pub(crate) fn handle_shell(shell: &ShellArgs, ctx: &mut CommandContext<'_>) -> Result<(), AppError> {
    let create = CreateArgs {
        location: shell.location.clone(),
        quiet: shell.quiet,
        ..CreateArgs::default()
    };
    let mut terminal = ctx.terminal(shell.quiet);
    let mut rounds = 0usize;
    loop {
        ctx.config = Config::load();
        ctx.tracker.apply_strategy(ctx.config.cleanup_strategy());
        tracing::debug!(round = rounds, listener = ?ctx.tracker.close_listener(), "picker round");
        if !create_round(&create, false, ctx, &mut terminal)? {
            break;
        }
        rounds += 1;
    }
    tracing::debug!(rounds, "shell finished");
    Ok(())
}

fn history_rows(entries: Vec<HistoryEntry>, fs: &dyn FileSystem) -> Vec<HistoryRow> {
    entries
        .into_par_iter()
        .map(|entry| {
            let exists = fs.exists(Path::new(&entry.file_path)).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "treating unreadable history entry as deleted");
                false
            });
            HistoryRow { entry, exists }
        })
        .collect()
}

pub(crate) fn handle_history(json: bool, ctx: &mut CommandContext<'_>) -> Result<(), AppError> {
    let rows = history_rows(ctx.history.get_all(), ctx.fs);
    if json {
        println!("{}", output_history_json(&rows));
    } else {
        print_history_table(&rows, ctx.cli.stdout_color());
    }
    Ok(())
}

pub(crate) fn handle_forget(path: &str, ctx: &mut CommandContext<'_>) -> Result<(), AppError> {
    // History stores absolute paths; resolve relative input against the cwd.
    let target = std::path::absolute(path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_string());
    let before = ctx.history.get_all().len();
    let after = ctx.history.remove(&target)?.len();

    let mut terminal = ctx.terminal(false);
    if after < before {
        terminal.info(&format!("\"{}\" removed from history.", basename(&target)));
    } else {
        terminal.info(&format!("Not in history: {target}"));
    }
    Ok(())
}

/// Process-exit cleanup; returns how many deletions failed
pub(crate) fn shutdown(ctx: &mut CommandContext<'_>, quiet: bool) -> usize {
    let pending = ctx.tracker.tracked().len();
    if pending > 0
        && ctx.tracker.strategy() == CleanupStrategy::OnProcessExit
        && !quiet
        && !ctx.config.quiet
    {
        eprintln!("Attempting to delete {pending} temporary file(s) created this session...");
    }
    let report = ctx.tracker.shutdown(ctx.fs);
    tracing::info!(
        attempted = report.attempted(),
        deleted = report.deleted.len(),
        already_gone = report.already_gone.len(),
        failed = report.failed.len(),
        "session cleanup finished"
    );
    for (_, e) in &report.failed {
        eprintln!("Error: {e}");
    }
    ctx.tracker.dispose();
    report.failed.len()
}
