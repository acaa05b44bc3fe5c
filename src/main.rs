mod app;
mod cleanup;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod history;
mod host;
mod output;
mod session;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use app::{CommandContext, handle_create, handle_forget, handle_history, handle_shell, shutdown};
use cleanup::SessionCleanupTracker;
use cli::{Cli, Commands};
use config::Config;
use consts::LOG_ENV;
use history::{GlobalState, HistoryStore, get_state_path};
use host::OsFileSystem;

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = Config::load();

    let state_path = get_state_path().unwrap_or_else(|| {
        tracing::warn!("no data directory found, keeping state in the temp dir");
        std::env::temp_dir().join("quicktemp").join("state.json")
    });
    let mut history = match GlobalState::open(state_path).and_then(HistoryStore::open) {
        Ok(history) => history,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::debug!(path = %history.state_path().display(), "history loaded");

    let fs = OsFileSystem;
    let mut tracker = SessionCleanupTracker::new(config.cleanup_strategy());

    let quiet = match &cli.command {
        Some(Commands::New(args)) => args.create.quiet,
        Some(Commands::Quick(args)) => args.quiet,
        Some(Commands::Shell(args)) => args.quiet,
        None => cli.new.create.quiet,
        _ => false,
    };

    let mut ctx = CommandContext {
        cli: &cli,
        config,
        fs: &fs,
        history: &mut history,
        tracker: &mut tracker,
    };

    let result = match &cli.command {
        Some(Commands::New(args)) => handle_create(&args.create, args.no_dialog, &mut ctx),
        None => handle_create(&cli.new.create, cli.new.no_dialog, &mut ctx),
        Some(Commands::Quick(args)) => handle_create(args, true, &mut ctx),
        Some(Commands::Shell(args)) => handle_shell(args, &mut ctx),
        Some(Commands::History { json }) => handle_history(*json, &mut ctx),
        Some(Commands::Forget { path }) => handle_forget(path, &mut ctx),
    };

    let mut code = 0;
    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {e}");
        code = 1;
    }

    if shutdown(&mut ctx, quiet) > 0 {
        code = 1;
    }
    std::process::exit(code);
}
