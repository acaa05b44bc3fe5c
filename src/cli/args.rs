//! CLI argument definitions
//!
//! Global CLI options and color resolution.

use std::io::IsTerminal;

use clap::{Parser, ValueEnum};

use super::commands::{Commands, NewArgs};

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "quicktemp")]
#[command(about = "Create or reopen scratch files from a picker of recent files", version)]
#[command(args_conflicts_with_subcommands = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Arguments of the default `new` command
    #[command(flatten)]
    pub(crate) new: NewArgs,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug output (verbose logging to stderr)
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// `auto` colors only when the target stream is a terminal
    pub(crate) fn use_color(&self, stream_is_terminal: bool) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stream_is_terminal,
        }
    }

    pub(crate) fn stdout_color(&self) -> bool {
        self.use_color(std::io::stdout().is_terminal())
    }

    pub(crate) fn stderr_color(&self) -> bool {
        self.use_color(std::io::stderr().is_terminal())
    }
}
