//! CLI subcommand definitions

use clap::{Args, Subcommand};

use crate::session::{CreateFileArgs, DirectoryChoice};

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create a file via the picker (default)
    New(NewArgs),
    /// Create a file without the picker
    Quick(CreateArgs),
    /// Keep reopening the picker after each editor close
    Shell(ShellArgs),
    /// Show recently accessed files
    History {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Remove a file from history (the file itself is kept)
    Forget {
        /// Path of the file to forget
        path: String,
    },
}

/// Where new files go
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct LocationArgs {
    /// Target directory (default: `default_path` from config, else the system temp dir)
    #[arg(short, long, value_name = "DIR")]
    pub(crate) directory: Option<String>,

    /// Use the system temp dir regardless of config
    #[arg(long, conflicts_with = "directory")]
    pub(crate) temp: bool,

    /// Extension for new files without one (e.g. "md" or ".md")
    #[arg(short, long, value_name = "EXT")]
    pub(crate) extension: Option<String>,
}

impl LocationArgs {
    pub(crate) fn directory_choice(&self) -> DirectoryChoice {
        match (&self.directory, self.temp) {
            (Some(dir), _) => DirectoryChoice::Explicit(dir.clone()),
            (None, true) => DirectoryChoice::SystemTemp,
            (None, false) => DirectoryChoice::FromConfig,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct CreateArgs {
    /// File name; skips the picker
    #[arg(short, long, value_name = "NAME")]
    pub(crate) filename: Option<String>,

    /// Initial content; overwrites an existing file when non-empty
    #[arg(long, value_name = "TEXT")]
    pub(crate) content: Option<String>,

    #[command(flatten)]
    pub(crate) location: LocationArgs,

    /// Suppress informational messages
    #[arg(short, long)]
    pub(crate) quiet: bool,

    /// Do not launch the editor, only print the path
    #[arg(long)]
    pub(crate) no_open: bool,
}

impl CreateArgs {
    pub(crate) fn file_args(&self, no_dialog: bool) -> CreateFileArgs {
        CreateFileArgs {
            no_dialog,
            filename: self.filename.clone(),
            content: self.content.clone(),
            directory: self.location.directory_choice(),
            extension: self.location.extension.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct NewArgs {
    /// Create a randomly named file without the picker
    #[arg(long)]
    pub(crate) no_dialog: bool,

    #[command(flatten)]
    pub(crate) create: CreateArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ShellArgs {
    #[command(flatten)]
    pub(crate) location: LocationArgs,

    /// Suppress informational messages
    #[arg(short, long)]
    pub(crate) quiet: bool,
}
