//! Host collaborators: filesystem, notifications, editor and the terminal picker

mod editor;
mod fs;
mod prompt;
mod terminal;

pub(crate) use editor::{open_and_wait, resolve_editor};
pub(crate) use fs::{FileSystem, OsFileSystem};
pub(crate) use prompt::Prompter;
pub(crate) use terminal::Terminal;
