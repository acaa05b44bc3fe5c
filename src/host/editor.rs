//! Launching the editor for a resolved file
//!
//! The editor process exiting is the "document closed" event the cleanup
//! tracker listens for.

use std::io;
use std::path::Path;
use std::process::Command;

use crate::error::AppError;

/// Editor command: configured value, then `$VISUAL`, then `$EDITOR`
pub(crate) fn resolve_editor(configured: Option<&str>) -> Option<String> {
    configured
        .map(str::to_string)
        .or_else(|| env_editor("VISUAL"))
        .or_else(|| env_editor("EDITOR"))
}

fn env_editor(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Run `command` with `path` appended and wait for it to exit
pub(crate) fn open_and_wait(command: &str, path: &Path) -> Result<(), AppError> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(AppError::Editor {
            command: command.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty editor command"),
        });
    };
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|source| AppError::Editor {
            command: command.to_string(),
            source,
        })?;
    if !status.success() {
        tracing::warn!(command, %status, "editor exited unsuccessfully");
    }
    Ok(())
}
