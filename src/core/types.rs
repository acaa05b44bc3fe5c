use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One remembered file, as persisted in the state file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryEntry {
    pub(crate) label: String,
    pub(crate) file_path: String,
    /// Milliseconds since the Unix epoch
    pub(crate) last_accessed: i64,
}

impl HistoryEntry {
    /// Entry for `file_path`, stamped with the current time
    pub(crate) fn now(file_path: &str) -> Self {
        Self {
            label: basename(file_path).to_string(),
            file_path: file_path.to_string(),
            last_accessed: Utc::now().timestamp_millis(),
        }
    }

    pub(crate) fn directory(&self) -> String {
        Path::new(&self.file_path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// What accepting a candidate should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Intent {
    CreateRandomDefaultExt,
    CreateRandomWithExt(String),
    CreateNamed(String),
    OpenOrRecreate { path: String, was_deleted: bool },
}

impl Intent {
    /// Resolve into a concrete file path under `directory`
    pub(crate) fn target_path(&self, directory: &Path, default_extension: &str) -> PathBuf {
        match self {
            Intent::CreateRandomDefaultExt => {
                directory.join(format!("{}{}", Uuid::new_v4(), default_extension))
            }
            Intent::CreateRandomWithExt(ext) => directory.join(format!("{}{}", Uuid::new_v4(), ext)),
            Intent::CreateNamed(name) => join_under(directory, name),
            Intent::OpenOrRecreate { path, .. } => PathBuf::from(path),
        }
    }

    /// True when materializing a missing file means bringing a known file back
    pub(crate) fn is_recreate(&self) -> bool {
        matches!(
            self,
            Intent::OpenOrRecreate {
                was_deleted: true,
                ..
            }
        )
    }
}

/// Join `name` below `directory`, dropping any root or drive prefix so an
/// absolute name still lands inside `directory`
pub(crate) fn join_under(directory: &Path, name: &str) -> PathBuf {
    let bytes = name.as_bytes();
    let rest = match bytes {
        [drive, b':', ..]
            if drive.is_ascii_alphabetic() && matches!(bytes.get(2), None | Some(b'/' | b'\\')) =>
        {
            &name[2..]
        }
        _ => name,
    };
    directory.join(rest.trim_start_matches(['/', '\\']))
}

/// Last path component, accepting both separators
pub(crate) fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
}

/// Extension of the last path component including the dot, or "" if none.
/// Leading-dot names (`.bashrc`) have no extension; `name.` has extension `.`.
pub(crate) fn extname(path: &str) -> &str {
    let base = basename(path);
    if base.chars().all(|c| c == '.') {
        return "";
    }
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx..],
    }
}
