//! Persisted key/value state
//!
//! A single JSON object on disk holding namespaced keys. Reads are served from
//! memory; every update rewrites the file (temp file + rename).

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::consts::HOME_ENV;
use crate::error::PersistenceError;

/// Default state file location
pub(crate) fn get_state_path() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Some(PathBuf::from(home).join("state.json"));
    }
    let data_dir = dirs::data_dir()?;
    Some(data_dir.join("quicktemp").join("state.json"))
}

pub(crate) struct GlobalState {
    path: PathBuf,
    values: Map<String, Value>,
}

impl GlobalState {
    /// Load state from `path`; a missing file yields an empty state
    pub(crate) fn open(path: PathBuf) -> Result<Self, PersistenceError> {
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Map::new(),
            Ok(content) => serde_json::from_str::<Map<String, Value>>(&content).map_err(
                |source| PersistenceError::Decode {
                    path: path.clone(),
                    source,
                },
            )?,
            Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(PersistenceError::Read { path, source }),
        };
        Ok(Self { path, values })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Typed read of `key`; a value of a different shape is a decode error
    pub(crate) fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        let Some(value) = self.values.get(key) else {
            return Ok(None);
        };
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| PersistenceError::Decode {
                path: self.path.clone(),
                source,
            })
    }

    /// Set `key` and persist the whole state
    pub(crate) fn update<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_value(value).map_err(|source| PersistenceError::Encode {
            key: key.to_string(),
            source,
        })?;
        let previous = self.values.insert(key.to_string(), encoded);
        if let Err(e) = self.flush() {
            // Keep memory in step with disk.
            match previous {
                Some(old) => self.values.insert(key.to_string(), old),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(&self.values).map_err(|source| {
            PersistenceError::Encode {
                key: "*".to_string(),
                source,
            }
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let state = GlobalState::open(dir.path().join("state.json")).unwrap();
        assert_eq!(state.get::<Vec<String>>("k").unwrap(), None);
    }

    #[test]
    fn test_update_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let mut state = GlobalState::open(path.clone()).unwrap();
        state.update("k", &vec!["a".to_string()]).unwrap();

        let reopened = GlobalState::open(path).unwrap();
        assert_eq!(reopened.get::<Vec<String>>("k").unwrap(), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_malformed_file_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        let err = GlobalState::open(path).err().unwrap();
        assert!(matches!(err, PersistenceError::Decode { .. }));
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = TempDir::new().unwrap();
        let mut state = GlobalState::open(dir.path().join("sub").join("state.json")).unwrap();
        // Parent "directory" becomes a regular file, so writes must fail.
        fs::write(dir.path().join("sub"), "").unwrap();

        let err = state.update("k", &1).unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));
        assert_eq!(state.get::<i32>("k").unwrap(), None);
    }

    #[test]
    fn test_value_of_wrong_shape_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"k": "not a list"}"#).unwrap();
        let state = GlobalState::open(path).unwrap();
        let err = state.get::<Vec<String>>("k").unwrap_err();
        assert!(matches!(err, PersistenceError::Decode { .. }));
    }
}
