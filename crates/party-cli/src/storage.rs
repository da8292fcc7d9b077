//! Local persisted state: a small JSON key-value file.
//!
//! Mirrors browser local storage: string keys mapping to JSON values, read
//! once on open and written back whole on [`LocalStore::save`]. The form
//! selection and the language preference live under fixed keys.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use party_core::{FormSelection, Language};

/// Key holding the in-progress [`FormSelection`].
pub const FORM_KEY: &str = "partyFormData";
/// Key holding the preferred language code.
pub const LANGUAGE_KEY: &str = "partyLanguage";

const FILE_NAME: &str = "storage.json";

/// Errors that can occur while reading or writing the store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A JSON key-value file under the data directory.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl LocalStore {
    /// Open (or lazily create) the store in `dir`.
    ///
    /// A missing file yields an empty store. An unreadable JSON document is
    /// discarded with a warning, the same way a browser app drops a corrupt
    /// local-storage entry instead of refusing to start.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join(FILE_NAME);
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                Ok(_) | Err(_) => {
                    tracing::warn!(path = %path.display(), "ignoring unreadable local store");
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(StorageError::Read { path, source }),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn set_item(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_owned(), value);
    }

    pub fn remove_item(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Write the store back to disk via a temp file and rename.
    pub fn save(&self) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(|source| StorageError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "saved local store");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Typed accessors
    // -------------------------------------------------------------------

    /// The persisted form, or an empty one when nothing usable is stored.
    pub fn load_form(&self) -> FormSelection {
        self.get_item(FORM_KEY)
            .map(FormSelection::from_json_value)
            .unwrap_or_default()
    }

    pub fn save_form(&mut self, form: &FormSelection) -> Result<(), StorageError> {
        self.set_item(FORM_KEY, serde_json::to_value(form)?);
        Ok(())
    }

    pub fn clear_form(&mut self) {
        self.remove_item(FORM_KEY);
    }

    /// The persisted language, if one was chosen and is still supported.
    pub fn language(&self) -> Option<Language> {
        self.get_item(LANGUAGE_KEY)
            .and_then(Value::as_str)
            .and_then(|code| code.parse().ok())
    }

    pub fn set_language(&mut self, language: Language) {
        self.set_item(LANGUAGE_KEY, Value::String(language.code().to_owned()));
    }
}
