//! Snapshot of the source resource as of the last sync.
//!
//! Comparing the source against this snapshot is what tells a real edit
//! apart from a rerun: a key whose source value still equals the snapshot
//! value is retained in every target.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::Error,
    store::check_rename_arguments,
    traits::{Parser, write_pretty_json},
    types::{Entries, Resource, is_translatable_key, json_to_string},
};

const HISTORY_DESCRIPTION: &str =
    "This file tracks changes to the source ARB file. It is maintained by arbsync, do not edit it by hand.";

/// Source entries recorded at the end of the last sync.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct History {
    entries: Entries,
}

impl History {
    pub fn new(entries: Entries) -> Self {
        History { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A source key whose value differs from the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryChange {
    pub key: String,
    pub source_value: String,
    /// `None` for keys added since the last sync.
    pub history_value: Option<String>,
}

impl HistoryChange {
    pub fn is_new(&self) -> bool {
        self.history_value.is_none()
    }
}

/// On-disk layout: `{"description": "...", "data": {key: value}}`.
#[derive(Debug, Serialize, Deserialize)]
struct HistoryDocument {
    #[serde(default)]
    description: String,
    #[serde(default)]
    data: IndexMap<String, Value>,
}

impl Parser for HistoryDocument {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        write_pretty_json(writer, self)
    }
}

/// The history file plus its in-memory copy.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    history: History,
}

impl HistoryStore {
    /// Loads the history at `path`, creating an empty history file when absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let mut store = HistoryStore {
            path,
            history: History::default(),
        };
        match HistoryDocument::read_from(&store.path) {
            Ok(document) => {
                store.history = History::new(
                    document
                        .data
                        .into_iter()
                        .map(|(k, v)| (k, json_to_string(v)))
                        .collect(),
                );
                debug!(
                    "Loaded history with {} entries from {}",
                    store.history.len(),
                    store.path.display()
                );
            }
            Err(Error::FileNotFound { .. }) => {
                store.save()?;
                info!("Created history file {}", store.path.display());
            }
            Err(e) => return Err(e),
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> &History {
        &self.history
    }

    /// Replaces the whole snapshot and persists it.
    pub fn set(&mut self, entries: Entries) -> Result<(), Error> {
        self.history = History::new(entries);
        self.save()
    }

    /// Translatable source keys whose value is new or changed since the last sync.
    pub fn compare(&self, source: &Resource) -> Vec<HistoryChange> {
        source
            .translatable_entries()
            .filter(|(key, value)| self.history.get(key) != Some(value.as_str()))
            .map(|(key, value)| HistoryChange {
                key: key.clone(),
                source_value: value.clone(),
                history_value: self.history.get(key).map(str::to_string),
            })
            .collect()
    }

    /// Records the current source value of `keys` so the next sync retains
    /// whatever the targets hold for them.
    ///
    /// Returns the number of keys excluded.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArguments`] if a key is not in the source.
    pub fn exclude(&mut self, source: &Resource, keys: &[String]) -> Result<usize, Error> {
        if let Some(unknown) = keys.iter().find(|k| !source.contains_key(k)) {
            return Err(Error::invalid_arguments(format!(
                "key '{}' does not exist in {}",
                unknown,
                source.file_name()
            )));
        }
        if keys.is_empty() {
            return Ok(0);
        }

        let mut entries = self.history.entries.clone();
        for key in keys {
            if let Some(value) = source.get(key) {
                entries.insert(key.clone(), value.to_string());
            }
        }
        self.set(entries)?;
        Ok(keys.len())
    }

    /// Renames keys of the snapshot, see [`crate::store::ResourceStore::rename_keys`].
    pub fn rename_keys(&mut self, old_keys: &[String], new_keys: &[String]) -> Result<usize, Error> {
        check_rename_arguments(old_keys, new_keys)?;
        let mut renamed = 0;
        let entries: Entries = self
            .history
            .entries
            .iter()
            .map(|(key, value)| match old_keys.iter().position(|k| k == key) {
                Some(index) => {
                    renamed += 1;
                    (new_keys[index].clone(), value.clone())
                }
                None => (key.clone(), value.clone()),
            })
            .collect();
        if renamed > 0 {
            self.set(entries)?;
        }
        Ok(renamed)
    }

    pub fn delete_keys(&mut self, keys: &[String]) -> Result<usize, Error> {
        let mut entries = self.history.entries.clone();
        entries.retain(|key, _| !keys.contains(key));
        let deleted = self.history.len() - entries.len();
        if deleted > 0 {
            self.set(entries)?;
        }
        Ok(deleted)
    }

    /// Number of translatable keys in the snapshot.
    pub fn translatable_len(&self) -> usize {
        self.history.entries.keys().filter(|k| is_translatable_key(k)).count()
    }

    fn save(&self) -> Result<(), Error> {
        let document = HistoryDocument {
            description: HISTORY_DESCRIPTION.to_string(),
            data: self
                .history
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        };
        document.write_to(&self.path)
    }
}
