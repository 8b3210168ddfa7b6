//! Core types shared by every arbsync component.
//!
//! A [`Resource`] is one ARB file: an ordered key → string mapping plus the
//! language it belongs to. On disk it is an [`ArbDocument`], which keeps
//! non-string values (ARB metadata objects) intact.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::Error,
    traits::{Parser, write_pretty_json},
};

/// Key holding the language code of an ARB file. Rewritten, never translated.
pub const LOCALE_KEY: &str = "@@locale";

/// Ordered key → value entries of a resource.
pub type Entries = IndexMap<String, String>;

/// Metadata keys annotate other keys and are never translated.
pub fn is_metadata_key(key: &str) -> bool {
    key != LOCALE_KEY && key.contains('@')
}

pub fn is_translatable_key(key: &str) -> bool {
    key != LOCALE_KEY && !is_metadata_key(key)
}

/// What a sync does with one key of a target resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Key is new to the target.
    Create,
    /// Key exists in the target but the source changed since the last sync.
    Update,
    /// Key exists in the target and the source is unchanged.
    Retain,
    /// Key exists only in the target and is dropped.
    Delete,
}

impl Action {
    /// Whether the key has to go through the provider (or the cache).
    pub fn needs_translation(self) -> bool {
        matches!(self, Action::Create | Action::Update)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Retain => "retain",
            Action::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// One ARB file loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Language code resolved from the file name (e.g. `fr`, `zh_CN`).
    pub language_code: String,

    /// Where the resource was read from or will be written to.
    pub path: PathBuf,

    /// Entries in file order.
    pub entries: Entries,
}

impl Resource {
    pub fn new(language_code: impl Into<String>, path: impl Into<PathBuf>, entries: Entries) -> Self {
        Self {
            language_code: language_code.into(),
            path: path.into(),
            entries,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Entries that are neither `@@locale` nor metadata, in file order.
    pub fn translatable_entries(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter().filter(|(k, _)| is_translatable_key(k))
    }

    pub fn translatable_len(&self) -> usize {
        self.translatable_entries().count()
    }

    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Resource {{ language: {}, file: {}, entries: {} }}",
            self.language_code,
            self.file_name(),
            self.entries.len()
        )
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Raw JSON object of an ARB file, values kept as JSON.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArbDocument(pub IndexMap<String, Value>);

impl ArbDocument {
    pub fn from_entries(entries: &Entries) -> Self {
        ArbDocument(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }

    /// String view of the document. Non-string values are rendered as compact JSON.
    pub fn into_entries(self) -> Entries {
        self.0
            .into_iter()
            .map(|(k, v)| (k, json_to_string(v)))
            .collect()
    }
}

/// Strings are taken as is, any other JSON value becomes its compact text.
pub(crate) fn json_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl Parser for ArbDocument {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let map: IndexMap<String, Value> = serde_json::from_reader(reader)?;
        Ok(ArbDocument(map))
    }

    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        write_pretty_json(writer, &self.0)
    }
}
