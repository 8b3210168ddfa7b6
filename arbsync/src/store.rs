//! Reading and writing ARB resource files.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::{
    error::Error,
    traits::Parser,
    types::{ArbDocument, Entries, LOCALE_KEY, Resource},
};

const ARB_EXTENSION: &str = "arb";

/// Access to the resource files of a project.
///
/// The orchestrator, the statistics engine and the validator only talk to
/// resource files through this trait.
pub trait ResourceStore {
    /// Lists every `.arb` file in the directory of `source_path`, sorted by name.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] when `source_path` itself does not exist.
    fn list_resource_files(&self, source_path: &Path) -> Result<Vec<PathBuf>, Error>;

    /// Reads the key → value mapping of a resource file.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] when the file is missing and
    /// [`Error::MalformedJson`] when it is not a JSON object.
    fn read(&self, path: &Path) -> Result<Entries, Error>;

    /// Rewrites the file at `path` with `entries`, in order.
    fn upsert(&self, path: &Path, entries: &Entries) -> Result<(), Error>;

    /// Writes `{"@@locale": language_code}` to `path` unless the file exists.
    ///
    /// Returns whether the file was created.
    fn create_if_absent(&self, path: &Path, language_code: &str) -> Result<bool, Error>;

    fn exists(&self, path: &Path) -> bool;

    /// Renames `old_keys[i]` to `new_keys[i]`. Keys missing from the file are skipped.
    fn rename_keys(&self, path: &Path, old_keys: &[String], new_keys: &[String]) -> Result<usize, Error>;

    /// Removes `keys` from the file. Returns how many were present.
    fn delete_keys(&self, path: &Path, keys: &[String]) -> Result<usize, Error>;

    /// Reads `path` into a [`Resource`] tagged with `language_code`.
    fn load(&self, path: &Path, language_code: &str) -> Result<Resource, Error> {
        let entries = self.read(path)?;
        Ok(Resource::new(language_code, path, entries))
    }

    /// Like [`ResourceStore::load`], but `None` when the file does not exist.
    fn load_if_exists(&self, path: &Path, language_code: &str) -> Result<Option<Resource>, Error> {
        if !self.exists(path) {
            return Ok(None);
        }
        self.load(path, language_code).map(Some)
    }
}

/// [`ResourceStore`] backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsResourceStore;

impl FsResourceStore {
    pub fn new() -> Self {
        FsResourceStore
    }

    fn read_document(&self, path: &Path) -> Result<ArbDocument, Error> {
        ArbDocument::read_from(path)
    }
}

impl ResourceStore for FsResourceStore {
    fn list_resource_files(&self, source_path: &Path) -> Result<Vec<PathBuf>, Error> {
        if !source_path.exists() {
            return Err(Error::FileNotFound {
                path: source_path.to_path_buf(),
            });
        }
        let directory = match source_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(directory)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(ARB_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<Entries, Error> {
        Ok(self.read_document(path)?.into_entries())
    }

    fn upsert(&self, path: &Path, entries: &Entries) -> Result<(), Error> {
        let previous = if path.exists() {
            self.read_document(path).ok()
        } else {
            None
        };
        let document = restore_json_values(entries, previous.as_ref());
        document.write_to(path)?;
        debug!("Wrote {} entries to {}", entries.len(), path.display());
        Ok(())
    }

    fn create_if_absent(&self, path: &Path, language_code: &str) -> Result<bool, Error> {
        if path.exists() {
            return Ok(false);
        }
        let mut entries = Entries::new();
        entries.insert(LOCALE_KEY.to_string(), language_code.to_string());
        ArbDocument::from_entries(&entries).write_to(path)?;
        debug!("Created {}", path.display());
        Ok(true)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn rename_keys(&self, path: &Path, old_keys: &[String], new_keys: &[String]) -> Result<usize, Error> {
        check_rename_arguments(old_keys, new_keys)?;
        let ArbDocument(map) = self.read_document(path)?;

        let mut renamed = 0;
        let document = ArbDocument(
            map.into_iter()
                .map(|(key, value)| match old_keys.iter().position(|k| *k == key) {
                    Some(index) => {
                        renamed += 1;
                        (new_keys[index].clone(), value)
                    }
                    None => (key, value),
                })
                .collect(),
        );
        if renamed > 0 {
            document.write_to(path)?;
        }
        Ok(renamed)
    }

    fn delete_keys(&self, path: &Path, keys: &[String]) -> Result<usize, Error> {
        let ArbDocument(mut map) = self.read_document(path)?;
        let before = map.len();
        map.retain(|key, _| !keys.contains(key));
        let deleted = before - map.len();
        if deleted > 0 {
            ArbDocument(map).write_to(path)?;
        }
        Ok(deleted)
    }
}

pub(crate) fn check_rename_arguments(old_keys: &[String], new_keys: &[String]) -> Result<(), Error> {
    if old_keys.len() != new_keys.len() {
        return Err(Error::invalid_arguments(format!(
            "{} keys to rename but {} new names",
            old_keys.len(),
            new_keys.len()
        )));
    }
    Ok(())
}

/// Checks a rename against the source resource before any file is touched.
///
/// Every old key must exist in `source` and no new key may already exist,
/// otherwise two entries would collapse into one.
///
/// # Errors
///
/// [`Error::InvalidArguments`] naming the first offending key.
pub fn check_renamable(source: &Resource, old_keys: &[String], new_keys: &[String]) -> Result<(), Error> {
    check_rename_arguments(old_keys, new_keys)?;
    if let Some(missing) = old_keys.iter().find(|k| !source.contains_key(k)) {
        return Err(Error::invalid_arguments(format!(
            "key '{}' does not exist in {}",
            missing,
            source.file_name()
        )));
    }
    if let Some(taken) = new_keys.iter().find(|k| source.contains_key(k)) {
        return Err(Error::invalid_arguments(format!(
            "key '{}' already exists in {}",
            taken,
            source.file_name()
        )));
    }
    Ok(())
}

/// Builds the document for `entries`, keeping the JSON values of `previous`
/// whose compact text is unchanged so metadata objects survive a rewrite.
fn restore_json_values(entries: &Entries, previous: Option<&ArbDocument>) -> ArbDocument {
    ArbDocument(
        entries
            .iter()
            .map(|(key, value)| {
                let json = match previous.and_then(|doc| doc.0.get(key)) {
                    Some(original) if !original.is_string() && original.to_string() == *value => {
                        original.clone()
                    }
                    _ => Value::String(value.clone()),
                };
                (key.clone(), json)
            })
            .collect(),
    )
}
