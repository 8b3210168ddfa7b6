//! Content-addressed cache of provider translations.
//!
//! Entries are keyed by language pair and the SHA-1 of the source text, so a
//! string translated once is reused under any key and in any file.
//!
//! ```text
//! { "description": "...", "en": { "fr": { "<sha1>": "Bonjour" } } }
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tracing::{debug, info};

use crate::{
    error::Error,
    traits::{Parser, write_pretty_json},
    types::Resource,
};

const CACHE_DESCRIPTION: &str = "This file is a translation cache maintained by arbsync.";

type Translations = IndexMap<String, String>;
type LanguagePairs = IndexMap<String, IndexMap<String, Translations>>;

/// Identifies one cached translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source_language: String,
    pub target_language: String,
    /// Lower-case hex SHA-1 of the source text.
    pub source_sha1: String,
}

impl CacheKey {
    pub fn new(source_value: &str, source_language: &str, target_language: &str) -> Self {
        CacheKey {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            source_sha1: sha1_hex(source_value),
        }
    }
}

pub fn sha1_hex(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheDocument {
    #[serde(default, skip_deserializing)]
    description: String,
    #[serde(flatten)]
    languages: LanguagePairs,
}

impl Parser for CacheDocument {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let mut value: serde_json::Value = serde_json::from_reader(reader)?;
        if let Some(object) = value.as_object_mut() {
            object.remove("description");
        }
        Ok(serde_json::from_value(value)?)
    }

    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        write_pretty_json(writer, self)
    }
}

/// The cache file plus its in-memory copy.
///
/// The file is read once on [`TranslationCache::open`] and rewritten in full
/// on every upsert. It is not created until the first upsert.
#[derive(Debug)]
pub struct TranslationCache {
    path: PathBuf,
    languages: LanguagePairs,
}

impl TranslationCache {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let mut cache = TranslationCache {
            path: path.into(),
            languages: LanguagePairs::new(),
        };
        cache.reload()?;
        Ok(cache)
    }

    /// Re-reads the cache file, picking up edits made outside this process.
    pub fn reload(&mut self) -> Result<(), Error> {
        self.languages = match CacheDocument::read_from(&self.path) {
            Ok(document) => document.languages,
            Err(Error::FileNotFound { .. }) => LanguagePairs::new(),
            Err(e) => return Err(e),
        };
        debug!("Loaded {} cached translations from {}", self.len(), self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_key(&self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&str> {
        self.languages
            .get(&key.source_language)?
            .get(&key.target_language)?
            .get(&key.source_sha1)
            .map(String::as_str)
    }

    /// Stores a translation and rewrites the cache file.
    pub fn upsert(&mut self, key: &CacheKey, translated: impl Into<String>) -> Result<(), Error> {
        self.insert(key, translated.into());
        self.save()
    }

    /// Number of cached translations across all language pairs.
    pub fn len(&self) -> usize {
        self.languages
            .values()
            .flat_map(|targets| targets.values())
            .map(|translations| translations.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fills the cache from translations that already exist in target files.
    ///
    /// For every translatable key of `source` that a target also has, the
    /// target value is cached as the translation of the source value. Targets
    /// in the source language are skipped. The file is written once.
    ///
    /// Returns the number of entries written.
    pub fn rebuild_from(&mut self, source: &Resource, targets: &[Resource]) -> Result<usize, Error> {
        let mut count = 0;
        for target in targets {
            if target.language_code == source.language_code {
                continue;
            }
            for (key, source_value) in source.translatable_entries() {
                if let Some(target_value) = target.get(key) {
                    let cache_key = CacheKey::new(source_value, &source.language_code, &target.language_code);
                    self.insert(&cache_key, target_value.to_string());
                    count += 1;
                }
            }
            debug!("Cached {} translations from {}", count, target.file_name());
        }
        if count > 0 {
            self.save()?;
        }
        info!("Rebuilt translation cache with {} entries", count);
        Ok(count)
    }

    fn insert(&mut self, key: &CacheKey, translated: String) {
        self.languages
            .entry(key.source_language.clone())
            .or_default()
            .entry(key.target_language.clone())
            .or_default()
            .insert(key.source_sha1.clone(), translated);
    }

    fn save(&self) -> Result<(), Error> {
        let document = CacheDocument {
            description: CACHE_DESCRIPTION.to_string(),
            languages: self.languages.clone(),
        };
        document.write_to(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entries;
    use tempfile::TempDir;

    fn resource(code: &str, pairs: &[(&str, &str)]) -> Resource {
        let entries: Entries = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Resource::new(code, format!("{}.arb", code), entries)
    }

    #[test]
    fn test_sha1_hex() {
        assert_eq!(sha1_hex("Hello"), "f7ff9e8b7bb2e09b70935a5d785e0cc5d9d0abf0");
        assert_eq!(sha1_hex(""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_open_missing_file_does_not_create_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let cache = TranslationCache::open(&path).unwrap();
        assert!(cache.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_upsert_then_get_is_content_addressed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/cache.json");
        let mut cache = TranslationCache::open(&path).unwrap();

        cache.upsert(&CacheKey::new("Hello", "en", "fr"), "Bonjour").unwrap();
        assert!(path.exists());
        assert_eq!(cache.get(&CacheKey::new("Hello", "en", "fr")), Some("Bonjour"));
        assert!(!cache.has_key(&CacheKey::new("Hello", "en", "ko")));
        assert!(!cache.has_key(&CacheKey::new("Hello", "fr", "en")));

        let reopened = TranslationCache::open(&path).unwrap();
        assert_eq!(reopened.get(&CacheKey::new("Hello", "en", "fr")), Some("Bonjour"));
    }

    #[test]
    fn test_document_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = TranslationCache::open(&path).unwrap();
        cache.upsert(&CacheKey::new("Hello", "en", "fr"), "Bonjour").unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["description"].is_string());
        assert_eq!(
            json["en"]["fr"]["f7ff9e8b7bb2e09b70935a5d785e0cc5d9d0abf0"],
            "Bonjour"
        );
    }

    #[test]
    fn test_reload_picks_up_external_edits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = TranslationCache::open(&path).unwrap();
        assert!(cache.is_empty());

        std::fs::write(
            &path,
            format!(r#"{{"description": "x", "en": {{"ko": {{"{}": "안녕"}}}}}}"#, sha1_hex("Hello")),
        )
        .unwrap();
        cache.reload().unwrap();
        assert_eq!(cache.get(&CacheKey::new("Hello", "en", "ko")), Some("안녕"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_malformed_cache_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(
            TranslationCache::open(&path),
            Err(Error::MalformedJson { .. })
        ));
    }

    #[test]
    fn test_rebuild_from_targets() {
        let dir = TempDir::new().unwrap();
        let mut cache = TranslationCache::open(dir.path().join("cache.json")).unwrap();
        let source = resource(
            "en",
            &[("@@locale", "en"), ("hello", "Hello"), ("@hello", "{}"), ("bye", "Bye")],
        );
        let fr = resource("fr", &[("@@locale", "fr"), ("hello", "Bonjour")]);
        let en_copy = resource("en", &[("hello", "Hello")]);

        let count = cache.rebuild_from(&source, &[fr, en_copy]).unwrap();
        assert_eq!(count, 1);
        assert_eq!(cache.get(&CacheKey::new("Hello", "en", "fr")), Some("Bonjour"));
        assert!(!cache.has_key(&CacheKey::new("Bye", "en", "fr")));
    }
}
