//! Read-only preview of what a sync would do.
//!
//! Uses the same classification as [`crate::sync`] and probes the cache for
//! every key that would be translated. Nothing is written.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    cache::{CacheKey, TranslationCache},
    error::Error,
    history::History,
    language::{ArbLayout, language_by_code},
    store::ResourceStore,
    sync::classify,
    types::{Action, LOCALE_KEY, Resource, is_translatable_key},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionStatistic {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub retain: usize,
}

/// Estimated provider usage: calls for cache misses, hits otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApiStatistic {
    pub api_call: usize,
    pub cache_hit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageStatistic {
    pub language_code: String,
    pub file_path: PathBuf,
    pub action: ActionStatistic,
    pub api: ApiStatistic,
    pub translation_required: bool,
}

impl LanguageStatistic {
    /// Non-zero counters as `"create: 2, update: 1, api_call: 3"`, or `"No changes"`.
    pub fn describe(&self) -> String {
        if !self.translation_required {
            return "No changes".to_string();
        }
        [
            ("create", self.action.create),
            ("update", self.action.update),
            ("delete", self.action.delete),
            ("api_call", self.api.api_call),
            ("cache_hit", self.api.cache_hit),
        ]
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(name, count)| format!("{}: {}", name, count))
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Computes per-language statistics in the order of `target_languages`.
///
/// The source language is skipped. A target without a file counts every
/// translatable source key as `create`.
pub fn compute_statistics<S: ResourceStore>(
    store: &S,
    cache: &TranslationCache,
    layout: &ArbLayout,
    source: &Resource,
    target_languages: &[String],
    history: &History,
) -> Result<IndexMap<String, LanguageStatistic>, Error> {
    let mut statistics = IndexMap::new();
    for code in target_languages {
        let language = language_by_code(code)?;
        if language.language_code == source.language_code {
            continue;
        }
        let file_path = layout.path_for_language(language.language_code)?;
        let target = store.load_if_exists(&file_path, language.language_code)?;

        let mut action = ActionStatistic::default();
        let mut api = ApiStatistic::default();
        for (key, value) in source.translatable_entries() {
            let outcome = classify(key, value, target.as_ref(), history);
            match outcome {
                Action::Create => action.create += 1,
                Action::Update => action.update += 1,
                Action::Retain => action.retain += 1,
                Action::Delete => action.delete += 1,
            }
            if outcome.needs_translation() {
                if cache.has_key(&CacheKey::new(value, &source.language_code, language.language_code)) {
                    api.cache_hit += 1;
                } else {
                    api.api_call += 1;
                }
            }
        }
        if let Some(target) = &target {
            action.delete = target
                .keys()
                .filter(|key| *key != LOCALE_KEY && !(is_translatable_key(key) && source.contains_key(key)))
                .count();
        }

        let translation_required = action.create + action.update + action.delete > 0;
        statistics.insert(
            language.language_code.to_string(),
            LanguageStatistic {
                language_code: language.language_code.to_string(),
                file_path,
                action,
                api,
                translation_required,
            },
        );
    }
    Ok(statistics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FsResourceStore;
    use crate::types::Entries;
    use tempfile::TempDir;

    fn entries(pairs: &[(&str, &str)]) -> Entries {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    struct Fixture {
        dir: TempDir,
        layout: ArbLayout,
        source: Resource,
    }

    fn fixture(source: &[(&str, &str)]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let source_path = dir.path().join("en.arb");
        let store = FsResourceStore;
        store.upsert(&source_path, &entries(source)).unwrap();
        let source = store.load(&source_path, "en").unwrap();
        Fixture {
            layout: ArbLayout::new(&source_path),
            dir,
            source,
        }
    }

    #[test]
    fn test_partition_example() {
        let f = fixture(&[("@@locale", "en"), ("b", "old"), ("a", "new"), ("c", "new")]);
        let store = FsResourceStore;
        store
            .upsert(
                &f.dir.path().join("fr.arb"),
                &entries(&[("@@locale", "fr"), ("b", "B"), ("c", "C"), ("d", "D")]),
            )
            .unwrap();
        let cache = TranslationCache::open(f.dir.path().join("cache.json")).unwrap();
        let history = History::new(entries(&[("b", "old")]));

        let stats = compute_statistics(&store, &cache, &f.layout, &f.source, &["fr".to_string()], &history)
            .unwrap();
        let fr = &stats["fr"];
        assert_eq!(
            fr.action,
            ActionStatistic {
                create: 1,
                update: 1,
                delete: 1,
                retain: 1,
            }
        );
        assert_eq!(fr.api, ApiStatistic { api_call: 2, cache_hit: 0 });
        assert!(fr.translation_required);
        assert_eq!(fr.describe(), "create: 1, update: 1, delete: 1, api_call: 2");
    }

    #[test]
    fn test_absent_target_counts_everything_as_create() {
        let f = fixture(&[("@@locale", "en"), ("a", "A"), ("@a", "{}"), ("b", "Hello")]);
        let mut cache = TranslationCache::open(f.dir.path().join("cache.json")).unwrap();
        cache.upsert(&CacheKey::new("Hello", "en", "ko"), "안녕하세요").unwrap();

        let stats = compute_statistics(
            &FsResourceStore,
            &cache,
            &f.layout,
            &f.source,
            &["ko".to_string(), "en".to_string()],
            &History::default(),
        )
        .unwrap();
        assert_eq!(stats.len(), 1);
        let ko = &stats["ko"];
        assert_eq!(ko.action.create, 2);
        assert_eq!(ko.action.delete, 0);
        assert_eq!(ko.api, ApiStatistic { api_call: 1, cache_hit: 1 });
        assert!(!f.dir.path().join("ko.arb").exists());
    }

    #[test]
    fn test_up_to_date_target_requires_nothing() {
        let f = fixture(&[("@@locale", "en"), ("a", "A")]);
        let store = FsResourceStore;
        store
            .upsert(&f.dir.path().join("fr.arb"), &entries(&[("@@locale", "fr"), ("a", "Á")]))
            .unwrap();
        let cache = TranslationCache::open(f.dir.path().join("cache.json")).unwrap();
        let history = History::new(f.source.entries.clone());

        let first = compute_statistics(&store, &cache, &f.layout, &f.source, &["fr".to_string()], &history)
            .unwrap();
        let second = compute_statistics(&store, &cache, &f.layout, &f.source, &["fr".to_string()], &history)
            .unwrap();
        assert_eq!(first, second);
        assert!(!first["fr"].translation_required);
        assert_eq!(first["fr"].action.retain, 1);
        assert_eq!(first["fr"].describe(), "No changes");
    }

    #[test]
    fn test_unknown_language_is_an_error() {
        let f = fixture(&[("a", "A")]);
        let cache = TranslationCache::open(f.dir.path().join("cache.json")).unwrap();
        let result = compute_statistics(
            &FsResourceStore,
            &cache,
            &f.layout,
            &f.source,
            &["xx".to_string()],
            &History::default(),
        );
        assert!(matches!(result, Err(Error::InvalidLanguageCode(_))));
    }
}
