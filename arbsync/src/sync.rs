//! Translation orchestrator.
//!
//! One sync brings every target resource in line with the source resource:
//! keys unchanged since the last sync keep their target value, new or edited
//! keys are translated (through the cache first, the provider second) and
//! keys that no longer exist in the source are dropped.
//!
//! Languages are processed one after another. Within a language all provider
//! calls run concurrently on the current task. A provider failure aborts only
//! the language it happened in.

use std::{
    fmt::Display,
    ops::AddAssign,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use futures::future::join_all;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    cache::{CacheKey, TranslationCache},
    error::{Error, ErrorCategory},
    history::{History, HistoryStore},
    language::{ArbLayout, Language, language_by_code},
    notify::Notifier,
    placeholder,
    provider::{ProviderSet, TranslationProvider, TranslationType},
    store::ResourceStore,
    types::{Action, Entries, LOCALE_KEY, Resource, is_metadata_key},
};

/// Value held by a staged key until its translation arrives.
pub const PENDING_TRANSLATION: &str = "will be translated";

/// Decides what a sync does with one translatable source key.
///
/// A key is retained only when the target already has it and the source
/// value equals the value recorded in the history.
pub fn classify(key: &str, source_value: &str, target: Option<&Resource>, history: &History) -> Action {
    let in_target = target.is_some_and(|t| t.contains_key(key));
    if in_target && history.get(key) == Some(source_value) {
        Action::Retain
    } else if in_target {
        Action::Update
    } else {
        Action::Create
    }
}

/// Cooperative cancellation of a multi-language run, checked between languages.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters of one language (or the sum over several).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStatistic {
    pub create: usize,
    pub update: usize,
    /// Retained keys.
    pub skip: usize,
    /// Keys of the previous target file missing from the written one.
    pub delete: usize,
    pub api_call: usize,
    pub cache_hit: usize,
}

impl AddAssign for TranslationStatistic {
    fn add_assign(&mut self, other: Self) {
        self.create += other.create;
        self.update += other.update;
        self.skip += other.skip;
        self.delete += other.delete;
        self.api_call += other.api_call;
        self.cache_hit += other.cache_hit;
    }
}

impl Display for TranslationStatistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "create: {}, update: {}, skip: {}, delete: {}, api_call: {}, cache_hit: {}",
            self.create, self.update, self.skip, self.delete, self.api_call, self.cache_hit
        )
    }
}

/// A language whose sync failed.
#[derive(Debug)]
pub struct LanguageFailure {
    pub language_code: String,
    pub error: Error,
    /// Keys that were due for translation. Their history entries are kept as
    /// they were so the next run stages them again.
    pub pending_keys: Vec<String>,
}

/// Outcome of [`Translator::translate_all`].
#[derive(Debug, Default)]
pub struct SyncRun {
    /// Languages attempted, successful or not. The source language is not counted.
    pub processed: usize,
    pub cancelled: bool,
    pub statistics: IndexMap<String, TranslationStatistic>,
    pub failures: Vec<LanguageFailure>,
}

impl SyncRun {
    pub fn total(&self) -> TranslationStatistic {
        let mut total = TranslationStatistic::default();
        for statistic in self.statistics.values() {
            total += *statistic;
        }
        total
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Translator<'a, S: ResourceStore, N: Notifier> {
    store: &'a S,
    cache: &'a mut TranslationCache,
    layout: &'a ArbLayout,
    notifier: N,
}

impl<'a, S: ResourceStore, N: Notifier> Translator<'a, S, N> {
    pub fn new(store: &'a S, cache: &'a mut TranslationCache, layout: &'a ArbLayout, notifier: N) -> Self {
        Translator {
            store,
            cache,
            layout,
            notifier,
        }
    }

    /// Syncs every language of `target_languages` in order, then records the
    /// source as the new history.
    ///
    /// Provider failures are collected in [`SyncRun::failures`] and the run
    /// moves on to the next language. Keys a failed language still had to
    /// translate keep their previous history entry (or none). Any other error aborts the run and
    /// leaves the history untouched. A cancelled run still updates the
    /// history; languages finished before the cancellation stay written.
    ///
    /// # Errors
    ///
    /// - [`Error::TargetLanguagesRequired`] if `target_languages` is empty.
    /// - [`Error::ApiKeyRequired`] for a paid run without a paid provider.
    /// - [`Error::InvalidLanguageCode`] for an unsupported language code.
    pub async fn translate_all(
        &mut self,
        providers: &ProviderSet,
        translation_type: TranslationType,
        source: &Resource,
        history: &mut HistoryStore,
        target_languages: &[String],
        cancel: &CancelFlag,
    ) -> Result<SyncRun, Error> {
        if target_languages.is_empty() {
            return Err(Error::TargetLanguagesRequired);
        }
        let provider = providers.select(translation_type)?;
        let languages = target_languages
            .iter()
            .map(|code| language_by_code(code))
            .collect::<Result<Vec<_>, _>>()?;

        let mut run = SyncRun::default();
        if source.translatable_len() == 0 {
            self.notifier
                .warn(&format!("{} has no keys to translate.", source.file_name()));
            return Ok(run);
        }

        info!(
            provider = provider.provider_name(),
            translation_type = %translation_type,
            languages = languages.len(),
            "Starting translation"
        );
        for language in languages {
            if cancel.is_cancelled() {
                run.cancelled = true;
                self.notifier.warn("Translation cancelled.");
                break;
            }
            if language.language_code == source.language_code {
                continue;
            }
            run.processed += 1;

            match self
                .translate_language(provider, source, history.get(), language)
                .await
            {
                Ok(Some(statistic)) => {
                    self.notifier.info(&format!(
                        "{} translated. ({} / {})",
                        self.layout.path_for_language(language.language_code)?.display(),
                        run.processed,
                        target_languages.len()
                    ));
                    run.statistics
                        .insert(language.language_code.to_string(), statistic);
                }
                Ok(None) => {}
                Err(error) if error.category() == ErrorCategory::Provider => {
                    self.notifier.warn(&format!(
                        "Translation to {} failed: {}",
                        language.language_code, error
                    ));
                    let pending_keys = self.pending_keys(source, history.get(), language)?;
                    run.failures.push(LanguageFailure {
                        language_code: language.language_code.to_string(),
                        error,
                        pending_keys,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        let synced = synced_history(source, history.get(), &run.failures);
        history.set(synced)?;
        self.notifier.info(&format!(
            "Total {} languages translated. ({} {})",
            run.statistics.len(),
            translation_type,
            run.total()
        ));
        Ok(run)
    }

    /// Syncs one target language and writes its resource file.
    ///
    /// Returns `None` when `target` is the source language. On a provider
    /// failure nothing is written beyond the stub of a missing target file.
    pub async fn translate_language(
        &mut self,
        provider: &dyn TranslationProvider,
        source: &Resource,
        history: &History,
        target: &Language,
    ) -> Result<Option<TranslationStatistic>, Error> {
        if target.language_code == source.language_code {
            return Ok(None);
        }
        let source_language = language_by_code(&source.language_code)?;
        let target_path = self.layout.path_for_language(target.language_code)?;
        self.store
            .create_if_absent(&target_path, target.language_code)?;
        let previous = self.store.load(&target_path, target.language_code)?;

        let mut statistic = TranslationStatistic::default();
        let mut output = Entries::with_capacity(source.entries.len() + 1);
        if !source.contains_key(LOCALE_KEY) {
            output.insert(LOCALE_KEY.to_string(), target.language_code.to_string());
        }

        let mut staged: Vec<(&str, &str)> = Vec::new();
        for (key, source_value) in &source.entries {
            if key == LOCALE_KEY {
                output.insert(key.clone(), target.language_code.to_string());
                continue;
            }
            if is_metadata_key(key) {
                continue;
            }
            match classify(key, source_value, Some(&previous), history) {
                Action::Retain => {
                    let value = previous.get(key).unwrap_or_default();
                    output.insert(key.clone(), value.to_string());
                    statistic.skip += 1;
                }
                action => {
                    if action == Action::Update {
                        statistic.update += 1;
                    } else {
                        statistic.create += 1;
                    }
                    output.insert(key.clone(), PENDING_TRANSLATION.to_string());
                    staged.push((key.as_str(), source_value.as_str()));
                }
            }
        }
        debug!(
            language = target.language_code,
            create = statistic.create,
            update = statistic.update,
            skip = statistic.skip,
            "Classified keys"
        );

        if !staged.is_empty() {
            let translated = self
                .translate_batch(provider, source_language, target, &staged, &mut statistic)
                .await?;
            for ((key, _), value) in staged.iter().zip(translated) {
                output.insert(key.to_string(), value);
            }
        }

        statistic.delete = previous
            .keys()
            .filter(|key| *key != LOCALE_KEY && !output.contains_key(*key))
            .count();
        self.store.upsert(&target_path, &output)?;
        info!(
            language = target.language_code,
            api_call = statistic.api_call,
            cache_hit = statistic.cache_hit,
            "Wrote {}",
            target_path.display()
        );
        Ok(Some(statistic))
    }

    /// Translatable keys of `source` that `target` still needs translated.
    fn pending_keys(&self, source: &Resource, history: &History, target: &Language) -> Result<Vec<String>, Error> {
        let path = self.layout.path_for_language(target.language_code)?;
        let current = self.store.load_if_exists(&path, target.language_code)?;
        Ok(source
            .translatable_entries()
            .filter(|(key, value)| classify(key, value, current.as_ref(), history).needs_translation())
            .map(|(key, _)| key.clone())
            .collect())
    }

    /// Translates `(key, text)` pairs, returning the translations in order.
    ///
    /// Cache hits are resolved first. The remaining texts go to the provider
    /// all at once; every successful call is cached even if another one fails.
    async fn translate_batch(
        &mut self,
        provider: &dyn TranslationProvider,
        source: &Language,
        target: &Language,
        staged: &[(&str, &str)],
        statistic: &mut TranslationStatistic,
    ) -> Result<Vec<String>, Error> {
        let mut results: Vec<Option<String>> = vec![None; staged.len()];
        let mut misses = Vec::new();
        for (index, (_, text)) in staged.iter().enumerate() {
            let cache_key = CacheKey::new(text, source.language_code, target.language_code);
            match self.cache.get(&cache_key) {
                Some(cached) => {
                    results[index] = Some(cached.to_string());
                    statistic.cache_hit += 1;
                }
                None => misses.push((index, cache_key)),
            }
        }

        let calls = misses
            .iter()
            .map(|(index, _)| translate_text(provider, staged[*index].1, source, target));
        let outcomes = join_all(calls).await;

        let mut failure = None;
        for ((index, cache_key), outcome) in misses.into_iter().zip(outcomes) {
            match outcome {
                Ok(translated) => {
                    self.cache.upsert(&cache_key, translated.clone())?;
                    results[index] = Some(translated);
                    statistic.api_call += 1;
                }
                Err(error) => {
                    let key = staged[index].0;
                    warn!(key, language = target.language_code, "Translation failed: {}", error);
                    if failure.is_none() {
                        failure = Some(as_translation_failure(key, error));
                    }
                }
            }
        }
        if let Some(error) = failure {
            return Err(error);
        }

        Ok(results.into_iter().map(Option::unwrap_or_default).collect())
    }
}

/// The source entries, except that keys still pending for a failed language
/// keep their previous history value, or are left out if they had none.
fn synced_history(source: &Resource, previous: &History, failures: &[LanguageFailure]) -> Entries {
    let mut entries = source.entries.clone();
    for key in failures.iter().flat_map(|f| &f.pending_keys) {
        match previous.get(key) {
            Some(value) => {
                entries.insert(key.clone(), value.to_string());
            }
            None => {
                entries.shift_remove(key);
            }
        }
    }
    entries
}

/// Sends one text through the placeholder codec and the provider.
async fn translate_text(
    provider: &dyn TranslationProvider,
    text: &str,
    source: &Language,
    target: &Language,
) -> Result<String, Error> {
    let encoded = placeholder::encode(text)?;
    let translated = provider.translate(&encoded.text, source, target).await?;
    Ok(placeholder::decode(&encoded.dictionary, &translated))
}

fn as_translation_failure(key: &str, error: Error) -> Error {
    match error {
        Error::TranslationFailure(message) => Error::TranslationFailure(format!("{}: {}", key, message)),
        Error::PlaceholderLimit { .. } => Error::TranslationFailure(format!("{}: {}", key, error)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> Entries {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_classification_partition() {
        let history = History::new(entries(&[("b", "old")]));
        let target = Resource::new("fr", "fr.arb", entries(&[("b", "B"), ("c", "C"), ("d", "D")]));

        assert_eq!(classify("a", "new", Some(&target), &history), Action::Create);
        assert_eq!(classify("b", "old", Some(&target), &history), Action::Retain);
        assert_eq!(classify("c", "new", Some(&target), &history), Action::Update);
    }

    #[test]
    fn test_classify_without_target_is_create() {
        let history = History::new(entries(&[("a", "A")]));
        assert_eq!(classify("a", "A", None, &history), Action::Create);
    }

    #[test]
    fn test_changed_source_is_update() {
        let history = History::new(entries(&[("a", "old")]));
        let target = Resource::new("fr", "fr.arb", entries(&[("a", "ancien")]));
        assert_eq!(classify("a", "new", Some(&target), &history), Action::Update);
    }

    #[test]
    fn test_statistic_sum_and_display() {
        let mut total = TranslationStatistic {
            create: 1,
            api_call: 1,
            ..Default::default()
        };
        total += TranslationStatistic {
            update: 2,
            cache_hit: 2,
            ..Default::default()
        };
        assert_eq!(total.create, 1);
        assert_eq!(total.update, 2);
        assert_eq!(
            total.to_string(),
            "create: 1, update: 2, skip: 0, delete: 0, api_call: 1, cache_hit: 2"
        );
    }

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_cancelled());
        handle.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_synced_history_keeps_pending_keys_of_failed_languages() {
        let source = Resource::new("en", "en.arb", entries(&[("a", "Hello"), ("b", "New"), ("c", "Same")]));
        let previous = History::new(entries(&[("a", "Hi"), ("c", "Same")]));
        let failures = vec![LanguageFailure {
            language_code: "ko".to_string(),
            error: Error::translation_failure("429"),
            pending_keys: vec!["a".to_string(), "b".to_string()],
        }];

        let synced = synced_history(&source, &previous, &failures);
        assert_eq!(synced, entries(&[("a", "Hi"), ("c", "Same")]));
        assert_eq!(synced_history(&source, &previous, &[]), source.entries);
    }

    #[test]
    fn test_placeholder_limit_becomes_translation_failure() {
        let error = as_translation_failure("long", Error::PlaceholderLimit { max: 11, found: 12 });
        match error {
            Error::TranslationFailure(message) => assert!(message.starts_with("long: ")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
