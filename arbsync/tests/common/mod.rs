#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use arbsync::{
    ArbLayout, CancelFlag, Entries, Error, FsResourceStore, Language, Resource, ResourceStore,
    TranslationProvider,
};
use async_trait::async_trait;
use tempfile::TempDir;

pub fn entries(pairs: &[(&str, &str)]) -> Entries {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Provider that prefixes the text with the target language code.
///
/// Fails on texts containing `fail_on` when the target is `fail_for`.
#[derive(Default)]
pub struct ScriptedProvider {
    pub calls: AtomicUsize,
    pub received: Mutex<Vec<String>>,
    pub fail_for: Option<(&'static str, &'static str)>,
    pub cancel_on_call: Option<CancelFlag>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(language_code: &'static str, text: &'static str) -> Self {
        ScriptedProvider {
            fail_for: Some((language_code, text)),
            ..Default::default()
        }
    }

    pub fn cancelling(flag: CancelFlag) -> Self {
        ScriptedProvider {
            cancel_on_call: Some(flag),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationProvider for ScriptedProvider {
    async fn translate(&self, text: &str, _source: &Language, target: &Language) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(text.to_string());
        if let Some(flag) = &self.cancel_on_call {
            flag.cancel();
        }
        if let Some((language, needle)) = self.fail_for {
            if target.language_code == language && text.contains(needle) {
                return Err(Error::translation_failure("Rate limit exceeded (429)"));
            }
        }
        Ok(format!("[{}] {}", target.language_code, text))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// Provider shared by reference between a `ProviderSet` and the test body.
pub struct SharedProvider(pub std::sync::Arc<ScriptedProvider>);

#[async_trait]
impl TranslationProvider for SharedProvider {
    async fn translate(&self, text: &str, source: &Language, target: &Language) -> Result<String, Error> {
        self.0.translate(text, source, target).await
    }

    fn provider_name(&self) -> &str {
        self.0.provider_name()
    }
}

/// A temporary l10n directory with an `en.arb` source file.
pub struct Project {
    pub dir: TempDir,
    pub layout: ArbLayout,
    pub store: FsResourceStore,
}

impl Project {
    pub fn new(source: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let source_path = dir.path().join("l10n").join("en.arb");
        let store = FsResourceStore::new();
        store.upsert(&source_path, &entries(source)).unwrap();
        Project {
            layout: ArbLayout::new(source_path),
            dir,
            store,
        }
    }

    pub fn source(&self) -> Resource {
        self.store.load(&self.layout.source_path, "en").unwrap()
    }

    pub fn path(&self, code: &str) -> PathBuf {
        self.layout.path_for_language(code).unwrap()
    }

    pub fn write_target(&self, code: &str, pairs: &[(&str, &str)]) {
        self.store.upsert(&self.path(code), &entries(pairs)).unwrap();
    }

    pub fn read_target(&self, code: &str) -> Entries {
        self.store.read(&self.path(code)).unwrap()
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.path().join("l10n").join("history.json")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.dir.path().join("l10n").join("cache.json")
    }
}
