#![forbid(unsafe_code)]
//! Translation synchronization and validation for Flutter ARB files.
//!
//! One source ARB file is the source of truth. Every target language has its
//! own ARB file next to it, kept in sync through a machine translation
//! provider. Only keys that are new or changed since the last sync are
//! translated, translations are cached by content, and translated files can be
//! checked for lost keys, placeholders, brackets and HTML entities.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use arbsync::{
//!     ArbLayout, CancelFlag, FsResourceStore, HistoryStore, ProviderSet, ResourceStore,
//!     TracingNotifier, TranslationCache, TranslationProvider, TranslationType, Translator,
//! };
//!
//! # async fn run(free: Box<dyn TranslationProvider>) -> Result<(), arbsync::Error> {
//! let layout = ArbLayout::new("lib/l10n/intl_en.arb").with_prefix(Some("intl_".into()));
//! let store = FsResourceStore::new();
//! let source = store.load(&layout.source_path, layout.source_language()?.language_code)?;
//! let mut history = HistoryStore::open("lib/l10n/history.json")?;
//! let mut cache = TranslationCache::open("lib/l10n/cache.json")?;
//!
//! let providers = ProviderSet::new(free, None);
//! let mut translator = Translator::new(&store, &mut cache, &layout, TracingNotifier);
//! let run = translator
//!     .translate_all(
//!         &providers,
//!         TranslationType::Free,
//!         &source,
//!         &mut history,
//!         &["fr".to_string(), "ko".to_string()],
//!         &CancelFlag::new(),
//!     )
//!     .await?;
//! println!("{}", run.total());
//! # Ok(())
//! # }
//! ```
//!
//! # Components
//!
//! - [`store`]: reading and writing ARB files
//! - [`history`]: the source snapshot of the last sync
//! - [`cache`]: content-addressed translation cache
//! - [`placeholder`]: protects `{placeholders}` from the provider
//! - [`sync`]: the translation orchestrator
//! - [`statistics`]: read-only preview of a sync
//! - [`validation`]: structural checks and entity repair

pub mod cache;
pub mod error;
pub mod history;
pub mod language;
pub mod notify;
pub mod placeholder;
pub mod provider;
pub mod statistics;
pub mod store;
pub mod sync;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export most used types for easy consumption
pub use crate::{
    cache::{CacheKey, TranslationCache},
    error::{Error, ErrorCategory},
    history::{History, HistoryChange, HistoryStore},
    language::{ArbLayout, Language, SUPPORTED_LANGUAGES, language_by_code},
    notify::{Notifier, SilentNotifier, TracingNotifier},
    provider::{ProviderSet, TranslationProvider, TranslationType},
    statistics::{ActionStatistic, ApiStatistic, LanguageStatistic, compute_statistics},
    store::{FsResourceStore, ResourceStore, check_renamable},
    sync::{CancelFlag, LanguageFailure, SyncRun, TranslationStatistic, Translator, classify},
    traits::Parser,
    types::{Action, Entries, LOCALE_KEY, Resource},
    validation::{Fingerprint, InvalidType, ValidationFinding, Validator, findings, fingerprints},
};
