//! Translation provider abstraction.
//!
//! The engine never talks to a network service directly. The CLI supplies
//! implementations of [`TranslationProvider`] for the free and the paid
//! Google endpoints; tests supply scripted in-memory ones.

use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::Error, language::Language};

/// Which provider entry point a sync goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationType {
    /// Unauthenticated and rate limited (roughly 100 requests per hour).
    #[default]
    Free,
    /// Requires an API key.
    Paid,
}

impl Display for TranslationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationType::Free => write!(f, "free"),
            TranslationType::Paid => write!(f, "paid"),
        }
    }
}

/// A machine translation backend.
///
/// Implementations receive text whose placeholders are already encoded and
/// should return the translation verbatim. Failures are reported as
/// [`Error::TranslationFailure`] carrying the provider's message.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translates `text` from `source` to `target`.
    async fn translate(&self, text: &str, source: &Language, target: &Language) -> Result<String, Error>;

    /// Name used in logs.
    fn provider_name(&self) -> &str;
}

/// The providers available to a run, one per [`TranslationType`].
pub struct ProviderSet {
    free: Box<dyn TranslationProvider>,
    paid: Option<Box<dyn TranslationProvider>>,
}

impl ProviderSet {
    pub fn new(free: Box<dyn TranslationProvider>, paid: Option<Box<dyn TranslationProvider>>) -> Self {
        ProviderSet { free, paid }
    }

    /// Returns the provider for `translation_type`.
    ///
    /// # Errors
    ///
    /// [`Error::ApiKeyRequired`] for [`TranslationType::Paid`] when no paid
    /// provider is configured.
    pub fn select(&self, translation_type: TranslationType) -> Result<&dyn TranslationProvider, Error> {
        match translation_type {
            TranslationType::Free => Ok(&*self.free),
            TranslationType::Paid => self.paid.as_deref().ok_or(Error::ApiKeyRequired),
        }
    }
}
