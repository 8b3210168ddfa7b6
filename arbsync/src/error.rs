//! All error types for the arbsync crate.
//!
//! Validation findings are not errors; they are returned as data from
//! [`crate::validation`]. Everything here is a genuine fault condition.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification used by callers to decide how far an error propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing configuration or bad arguments, raised before any mutating I/O.
    Precondition,
    /// File system or document format problems.
    Io,
    /// Translation provider failures, scoped to one target language.
    Provider,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("file {} not found", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("malformed JSON in {}: {source}", .path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("source ARB file path is not configured")]
    SourcePathRequired,

    #[error("no target languages are configured")]
    TargetLanguagesRequired,

    #[error("a Google API key is required for paid translation")]
    ApiKeyRequired,

    #[error("configuration not found: {0}")]
    ConfigNotFound(String),

    #[error("the language code of {0} is not valid")]
    InvalidArbFileName(String),

    #[error("{0} is an invalid language code")]
    InvalidLanguageCode(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("the number of parameters has exceeded the maximum ({max}), found {found}")]
    PlaceholderLimit { max: usize, found: usize },

    #[error("translation failed: {0}")]
    TranslationFailure(String),
}

impl Error {
    /// Creates a translation failure carrying the provider's message.
    pub fn translation_failure(message: impl Into<String>) -> Self {
        Error::TranslationFailure(message.into())
    }

    /// Creates an invalid-arguments error.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Error::InvalidArguments(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::FileNotFound { .. } | Error::MalformedJson { .. } | Error::Io(_) | Error::Parse(_) => {
                ErrorCategory::Io
            }
            Error::PlaceholderLimit { .. } | Error::TranslationFailure(_) => ErrorCategory::Provider,
            Error::SourcePathRequired
            | Error::TargetLanguagesRequired
            | Error::ApiKeyRequired
            | Error::ConfigNotFound(_)
            | Error::InvalidArbFileName(_)
            | Error::InvalidLanguageCode(_)
            | Error::InvalidArguments(_) => ErrorCategory::Precondition,
        }
    }

    /// Provider errors abort only the target language being processed.
    pub fn is_language_scoped(&self) -> bool {
        self.category() == ErrorCategory::Provider
    }
}
