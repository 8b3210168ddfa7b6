//! Structural checks of translated resources.
//!
//! Every translatable value is reduced to a [`Fingerprint`]. A target value
//! whose fingerprint disagrees with the source value's fingerprint is
//! reported as a [`ValidationFinding`]. Findings are data, never errors.

use std::{
    collections::VecDeque,
    fmt::Display,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use lazy_static::lazy_static;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::Error,
    language::ArbLayout,
    placeholder::count_params,
    store::ResourceStore,
    types::Resource,
};

/// Bracket glyphs counted by [`Fingerprint`]: ASCII plus full-width and CJK pairs.
pub const BRACKETS: &[char] = &[
    '(', ')', '{', '}', '[', ']', '（', '）', '｛', '｝', '［', '］', '【', '】', '「', '」', '『', '』', '〈',
    '〉', '《', '》', '〔', '〕', '〖', '〗', '〘', '〙', '〚', '〛',
];

lazy_static! {
    /// Named (`&amp;`) and numeric (`&#39;`, `&#x27;`) character references.
    static ref ENTITY_REGEX: Regex = Regex::new(r"&(?:[a-zA-Z]+|#[0-9]+|#[xX][0-9a-fA-F]+);").unwrap();
}

pub fn count_brackets(value: &str) -> usize {
    value.chars().filter(|c| BRACKETS.contains(c)).count()
}

pub fn count_entities(value: &str) -> usize {
    ENTITY_REGEX.find_iter(value).count()
}

/// Decodes every HTML character reference in `value`. Unknown names are kept.
pub fn decode_html_entities(value: &str) -> String {
    ENTITY_REGEX
        .replace_all(value, |caps: &regex::Captures| {
            let entity = &caps[0];
            match unescape_with(entity, resolve_html5_entity) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => entity.to_string(),
            }
        })
        .into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    pub value: String,
    pub param_count: usize,
    pub bracket_count: usize,
    pub entity_count: usize,
}

impl Fingerprint {
    pub fn of(value: &str) -> Self {
        Fingerprint {
            value: value.to_string(),
            param_count: count_params(value),
            bracket_count: count_brackets(value),
            entity_count: count_entities(value),
        }
    }
}

/// Fingerprints of the translatable entries of `resource`, in file order.
pub fn fingerprints(resource: &Resource) -> IndexMap<String, Fingerprint> {
    resource
        .translatable_entries()
        .map(|(key, value)| (key.clone(), Fingerprint::of(value)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidType {
    KeyNotFound,
    InvalidParameterCount,
    InvalidBracketCount,
    UndecodedEntityExists,
}

impl Display for InvalidType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            InvalidType::KeyNotFound => "key not found",
            InvalidType::InvalidParameterCount => "incorrect number of parameters",
            InvalidType::InvalidBracketCount => "incorrect number of brackets",
            InvalidType::UndecodedEntityExists => "undecoded HTML entity",
        };
        f.write_str(description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFinding {
    pub language_code: String,
    pub target_path: PathBuf,
    pub key: String,
    pub invalid_type: InvalidType,
    /// Fingerprint of the source value at `key`.
    pub source: Fingerprint,
}

/// Lazily yields the findings of every target, language by language.
///
/// Created by [`findings`]. Call [`findings`] again to start over.
pub struct Findings<'a> {
    source: IndexMap<String, Fingerprint>,
    source_language: &'a str,
    targets: std::slice::Iter<'a, Resource>,
    current: Option<(&'a Resource, IndexMap<String, Fingerprint>)>,
    next_key: usize,
    pending: VecDeque<ValidationFinding>,
}

/// Validates `targets` against `source`. Targets in the source language are skipped.
pub fn findings<'a>(source: &'a Resource, targets: &'a [Resource]) -> Findings<'a> {
    Findings {
        source: fingerprints(source),
        source_language: &source.language_code,
        targets: targets.iter(),
        current: None,
        next_key: 0,
        pending: VecDeque::new(),
    }
}

impl Findings<'_> {
    fn check(&mut self, target: &Resource, target_prints: &IndexMap<String, Fingerprint>, index: usize) {
        let Some((key, source)) = self.source.get_index(index) else {
            return;
        };
        let finding = |invalid_type| ValidationFinding {
            language_code: target.language_code.clone(),
            target_path: target.path.clone(),
            key: key.clone(),
            invalid_type,
            source: source.clone(),
        };

        let Some(print) = target_prints.get(key) else {
            self.pending.push_back(finding(InvalidType::KeyNotFound));
            return;
        };
        if print.entity_count > 0 {
            self.pending
                .push_back(finding(InvalidType::UndecodedEntityExists));
        }
        if print.param_count != source.param_count {
            self.pending
                .push_back(finding(InvalidType::InvalidParameterCount));
        } else if print.bracket_count != source.bracket_count {
            self.pending
                .push_back(finding(InvalidType::InvalidBracketCount));
        }
    }
}

impl Iterator for Findings<'_> {
    type Item = ValidationFinding;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(finding) = self.pending.pop_front() {
                return Some(finding);
            }

            match self.current.take() {
                Some((target, prints)) if self.next_key < self.source.len() => {
                    let index = self.next_key;
                    self.next_key += 1;
                    self.check(target, &prints, index);
                    self.current = Some((target, prints));
                }
                _ => {
                    let target = self
                        .targets
                        .find(|t| t.language_code != self.source_language)?;
                    debug!("Validating {}", target.file_name());
                    self.current = Some((target, fingerprints(target)));
                    self.next_key = 0;
                }
            }
        }
    }
}

/// Loads targets and repairs entity findings.
pub struct Validator<'a, S: ResourceStore> {
    store: &'a S,
    layout: &'a ArbLayout,
}

impl<'a, S: ResourceStore> Validator<'a, S> {
    pub fn new(store: &'a S, layout: &'a ArbLayout) -> Self {
        Validator { store, layout }
    }

    /// Reads the target file of each language. Missing files are skipped.
    pub fn load_targets(&self, languages: &[String]) -> Result<Vec<Resource>, Error> {
        let mut targets = Vec::with_capacity(languages.len());
        for code in languages {
            let path = self.layout.path_for_language(code)?;
            match self.store.load_if_exists(&path, code)? {
                Some(resource) => targets.push(resource),
                None => debug!("Skipping {}, file does not exist", path.display()),
            }
        }
        Ok(targets)
    }

    /// HTML-decodes the values of `keys` in `target`'s file and persists it.
    ///
    /// Returns the number of values that changed.
    pub fn decode_entities(&self, target: &Resource, keys: &[String]) -> Result<usize, Error> {
        self.decode_file(&target.path, keys)
    }

    /// Decodes every [`InvalidType::UndecodedEntityExists`] finding, one write per file.
    pub fn decode_all_entities(&self, findings: &[ValidationFinding]) -> Result<usize, Error> {
        let mut keys_by_file: IndexMap<&Path, Vec<String>> = IndexMap::new();
        for finding in findings
            .iter()
            .filter(|f| f.invalid_type == InvalidType::UndecodedEntityExists)
        {
            keys_by_file
                .entry(finding.target_path.as_path())
                .or_default()
                .push(finding.key.clone());
        }

        let mut total = 0;
        for (path, keys) in keys_by_file {
            total += self.decode_file(path, &keys)?;
        }
        Ok(total)
    }

    fn decode_file(&self, path: &Path, keys: &[String]) -> Result<usize, Error> {
        let mut entries = self.store.read(path)?;
        let mut decoded = 0;
        for key in keys {
            if let Some(value) = entries.get_mut(key) {
                let repaired = decode_html_entities(value);
                if repaired != *value {
                    *value = repaired;
                    decoded += 1;
                }
            }
        }
        if decoded > 0 {
            self.store.upsert(path, &entries)?;
            info!("Decoded {} values in {}", decoded, path.display());
        }
        Ok(decoded)
    }
}
