//! Core translation types: single records and per-locale collections.

use std::{collections::HashMap, fmt::Display};

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    pattern::TokenPattern,
};

/// The translation of a single id for a single locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    /// Canonical id this record translates.
    pub id: String,

    /// Translated text, or `None` if this locale has no translation.
    /// An empty string is never stored here.
    pub value: Option<String>,

    /// Value of the fallback locale, captured when the table was loaded.
    pub fallback: String,
}

impl TranslationRecord {
    /// Creates a record; an empty `value` means "untranslated".
    pub fn new(id: impl Into<String>, value: impl Into<String>, fallback: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: id.into(),
            value: if value.is_empty() { None } else { Some(value) },
            fallback: fallback.into(),
        }
    }

    /// Creates a record without value or fallback, as added for newly discovered ids.
    pub fn untranslated(id: impl Into<String>) -> Self {
        Self::new(id, "", "")
    }

    pub fn has_translation(&self) -> bool {
        self.value.is_some()
    }

    /// The value if present, else the fallback.
    pub fn effective_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.fallback)
    }

    /// The raw value as stored in the table (empty when untranslated).
    pub fn to_table_cell(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

impl Display for TranslationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.effective_value())
    }
}

/// All translation records of one locale, in table order.
///
/// Every id known to the owning [`crate::TranslationStore`] has a record here,
/// possibly an untranslated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    id: String,
    records: Vec<TranslationRecord>,
    index: HashMap<String, usize>,
}

impl Locale {
    /// Creates a locale without records.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Locale id such as `"en"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn records(&self) -> impl Iterator<Item = &TranslationRecord> {
        self.records.iter()
    }

    pub fn translation(&self, id: &str) -> Option<&TranslationRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Whether this locale has a record for `id`, even an untranslated one.
    pub fn has_translation_item(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of records with a non-empty value.
    pub fn number_of_translations(&self) -> usize {
        self.records.iter().filter(|r| r.has_translation()).count()
    }

    /// Ids without a value in this locale, in table order.
    pub fn untranslated_ids(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| !r.has_translation())
            .map(|r| r.id.as_str())
            .collect()
    }

    /// Appends a record, replacing nothing. Returns `false` if the id already exists.
    pub(crate) fn push(&mut self, record: TranslationRecord) -> bool {
        if self.index.contains_key(&record.id) {
            return false;
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Adds an untranslated record for `id` if it isn't already present.
    pub(crate) fn add_id(&mut self, id: &str) {
        self.push(TranslationRecord::untranslated(id));
    }

    /// Replaces every token in `text` by its translation in this locale.
    ///
    /// Each match is substituted exactly once; inserted values are never scanned again.
    /// Ids that only have a fallback value and ids unknown to this locale are reported to
    /// `sink`, once per distinct raw token in `text`. Unknown ids are replaced by the bare id.
    pub fn translate_string(
        &self,
        pattern: &TokenPattern,
        text: &str,
        location: Option<&str>,
        sink: &mut dyn DiagnosticSink,
    ) -> String {
        let mut resolved: HashMap<String, String> = HashMap::new();
        pattern
            .regex()
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let raw = &caps[0];
                if let Some(replacement) = resolved.get(raw) {
                    return replacement.clone();
                }
                let replacement = self.resolve(pattern, raw, location, &mut *sink);
                resolved.insert(raw.to_string(), replacement.clone());
                replacement
            })
            .into_owned()
    }

    fn resolve(
        &self,
        pattern: &TokenPattern,
        raw: &str,
        location: Option<&str>,
        sink: &mut dyn DiagnosticSink,
    ) -> String {
        let id = pattern.normalize(raw);
        match self.translation(id) {
            Some(record) => {
                if !record.has_translation() {
                    sink.report(Diagnostic::FallbackUsed {
                        id: id.to_string(),
                        locale: self.id.clone(),
                        fallback: record.fallback.clone(),
                    });
                }
                record.effective_value().to_string()
            }
            None => {
                sink.report(Diagnostic::UnresolvedToken {
                    id: id.to_string(),
                    raw: raw.to_string(),
                    location: location.map(str::to_string),
                });
                id.to_string()
            }
        }
    }
}
