//! Placeholder token matching and normalization.
//!
//! A raw token is `prefix + middle + suffix`, where the middle part is one or more
//! characters from `[0-9A-Za-z_]`. The canonical id is the middle part.
//!
//! Prefix and suffix are matched literally. Empty prefix and suffix are legal but
//! degenerate: every identifier-like word becomes a token and normalization is the
//! identity.

use std::collections::BTreeSet;

use regex::Regex;

use crate::error::Error;

/// Grammar of the middle (id) part of a token.
pub const ID_PATTERN_MIDDLE: &str = "[0-9A-Za-z_]+";

#[derive(Debug, Clone)]
pub struct TokenPattern {
    prefix: String,
    suffix: String,
    regex: Regex,
}

impl TokenPattern {
    /// Compiles the token pattern for the given literal prefix and suffix.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Result<Self, Error> {
        let prefix = prefix.into();
        let suffix = suffix.into();
        let regex = Regex::new(&format!(
            "{}{}{}",
            regex::escape(&prefix),
            ID_PATTERN_MIDDLE,
            regex::escape(&suffix)
        ))?;
        Ok(Self {
            prefix,
            suffix,
            regex,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns all non-overlapping raw tokens in `text`, in order of occurrence.
    pub fn find_tokens<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> {
        self.regex.find_iter(text).map(|m| m.as_str())
    }

    /// Returns the set of canonical ids of all tokens in `text`.
    pub fn find_ids(&self, text: &str) -> BTreeSet<String> {
        self.find_tokens(text)
            .map(|raw| self.normalize(raw).to_string())
            .collect()
    }

    /// Strips exactly one leading prefix and one trailing suffix from a raw token.
    ///
    /// The suffix is anchored at the end, so `prefix == suffix` is unambiguous.
    pub fn normalize<'r>(&self, raw: &'r str) -> &'r str {
        let without_prefix = raw.strip_prefix(self.prefix.as_str()).unwrap_or(raw);
        without_prefix
            .strip_suffix(self.suffix.as_str())
            .unwrap_or(without_prefix)
    }

    /// Combines an id with prefix and suffix into a raw token.
    pub fn complete_id(&self, id: &str) -> String {
        format!("{}{}{}", self.prefix, id, self.suffix)
    }
}
