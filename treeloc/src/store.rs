//! The translation table across all locales and ids, with CSV persistence.
//!
//! Layout of the table:
//!
//! ```text
//! id,en,de
//! WELCOME_MSG,Hello,Hallo
//! GOODBYE_MSG,Bye,
//! ```
//!
//! The first locale column is the fallback locale. Every id must have a value there.
//! Empty cells are untranslated and stay empty when the table is written back.

use std::{
    collections::HashSet,
    io::{BufRead, Write},
    path::Path,
};

use crate::{
    error::Error,
    traits::Parser,
    types::{Locale, TranslationRecord},
};

/// Name of the placeholder locale used when no translation file exists yet.
pub const BOOTSTRAP_LOCALE: &str = "[add locale]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationStore {
    ids: Vec<String>,
    locales: Vec<Locale>,
}

impl TranslationStore {
    /// Creates a store and checks that ids are unique, that the fallback (first) locale
    /// translates every id and that every locale has exactly one record per id.
    pub fn new(ids: Vec<String>, locales: Vec<Locale>) -> Result<Self, Error> {
        let fallback = locales
            .first()
            .ok_or_else(|| Error::table_error("at least one locale is required"))?;
        let mut seen = HashSet::new();
        if let Some(dup) = ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(Error::DuplicateId(dup.clone()));
        }
        if let Some(locale) = locales.iter().find(|l| l.records().count() != ids.len()) {
            return Err(Error::table_error(format!(
                "locale `{}` has {} entries for {} ids",
                locale.id(),
                locale.records().count(),
                ids.len()
            )));
        }
        for id in &ids {
            if !fallback.translation(id).is_some_and(|r| r.has_translation()) {
                return Err(Error::MissingFallback {
                    locale: fallback.id().to_string(),
                    id: id.clone(),
                });
            }
            if let Some(locale) = locales.iter().find(|l| !l.has_translation_item(id)) {
                return Err(Error::table_error(format!(
                    "locale `{}` has no entry for id `{}`",
                    locale.id(),
                    id
                )));
            }
        }
        Ok(Self { ids, locales })
    }

    /// An empty store with a single placeholder locale.
    pub fn bootstrap() -> Self {
        Self {
            ids: Vec::new(),
            locales: vec![Locale::new(BOOTSTRAP_LOCALE)],
        }
    }

    /// Loads the table at `path`, or returns `None` if there is no such file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>, Error> {
        Self::read_if_exists(path)
    }

    /// Writes the table to `path`, creating parent directories as needed.
    pub fn store<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        self.write_to(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), ids = self.ids.len(), "stored translation table");
        Ok(())
    }

    /// Ids in table order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn locale_ids(&self) -> Vec<&str> {
        self.locales.iter().map(Locale::id).collect()
    }

    pub fn fallback_locale(&self) -> &Locale {
        &self.locales[0]
    }

    pub fn has_locale(&self, locale_id: &str) -> bool {
        self.locales.iter().any(|l| l.id() == locale_id)
    }

    pub fn get_locale(&self, locale_id: &str) -> Result<&Locale, Error> {
        self.locales
            .iter()
            .find(|l| l.id() == locale_id)
            .ok_or_else(|| Error::UnknownLocale(locale_id.to_string()))
    }

    /// Looks up the record of `id` in the given locale.
    pub fn translate(&self, locale_id: &str, id: &str) -> Result<&TranslationRecord, Error> {
        let locale = self.get_locale(locale_id)?;
        locale.translation(id).ok_or_else(|| {
            Error::table_error(format!("locale `{}` has no entry for id `{}`", locale_id, id))
        })
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.fallback_locale().has_translation_item(id)
    }

    /// Number of ids translated in the fallback locale.
    pub fn number_of_translations(&self) -> usize {
        self.fallback_locale().number_of_translations()
    }

    /// Appends `id` with an untranslated record in every locale, if it is new.
    ///
    /// Returns whether the id was added.
    pub fn add_id(&mut self, id: &str) -> bool {
        if self.contains_id(id) {
            return false;
        }
        self.ids.push(id.to_string());
        for locale in &mut self.locales {
            locale.add_id(id);
        }
        true
    }
}

impl Parser for TranslationStore {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows = rdr.records();

        let header = rows
            .next()
            .ok_or_else(|| Error::table_error("missing header row"))??;
        let locale_ids: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
        if locale_ids.is_empty() {
            return Err(Error::table_error("the header row names no locale"));
        }
        let mut seen_locales = HashSet::new();
        if let Some(dup) = locale_ids.iter().find(|l| !seen_locales.insert(l.as_str())) {
            return Err(Error::table_error(format!("duplicate locale column `{}`", dup)));
        }

        let mut ids = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut locales: Vec<Locale> = locale_ids.iter().map(Locale::new).collect();
        for row in rows {
            let row = row?;
            let Some(id) = row.get(0) else {
                continue;
            };
            let cells: Vec<&str> = row.iter().skip(1).collect();
            if cells.len() > locale_ids.len() {
                return Err(Error::table_error(format!(
                    "row `{}` has {} values but there are only {} locales",
                    id,
                    cells.len(),
                    locale_ids.len()
                )));
            }
            if !seen_ids.insert(id.to_string()) {
                return Err(Error::DuplicateId(id.to_string()));
            }
            ids.push(id.to_string());

            let fallback = cells.first().copied().unwrap_or_default();
            for (i, locale) in locales.iter_mut().enumerate() {
                let value = cells.get(i).copied().unwrap_or_default();
                locale.push(TranslationRecord::new(id, value, fallback));
            }
        }

        Self::new(ids, locales)
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new().from_writer(writer);

        let mut header = vec!["id"];
        header.extend(self.locale_ids());
        wtr.write_record(&header)?;

        for id in &self.ids {
            let mut row = vec![id.as_str()];
            for locale in &self.locales {
                row.push(locale.translation(id).map_or("", |r| r.to_table_cell()));
            }
            wtr.write_record(&row)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
