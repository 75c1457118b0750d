//! The context shared by all operations: base path, configuration, compiled pattern and
//! the loaded translation table.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crate::{
    config::Config,
    diagnostics::DiagnosticSink,
    error::Error,
    store::TranslationStore,
    translator::{TranslationSummary, Translator},
};

/// A translation project rooted at a base path.
///
/// Relative paths passed to its operations are resolved against the base path.
#[derive(Debug, Clone)]
pub struct Project {
    base_path: PathBuf,
    config: Config,
    translator: Translator,
    store: TranslationStore,
}

impl Project {
    /// Opens the project at `base_path`, creating a default `translate.config` if needed.
    pub fn open<P: AsRef<Path>>(base_path: P) -> Result<Self, Error> {
        let config = Config::load_or_create(base_path.as_ref())?;
        Self::with_config(base_path, config)
    }

    /// Builds a project from an explicit configuration. The translation table is loaded
    /// if it exists; otherwise an empty store with a placeholder locale is used.
    pub fn with_config<P: AsRef<Path>>(base_path: P, config: Config) -> Result<Self, Error> {
        let base_path = base_path.as_ref().to_path_buf();
        let translator = Translator::from_config(&config)?;
        let store = TranslationStore::load(base_path.join(&config.translation_file))?
            .unwrap_or_else(TranslationStore::bootstrap);
        Ok(Self {
            base_path,
            config,
            translator,
            store,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Resolves a path relative to the base path.
    pub fn abspath<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.base_path.join(path)
    }

    pub fn translation_file(&self) -> PathBuf {
        self.abspath(&self.config.translation_file)
    }

    /// Translatable files in `folder` and its sub folders.
    pub fn translatable_files<P: AsRef<Path>>(&self, folder: P) -> Result<Vec<PathBuf>, Error> {
        self.translator.translatable_files(&self.abspath(folder))
    }

    /// Ids used in the translatable files in `folder` and its sub folders.
    pub fn find_ids<P: AsRef<Path>>(&self, folder: P) -> Result<BTreeSet<String>, Error> {
        self.translator.find_ids(&self.abspath(folder))
    }

    /// Sorted ids found in `folder`; with `only_untranslated`, only ids missing from the table.
    pub fn list_ids<P: AsRef<Path>>(
        &self,
        folder: P,
        only_untranslated: bool,
    ) -> Result<Vec<String>, Error> {
        Ok(self
            .find_ids(folder)?
            .into_iter()
            .filter(|id| !only_untranslated || !self.store.contains_id(id))
            .collect())
    }

    /// Adds every id found in `folder` to the table and writes the table.
    ///
    /// Ids are only ever added. Returns the ids that were new.
    pub fn gather_translations<P: AsRef<Path>>(&mut self, folder: P) -> Result<Vec<String>, Error> {
        let mut added = Vec::new();
        for id in self.find_ids(folder)? {
            if self.store.add_id(&id) {
                added.push(id);
            }
        }
        self.store_translations()?;
        tracing::info!(added = added.len(), total = self.store.ids().len(), "gathered translation ids");
        Ok(added)
    }

    pub fn store_translations(&self) -> Result<(), Error> {
        self.store.store(self.translation_file())
    }

    /// Translates a single file into `locale_id`.
    pub fn translate_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        locale_id: &str,
        input: P,
        output: Q,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Option<PathBuf>, Error> {
        let locale = self.store.get_locale(locale_id)?;
        self.translator
            .translate_file(locale, &self.abspath(input), &self.abspath(output), sink)
    }

    /// Copies `source_folder` into `target_folder`, translating into `locale_id`.
    pub fn translate<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        locale_id: &str,
        source_folder: P,
        target_folder: Q,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<TranslationSummary, Error> {
        let locale = self.store.get_locale(locale_id)?;
        self.translator.translate_tree(
            locale,
            &self.abspath(source_folder),
            &self.abspath(target_folder),
            sink,
        )
    }
}
