//! Read-only statistics over a translation table.

use serde::Serialize;

use crate::store::TranslationStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocaleStats {
    pub locale: String,
    pub translated: usize,
    pub total: usize,
    pub completion_percent: f64,
    pub untranslated: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    pub ids: usize,
    pub locales: Vec<LocaleStats>,
}

impl StoreStats {
    pub fn collect(store: &TranslationStore) -> Self {
        let total = store.ids().len();
        let locales = store
            .locales()
            .iter()
            .map(|locale| {
                let translated = locale.number_of_translations();
                let percent = if total == 0 {
                    100.0
                } else {
                    (translated as f64) * 100.0 / (total as f64)
                };
                LocaleStats {
                    locale: locale.id().to_string(),
                    translated,
                    total,
                    completion_percent: (percent * 100.0).round() / 100.0,
                    untranslated: locale
                        .untranslated_ids()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                }
            })
            .collect();
        Self { ids: total, locales }
    }
}
