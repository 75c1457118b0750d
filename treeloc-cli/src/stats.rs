use treeloc::{StoreStats, TranslationStore};

pub fn print_stats(store: &TranslationStore, json_output: bool) -> Result<(), serde_json::Error> {
    let stats = StoreStats::collect(store);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "Overall {} translation ids in {} locales",
        stats.ids,
        stats.locales.len()
    );
    println!("Translation status per locale");
    for locale in &stats.locales {
        println!(
            "{:10} {:>9.0}% {:10}",
            locale.locale, locale.completion_percent, locale.translated
        );
    }
    Ok(())
}

pub fn print_untranslated(store: &TranslationStore) {
    for locale in store.locales() {
        let untranslated = locale.untranslated_ids();
        if untranslated.is_empty() {
            println!("No untranslated ids for locale {}", locale.id());
        } else {
            println!("Untranslated ids for locale {}:", locale.id());
            println!(
                "{}",
                untranslated
                    .iter()
                    .map(|id| format!("{:?}", id))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
}
