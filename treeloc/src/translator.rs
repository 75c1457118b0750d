//! Translation of single files and whole directory trees.
//!
//! Translatable files are decoded, rewritten line by line through
//! [`Locale::translate_string`] and written in the target encoding. All other files are
//! copied byte for byte. Every written file is handed to the [`PostProcessor`].

use std::{
    borrow::Cow,
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
};

use encoding_rs::{Encoding, UTF_8};
use walkdir::WalkDir;

use crate::{
    classify::FileClassifier,
    config::Config,
    diagnostics::DiagnosticSink,
    error::Error,
    pattern::TokenPattern,
    postprocess::PostProcessor,
    types::Locale,
};

/// Counts of files handled by [`Translator::translate_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    pub translated: usize,
    pub copied: usize,
    pub compressed: usize,
}

#[derive(Debug, Clone)]
pub struct Translator {
    pattern: TokenPattern,
    classifier: FileClassifier,
    post_processor: PostProcessor,
    encoding: &'static Encoding,
}

impl Translator {
    pub fn new(
        pattern: TokenPattern,
        classifier: FileClassifier,
        post_processor: PostProcessor,
        encoding: &'static Encoding,
    ) -> Self {
        Self {
            pattern,
            classifier,
            post_processor,
            encoding,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(Self::new(
            TokenPattern::new(&config.pattern_prefix, &config.pattern_suffix)?,
            FileClassifier::new(config.translated_file_endings.iter().cloned()),
            PostProcessor::new(&config.files_to_gzip_pattern, &config.gzipped_file_ending),
            config.encoding()?,
        ))
    }

    pub fn pattern(&self) -> &TokenPattern {
        &self.pattern
    }

    pub fn classifier(&self) -> &FileClassifier {
        &self.classifier
    }

    pub fn post_processor(&self) -> &PostProcessor {
        &self.post_processor
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Reads a text file as UTF-8, or in the target encoding if it isn't valid UTF-8.
    pub fn read_text(&self, path: &Path) -> Result<String, Error> {
        let bytes = fs::read(path)?;
        if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(&bytes) {
            return Ok(text.into_owned());
        }
        self.encoding
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .map(Cow::into_owned)
            .ok_or_else(|| Error::Decode {
                path: path.to_path_buf(),
                encoding: self.encoding.name().to_string(),
            })
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<(), Error> {
        let (bytes, used, unmappable) = self.encoding.encode(text);
        if unmappable || used != self.encoding {
            return Err(Error::Encode {
                path: path.to_path_buf(),
                encoding: self.encoding.name().to_string(),
            });
        }
        fs::write(path, bytes)?;
        Ok(())
    }

    /// All translatable files below `dir`, sorted.
    pub fn translatable_files(&self, dir: &Path) -> Result<Vec<PathBuf>, Error> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            if entry.path().is_file() && self.classifier.is_translatable_path(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Canonical ids of all tokens in the translatable files below `dir`.
    pub fn find_ids(&self, dir: &Path) -> Result<BTreeSet<String>, Error> {
        let mut ids = BTreeSet::new();
        for file in self.translatable_files(dir)? {
            let text = self.read_text(&file)?;
            for line in text.split_inclusive('\n') {
                ids.extend(self.pattern.find_ids(line));
            }
        }
        Ok(ids)
    }

    /// Translates `source` into `target` and post-processes the result.
    ///
    /// Fails with [`Error::SelfOverwrite`] before writing anything when both paths name the
    /// same file. Returns the path of the compressed sibling, if one was written.
    pub fn translate_file(
        &self,
        locale: &Locale,
        source: &Path,
        target: &Path,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Option<PathBuf>, Error> {
        if is_same_file(source, target)? {
            return Err(Error::SelfOverwrite(source.to_path_buf()));
        }
        let text = self.read_text(source)?;
        let location = format!("file `{}`", source.display());
        let translated: String = text
            .split_inclusive('\n')
            .map(|line| {
                locale.translate_string(&self.pattern, line, Some(location.as_str()), &mut *sink)
            })
            .collect();
        self.write_text(target, &translated)?;
        tracing::debug!(source = %source.display(), target = %target.display(), "translated file");
        self.post_processor.post_process(target)
    }

    fn copy_file(&self, source: &Path, target: &Path) -> Result<Option<PathBuf>, Error> {
        if is_same_file(source, target)? {
            return Err(Error::SelfOverwrite(source.to_path_buf()));
        }
        fs::copy(source, target)?;
        tracing::debug!(source = %source.display(), target = %target.display(), "copied file");
        self.post_processor.post_process(target)
    }

    /// Mirrors `source_dir` into `target_dir`, translating translatable files into `locale`.
    ///
    /// Target paths are `target_dir` joined with each file's path relative to `source_dir`.
    /// Fails with [`Error::SelfOverwrite`] before walking when both directories resolve to
    /// the same location. When `target_dir` lies inside `source_dir` it is skipped during
    /// the walk. The first failing file aborts the walk; files written before it are kept.
    pub fn translate_tree(
        &self,
        locale: &Locale,
        source_dir: &Path,
        target_dir: &Path,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<TranslationSummary, Error> {
        let source_root = fs::canonicalize(source_dir)?;
        let target_root = resolve_path(target_dir)?;
        if source_root == target_root {
            return Err(Error::SelfOverwrite(source_dir.to_path_buf()));
        }
        let skip_target = target_root.starts_with(&source_root);
        let walker = WalkDir::new(source_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(skip_target
                    && entry.file_type().is_dir()
                    && fs::canonicalize(entry.path()).is_ok_and(|p| p == target_root))
            });

        let mut summary = TranslationSummary::default();
        for entry in walker {
            let entry = entry?;
            let source = entry.path();
            if !source.is_file() {
                continue;
            }
            let relative = source.strip_prefix(source_dir).map_err(|_| {
                io::Error::other(format!(
                    "`{}` is not below `{}`",
                    source.display(),
                    source_dir.display()
                ))
            })?;
            let target = target_dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            let compressed = if self.classifier.is_translatable_path(source) {
                summary.translated += 1;
                self.translate_file(locale, source, &target, sink)?
            } else {
                summary.copied += 1;
                self.copy_file(source, &target)?
            };
            if compressed.is_some() {
                summary.compressed += 1;
            }
        }
        tracing::info!(
            locale = locale.id(),
            translated = summary.translated,
            copied = summary.copied,
            compressed = summary.compressed,
            "translated tree"
        );
        Ok(summary)
    }
}

/// Whether `source` and `target` name the same file, however they are spelled.
fn is_same_file(source: &Path, target: &Path) -> io::Result<bool> {
    if source == target {
        return Ok(true);
    }
    if !target.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(source)? == fs::canonicalize(target)?)
}

/// Canonical form of `path`; components that don't exist yet are appended to the
/// canonical form of their nearest existing ancestor.
fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    if path.exists() {
        return fs::canonicalize(path);
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            Ok(resolve_path(parent)?.join(name))
        }
        _ => std::path::absolute(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostics::Diagnostic, store::TranslationStore, traits::Parser};
    use tempfile::TempDir;

    fn translator(encoding: &'static Encoding) -> Translator {
        Translator::new(
            TokenPattern::new("___", "___").unwrap(),
            FileClassifier::new([".cpp", ".h", ".js"]),
            PostProcessor::new(".min.", ".gz"),
            encoding,
        )
    }

    fn store() -> TranslationStore {
        TranslationStore::from_str("id,en,de\nGREETING,Hi,Hallo\nBYE,Bye,\n").unwrap()
    }

    #[test]
    fn test_translate_file_line_by_line() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("main.cpp");
        let target = temp_dir.path().join("out.cpp");
        fs::write(&source, "// ___GREETING___\r\nputs(\"___BYE___\");\nputs(\"___WHO___\");").unwrap();

        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let compressed = translator(UTF_8)
            .translate_file(store.get_locale("de").unwrap(), &source, &target, &mut sink)
            .unwrap();

        assert_eq!(compressed, None);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "// Hallo\r\nputs(\"Bye\");\nputs(\"WHO\");"
        );
        assert_eq!(sink.len(), 2);
        assert!(matches!(&sink[1], Diagnostic::UnresolvedToken { location: Some(l), .. } if l.contains("main.cpp")));
    }

    #[test]
    fn test_translate_file_refuses_self_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("main.cpp");
        fs::write(&source, "___GREETING___").unwrap();

        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let err = translator(UTF_8)
            .translate_file(store.get_locale("en").unwrap(), &source, &source, &mut sink)
            .unwrap_err();
        assert!(matches!(err, Error::SelfOverwrite(_)));
        assert_eq!(fs::read_to_string(&source).unwrap(), "___GREETING___");
    }

    #[test]
    fn test_non_utf8_source_is_read_in_target_encoding() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("legacy.h");
        let target = temp_dir.path().join("legacy_de.h");
        // "Grüße ___GREETING___" in windows-1252
        fs::write(&source, b"Gr\xfc\xdfe ___GREETING___\n").unwrap();

        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        translator(encoding_rs::WINDOWS_1252)
            .translate_file(store.get_locale("de").unwrap(), &source, &target, &mut sink)
            .unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"Gr\xfc\xdfe Hallo\n");
    }

    #[test]
    fn test_undecodable_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("broken.h");
        fs::write(&source, b"\xff\xfe\xfd").unwrap();
        let err = translator(UTF_8).read_text(&source).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_unencodable_output_fails() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.h");
        fs::write(&source, "日本 ___GREETING___\n").unwrap();
        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let err = translator(encoding_rs::WINDOWS_1252)
            .translate_file(
                store.get_locale("en").unwrap(),
                &source,
                &temp_dir.path().join("b.h"),
                &mut sink,
            )
            .unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
    }

    #[test]
    fn test_decode_only_target_encoding_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.h");
        let target = temp_dir.path().join("b.h");
        fs::write(&source, "___GREETING___\n").unwrap();
        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let err = translator(encoding_rs::UTF_16LE)
            .translate_file(store.get_locale("en").unwrap(), &source, &target, &mut sink)
            .unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn test_translate_tree_mirrors_structure() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("src");
        let target_dir = temp_dir.path().join("out");
        fs::create_dir_all(source_dir.join("web/js")).unwrap();
        fs::write(source_dir.join("main.cpp"), "___GREETING___\n").unwrap();
        fs::write(source_dir.join("web/js/app.min.js"), "alert('___BYE___')").unwrap();
        fs::write(source_dir.join("web/logo.png"), [0x89u8, b'P', b'N', b'G', 0xff]).unwrap();

        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let summary = translator(UTF_8)
            .translate_tree(store.get_locale("en").unwrap(), &source_dir, &target_dir, &mut sink)
            .unwrap();

        assert_eq!(
            summary,
            TranslationSummary {
                translated: 2,
                copied: 1,
                compressed: 1
            }
        );
        assert_eq!(fs::read_to_string(target_dir.join("main.cpp")).unwrap(), "Hi\n");
        assert_eq!(
            fs::read_to_string(target_dir.join("web/js/app.min.js")).unwrap(),
            "alert('Bye')"
        );
        assert!(target_dir.join("web/js/app.min.js.gz").exists());
        assert_eq!(
            fs::read(target_dir.join("web/logo.png")).unwrap(),
            fs::read(source_dir.join("web/logo.png")).unwrap()
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_translate_tree_into_itself_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("main.cpp"), "___GREETING___").unwrap();
        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let err = translator(UTF_8)
            .translate_tree(
                store.get_locale("en").unwrap(),
                temp_dir.path(),
                temp_dir.path(),
                &mut sink,
            )
            .unwrap_err();
        assert!(matches!(err, Error::SelfOverwrite(_)));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("main.cpp")).unwrap(),
            "___GREETING___"
        );
    }

    #[test]
    fn test_translate_tree_into_differently_spelled_self_fails() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("src");
        fs::create_dir_all(&source_dir).unwrap();
        let png = [0x89u8, 0x50, 0x4e, 0x47];
        fs::write(source_dir.join("logo.png"), png).unwrap();
        fs::write(source_dir.join("main.cpp"), "___GREETING___\n").unwrap();

        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let err = translator(UTF_8)
            .translate_tree(
                store.get_locale("en").unwrap(),
                &source_dir,
                &temp_dir.path().join("src/../src"),
                &mut sink,
            )
            .unwrap_err();
        assert!(matches!(err, Error::SelfOverwrite(_)));
        assert_eq!(fs::read(source_dir.join("logo.png")).unwrap(), png);
        assert_eq!(
            fs::read_to_string(source_dir.join("main.cpp")).unwrap(),
            "___GREETING___\n"
        );
    }

    #[test]
    fn test_copy_refuses_differently_spelled_self() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("sub")).unwrap();
        let source = temp_dir.path().join("logo.png");
        fs::write(&source, [1u8, 2, 3, 4]).unwrap();

        let err = translator(UTF_8)
            .copy_file(&source, &temp_dir.path().join("sub/../logo.png"))
            .unwrap_err();
        assert!(matches!(err, Error::SelfOverwrite(_)));
        assert_eq!(fs::read(&source).unwrap(), [1u8, 2, 3, 4]);
    }

    #[test]
    fn test_translate_file_refuses_differently_spelled_self() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("sub")).unwrap();
        let source = temp_dir.path().join("main.cpp");
        fs::write(&source, "___GREETING___").unwrap();

        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let err = translator(UTF_8)
            .translate_file(
                store.get_locale("de").unwrap(),
                &source,
                &temp_dir.path().join("sub/../main.cpp"),
                &mut sink,
            )
            .unwrap_err();
        assert!(matches!(err, Error::SelfOverwrite(_)));
        assert_eq!(fs::read_to_string(&source).unwrap(), "___GREETING___");
    }

    #[cfg(unix)]
    #[test]
    fn test_translate_tree_into_symlinked_self_fails() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("src");
        fs::create_dir_all(&source_dir).unwrap();
        fs::write(source_dir.join("data.bin"), [7u8, 7, 7]).unwrap();
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink(&source_dir, &link).unwrap();

        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let err = translator(UTF_8)
            .translate_tree(store.get_locale("en").unwrap(), &source_dir, &link, &mut sink)
            .unwrap_err();
        assert!(matches!(err, Error::SelfOverwrite(_)));
        assert_eq!(fs::read(source_dir.join("data.bin")).unwrap(), [7u8, 7, 7]);
    }

    #[test]
    fn test_translate_tree_skips_differently_spelled_nested_target() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("a.cpp"), "___GREETING___").unwrap();
        fs::write(temp_dir.path().join("z.png"), [1u8]).unwrap();

        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let summary = translator(UTF_8)
            .translate_tree(
                store.get_locale("de").unwrap(),
                temp_dir.path(),
                &temp_dir.path().join("sub/../out"),
                &mut sink,
            )
            .unwrap();
        assert_eq!(summary.translated, 1);
        assert_eq!(summary.copied, 1);
        let out = temp_dir.path().join("out");
        assert_eq!(fs::read_to_string(out.join("a.cpp")).unwrap(), "Hallo");
        assert!(!out.join("out").exists());
    }

    #[test]
    fn test_translate_tree_skips_nested_target() {
        let temp_dir = TempDir::new().unwrap();
        let target_dir = temp_dir.path().join("build");
        fs::create_dir_all(&target_dir).unwrap();
        fs::write(target_dir.join("stale.cpp"), "old").unwrap();
        fs::write(temp_dir.path().join("main.cpp"), "___GREETING___").unwrap();

        let store = store();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let summary = translator(UTF_8)
            .translate_tree(store.get_locale("de").unwrap(), temp_dir.path(), &target_dir, &mut sink)
            .unwrap();
        assert_eq!(summary.translated, 1);
        assert_eq!(fs::read_to_string(target_dir.join("main.cpp")).unwrap(), "Hallo");
        assert!(!target_dir.join("build").exists());
    }

    #[test]
    fn test_find_ids_only_scans_translatable_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("a.cpp"), "___A___ ___B___\n___A___").unwrap();
        fs::write(temp_dir.path().join("sub/b.h"), "___C___").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "___D___").unwrap();

        let ids = translator(UTF_8).find_ids(temp_dir.path()).unwrap();
        assert_eq!(
            ids.into_iter().collect::<Vec<_>>(),
            vec!["A".to_string(), "B".to_string(), "C".to_string()]
        );
    }
}
