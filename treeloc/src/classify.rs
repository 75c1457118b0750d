//! Decides which files have their content translated and which are copied verbatim.

use std::{collections::BTreeSet, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileClassifier {
    endings: BTreeSet<String>,
}

impl FileClassifier {
    pub fn new<I, S>(endings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endings: endings.into_iter().map(Into::into).collect(),
        }
    }

    pub fn endings(&self) -> impl Iterator<Item = &str> {
        self.endings.iter().map(String::as_str)
    }

    /// True iff the file name ends with one of the configured endings (case-sensitive).
    pub fn is_translatable(&self, file_name: &str) -> bool {
        self.endings.iter().any(|ending| file_name.ends_with(ending.as_str()))
    }

    /// Classifies a path by its final component. Paths without a UTF-8 file name are
    /// never translatable.
    pub fn is_translatable_path(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.is_translatable(name))
    }
}
