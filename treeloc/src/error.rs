//! All error types for the treeloc crate.
//!
//! These are returned from all fallible operations (table loading, configuration, tree translation, etc.).
//! Substitution warnings are not errors; see [`crate::diagnostics`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid token pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("unknown encoding `{0}`")]
    UnknownEncoding(String),

    #[error("the translation file has the wrong format: {0}")]
    Table(String),

    #[error("duplicate translation id `{0}`")]
    DuplicateId(String),

    #[error("fallback locale `{locale}` has no translation for id `{id}`")]
    MissingFallback { locale: String, id: String },

    #[error("no such locale `{0}`")]
    UnknownLocale(String),

    #[error("can't overwrite file `{}` during translation", .0.display())]
    SelfOverwrite(PathBuf),

    #[error("cannot decode `{}` as {encoding}", .path.display())]
    Decode { path: PathBuf, encoding: String },

    #[error("cannot encode `{}` as {encoding}", .path.display())]
    Encode { path: PathBuf, encoding: String },
}

impl Error {
    /// Creates a new table structure error
    pub fn table_error(message: impl Into<String>) -> Self {
        Error::Table(message.into())
    }

    /// Whether the error stems from a malformed translation table or configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::CsvParse(_)
                | Error::Json(_)
                | Error::InvalidPattern(_)
                | Error::Config(_)
                | Error::UnknownEncoding(_)
                | Error::Table(_)
                | Error::DuplicateId(_)
        )
    }
}
