#![forbid(unsafe_code)]
//! Pattern-based localization of whole source trees.
//!
//! Placeholder tokens such as `___WELCOME_MSG___` embedded in arbitrary text files are
//! replaced by locale-specific strings from a CSV translation table while the tree is
//! copied to a target directory.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use treeloc::{Project, TracingSink};
//!
//! // Reads `translate.config` and `translations.csv` from the base path
//! let mut project = Project::open("firmware")?;
//!
//! // Add every id used below `src` to the table
//! project.gather_translations("src")?;
//!
//! // Write a German copy of `src` to `build/de`
//! project.translate("de", "src", "build/de", &mut TracingSink)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Translation table
//!
//! ```text
//! id,en,de
//! WELCOME_MSG,Hello,Hallo
//! GOODBYE_MSG,Bye,
//! ```
//!
//! The first locale column is the fallback: every id must have a value there, and it is
//! used (with a warning) wherever another locale's cell is empty.

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod pattern;
pub mod postprocess;
pub mod project;
pub mod stats;
pub mod store;
pub mod traits;
pub mod translator;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    classify::FileClassifier,
    config::Config,
    diagnostics::{Diagnostic, DiagnosticSink, TracingSink},
    error::Error,
    pattern::TokenPattern,
    postprocess::PostProcessor,
    project::Project,
    stats::{LocaleStats, StoreStats},
    store::TranslationStore,
    translator::{TranslationSummary, Translator},
    types::{Locale, TranslationRecord},
};
