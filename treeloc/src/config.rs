//! Tool configuration, stored as `translate.config` (JSON) in the base path.

use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// File name of the configuration inside the base path.
pub const CONFIG_FILE: &str = "translate.config";

/// Typed configuration. Every field has a default; see [`Config::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Start of a translation token.
    pub pattern_prefix: String,
    /// End of a translation token.
    pub pattern_suffix: String,
    /// Path of the translation table, relative to the base path.
    pub translation_file: String,
    /// Endings of files whose content is translated; everything else is copied.
    pub translated_file_endings: BTreeSet<String>,
    /// Encoding written to translated files, also used to read files that aren't UTF-8.
    pub target_encoding: String,
    /// Files whose path contains this string get a compressed sibling.
    pub files_to_gzip_pattern: String,
    /// Appended to a file name to name its compressed sibling.
    pub gzipped_file_ending: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern_prefix: "___".to_string(),
            pattern_suffix: "___".to_string(),
            translation_file: "translations.csv".to_string(),
            translated_file_endings: [".h", ".hpp", ".cpp", ".c", ".json", ".ino", ".html"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            target_encoding: "utf-8".to_string(),
            files_to_gzip_pattern: ".min.".to_string(),
            gzipped_file_ending: ".gz".to_string(),
        }
    }
}

impl Config {
    /// Names of all configuration fields, in the (sorted) order they are written.
    pub const FIELDS: [&'static str; 7] = [
        "files_to_gzip_pattern",
        "gzipped_file_ending",
        "pattern_prefix",
        "pattern_suffix",
        "target_encoding",
        "translated_file_endings",
        "translation_file",
    ];

    /// Loads the configuration from `base_path`, creating it with defaults if absent.
    ///
    /// Keys that aren't configuration fields are rejected rather than ignored, so a
    /// misspelled field fails loudly instead of silently taking its default.
    ///
    /// Fields missing from an existing file take their default value and the completed
    /// configuration is written back.
    pub fn load_or_create<P: AsRef<Path>>(base_path: P) -> Result<Self, Error> {
        let path = base_path.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            let config = Config::default();
            config.write_to(&path)?;
            tracing::info!(path = %path.display(), "created default configuration file");
            return Ok(config);
        }

        let reader = BufReader::new(File::open(&path)?);
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::Config(format!("`{}` is not a JSON object", path.display())))?;
        let missing: Vec<&str> = Self::FIELDS
            .into_iter()
            .filter(|field| !object.contains_key(*field))
            .collect();

        let config: Config = serde_json::from_value(value)?;
        config.validate()?;
        if !missing.is_empty() {
            let defaults = serde_json::to_value(Config::default())?;
            for field in &missing {
                tracing::warn!(field, default = %defaults[*field], "config field missing, using default");
            }
            config.write_to(&path)?;
        }
        Ok(config)
    }

    /// Parses a configuration from JSON text, applying defaults to missing fields.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON with sorted keys.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let value = serde_json::to_value(self)?;
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Resolves `target_encoding` to an encoding.
    ///
    /// Labels of encodings that can be decoded but not written (UTF-16, `replacement`)
    /// are rejected.
    pub fn encoding(&self) -> Result<&'static Encoding, Error> {
        let encoding = Encoding::for_label(self.target_encoding.as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(self.target_encoding.clone()))?;
        if encoding.output_encoding() != encoding {
            return Err(Error::Config(format!(
                "`target_encoding` `{}` can't be used to write files",
                self.target_encoding
            )));
        }
        Ok(encoding)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.translation_file.trim().is_empty() {
            return Err(Error::Config("`translation_file` must not be empty".to_string()));
        }
        if self.translated_file_endings.iter().any(String::is_empty) {
            return Err(Error::Config(
                "`translated_file_endings` must not contain an empty ending".to_string(),
            ));
        }
        if self.gzipped_file_ending.is_empty() {
            return Err(Error::Config("`gzipped_file_ending` must not be empty".to_string()));
        }
        self.encoding()?;
        Ok(())
    }
}
