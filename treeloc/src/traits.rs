//! Persistence of values that live in a single file, such as the translation table.

use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::error::Error;

/// Reading and writing a value from/to one file.
///
/// Implementors only provide [`Parser::from_reader`] and [`Parser::to_writer`].
///
/// # Example
///
/// ```rust,no_run
/// use treeloc::{TranslationStore, traits::Parser};
/// let store = TranslationStore::read_from("translations.csv")?;
/// store.write_to("backup/translations.csv")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser: Sized {
    /// Parse from any buffered reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>;

    /// Write to any writer.
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Parse the file at `path`.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Parse the file at `path`, or return `None` if it doesn't exist.
    fn read_if_exists<P: AsRef<Path>>(path: P) -> Result<Option<Self>, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::read_from(path).map(Some)
    }

    /// Write to the file at `path`, creating missing parent directories.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_reader(s.as_bytes())
    }

    /// Render into a string.
    fn to_text(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        String::from_utf8(out).map_err(|e| Error::table_error(e.to_string()))
    }
}
