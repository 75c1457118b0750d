//! Post-processing of written files: gzip siblings for minified artifacts.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use flate2::{Compression, write::GzEncoder};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessor {
    marker: String,
    compressed_suffix: String,
}

impl PostProcessor {
    /// `marker` selects files by a substring of their path; `compressed_suffix` is appended
    /// to the path to name the compressed sibling.
    pub fn new(marker: impl Into<String>, compressed_suffix: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            compressed_suffix: compressed_suffix.into(),
        }
    }

    pub fn qualifies(&self, path: &Path) -> bool {
        path.to_string_lossy().contains(self.marker.as_str())
    }

    /// Path of the compressed sibling of `path`.
    pub fn compressed_path(&self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(&self.compressed_suffix);
        PathBuf::from(name)
    }

    /// Writes a gzip sibling of `path` if it qualifies, returning the sibling's path.
    pub fn post_process(&self, path: &Path) -> Result<Option<PathBuf>, Error> {
        if !self.qualifies(path) {
            return Ok(None);
        }
        let target = self.compressed_path(path);
        let mut source = BufReader::new(File::open(path)?);
        let mut encoder = GzEncoder::new(BufWriter::new(File::create(&target)?), Compression::default());
        io::copy(&mut source, &mut encoder)?;
        encoder.finish()?.flush()?;
        tracing::debug!(path = %target.display(), "wrote compressed file");
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_marked_file_gets_gzip_sibling() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.min.js");
        let content = b"function f(){return \"Hallo\"}\n".repeat(20);
        std::fs::write(&path, &content).unwrap();

        let post = PostProcessor::new(".min.", ".gz");
        let sibling = post.post_process(&path).unwrap().unwrap();
        assert_eq!(sibling, temp_dir.path().join("app.min.js.gz"));

        let mut decoded = Vec::new();
        GzDecoder::new(File::open(&sibling).unwrap())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, content);
    }

    #[test]
    fn test_unmarked_file_is_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.js");
        std::fs::write(&path, "x").unwrap();

        let post = PostProcessor::new(".min.", ".gz");
        assert_eq!(post.post_process(&path).unwrap(), None);
        assert!(!temp_dir.path().join("app.js.gz").exists());
    }

    #[test]
    fn test_marker_matches_directories_too() {
        let post = PostProcessor::new(".min.", ".gz");
        assert!(post.qualifies(Path::new("dist/x.min.d/app.js")));
    }
}
