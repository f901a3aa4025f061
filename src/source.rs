//! Access to the text of a source file.
//!
//! The builder only ever sees already-read text; [`LocalFile::open`] is the
//! single place that touches the filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::fingerprint;

/// A source file whose contents are available in memory.
pub trait SourceFile: Send + Sync {
    /// Path recorded in the file model.
    fn path(&self) -> &str;

    fn contents(&self) -> &str;

    /// Content fingerprint; lowercase hex SHA-256 of [`contents`](Self::contents).
    fn hash(&self) -> String {
        fingerprint(self.contents())
    }
}

/// A file read from disk.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: String,
    contents: String,
}

impl LocalFile {
    /// Read `path` eagerly.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        Ok(Self {
            path: path.display().to_string(),
            contents,
        })
    }
}

impl SourceFile for LocalFile {
    fn path(&self) -> &str {
        &self.path
    }

    fn contents(&self) -> &str {
        &self.contents
    }
}

/// Source text that never lived on disk, e.g. in tests or editors. It is
/// still a complete source file with a path and is built like a
/// [`LocalFile`].
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    path: String,
    contents: String,
}

impl InMemoryFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

impl SourceFile for InMemoryFile {
    fn path(&self) -> &str {
        &self.path
    }

    fn contents(&self) -> &str {
        &self.contents
    }
}

/// Something a caller would like to build a model from.
pub enum Candidate<'a> {
    /// An already loaded source file.
    File(&'a dyn SourceFile),
    /// A path that has not been read yet.
    Path(PathBuf),
    /// Bare text with no file identity.
    Text(&'a str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_in_memory_hash_is_sha256() {
        let file = InMemoryFile::new("a.php", "");
        assert_eq!(
            file.hash(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_local_file_reads_contents() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "<?php\nfunction f() {{}}\n").unwrap();

        let file = LocalFile::open(tmp.path()).unwrap();
        assert_eq!(file.contents(), "<?php\nfunction f() {}\n");
        assert_eq!(file.path(), tmp.path().display().to_string());
        assert_eq!(file.hash(), InMemoryFile::new("x", file.contents()).hash());
    }

    #[test]
    fn test_missing_local_file() {
        assert!(LocalFile::open("/definitely/not/here.php").is_err());
    }
}
