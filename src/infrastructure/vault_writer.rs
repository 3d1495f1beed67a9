//! Destination vault writer.
//!
//! Only paths produced by this run are created or overwritten; nothing in the
//! vault is ever deleted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{ConvertError, Result};

/// Writes folders and Markdown files beneath a vault root.
pub struct VaultWriter {
    root: PathBuf,
}

impl VaultWriter {
    /// Create a writer for the given destination root.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Create the destination root if missing.
    ///
    /// # Errors
    /// Returns `Write` if the directory cannot be created.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| ConvertError::write(&self.root, e))
    }

    /// Create a directory (and its parents) relative to the root.
    ///
    /// # Errors
    /// Returns `Write` if the directory cannot be created.
    pub fn create_dir(&self, relative: &Path) -> Result<()> {
        let path = self.root.join(relative);
        fs::create_dir_all(&path).map_err(|e| ConvertError::write(relative, e))?;
        tracing::debug!(path = %relative.display(), "Created folder");
        Ok(())
    }

    /// Write a file relative to the root, creating parent directories and
    /// overwriting any existing file.
    ///
    /// # Errors
    /// Returns `Write` if the file or its parents cannot be written.
    pub fn write_file(&self, relative: &Path, content: &str) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConvertError::write(relative, e))?;
        }
        fs::write(&path, content).map_err(|e| ConvertError::write(relative, e))?;
        tracing::debug!(path = %relative.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_parents_and_overwrites() {
        let dir = tempdir().unwrap();
        let writer = VaultWriter::new(&dir.path().join("vault"));
        writer.ensure_root().unwrap();

        let rel = Path::new("Part One/Chapter 1.md");
        writer.write_file(rel, "first").unwrap();
        writer.write_file(rel, "second").unwrap();

        let written = fs::read_to_string(dir.path().join("vault").join(rel)).unwrap();
        assert_eq!(written, "second");
    }

    #[test]
    fn test_unrelated_files_are_left_alone() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keep.md"), "mine").unwrap();

        let writer = VaultWriter::new(dir.path());
        writer.create_dir(Path::new("Empty Folder")).unwrap();
        writer.write_file(Path::new("new.md"), "x").unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("keep.md")).unwrap(), "mine");
        assert!(dir.path().join("Empty Folder").is_dir());
    }

    #[test]
    fn test_write_over_directory_fails() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("taken.md")).unwrap();

        let err = VaultWriter::new(dir.path())
            .write_file(Path::new("taken.md"), "x")
            .unwrap_err();
        assert!(matches!(err, ConvertError::Write { .. }));
    }
}
