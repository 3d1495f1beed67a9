//! Per-document resource loading.
//!
//! Reads `content.rtf`, `synopsis.txt`, and `notes.rtf` from a document's
//! data directory. The bundle is only ever opened for reading.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{ConvertError, DocumentResources, Result};

use super::bundle_paths::{resource_dir, CONTENT_FILE, NOTES_FILE, SYNOPSIS_FILE};

/// Loads document resources from a project bundle.
pub struct ResourceLoader {
    bundle: PathBuf,
}

impl ResourceLoader {
    /// Create a loader rooted at the bundle directory.
    #[must_use]
    pub fn new(bundle: &Path) -> Self {
        Self {
            bundle: bundle.to_path_buf(),
        }
    }

    /// Load the resources for a document identifier.
    ///
    /// Missing files are not errors.
    ///
    /// # Errors
    /// Returns `ResourceRead` if a file exists but cannot be read, or the
    /// identifier cannot address a data directory.
    pub fn load(&self, id: &str) -> Result<DocumentResources> {
        let dir = resource_dir(&self.bundle, id).ok_or_else(|| {
            ConvertError::resource(
                self.bundle.join("Files/Data"),
                std::io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("invalid document identifier {id:?}"),
                ),
            )
        })?;

        let content = read_optional(&dir.join(CONTENT_FILE))?;
        let synopsis = read_optional(&dir.join(SYNOPSIS_FILE))?
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string());
        let notes = read_optional(&dir.join(NOTES_FILE))?;

        tracing::debug!(
            id,
            content = content.is_some(),
            synopsis = synopsis.is_some(),
            notes = notes.is_some(),
            "Loaded document resources"
        );

        Ok(DocumentResources {
            content,
            synopsis,
            notes,
        })
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConvertError::resource(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn data_dir(bundle: &Path, id: &str) -> PathBuf {
        let dir = bundle.join("Files/Data").join(id);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_everything_is_not_an_error() {
        let bundle = tempdir().unwrap();
        let resources = ResourceLoader::new(bundle.path()).load("NOPE").unwrap();
        assert_eq!(resources, DocumentResources::default());
    }

    #[test]
    fn test_loads_all_three() {
        let bundle = tempdir().unwrap();
        let dir = data_dir(bundle.path(), "A");
        std::fs::write(dir.join(CONTENT_FILE), b"{\\rtf1 Body}").unwrap();
        std::fs::write(dir.join(SYNOPSIS_FILE), "  John arrives.\n").unwrap();
        std::fs::write(dir.join(NOTES_FILE), b"{\\rtf1 Note}").unwrap();

        let resources = ResourceLoader::new(bundle.path()).load("A").unwrap();
        assert_eq!(resources.content.as_deref(), Some(&b"{\\rtf1 Body}"[..]));
        assert_eq!(resources.synopsis.as_deref(), Some("John arrives."));
        assert!(resources.notes.is_some());
    }

    #[test]
    fn test_blank_synopsis_is_present() {
        let bundle = tempdir().unwrap();
        let dir = data_dir(bundle.path(), "A");
        std::fs::write(dir.join(SYNOPSIS_FILE), "\n").unwrap();

        let resources = ResourceLoader::new(bundle.path()).load("A").unwrap();
        assert_eq!(resources.synopsis.as_deref(), Some(""));
    }

    #[test]
    fn test_unreadable_content_is_resource_error() {
        let bundle = tempdir().unwrap();
        let dir = data_dir(bundle.path(), "A");
        std::fs::create_dir(dir.join(CONTENT_FILE)).unwrap();

        let err = ResourceLoader::new(bundle.path()).load("A").unwrap_err();
        assert!(matches!(err, ConvertError::ResourceRead { .. }));
    }

    #[test]
    fn test_unreadable_notes_is_resource_error() {
        let bundle = tempdir().unwrap();
        let dir = data_dir(bundle.path(), "A");
        std::fs::write(dir.join(CONTENT_FILE), r"{\rtf1 body}").unwrap();
        std::fs::create_dir(dir.join(NOTES_FILE)).unwrap();

        let err = ResourceLoader::new(bundle.path()).load("A").unwrap_err();
        match err {
            ConvertError::ResourceRead { path, .. } => assert!(path.ends_with(NOTES_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unreadable_synopsis_is_resource_error() {
        let bundle = tempdir().unwrap();
        let dir = data_dir(bundle.path(), "A");
        std::fs::create_dir(dir.join(SYNOPSIS_FILE)).unwrap();

        let err = ResourceLoader::new(bundle.path()).load("A").unwrap_err();
        assert!(matches!(err, ConvertError::ResourceRead { .. }));
    }

    #[test]
    fn test_invalid_identifier() {
        let bundle = tempdir().unwrap();
        let err = ResourceLoader::new(bundle.path()).load("../x").unwrap_err();
        assert!(matches!(err, ConvertError::ResourceRead { .. }));
    }
}
