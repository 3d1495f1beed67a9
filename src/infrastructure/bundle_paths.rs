//! Scrivener bundle layout.
//!
//! Locates the binder descriptor and per-document resource files inside a
//! `.scriv` directory.

use std::path::{Component, Path, PathBuf};

use crate::domain::{ConvertError, Result};

/// Extension of the binder descriptor file.
const DESCRIPTOR_EXTENSION: &str = "scrivx";

/// Directory holding one subdirectory per document identifier.
const DATA_DIR: &str = "Files/Data";

/// Resource file names inside a document's data directory.
pub const CONTENT_FILE: &str = "content.rtf";
pub const SYNOPSIS_FILE: &str = "synopsis.txt";
pub const NOTES_FILE: &str = "notes.rtf";

/// Finds the `.scrivx` descriptor in the bundle root.
///
/// # Errors
/// Returns `BundleUnreadable` if the bundle cannot be listed or holds no descriptor.
pub fn find_descriptor(bundle: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(bundle)
        .map_err(|e| ConvertError::bundle(bundle, format!("cannot list bundle: {e}")))?;

    let mut descriptors: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(DESCRIPTOR_EXTENSION))
        })
        .collect();
    descriptors.sort();

    if descriptors.len() > 1 {
        tracing::warn!(
            count = descriptors.len(),
            "Several binder descriptors found, using the first"
        );
    }

    let descriptor = descriptors.into_iter().next().ok_or_else(|| {
        ConvertError::bundle(bundle, format!("no .{DESCRIPTOR_EXTENSION} file found"))
    })?;

    tracing::debug!("Found binder descriptor: {}", descriptor.display());
    Ok(descriptor)
}

/// Returns the data directory for a document identifier.
///
/// Identifiers that would escape the data directory yield `None`.
#[must_use]
pub fn resource_dir(bundle: &Path, id: &str) -> Option<PathBuf> {
    let mut components = Path::new(id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !id.contains(['/', '\\']) => {
            Some(bundle.join(DATA_DIR).join(id))
        }
        _ => None,
    }
}

/// Human-facing project name: the bundle directory without `.scriv`.
#[must_use]
pub fn project_name(bundle: &Path) -> String {
    bundle
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("Project")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_find_descriptor() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Novel.scrivx"), "<ScrivenerProject/>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let found = find_descriptor(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "Novel.scrivx");
    }

    #[test]
    fn test_missing_descriptor_is_bundle_error() {
        let dir = tempdir().unwrap();
        let err = find_descriptor(dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::BundleUnreadable { .. }));
    }

    #[test]
    fn test_resource_dir_rejects_escaping_ids() {
        let bundle = Path::new("/p/Novel.scriv");
        assert_eq!(
            resource_dir(bundle, "ABC-123"),
            Some(PathBuf::from("/p/Novel.scriv/Files/Data/ABC-123"))
        );
        assert_eq!(resource_dir(bundle, ""), None);
        assert_eq!(resource_dir(bundle, ".."), None);
        assert_eq!(resource_dir(bundle, "a/b"), None);
        assert_eq!(resource_dir(bundle, "a\\b"), None);
    }

    #[test]
    fn test_project_name() {
        assert_eq!(project_name(Path::new("/x/My Novel.scriv")), "My Novel");
    }
}
