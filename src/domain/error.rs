//! Domain-level error types for scrivener-vault.
//!
//! All errors are typed with `thiserror`. Only `BundleUnreadable` and a
//! `Write` on the destination root abort a conversion; the rest are scoped to
//! a single binder item and end up in the report.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a project or writing a vault.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Binder descriptor missing, unreadable, or malformed.
    #[error("Project bundle unreadable ({path}): {message}")]
    BundleUnreadable { path: PathBuf, message: String },

    /// A document's content, synopsis, or notes file exists but cannot be read.
    #[error("Failed to read resource {path}: {source}")]
    ResourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A destination file or directory could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Frontmatter could not be serialized.
    #[error("Failed to render frontmatter: {message}")]
    Frontmatter {
        message: String,
        #[source]
        source: Option<serde_yaml::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed outside of a conversion.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl ConvertError {
    /// Create a bundle error for the given descriptor or bundle path.
    pub fn bundle(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::BundleUnreadable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a resource read error.
    pub fn resource(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::ResourceRead {
            path: path.into(),
            source: err,
        }
    }

    /// Create a write error.
    pub fn write(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source: err,
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create a frontmatter serialization error.
    pub fn frontmatter(err: serde_yaml::Error) -> Self {
        Self::Frontmatter {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Result type alias using `ConvertError`.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_error_message() {
        let msg = ConvertError::bundle("Novel.scriv", "no .scrivx descriptor").to_string();
        assert!(msg.contains("Novel.scriv"));
        assert!(msg.contains("no .scrivx descriptor"));
    }

    #[test]
    fn test_messages_name_the_path() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let msg = ConvertError::write("Part One/Chapter 1.md", err).to_string();
        assert!(msg.contains("Part One/Chapter 1.md"));
        assert!(msg.contains("disk full"));
    }
}
