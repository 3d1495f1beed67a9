//! Domain layer - core types and errors.
//!
//! This layer contains pure domain models and error types
//! without any I/O.

pub mod error;
pub mod models;
pub mod options;

pub use error::{ConvertError, Result};
pub use models::{
    BinderItem, ConversionReport, ConversionResult, DocumentResources, Failure, FolderRole,
    ItemKind, ItemStatus, UNTITLED,
};
pub use options::{AppConfig, ConvertOptions, OutputConfig};
