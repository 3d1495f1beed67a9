//! Scrivener Vault - convert Scrivener projects into Markdown vaults.
//!
//! Reads a `.scriv` bundle (binder descriptor plus per-document rich-text
//! resources) and mirrors its binder as a directory tree of Markdown files
//! with YAML frontmatter. The source bundle is never modified.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = scrivener_vault::convert(Path::new("Novel.scriv"), Path::new("vault"));
//! println!("{}", report.message);
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{convert, convert_with, rtf_to_text, Converter};
pub use domain::{
    BinderItem, ConversionReport, ConversionResult, ConvertError, ConvertOptions, ItemStatus,
    Result,
};
