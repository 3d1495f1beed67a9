//! Application layer - conversion use cases.
//!
//! This layer contains the text conversion, naming, rendering, and the
//! orchestration that ties them to the bundle reader and vault writer.

pub mod converter;
pub mod formatter;
pub mod markdown;
pub mod path_mapper;
pub mod rtf;

pub use converter::{convert, convert_with, Converter};
pub use formatter::{format_outline_table, format_report_json, format_report_text, OutputFormat};
pub use markdown::{render_document, NoteDocument};
pub use path_mapper::{sanitize, PathMapper, SiblingNames};
pub use rtf::rtf_to_text;
