//! Conversion orchestration.
//!
//! Walks the binder depth-first in child order, mirroring folders as
//! directories and documents as Markdown files. Per-item failures are recorded
//! and the walk continues; only an unreadable bundle or an unwritable
//! destination root stops the run.

use std::path::{Path, PathBuf};

use crate::domain::{
    BinderItem, ConversionReport, ConversionResult, ConvertOptions, ItemKind, ItemStatus, Result,
};
use crate::infrastructure::{find_descriptor, project_name, read_binder, ResourceLoader, VaultWriter};

use super::markdown::{render_document, NoteDocument};
use super::path_mapper::{sanitize, PathMapper, SiblingNames};
use super::rtf::rtf_to_text;

/// Extension of generated documents.
const MARKDOWN_EXTENSION: &str = "md";

/// Converts a Scrivener bundle into a vault with default options.
#[must_use]
pub fn convert(source: &Path, destination: &Path) -> ConversionReport {
    Converter::new(ConvertOptions::default()).run(source, destination)
}

/// Converts a Scrivener bundle into a vault with explicit options and an
/// optional progress hook, called after each item.
#[must_use]
pub fn convert_with(
    source: &Path,
    destination: &Path,
    options: ConvertOptions,
    progress: Option<&mut dyn FnMut(&ConversionResult)>,
) -> ConversionReport {
    let mut converter = Converter::new(options);
    converter.progress = progress;
    converter.run(source, destination)
}

/// A single conversion run.
pub struct Converter<'a> {
    options: ConvertOptions,
    mapper: PathMapper,
    progress: Option<&'a mut dyn FnMut(&ConversionResult)>,
}

impl<'a> Converter<'a> {
    /// Create a converter.
    #[must_use]
    pub fn new(options: ConvertOptions) -> Self {
        let mapper = PathMapper::new(&options);
        Self {
            options,
            mapper,
            progress: None,
        }
    }

    /// Attach a progress hook.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a mut dyn FnMut(&ConversionResult)) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Convert `source` into `destination`.
    pub fn run(mut self, source: &Path, destination: &Path) -> ConversionReport {
        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            "Starting conversion"
        );

        let root = match find_descriptor(source)
            .and_then(|descriptor| read_binder(&descriptor, &project_name(source)))
        {
            Ok(root) => root,
            Err(e) => {
                tracing::error!("{e}");
                return ConversionReport::fatal(source.to_path_buf(), e.to_string());
            }
        };

        let writer = VaultWriter::new(destination);
        if let Err(e) = writer.ensure_root() {
            tracing::error!("{e}");
            return ConversionReport::fatal(destination.to_path_buf(), e.to_string());
        }

        let mut walk = Walk {
            loader: ResourceLoader::new(source),
            writer,
            report: ConversionReport::default(),
            converter: &mut self,
        };
        walk.visit_children(&root, Path::new(""));

        let mut report = walk.report;
        report.finish();
        tracing::info!(
            converted = report.converted_count,
            skipped = report.skipped_count,
            failed = report.failed_count,
            "{}",
            report.message
        );
        report
    }
}

/// Traversal state for one run.
struct Walk<'c, 'a> {
    loader: ResourceLoader,
    writer: VaultWriter,
    report: ConversionReport,
    converter: &'c mut Converter<'a>,
}

impl Walk<'_, '_> {
    fn visit_children(&mut self, parent: &BinderItem, dir: &Path) {
        let mut siblings = SiblingNames::default();
        for (position, child) in parent.children.iter().enumerate() {
            self.visit(child, dir, position, &mut siblings);
        }
    }

    fn visit(&mut self, item: &BinderItem, dir: &Path, position: usize, siblings: &mut SiblingNames) {
        if item.is_trash() && !self.converter.options.include_trash {
            self.skip_tree(item, dir, "in trash");
            return;
        }

        let mapper = &self.converter.mapper;
        match &item.kind {
            ItemKind::Folder { .. } => {
                let relative = dir.join(mapper.assign(&item.title, None, position, siblings));
                match self.writer.create_dir(&relative) {
                    Ok(()) => {
                        self.report.folders_created += 1;
                        tracing::info!(path = %relative.display(), "Created folder");
                    }
                    Err(e) => {
                        tracing::warn!("{e}");
                        let result = self.emit(item, ItemStatus::Failed, &relative, Some(e.to_string()));
                        self.report.record_folder_failure(result);
                    }
                }
                self.visit_children(item, &relative);
            }
            ItemKind::Document => {
                let file_name = mapper.assign(&item.title, Some(MARKDOWN_EXTENSION), position, siblings);
                let relative = dir.join(file_name);
                let nested = (!item.children.is_empty())
                    .then(|| dir.join(mapper.assign(&item.title, None, position, siblings)));

                match self.convert_document(item, &relative) {
                    Ok(()) => {
                        tracing::info!(path = %relative.display(), "Converted document");
                        self.finish(item, ItemStatus::Converted, &relative, None);
                    }
                    Err(e) => {
                        tracing::warn!(id = %item.id, "{e}");
                        self.finish(item, ItemStatus::Failed, &relative, Some(e.to_string()));
                    }
                }

                if let Some(nested) = nested {
                    self.visit_children(item, &nested);
                }
            }
            ItemKind::Other { type_name } => {
                let reason = format!("unsupported item type {type_name}");
                tracing::debug!(id = %item.id, "Skipping: {reason}");
                let nested = (!item.children.is_empty())
                    .then(|| dir.join(mapper.assign(&item.title, None, position, siblings)));

                let location = nested
                    .clone()
                    .unwrap_or_else(|| dir.join(sanitize(&item.title)));
                self.finish(item, ItemStatus::Skipped, &location, Some(reason));

                if let Some(nested) = nested {
                    self.visit_children(item, &nested);
                }
            }
        }
    }

    fn convert_document(&self, item: &BinderItem, relative: &Path) -> Result<()> {
        let resources = self.loader.load(&item.id)?;

        let body = resources
            .content
            .as_deref()
            .map(rtf_to_text)
            .unwrap_or_default();
        let notes = resources.notes.as_deref().map(rtf_to_text);

        let markdown = render_document(&NoteDocument {
            title: &item.title,
            body: &body,
            synopsis: resources.synopsis.as_deref(),
            notes: notes.as_deref(),
            label: item.label.as_deref(),
            status: item.status.as_deref(),
            include_in_compile: item.include_in_compile,
        })?;

        self.writer.write_file(relative, &markdown)
    }

    /// Record the item and every descendant as skipped.
    fn skip_tree(&mut self, item: &BinderItem, dir: &Path, reason: &str) {
        let location = dir.join(sanitize(&item.title));
        self.finish(item, ItemStatus::Skipped, &location, Some(reason.to_string()));
        for child in &item.children {
            self.skip_tree(child, &location, reason);
        }
    }

    fn finish(&mut self, item: &BinderItem, status: ItemStatus, path: &Path, reason: Option<String>) {
        let result = self.emit(item, status, path, reason);
        self.report.record(result);
    }

    /// Build an outcome and pass it to the progress hook.
    fn emit(
        &mut self,
        item: &BinderItem,
        status: ItemStatus,
        path: &Path,
        reason: Option<String>,
    ) -> ConversionResult {
        let result = ConversionResult {
            id: item.id.clone(),
            title: item.title.clone(),
            status,
            output_path: PathBuf::from(path),
            reason,
        };
        if let Some(progress) = self.converter.progress.as_mut() {
            progress(&result);
        }
        result
    }
}
