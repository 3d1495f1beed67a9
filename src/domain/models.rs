//! Domain models for Scrivener projects and conversion outcomes.
//!
//! Binder items and resources are read-only views over the source bundle.
//! Results and reports are built fresh for every run.

use std::path::PathBuf;

use serde::Serialize;

/// Title used when a binder item has none.
pub const UNTITLED: &str = "Untitled";

/// Special folders Scrivener creates at the top of every binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderRole {
    /// A folder the author created.
    #[default]
    Plain,
    /// The manuscript (Draft) folder.
    Draft,
    /// The research folder.
    Research,
    /// The trash folder.
    Trash,
}

/// What a binder node is, as declared by its `Type` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    /// Container mirrored as a directory.
    Folder { role: FolderRole },
    /// Rich-text document converted to Markdown.
    Document,
    /// Anything else (PDF, image, web archive...). Never written.
    Other { type_name: String },
}

impl ItemKind {
    /// Map a binder `Type` attribute to a kind.
    #[must_use]
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name {
            "Folder" => Self::Folder {
                role: FolderRole::Plain,
            },
            "DraftFolder" => Self::Folder {
                role: FolderRole::Draft,
            },
            "ResearchFolder" => Self::Folder {
                role: FolderRole::Research,
            },
            "TrashFolder" => Self::Folder {
                role: FolderRole::Trash,
            },
            "Text" => Self::Document,
            other => Self::Other {
                type_name: other.to_string(),
            },
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Folder {
                role: FolderRole::Plain,
            } => write!(f, "Folder"),
            Self::Folder {
                role: FolderRole::Draft,
            } => write!(f, "Draft"),
            Self::Folder {
                role: FolderRole::Research,
            } => write!(f, "Research"),
            Self::Folder {
                role: FolderRole::Trash,
            } => write!(f, "Trash"),
            Self::Document => write!(f, "Document"),
            Self::Other { type_name } => write!(f, "{type_name}"),
        }
    }
}

/// A node in the project outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinderItem {
    /// Stable identifier, unique within the project.
    pub id: String,
    /// Display title, never empty.
    pub title: String,
    /// Node kind.
    pub kind: ItemKind,
    /// Children in descriptor order.
    pub children: Vec<BinderItem>,
    /// Resolved label name.
    pub label: Option<String>,
    /// Resolved status name.
    pub status: Option<String>,
    /// Whether the item is part of the compiled manuscript.
    pub include_in_compile: bool,
}

impl BinderItem {
    /// Create an item with no metadata and no children.
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: ItemKind) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            title
        };

        Self {
            id: id.into(),
            title,
            kind,
            children: Vec::new(),
            label: None,
            status: None,
            include_in_compile: false,
        }
    }

    /// Whether this node is the trash folder.
    #[must_use]
    pub const fn is_trash(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Folder {
                role: FolderRole::Trash
            }
        )
    }

    /// Iterate over this item and all descendants, depth-first in child order.
    pub fn walk(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let item = stack.pop()?;
            stack.extend(item.children.iter().rev());
            Some(item)
        })
    }

    /// Count documents in this subtree.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.walk()
            .filter(|i| matches!(i.kind, ItemKind::Document))
            .count()
    }
}

/// Resources stored next to a document in the bundle.
///
/// `None` means the file does not exist; `Some` with empty contents means it
/// exists but is blank. Rendering treats the two differently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentResources {
    /// Raw rich-text body.
    pub content: Option<Vec<u8>>,
    /// Plain-text synopsis, trimmed.
    pub synopsis: Option<String>,
    /// Raw rich-text notes.
    pub notes: Option<Vec<u8>>,
}

/// Outcome of a single binder item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Converted,
    Skipped,
    Failed,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Converted => write!(f, "Converted"),
            Self::Skipped => write!(f, "Skipped"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Per-item outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    /// Binder identifier.
    pub id: String,
    /// Binder title.
    pub title: String,
    /// What happened.
    pub status: ItemStatus,
    /// Path relative to the vault root (or to the binder position when skipped).
    pub output_path: PathBuf,
    /// Why the item was skipped or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A single failure entry in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Path relative to the vault root.
    pub relative_path: PathBuf,
    /// Human-readable cause.
    pub reason: String,
}

/// Aggregate outcome of a conversion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    /// True when the bundle could be read, even if some documents failed.
    pub success: bool,
    /// Documents written.
    pub converted_count: usize,
    /// Items deliberately not written.
    pub skipped_count: usize,
    /// Items that failed.
    pub failed_count: usize,
    /// Directories created for binder folders.
    pub folders_created: usize,
    /// Failures in visit order.
    pub failures: Vec<Failure>,
    /// Short summary for display.
    pub message: String,
    /// Every item outcome in visit order.
    pub results: Vec<ConversionResult>,
    /// Failed items that were folders, not documents.
    #[serde(skip)]
    failed_folders: usize,
}

impl ConversionReport {
    /// Report for a run that could not start.
    #[must_use]
    pub fn fatal(relative_path: PathBuf, reason: String) -> Self {
        Self {
            success: false,
            message: reason.clone(),
            failures: vec![Failure {
                relative_path,
                reason,
            }],
            failed_count: 1,
            ..Self::default()
        }
    }

    /// Record an item outcome.
    pub fn record(&mut self, result: ConversionResult) {
        match result.status {
            ItemStatus::Converted => self.converted_count += 1,
            ItemStatus::Skipped => self.skipped_count += 1,
            ItemStatus::Failed => {
                self.failed_count += 1;
                self.failures.push(Failure {
                    relative_path: result.output_path.clone(),
                    reason: result.reason.clone().unwrap_or_default(),
                });
            }
        }
        self.results.push(result);
    }

    /// Record a folder that could not be created. It is listed as a
    /// failure but not counted as a document.
    pub fn record_folder_failure(&mut self, result: ConversionResult) {
        self.failed_folders += 1;
        self.record(result);
    }

    /// Mark the run complete and compose the summary message.
    pub fn finish(&mut self) {
        self.success = true;

        let mut message = format!(
            "Converted {} of {} documents",
            self.converted_count,
            self.converted_count + self.failed_count - self.failed_folders
        );
        if self.skipped_count > 0 {
            message.push_str(&format!(", {} skipped", self.skipped_count));
        }
        if self.failed_count > 0 {
            message.push_str(&format!(", {} failed", self.failed_count));
        }
        self.message = message;
    }
}
