//! Binder descriptor (`.scrivx`) reader.
//!
//! The descriptor is validated with a streaming pass first (root element,
//! nesting depth, well-formedness), then deserialized into raw structs and
//! mapped onto the domain tree.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use crate::domain::{BinderItem, ConvertError, FolderRole, ItemKind, Result};

/// Expected root element of a Scrivener project descriptor.
const ROOT_ELEMENT: &[u8] = b"ScrivenerProject";

/// Nesting limit for the descriptor.
const MAX_DEPTH: usize = 512;

/// Label and status names that mean "unset".
const UNSET_NAMES: &[&str] = &["No Label", "No Status"];

#[derive(Debug, Deserialize)]
struct RawProject {
    #[serde(rename = "Binder")]
    binder: Option<RawBinder>,
    #[serde(rename = "LabelSettings", default)]
    label_settings: Option<RawSettings>,
    #[serde(rename = "StatusSettings", default)]
    status_settings: Option<RawSettings>,
}

#[derive(Debug, Deserialize, Default)]
struct RawBinder {
    #[serde(rename = "BinderItem", default)]
    items: Vec<RawBinderItem>,
}

#[derive(Debug, Deserialize)]
struct RawBinderItem {
    #[serde(rename = "@UUID", default)]
    uuid: String,
    #[serde(rename = "@Type", default)]
    item_type: Option<String>,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "MetaData", default)]
    metadata: Option<RawMetaData>,
    #[serde(rename = "Children", default)]
    children: Option<RawBinder>,
}

#[derive(Debug, Deserialize, Default)]
struct RawMetaData {
    #[serde(rename = "IncludeInCompile", default)]
    include_in_compile: Option<String>,
    #[serde(rename = "LabelID", default)]
    label_id: Option<String>,
    #[serde(rename = "StatusID", default)]
    status_id: Option<String>,
}

/// `LabelSettings` / `StatusSettings`. Entries sit either directly under the
/// settings element or inside a `Labels` / `Statuses` list.
#[derive(Debug, Deserialize, Default)]
struct RawSettings {
    #[serde(rename = "Label", alias = "Status", default)]
    entries: Vec<RawEntry>,
    #[serde(rename = "Labels", alias = "Statuses", default)]
    list: Option<RawEntryList>,
}

#[derive(Debug, Deserialize, Default)]
struct RawEntryList {
    #[serde(rename = "Label", alias = "Status", default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "@ID", default)]
    id: String,
    #[serde(rename = "$text", default)]
    name: String,
}

impl RawSettings {
    fn into_table(self) -> HashMap<String, String> {
        self.entries
            .into_iter()
            .chain(self.list.into_iter().flat_map(|l| l.entries))
            .map(|e| (e.id.trim().to_string(), e.name.trim().to_string()))
            .filter(|(id, name)| {
                !id.is_empty() && !name.is_empty() && !UNSET_NAMES.contains(&name.as_str())
            })
            .collect()
    }
}

/// Resolves label and status identifiers to their display names.
struct Lookup {
    labels: HashMap<String, String>,
    statuses: HashMap<String, String>,
}

/// Reads the binder descriptor at `path` and returns the synthetic root folder.
///
/// # Errors
/// Returns `BundleUnreadable` if the file is missing, unreadable, or malformed.
pub fn read_binder(path: &Path, project_name: &str) -> Result<BinderItem> {
    let xml = std::fs::read_to_string(path)
        .map_err(|e| ConvertError::bundle(path, format!("cannot read descriptor: {e}")))?;

    parse_binder(&xml, project_name).map_err(|message| ConvertError::bundle(path, message))
}

/// Parses descriptor text into the binder tree.
///
/// Top-level binder items become children of a folder titled `project_name`.
pub fn parse_binder(xml: &str, project_name: &str) -> std::result::Result<BinderItem, String> {
    let xml = xml.trim_start_matches('\u{feff}');
    validate_structure(xml)?;

    let raw: RawProject =
        quick_xml::de::from_str(xml).map_err(|e| format!("malformed descriptor: {e}"))?;

    let binder = raw
        .binder
        .ok_or_else(|| "descriptor has no Binder element".to_string())?;

    let lookup = Lookup {
        labels: raw
            .label_settings
            .map(RawSettings::into_table)
            .unwrap_or_default(),
        statuses: raw
            .status_settings
            .map(RawSettings::into_table)
            .unwrap_or_default(),
    };

    let mut root = BinderItem::new(
        String::new(),
        project_name,
        ItemKind::Folder {
            role: FolderRole::Plain,
        },
    );
    root.children = binder
        .items
        .into_iter()
        .map(|item| build_item(item, &lookup))
        .collect();

    tracing::info!(
        items = root.walk().count() - 1,
        documents = root.document_count(),
        "Parsed binder"
    );

    Ok(root)
}

/// Streaming pass: the document must be well-formed, bounded in depth, and
/// rooted at `ScrivenerProject`.
fn validate_structure(xml: &str) -> std::result::Result<(), String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if !seen_root {
                    if e.local_name().as_ref() != ROOT_ELEMENT {
                        return Err(unexpected_root(e.local_name().as_ref()));
                    }
                    seen_root = true;
                }
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(format!("descriptor nesting exceeds {MAX_DEPTH} levels"));
                }
            }
            Ok(Event::Empty(ref e)) if !seen_root => {
                if e.local_name().as_ref() != ROOT_ELEMENT {
                    return Err(unexpected_root(e.local_name().as_ref()));
                }
                seen_root = true;
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }

    if !seen_root {
        return Err("descriptor has no root element".to_string());
    }
    if depth != 0 {
        return Err(format!("descriptor ends with {depth} unclosed element(s)"));
    }
    Ok(())
}

fn unexpected_root(name: &[u8]) -> String {
    format!(
        "unexpected root element <{}>",
        String::from_utf8_lossy(name)
    )
}

fn build_item(raw: RawBinderItem, lookup: &Lookup) -> BinderItem {
    let kind = ItemKind::from_type_name(raw.item_type.as_deref().unwrap_or("Text"));
    let mut item = BinderItem::new(raw.uuid, raw.title.unwrap_or_default(), kind);

    if let Some(meta) = raw.metadata {
        item.include_in_compile = meta
            .include_in_compile
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("yes"));
        item.label = resolve(meta.label_id.as_deref(), &lookup.labels);
        item.status = resolve(meta.status_id.as_deref(), &lookup.statuses);
    }

    item.children = raw
        .children
        .map(|c| c.items)
        .unwrap_or_default()
        .into_iter()
        .map(|child| build_item(child, lookup))
        .collect();

    item
}

fn resolve(id: Option<&str>, table: &HashMap<String, String>) -> Option<String> {
    id.map(str::trim)
        .filter(|id| !id.is_empty())
        .and_then(|id| table.get(id))
        .cloned()
}
