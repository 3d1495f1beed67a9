//! Markdown rendering for converted documents.
//!
//! Output is YAML frontmatter (fixed key order), the body verbatim, then an
//! optional author-notes callout.

use serde::Serialize;

use crate::domain::{ConvertError, Result};

/// Header line of the notes callout.
pub const NOTES_CALLOUT: &str = "> [!note] Author Notes";

/// Everything needed to render one document.
#[derive(Debug, Clone, Default)]
pub struct NoteDocument<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub synopsis: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub label: Option<&'a str>,
    pub status: Option<&'a str>,
    pub include_in_compile: bool,
}

/// Frontmatter keys, serialized in declaration order.
#[derive(Debug, Serialize)]
struct Frontmatter<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    synopsis: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    include_in_compile: bool,
}

/// Renders a document as Markdown with frontmatter.
///
/// # Errors
/// Returns `Frontmatter` if the YAML block cannot be serialized.
pub fn render_document(doc: &NoteDocument<'_>) -> Result<String> {
    let tags = [("label", doc.label), ("status", doc.status)]
        .into_iter()
        .filter_map(|(prefix, value)| value.map(|v| tag(prefix, v)))
        .collect();

    let fm = Frontmatter {
        title: doc.title,
        synopsis: doc.synopsis,
        tags,
        include_in_compile: doc.include_in_compile,
    };
    let yaml = serde_yaml::to_string(&fm).map_err(ConvertError::frontmatter)?;

    let mut lines: Vec<String> = vec!["---".to_string()];
    lines.push(yaml.trim_end_matches('\n').to_string());
    lines.push("---".to_string());
    lines.push(String::new());

    if !doc.body.is_empty() {
        lines.push(doc.body.to_string());
        lines.push(String::new());
    }

    if let Some(notes) = doc.notes {
        lines.push(NOTES_CALLOUT.to_string());
        lines.extend(notes.lines().map(|line| format!("> {line}")));
        lines.push(String::new());
    }

    Ok(lines.join("\n"))
}

/// Builds a `prefix/value` tag: lower-cased, whitespace runs become `-`.
fn tag(prefix: &str, value: &str) -> String {
    let words: Vec<&str> = value.split_whitespace().collect();
    format!("{prefix}/{}", words.join("-").to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontmatter(markdown: &str) -> serde_yaml::Value {
        let rest = markdown.strip_prefix("---\n").unwrap();
        let end = rest.find("\n---\n").unwrap();
        serde_yaml::from_str(&rest[..end]).unwrap()
    }

    #[test]
    fn test_full_document() {
        let md = render_document(&NoteDocument {
            title: "Chapter 1",
            body: "The rain fell.",
            synopsis: Some("John arrives."),
            notes: Some("add detail"),
            label: Some("first-draft"),
            status: Some("to-do"),
            include_in_compile: true,
        })
        .unwrap();

        assert_eq!(
            md,
            "---\n\
             title: Chapter 1\n\
             synopsis: John arrives.\n\
             tags:\n\
             - label/first-draft\n\
             - status/to-do\n\
             include_in_compile: true\n\
             ---\n\
             \n\
             The rain fell.\n\
             \n\
             > [!note] Author Notes\n\
             > add detail\n"
        );

        let fm = frontmatter(&md);
        assert_eq!(fm["title"], "Chapter 1");
        assert_eq!(fm["synopsis"], "John arrives.");
        assert_eq!(fm["tags"][0], "label/first-draft");
        assert_eq!(fm["tags"][1], "status/to-do");
        assert_eq!(fm["include_in_compile"], true);
    }

    #[test]
    fn test_key_order() {
        let md = render_document(&NoteDocument {
            title: "T",
            synopsis: Some("S"),
            label: Some("L"),
            ..NoteDocument::default()
        })
        .unwrap();

        let keys: Vec<&str> = md
            .lines()
            .filter_map(|line| line.split_once(':').map(|(key, _)| key))
            .filter(|key| !key.starts_with(['-', ' ', '>']))
            .collect();
        assert_eq!(keys, ["title", "synopsis", "tags", "include_in_compile"]);
    }

    #[test]
    fn test_minimal_document() {
        let md = render_document(&NoteDocument {
            title: "Empty",
            ..NoteDocument::default()
        })
        .unwrap();

        assert_eq!(md, "---\ntitle: Empty\ninclude_in_compile: false\n---\n");
        assert!(!md.contains("synopsis"));
        assert!(!md.contains("tags"));
        assert!(!md.contains(NOTES_CALLOUT));
    }

    #[test]
    fn test_tags_are_normalised() {
        let md = render_document(&NoteDocument {
            title: "T",
            label: Some("First  Draft"),
            status: Some("In Review, Again"),
            ..NoteDocument::default()
        })
        .unwrap();

        let fm = frontmatter(&md);
        let tags = fm["tags"].as_sequence().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], "label/first-draft");
        assert_eq!(tags[1], "status/in-review,-again");
    }

    #[test]
    fn test_escaping_round_trips_through_yaml() {
        let title = "He said: \"go\"\\now";
        let synopsis = "line one\nline two";
        let md = render_document(&NoteDocument {
            title,
            synopsis: Some(synopsis),
            ..NoteDocument::default()
        })
        .unwrap();

        let fm = frontmatter(&md);
        assert_eq!(fm["title"], title);
        assert_eq!(fm["synopsis"], synopsis);
    }

    #[test]
    fn test_ambiguous_scalars_stay_strings() {
        let md = render_document(&NoteDocument {
            title: "yes",
            synopsis: Some("42"),
            ..NoteDocument::default()
        })
        .unwrap();

        let fm = frontmatter(&md);
        assert_eq!(fm["title"], "yes");
        assert_eq!(fm["synopsis"], "42");
    }

    #[test]
    fn test_multiline_notes() {
        let md = render_document(&NoteDocument {
            title: "T",
            body: "Body",
            notes: Some("first\n\nthird"),
            ..NoteDocument::default()
        })
        .unwrap();
        assert!(md.ends_with("Body\n\n> [!note] Author Notes\n> first\n> \n> third\n"));
    }

    #[test]
    fn test_blank_notes_keep_header_only() {
        let md = render_document(&NoteDocument {
            title: "T",
            notes: Some(""),
            ..NoteDocument::default()
        })
        .unwrap();
        assert!(md.ends_with("---\n\n> [!note] Author Notes\n"));
        assert_eq!(md.matches(NOTES_CALLOUT).count(), 1);
    }
}
