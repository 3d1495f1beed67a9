//! Title to file name mapping.
//!
//! Names are made safe for common filesystems, bounded in length, and made
//! unique among siblings in visit order: `Scene`, `Scene 2`, `Scene 3`.

use std::collections::HashSet;

use crate::domain::{ConvertOptions, UNTITLED};

/// Characters rejected by at least one common filesystem.
const ILLEGAL_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Device names Windows refuses as file stems.
const RESERVED_STEMS: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Smallest usable name budget; leaves room for an extension and a suffix.
pub const MIN_NAME_BYTES: usize = 16;

/// Names already used in one directory, compared case-insensitively.
#[derive(Debug, Default)]
pub struct SiblingNames {
    taken: HashSet<String>,
}

impl SiblingNames {
    /// Claim a name; returns false if a case-insensitive equal is taken.
    fn claim(&mut self, name: &str) -> bool {
        self.taken.insert(name.to_lowercase())
    }
}

/// Maps binder titles to file and directory names.
#[derive(Debug, Clone)]
pub struct PathMapper {
    max_bytes: usize,
    prefix_positions: bool,
}

impl PathMapper {
    /// Create a mapper from conversion options. Name budgets below
    /// `MIN_NAME_BYTES` are raised to it.
    #[must_use]
    pub fn new(options: &ConvertOptions) -> Self {
        Self {
            max_bytes: options.max_name_bytes.max(MIN_NAME_BYTES),
            prefix_positions: options.prefix_positions,
        }
    }

    /// Assign a unique name for `title` among `siblings`.
    ///
    /// `position` is the zero-based index among binder siblings and is only
    /// used when position prefixes are enabled. The returned name includes
    /// `extension` when given.
    pub fn assign(
        &self,
        title: &str,
        extension: Option<&str>,
        position: usize,
        siblings: &mut SiblingNames,
    ) -> String {
        let mut base = sanitize(title);
        if self.prefix_positions {
            base = format!("{:02} {base}", position + 1);
        }

        let budget = self
            .max_bytes
            .saturating_sub(extension.map_or(0, |ext| ext.len() + 1))
            .max(1);
        let stem = truncate(&base, budget);

        let with_extension = |stem: &str| match extension {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem.to_string(),
        };

        let first = with_extension(&stem);
        if siblings.claim(&first) {
            return first;
        }

        (2usize..)
            .map(|n| {
                let suffix = format!(" {n}");
                let head = truncate(&stem, budget.saturating_sub(suffix.len()));
                with_extension(&format!("{head}{suffix}"))
            })
            .find(|candidate| siblings.claim(candidate))
            .unwrap_or(first)
    }
}

/// Make a title safe to use as a file or directory name.
#[must_use]
pub fn sanitize(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if (c.is_control() && !c.is_whitespace()) || ILLEGAL_CHARS.contains(&c) {
                '-'
            } else {
                c
            }
        })
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    for word in replaced.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(word);
    }

    let mut name = String::with_capacity(collapsed.len());
    for c in collapsed.chars() {
        if c == '-' && name.ends_with('-') {
            continue;
        }
        name.push(c);
    }

    let name = name.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if name.is_empty() {
        return UNTITLED.to_string();
    }

    if RESERVED_STEMS.contains(&name.to_ascii_uppercase().as_str()) {
        return format!("{name}_");
    }

    name.to_string()
}

/// Cut a name to at most `max_bytes` bytes on a character boundary.
fn truncate(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end]
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PathMapper {
        PathMapper::new(&ConvertOptions::default())
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Act 1: Begin"), "Act 1- Begin");
        assert_eq!(sanitize("a/b\\c"), "a-b-c");
        assert_eq!(sanitize("  Many   spaces\there  "), "Many spaces here");
        assert_eq!(sanitize("What?? <No>"), "What- -No-");
        assert_eq!(sanitize("...hidden."), "hidden");
        assert_eq!(sanitize("   "), "Untitled");
        assert_eq!(sanitize("con"), "con_");
    }

    #[test]
    fn test_collisions_in_visit_order() {
        let mapper = mapper();
        let mut siblings = SiblingNames::default();

        assert_eq!(mapper.assign("Scene", Some("md"), 0, &mut siblings), "Scene.md");
        assert_eq!(mapper.assign("Scene", Some("md"), 1, &mut siblings), "Scene 2.md");
        assert_eq!(mapper.assign("scene", Some("md"), 2, &mut siblings), "scene 3.md");
        assert_eq!(mapper.assign("Scene 2", Some("md"), 3, &mut siblings), "Scene 2 2.md");
    }

    #[test]
    fn test_folder_and_file_do_not_collide() {
        let mapper = mapper();
        let mut siblings = SiblingNames::default();

        assert_eq!(mapper.assign("Notes", None, 0, &mut siblings), "Notes");
        assert_eq!(mapper.assign("Notes", Some("md"), 1, &mut siblings), "Notes.md");
        assert_eq!(mapper.assign("NOTES", Some("md"), 2, &mut siblings), "NOTES 2.md");
    }

    #[test]
    fn test_truncation_keeps_extension() {
        let mapper = mapper();
        let mut siblings = SiblingNames::default();

        let long = "é".repeat(200);
        let name = mapper.assign(&long, Some("md"), 0, &mut siblings);
        assert!(name.len() <= 255);
        assert!(name.ends_with(".md"));

        let second = mapper.assign(&long, Some("md"), 1, &mut siblings);
        assert!(second.len() <= 255);
        assert!(second.ends_with(" 2.md"));
    }

    #[test]
    fn test_tiny_budget_is_clamped() {
        let options = ConvertOptions {
            max_name_bytes: 3,
            ..ConvertOptions::default()
        };
        let mapper = PathMapper::new(&options);
        let mut siblings = SiblingNames::default();

        let first = mapper.assign("Chapter One", Some("md"), 0, &mut siblings);
        let second = mapper.assign("Chapter One", Some("md"), 1, &mut siblings);
        assert_eq!(first, "Chapter One.md");
        assert_eq!(second, "Chapter One 2.md");
        assert!(second.len() <= MIN_NAME_BYTES);
    }

    #[test]
    fn test_position_prefix() {
        let options = ConvertOptions {
            prefix_positions: true,
            ..ConvertOptions::default()
        };
        let mut siblings = SiblingNames::default();
        assert_eq!(
            PathMapper::new(&options).assign("Chapter 1", Some("md"), 0, &mut siblings),
            "01 Chapter 1.md"
        );
    }
}
