//! Source-comment records and description extraction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Source comments for one file, keyed by fully-qualified declaration path
/// (e.g. `.pkg.Message` or `.pkg.Message.field`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceInfo(BTreeMap<String, CommentBlock>);

impl SourceInfo {
    /// Create an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record comments for a declaration path.
    pub fn insert(&mut self, path: impl Into<String>, block: CommentBlock) {
        self.0.insert(path.into(), block);
    }

    /// Record comments for a declaration path, builder-style.
    pub fn with_comment(mut self, path: impl Into<String>, block: CommentBlock) -> Self {
        self.insert(path, block);
        self
    }

    /// Comments for a declaration path, if any were recorded.
    pub fn get(&self, path: &str) -> Option<&CommentBlock> {
        self.0.get(path)
    }

    /// Iterate over all recorded paths and their comments.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommentBlock)> {
        self.0.iter().map(|(path, block)| (path.as_str(), block))
    }

    /// Whether any comments were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The comments attached to one declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentBlock {
    /// Detached comment blocks above the declaration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_detached: Vec<String>,

    /// The comment immediately preceding the declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leading: Option<String>,

    /// The comment trailing the declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing: Option<String>,
}

impl CommentBlock {
    /// A block with only a leading comment.
    pub fn leading(text: impl Into<String>) -> Self {
        Self {
            leading: Some(text.into()),
            ..Self::default()
        }
    }

    /// Add a detached leading block.
    pub fn with_leading_detached(mut self, text: impl Into<String>) -> Self {
        self.leading_detached.push(text.into());
        self
    }

    /// Set the trailing comment.
    pub fn with_trailing(mut self, text: impl Into<String>) -> Self {
        self.trailing = Some(text.into());
        self
    }
}

/// Assemble a human-readable description from a declaration's comments.
///
/// Concatenates detached leading blocks, the immediate leading comment and
/// the trailing comment, each trimmed, blanks dropped, joined with blank
/// lines. Returns an empty string when no comments exist.
pub fn format_description(block: Option<&CommentBlock>) -> String {
    let Some(block) = block else {
        return String::new();
    };

    let mut parts: Vec<&str> = Vec::new();
    for detached in &block.leading_detached {
        let trimmed = detached.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }
    if let Some(leading) = &block.leading {
        let trimmed = leading.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }
    if let Some(trailing) = &block.trailing {
        let trimmed = trailing.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_comments_is_empty() {
        assert_eq!(format_description(None), "");
        assert_eq!(format_description(Some(&CommentBlock::default())), "");
    }

    #[test]
    fn test_leading_only() {
        let block = CommentBlock::leading(" The person's name. ");
        assert_eq!(format_description(Some(&block)), "The person's name.");
    }

    #[test]
    fn test_all_parts_in_order() {
        let block = CommentBlock::leading("Leading.")
            .with_leading_detached("Detached one.")
            .with_trailing("Trailing.");
        assert_eq!(
            format_description(Some(&block)),
            "Detached one.\n\nLeading.\n\nTrailing."
        );
    }

    #[test]
    fn test_blank_entries_dropped() {
        let block = CommentBlock {
            leading_detached: vec!["   ".to_string(), "Kept.".to_string()],
            leading: Some(String::new()),
            trailing: Some("End.".to_string()),
        };
        assert_eq!(format_description(Some(&block)), "Kept.\n\nEnd.");
    }

    #[test]
    fn test_source_info_lookup() {
        let info = SourceInfo::new().with_comment(".pkg.Person", CommentBlock::leading("A person"));
        assert!(info.get(".pkg.Person").is_some());
        assert!(info.get(".pkg.Other").is_none());
        assert!(!info.is_empty());
    }
}
