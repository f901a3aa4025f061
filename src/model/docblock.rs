//! Parsed documentation block descriptor.

use serde::Serialize;

/// A single `@name body` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// Tag name without the `@`.
    pub name: String,
    /// Everything after the tag name, continuation lines joined with `\n`.
    pub body: String,
}

/// Structured form of a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DocBlock {
    pub summary: String,
    pub description: String,
    pub tags: Vec<Tag>,
}

impl DocBlock {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }

    /// All tags with the given name, in source order.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> {
        self.tags.iter().filter(move |t| t.name == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags_named(name).next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.description.is_empty() && self.tags.is_empty()
    }
}
