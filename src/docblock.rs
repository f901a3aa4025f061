//! Doc-comment parsing.
//!
//! The model builder never looks inside comments itself; it hands the
//! selected token's text to a [`DocBlockParser`].

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::DocBlockError;
use crate::model::{DocBlock, Tag};

lazy_static! {
    static ref TAG_LINE: Regex = Regex::new(r"^@([\p{L}\p{N}_\-\\:]+)\s*(.*)$").expect("tag pattern is valid");
}

/// Turns the raw text of a documentation comment into a [`DocBlock`].
pub trait DocBlockParser: Send + Sync {
    fn parse(&self, comment: &str) -> Result<DocBlock, DocBlockError>;
}

/// Splits a `/** ... */` comment into summary, description and tags.
///
/// The summary ends at the first blank line or at the first line ending
/// with a period. Everything up to the first tag is the description. A tag
/// runs until the next tag, continuation lines joined with `\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDocBlockParser;

impl StandardDocBlockParser {
    pub fn new() -> Self {
        Self
    }

    /// Remove `/**`, `*/` and the leading `*` gutter of each line.
    fn strip(comment: &str) -> Result<Vec<String>, DocBlockError> {
        let trimmed = comment.trim();
        let inner = trimmed
            .strip_prefix("/**")
            .and_then(|s| s.strip_suffix("*/"))
            .ok_or_else(|| DocBlockError::NotADocBlock(trimmed.chars().take(40).collect()))?;

        let lines = inner
            .lines()
            .map(|line| {
                let line = line.trim();
                let line = line.strip_prefix('*').unwrap_or(line);
                line.strip_prefix(' ').unwrap_or(line).trim_end().to_string()
            })
            .collect::<Vec<_>>();

        // drop blank lines around the content
        let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
        let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
        Ok(lines[start..end].to_vec())
    }
}

impl DocBlockParser for StandardDocBlockParser {
    fn parse(&self, comment: &str) -> Result<DocBlock, DocBlockError> {
        let lines = Self::strip(comment)?;

        let tag_start = lines
            .iter()
            .position(|l| TAG_LINE.is_match(l))
            .unwrap_or(lines.len());
        let (text, tag_lines) = lines.split_at(tag_start);

        let mut summary = Vec::new();
        let mut rest = text;
        for (i, line) in text.iter().enumerate() {
            if line.is_empty() {
                rest = &text[i..];
                break;
            }
            summary.push(line.as_str());
            rest = &text[i + 1..];
            if line.ends_with('.') {
                break;
            }
        }

        let description = rest
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        let mut tags: Vec<Tag> = Vec::new();
        for line in tag_lines {
            if let Some(caps) = TAG_LINE.captures(line) {
                tags.push(Tag {
                    name: caps[1].to_string(),
                    body: caps[2].trim().to_string(),
                });
            } else if let Some(last) = tags.last_mut() {
                if !line.is_empty() {
                    if !last.body.is_empty() {
                        last.body.push('\n');
                    }
                    last.body.push_str(line.trim());
                }
            }
        }

        Ok(DocBlock {
            summary: summary.join(" "),
            description,
            tags,
        })
    }
}
