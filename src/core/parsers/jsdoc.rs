//! JSDoc block parsing.
//!
//! Splits the body of a `/** ... */` comment into its free-text description and the
//! list of `@tag` entries, in source order. Tag text is kept raw; merging repeated
//! tags and trimming is the job of the documentation aggregator.

use crate::core::program::RawTag;

/// Description and tags of one JSDoc block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsDoc {
    pub description: String,
    pub tags: Vec<RawTag>,
}

impl JsDoc {
    /// Parse a comment body as swc reports it (without `/*` and `*/`).
    pub fn parse(comment: &str) -> Self {
        let body = comment.strip_prefix('*').unwrap_or(comment);

        let mut description: Vec<&str> = Vec::new();
        // (name, lines of text)
        let mut tags: Vec<(&str, Vec<&str>)> = Vec::new();

        for line in body.lines().map(clean_line) {
            if let Some((name, rest)) = split_tag(line) {
                tags.push((name, vec![rest]));
            } else if let Some((_, lines)) = tags.last_mut() {
                lines.push(line);
            } else {
                description.push(line);
            }
        }

        let tags = tags
            .into_iter()
            .map(|(name, lines)| {
                let text = lines.join("\n");
                let text = text.trim();
                if text.is_empty() {
                    RawTag::bare(name)
                } else {
                    RawTag::new(name, text)
                }
            })
            .collect();

        Self {
            description: description.join("\n").trim().to_string(),
            tags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.tags.is_empty()
    }
}

/// Remove the decorative leading `*` (and one space after it) of a comment line.
fn clean_line(line: &str) -> &str {
    let trimmed = line.trim_start();
    let content = match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => trimmed,
    };
    content.trim_end()
}

/// Split `@name rest` into its tag name and the remaining text.
fn split_tag(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix('@')?;
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some((&rest[..end], rest[end..].trim_start()))
}
