use indexmap::IndexMap;

use crate::core::{
    data::{DocumentationComment, DocumentationTag},
    program::{RawTag, SymbolId, TagText, TypeProvider},
};

/// Normalized documentation of `sym`.
pub fn aggregate<P: TypeProvider + ?Sized>(provider: &P, sym: SymbolId) -> DocumentationComment {
    DocumentationComment {
        description: provider.documentation_comment(sym).replace("\r\n", "\n"),
        tags: merge_tags(provider.documentation_tags(sym)),
    }
}

/// Fold tags into a map keyed by name, joining repeated values with `\n`.
pub fn merge_tags(tags: &[RawTag]) -> IndexMap<String, DocumentationTag> {
    tags.iter().fold(IndexMap::new(), |mut merged, tag| {
        let text = tag_text(tag);
        merged
            .entry(tag.name.clone())
            .and_modify(|existing: &mut DocumentationTag| {
                existing.value.push('\n');
                existing.value.push_str(&text);
            })
            .or_insert_with(|| DocumentationTag::new(&tag.name, text));
        merged
    })
}

fn tag_text(tag: &RawTag) -> String {
    match &tag.text {
        Some(TagText::Text(text)) => text.trim().to_string(),
        Some(TagText::Parts(parts)) => parts.join(" ").trim().to_string(),
        None => String::new(),
    }
}
