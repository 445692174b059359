//! Selection of the most useful plain-text body of a message

use crate::html::html_to_text;
use crate::tree::{LeafPart, MessagePart, MessageTree};

/// Separator for the last-resort "any `text/*` part" fallback.
///
/// The structured export and the flat corpus export have always joined
/// these parts differently, and both behaviors are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackJoin {
    /// Blank line between parts, used for structured records
    #[default]
    BlankLine,
    /// Single space between parts, used for the flat corpus
    Space,
}

impl FallbackJoin {
    const fn separator(self) -> &'static str {
        match self {
            Self::BlankLine => "\n\n",
            Self::Space => " ",
        }
    }
}

/// Extract plain text from a message.
///
/// Multipart messages prefer inline `text/plain` parts, then inline
/// `text/html` parts converted to text, then any `text/*` part at all.
/// A message without text yields an empty string.
#[must_use]
pub fn extract_body(tree: &MessageTree, join: FallbackJoin) -> String {
    match &tree.root {
        MessagePart::Leaf(leaf) => single_part_text(leaf),
        MessagePart::Multipart(_) => multipart_text(&tree.leaves(), join),
    }
}

fn single_part_text(leaf: &LeafPart) -> String {
    let text = leaf.decode_text();
    if leaf.content_type == "text/html" {
        html_to_text(&text)
    } else {
        text
    }
}

fn multipart_text(leaves: &[&LeafPart], join: FallbackJoin) -> String {
    let inline_of = |content_type: &str| -> Vec<String> {
        leaves
            .iter()
            .filter(|leaf| !leaf.is_attachment() && leaf.content_type == content_type)
            .map(|leaf| leaf.decode_text())
            .collect()
    };

    let plain = inline_of("text/plain");
    if !plain.is_empty() {
        return join_trimmed(&plain, "\n\n");
    }

    let html = inline_of("text/html");
    if !html.is_empty() {
        return html
            .iter()
            .filter(|h| !h.trim().is_empty())
            .map(|h| html_to_text(h))
            .collect::<Vec<_>>()
            .join("\n\n");
    }

    let any_text: Vec<String> = leaves
        .iter()
        .filter(|leaf| leaf.main_type() == "text")
        .map(|leaf| leaf.decode_text())
        .collect();
    join_trimmed(&any_text, join.separator())
}

fn join_trimmed(parts: &[String], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
