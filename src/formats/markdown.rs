//! Markdown format implementation using tree-sitter-md.
//!
//! The block grammar already groups headings into its own `section` nodes; those are
//! flattened so the sectionizer sees a plain run of blocks. Both ATX (`#` syntax) and
//! setext (underlined) headings are recognized.

use crate::formats::Format;

/// Tree-sitter queries and node kinds for markdown documents.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn heading_query(&self) -> &'static str {
        "(atx_heading (inline) @title) @heading
         (setext_heading (paragraph (inline) @title)) @heading"
    }

    fn is_heading(&self, kind: &str) -> bool {
        matches!(kind, "atx_heading" | "setext_heading")
    }

    fn is_transparent(&self, kind: &str) -> bool {
        matches!(kind, "document" | "section")
    }

    fn heading_rank(&self, heading: &tree_sitter::Node) -> Option<u8> {
        let mut cursor = heading.walk();
        for child in heading.children(&mut cursor) {
            if let Some(rank) = marker_rank(child.kind()) {
                return Some(rank);
            }
        }
        None
    }

    fn is_preamble(&self, kind: &str, text: &str) -> bool {
        kind == "html_block"
            && text
                .trim_start()
                .get(..9)
                .is_some_and(|start| start.eq_ignore_ascii_case("<!doctype"))
    }
}

fn marker_rank(kind: &str) -> Option<u8> {
    match kind {
        "atx_h1_marker" | "setext_h1_underline" => Some(1),
        "atx_h2_marker" | "setext_h2_underline" => Some(2),
        "atx_h3_marker" => Some(3),
        "atx_h4_marker" => Some(4),
        "atx_h5_marker" => Some(5),
        "atx_h6_marker" => Some(6),
        _ => None,
    }
}
