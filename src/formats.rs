//! Format trait and implementations for different document types.
//!
//! A format tells the input layer how to parse a document into a flat fragment: which
//! tree-sitter grammar to use, which nodes are headings and at what rank, and which
//! grammar nodes are pure grouping that should be flattened away.

pub mod markdown;

/// Grammar-specific knowledge needed to turn a syntax tree into a flat fragment.
pub trait Format {
    /// Tree-sitter grammar for this format.
    fn language(&self) -> tree_sitter::Language;

    /// Query capturing each heading as `@heading` and its text as `@title`.
    fn heading_query(&self) -> &str;

    /// Whether a node of this kind is a heading.
    fn is_heading(&self, kind: &str) -> bool;

    /// Whether a node of this kind only groups other nodes and should be flattened.
    fn is_transparent(&self, kind: &str) -> bool;

    /// Rank of a heading node, `None` if it carries no recognizable rank marker.
    fn heading_rank(&self, heading: &tree_sitter::Node) -> Option<u8>;

    /// Whether a block is a document-level preamble such as a doctype.
    fn is_preamble(&self, kind: &str, text: &str) -> bool;
}
