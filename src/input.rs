//! Reading documents into flat fragments.
//!
//! A document is parsed with the format's tree-sitter grammar, grouping nodes are
//! flattened away, and every remaining block becomes a heading, a doctype marker or an
//! opaque content node, in source order.

use crate::formats::Format;
use crate::node::{Content, Heading, Node};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};
use streaming_iterator::StreamingIterator;
use thiserror::Error;
use tracing::debug;
use tree_sitter::{Parser, Query, QueryCursor};

#[derive(Debug, Error)]
/// Failures turning a document into a fragment.
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    /// The document could not be read.
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    #[error("failed to load grammar: {0}")]
    /// The tree-sitter grammar is incompatible with the linked runtime.
    Language(#[from] tree_sitter::LanguageError),
    #[error("invalid heading query: {0}")]
    /// The format's heading query does not compile.
    Query(#[from] tree_sitter::QueryError),
    #[error("tree-sitter produced no syntax tree")]
    /// The parser gave up without a tree.
    Parse,
    #[error("{kind} on line {line} has no rank marker")]
    /// A heading whose rank could not be determined.
    UnrankedHeading {
        /// Grammar node kind of the heading.
        kind: String,
        /// 1-indexed source line of the heading.
        line: usize,
    },
}

/// Read a file and parse it into a flat fragment.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed; see [`parse_fragment`].
pub fn read_fragment(path: &Path, format: &impl Format) -> Result<Vec<Node>, InputError> {
    let source = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_fragment(&source, format)
}

/// Parse document text into a flat fragment.
///
/// Headings pick up an identifier from a trailing `{#id}` attribute, which is removed
/// from their text.
///
/// # Errors
///
/// Returns an error if the grammar or heading query cannot be loaded, if parsing
/// fails, or if a heading carries no rank marker.
pub fn parse_fragment(source: &str, format: &impl Format) -> Result<Vec<Node>, InputError> {
    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language)?;
    let tree = parser.parse(source, None).ok_or(InputError::Parse)?;
    let bytes = source.as_bytes();

    let titles = heading_titles(&tree, &language, format, bytes)?;

    let mut blocks = Vec::new();
    flatten(tree.root_node(), format, &mut blocks);

    let mut nodes = Vec::with_capacity(blocks.len());
    for block in blocks {
        let kind = block.kind();
        let text = block.utf8_text(bytes).unwrap_or_default();
        if format.is_heading(kind) {
            let rank = format
                .heading_rank(&block)
                .ok_or_else(|| InputError::UnrankedHeading {
                    kind: kind.to_string(),
                    line: block.start_position().row + 1,
                })?;
            let title = titles.get(&block.id()).copied().unwrap_or_default();
            nodes.push(heading(rank, title));
        } else if format.is_preamble(kind, text) {
            nodes.push(Node::Doctype);
        } else {
            nodes.push(Content::new(kind, text.trim_end()).into());
        }
    }
    debug!(nodes = nodes.len(), "parsed fragment");
    Ok(nodes)
}

fn heading_titles<'s>(
    tree: &tree_sitter::Tree,
    language: &tree_sitter::Language,
    format: &impl Format,
    bytes: &'s [u8],
) -> Result<HashMap<usize, &'s str>, InputError> {
    let query = Query::new(language, format.heading_query())?;
    let heading_index = query.capture_index_for_name("heading");
    let title_index = query.capture_index_for_name("title");

    let mut titles = HashMap::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), bytes);
    while let Some(m) = matches.next() {
        let mut heading = None;
        let mut title = None;
        for capture in m.captures {
            if Some(capture.index) == heading_index {
                heading = Some(capture.node.id());
            } else if Some(capture.index) == title_index {
                title = capture.node.utf8_text(bytes).ok();
            }
        }
        if let (Some(heading), Some(title)) = (heading, title) {
            titles.insert(heading, title);
        }
    }
    Ok(titles)
}

fn flatten<'t>(
    node: tree_sitter::Node<'t>,
    format: &impl Format,
    out: &mut Vec<tree_sitter::Node<'t>>,
) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if format.is_transparent(child.kind()) {
            flatten(child, format, out);
        } else {
            out.push(child);
        }
    }
}

fn heading(rank: u8, title: &str) -> Node {
    let (text, id) = split_id(title.trim());
    let heading = Heading::new(rank, text);
    match id {
        Some(id) => heading.with_id(id),
        None => heading,
    }
    .into()
}

/// Split a trailing `{#id}` attribute off heading text.
fn split_id(title: &str) -> (&str, Option<&str>) {
    let Some(body) = title.strip_suffix('}') else {
        return (title, None);
    };
    let Some(open) = body.rfind("{#") else {
        return (title, None);
    };
    let id = &body[open + 2..];
    if id.is_empty() || id.contains(char::is_whitespace) {
        return (title, None);
    }
    (body[..open].trim_end(), Some(id))
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
