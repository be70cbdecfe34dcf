//! Typed document nodes making up a flat fragment and the nested tree built from it.
//!
//! A fragment is an ordered run of [`Node`]s. Only headings carry a rank; everything
//! else is content the sectionizer moves around without looking inside.

use crate::section::Section;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// One node of a document fragment.
pub enum Node {
    /// A ranked heading that opens an outline level.
    Heading(Heading),
    /// Any non-heading node, passed through untouched.
    Content(Content),
    /// Document-level preamble marker; never valid inside a fragment.
    Doctype,
    /// A synthesized section container.
    Section(Section),
}

impl Node {
    /// Outline rank of a heading or section, `None` for everything else.
    #[must_use]
    pub fn rank(&self) -> Option<u8> {
        match self {
            Self::Heading(heading) => Some(heading.rank),
            Self::Section(section) => Some(section.rank),
            Self::Content(_) | Self::Doctype => None,
        }
    }

    #[must_use]
    /// Borrow the section container, if this node is one.
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Self::Section(section) => Some(section),
            _ => None,
        }
    }

    #[must_use]
    /// Borrow the heading, if this node is one.
    pub fn as_heading(&self) -> Option<&Heading> {
        match self {
            Self::Heading(heading) => Some(heading),
            _ => None,
        }
    }

    #[must_use]
    /// Borrow the content node, if this node is one.
    pub fn as_content(&self) -> Option<&Content> {
        match self {
            Self::Content(content) => Some(content),
            _ => None,
        }
    }
}

impl From<Heading> for Node {
    fn from(heading: Heading) -> Self {
        Self::Heading(heading)
    }
}

impl From<Content> for Node {
    fn from(content: Content) -> Self {
        Self::Content(content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Heading node with an outline rank and an optional identifier.
pub struct Heading {
    /// Element type the heading came from, e.g. `h2`.
    pub tag: String,
    /// Outline depth, 1 being the shallowest.
    pub rank: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Identifier attribute; moved onto the enclosing section during sectionizing.
    pub id: Option<String>,
    /// Heading text without markup.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Back-reference (`#id`) to the identifier promoted onto the enclosing section.
    pub href: Option<String>,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    /// Original element type, recorded once the heading is wrapped.
    pub as_tag: Option<String>,
}

impl Heading {
    /// Heading of the given rank, tagged `h<rank>`.
    pub fn new(rank: u8, text: impl Into<String>) -> Self {
        Self {
            tag: format!("h{rank}"),
            rank,
            id: None,
            text: text.into(),
            href: None,
            as_tag: None,
        }
    }

    #[must_use]
    /// Attach an identifier attribute.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Opaque content node.
pub struct Content {
    /// Node kind as reported by whatever produced the fragment (`paragraph`, `p`, ...).
    pub kind: String,
    /// Source text of the node.
    pub text: String,
}

impl Content {
    /// Content node of the given kind.
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }
}
