//! The flat-to-nested transform.
//!
//! A single pass over the fragment keeps a stack of open sections, from the rank-0
//! root at the bottom to the innermost section on top, with ranks strictly increasing
//! upwards. A heading closes every open section of the same or deeper rank, then opens
//! a new section under whatever remains on top. Content always lands in the top section.
//!
//! Open sections live in an arena and the stack holds arena indices. A new section is
//! linked into its parent by index first and filled afterwards; the arena is only
//! sealed into owned [`Section`] trees once the pass is over.

use crate::node::{Heading, Node};
use crate::options::SectionizeOptions;
use crate::section::{Section, SectionData};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, trace};

const ROOT: usize = 0;

#[derive(Debug, Error, PartialEq, Eq)]
/// Reasons a sectionizing run fails. No partial output is produced.
pub enum SectionizeError {
    #[error("rank property `{key}` is reserved and cannot be set in static properties")]
    /// The rank metadata key was also supplied as a static property.
    ReservedRankProperty {
        /// The colliding key.
        key: String,
    },
    #[error("node {index} is a doctype: sectionizing only works on a fragment")]
    /// The input is a whole document rather than a fragment.
    NotAFragment {
        /// Position of the offending node in the input.
        index: usize,
    },
    #[error("heading at node {index} has rank {rank}; heading ranks start at 1")]
    /// A heading whose rank cannot sit below the rank-0 root.
    InvalidHeadingRank {
        /// Position of the heading in the input.
        index: usize,
        /// The rank it carried.
        rank: u8,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Result of a run: the root section itself, or its children lifted to the top level.
pub enum Sectionized {
    /// The rank-0 root section (root section enabled).
    Root(Section),
    /// Top-level sequence of sections and leading content (root section disabled).
    Fragment(Vec<Node>),
}

impl Sectionized {
    #[must_use]
    /// Top-level output sequence.
    pub fn into_nodes(self) -> Vec<Node> {
        match self {
            Self::Root(root) => vec![Node::Section(root)],
            Self::Fragment(nodes) => nodes,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Tagged<'a> {
    Section(&'a Section),
}

impl Serialize for Sectionized {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Root(root) => Tagged::Section(root).serialize(serializer),
            Self::Fragment(nodes) => nodes.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone)]
/// Validated options, ready to run over any number of fragments.
pub struct Sectionizer {
    options: SectionizeOptions,
}

impl Sectionizer {
    /// Validate `options` up front.
    ///
    /// # Errors
    ///
    /// Returns [`SectionizeError::ReservedRankProperty`] if the rank key is also a
    /// static property.
    pub fn new(options: SectionizeOptions) -> Result<Self, SectionizeError> {
        options.validate()?;
        Ok(Self { options })
    }

    #[must_use]
    /// Options this sectionizer was built with.
    pub fn options(&self) -> &SectionizeOptions {
        &self.options
    }

    /// Nest a flat fragment into sections.
    ///
    /// # Errors
    ///
    /// Returns [`SectionizeError::NotAFragment`] on a doctype node and
    /// [`SectionizeError::InvalidHeadingRank`] on a rank-0 heading.
    pub fn run(&self, nodes: Vec<Node>) -> Result<Sectionized, SectionizeError> {
        debug!(
            nodes = nodes.len(),
            root_section = self.options.enable_root_section,
            "sectionizing fragment"
        );
        let mut arena = vec![Draft::root()];
        let mut stack = vec![ROOT];

        for (index, node) in nodes.into_iter().enumerate() {
            match node {
                Node::Heading(heading) => {
                    let rank = heading.rank;
                    if rank == 0 {
                        return Err(SectionizeError::InvalidHeadingRank { index, rank });
                    }
                    while arena[top(&stack)].rank >= rank {
                        let closed = stack.pop();
                        trace!(?closed, rank, "closing section");
                    }
                    let parent = top(&stack);
                    let opened = arena.len();
                    arena.push(Draft::open(heading));
                    arena[parent].children.push(Slot::Open(opened));
                    stack.push(opened);
                    trace!(opened, parent, rank, depth = stack.len(), "opening section");
                }
                Node::Doctype => return Err(SectionizeError::NotAFragment { index }),
                node => arena[top(&stack)].children.push(Slot::Node(node)),
            }
        }

        let sections = arena.len() - 1;
        let root = seal(&mut arena, ROOT, &self.options);
        debug!(sections, "sectionized fragment");
        Ok(if self.options.enable_root_section {
            Sectionized::Root(root)
        } else {
            Sectionized::Fragment(root.children)
        })
    }
}

/// Validate `options` and nest `nodes` in one call.
///
/// # Errors
///
/// Fails on invalid options or on input that is not a well-formed fragment; see
/// [`SectionizeError`].
pub fn sectionize(
    nodes: Vec<Node>,
    options: &SectionizeOptions,
) -> Result<Sectionized, SectionizeError> {
    Sectionizer::new(options.clone())?.run(nodes)
}

enum Slot {
    Node(Node),
    Open(usize),
}

struct Draft {
    rank: u8,
    id: Option<String>,
    children: Vec<Slot>,
}

impl Draft {
    fn root() -> Self {
        Self {
            rank: 0,
            id: None,
            children: Vec::new(),
        }
    }

    /// Move the heading's identifier onto the new section, leaving a back-reference.
    fn open(mut heading: Heading) -> Self {
        let id = heading.id.take();
        heading.href = id.as_ref().map(|id| format!("#{id}"));
        heading.as_tag = Some(heading.tag.clone());
        Self {
            rank: heading.rank,
            id,
            children: vec![Slot::Node(Node::Heading(heading))],
        }
    }
}

// The root has rank 0 and no heading rank is 0, so it is never popped.
fn top(stack: &[usize]) -> usize {
    stack.last().copied().unwrap_or(ROOT)
}

fn seal(arena: &mut [Draft], index: usize, options: &SectionizeOptions) -> Section {
    let draft = &mut arena[index];
    let rank = draft.rank;
    let id = draft.id.take();
    let slots = std::mem::take(&mut draft.children);
    let children = slots
        .into_iter()
        .map(|slot| match slot {
            Slot::Node(node) => node,
            Slot::Open(child) => Node::Section(seal(arena, child, options)),
        })
        .collect();
    Section {
        rank,
        data: SectionData::new(rank, id.clone(), options),
        id,
        children,
    }
}

#[cfg(test)]
#[path = "tests/sectionize.rs"]
mod tests;
