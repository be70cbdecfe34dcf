//! Section containers synthesized around headings.
//!
//! A section wraps one heading and every node that nests beneath it, up to the next
//! heading of the same or a shallower rank. Its metadata is kept strongly typed and
//! only flattened into a key/value map (under the configured key names) when it is
//! serialized or queried by key.

use crate::node::{Heading, Node};
use crate::options::SectionizeOptions;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
/// Container holding a heading and the nodes that belong under it.
pub struct Section {
    /// Rank of the heading that opened the section, 0 for the root.
    pub rank: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Identifier promoted from the opening heading.
    pub id: Option<String>,
    /// Rank, identifier and static properties under their configured keys.
    pub data: SectionData,
    /// Ordered children: the opening heading, content, and nested sections.
    pub children: Vec<Node>,
}

impl Section {
    #[must_use]
    /// The heading that opened this section; `None` for the root.
    pub fn heading(&self) -> Option<&Heading> {
        self.children.first().and_then(Node::as_heading)
    }

    #[must_use]
    /// Directly nested sections, in order.
    pub fn subsections(&self) -> Vec<&Section> {
        self.children.iter().filter_map(Node::as_section).collect()
    }

    #[must_use]
    /// Every heading in the subtree, in document order.
    pub fn headings(&self) -> Vec<&Heading> {
        let mut found = Vec::new();
        let mut pending: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = pending.pop() {
            match node {
                Node::Heading(heading) => found.push(heading),
                Node::Section(section) => pending.extend(section.children.iter().rev()),
                Node::Content(_) | Node::Doctype => {}
            }
        }
        found
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Section metadata, flattened to `{rank_key: rank, id_key: id, ..properties}` on output.
pub struct SectionData {
    rank_key: String,
    rank: u8,
    id_key: String,
    id: Option<String>,
    properties: BTreeMap<String, Value>,
}

impl SectionData {
    pub(crate) fn new(rank: u8, id: Option<String>, options: &SectionizeOptions) -> Self {
        Self {
            rank_key: options.rank_property_name.clone(),
            rank,
            id_key: options.id_property_name.clone(),
            id,
            properties: options.properties.clone(),
        }
    }

    #[must_use]
    /// Rank recorded for the section.
    pub fn rank(&self) -> u8 {
        self.rank
    }

    #[must_use]
    /// Promoted identifier, if the opening heading had one.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    /// Key the rank is stored under.
    pub fn rank_key(&self) -> &str {
        &self.rank_key
    }

    #[must_use]
    /// Key the identifier is stored under.
    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    #[must_use]
    /// Static properties merged into every section.
    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    #[must_use]
    /// Look up a metadata key as it appears in the flattened map.
    ///
    /// Static properties are merged last, so they shadow the identifier key. They can
    /// never shadow the rank key, which option validation reserves.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.properties.get(key) {
            return Some(value.clone());
        }
        if key == self.rank_key {
            return Some(Value::from(self.rank));
        }
        if key == self.id_key {
            return self.id.clone().map(Value::from);
        }
        None
    }

    fn id_entry(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|_| !self.properties.contains_key(&self.id_key))
    }
}

impl Serialize for SectionData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let id = self.id_entry();
        let len = 1 + usize::from(id.is_some()) + self.properties.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(&self.rank_key, &self.rank)?;
        if let Some(id) = id {
            map.serialize_entry(&self.id_key, id)?;
        }
        for (key, value) in &self.properties {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
