//! sectionize: nest flat, heading-ranked document fragments into sections.
//!
//! A fragment is a flat run of headings and content. [`sectionize::sectionize`] wraps
//! each heading, and everything up to the next heading of the same or shallower rank,
//! in a [`section::Section`] container, recovering the outline the headings imply.
//!
//! ```
//! use sectionize::node::{Content, Heading};
//! use sectionize::options::SectionizeOptions;
//! use sectionize::sectionize::sectionize;
//!
//! let fragment = vec![
//!     Heading::new(1, "Intro").with_id("intro").into(),
//!     Content::new("p", "text").into(),
//!     Heading::new(2, "Sub").into(),
//! ];
//! let nodes = sectionize(fragment, &SectionizeOptions::default())
//!     .unwrap()
//!     .into_nodes();
//! let intro = nodes[0].as_section().unwrap();
//! assert_eq!(intro.id.as_deref(), Some("intro"));
//! assert_eq!(intro.subsections()[0].rank, 2);
//! ```

pub mod config;
pub mod formats;
pub mod input;
pub mod node;
pub mod options;
pub mod section;
pub mod sectionize;
