use super::{sectionize, Sectionized, Sectionizer, SectionizeError};
use crate::node::{Content, Heading, Node};
use crate::options::SectionizeOptions;
use crate::section::Section;
use serde_json::{json, Value};

fn p(text: &str) -> Node {
    Content::new("p", text).into()
}

fn h(rank: u8, text: &str) -> Node {
    Heading::new(rank, text).into()
}

fn h_id(rank: u8, text: &str, id: &str) -> Node {
    Heading::new(rank, text).with_id(id).into()
}

fn fragment(nodes: Vec<Node>) -> Vec<Node> {
    match sectionize(nodes, &SectionizeOptions::default()).unwrap() {
        Sectionized::Fragment(nodes) => nodes,
        Sectionized::Root(_) => panic!("root section is disabled by default"),
    }
}

fn section(node: &Node) -> &Section {
    node.as_section()
        .unwrap_or_else(|| panic!("expected a section, got {node:?}"))
}

fn outline(nodes: &[Node]) -> Vec<String> {
    fn walk(nodes: &[Node], depth: usize, out: &mut Vec<String>) {
        for node in nodes {
            match node {
                Node::Section(section) => {
                    out.push(format!("{}section {}", "  ".repeat(depth), section.rank));
                    walk(&section.children, depth + 1, out);
                }
                Node::Heading(heading) => {
                    out.push(format!("{}{} {}", "  ".repeat(depth), heading.tag, heading.text));
                }
                Node::Content(content) => {
                    out.push(format!("{}{} {}", "  ".repeat(depth), content.kind, content.text));
                }
                Node::Doctype => out.push("doctype".to_string()),
            }
        }
    }
    let mut out = Vec::new();
    walk(nodes, 0, &mut out);
    out
}

#[test]
fn test_heading_with_nested_subheading() {
    let nodes = fragment(vec![
        h_id(1, "Intro", "intro"),
        p("text"),
        h_id(2, "Sub", "sub"),
        p("more"),
    ]);

    assert_eq!(nodes.len(), 1);
    let intro = section(&nodes[0]);
    assert_eq!(intro.rank, 1);
    assert_eq!(intro.id.as_deref(), Some("intro"));
    assert_eq!(intro.children.len(), 3);
    assert_eq!(intro.heading().unwrap().text, "Intro");
    assert_eq!(intro.children[1], p("text"));

    let sub = section(&intro.children[2]);
    assert_eq!(sub.rank, 2);
    assert_eq!(sub.id.as_deref(), Some("sub"));
    assert_eq!(sub.heading().unwrap().text, "Sub");
    assert_eq!(sub.children[1], p("more"));
}

#[test]
fn test_same_rank_headings_become_siblings() {
    let nodes = fragment(vec![h(1, "A"), h(1, "B")]);

    assert_eq!(
        outline(&nodes),
        vec!["section 1", "  h1 A", "section 1", "  h1 B"]
    );
}

#[test]
fn test_root_section_wraps_headingless_fragment() {
    let options = SectionizeOptions::default().with_root_section(true);
    let result = sectionize(vec![p("orphan text")], &options).unwrap();

    let Sectionized::Root(root) = result else {
        panic!("expected the root section");
    };
    assert_eq!(root.rank, 0);
    assert_eq!(root.id, None);
    assert_eq!(root.children, vec![p("orphan text")]);
    assert_eq!(root.data.get("dataHeadingRank"), Some(json!(0)));
}

#[test]
fn test_reserved_rank_property_is_rejected() {
    let options = SectionizeOptions::default().with_property("dataHeadingRank", "x");

    let err = sectionize(vec![h(1, "A")], &options).unwrap_err();
    assert_eq!(
        err,
        SectionizeError::ReservedRankProperty {
            key: "dataHeadingRank".to_string()
        }
    );
    assert!(Sectionizer::new(options).is_err());
}

#[test]
fn test_reserved_key_follows_renamed_rank_property() {
    let mut options = SectionizeOptions::default().with_property("dataHeadingRank", "x");
    options.rank_property_name = "level".to_string();
    assert!(sectionize(vec![h(1, "A")], &options).is_ok());

    options = options.with_property("level", 3);
    assert!(matches!(
        sectionize(vec![h(1, "A")], &options),
        Err(SectionizeError::ReservedRankProperty { key }) if key == "level"
    ));
}

#[test]
fn test_leading_content_stays_at_top_level() {
    let nodes = fragment(vec![p("preface"), h(2, "Two"), p("body")]);

    assert_eq!(
        outline(&nodes),
        vec!["p preface", "section 2", "  h2 Two", "  p body"]
    );
}

#[test]
fn test_ascent_pops_several_levels() {
    let nodes = fragment(vec![
        h(1, "One"),
        h(2, "Two"),
        h(3, "Three"),
        p("deep"),
        h(1, "Back"),
        p("shallow"),
    ]);

    assert_eq!(
        outline(&nodes),
        vec![
            "section 1",
            "  h1 One",
            "  section 2",
            "    h2 Two",
            "    section 3",
            "      h3 Three",
            "      p deep",
            "section 1",
            "  h1 Back",
            "  p shallow",
        ]
    );
}

#[test]
fn test_partial_ascent_closes_only_deeper_sections() {
    let nodes = fragment(vec![h(1, "A"), h(2, "B"), h(4, "C"), h(3, "D")]);

    assert_eq!(
        outline(&nodes),
        vec![
            "section 1",
            "  h1 A",
            "  section 2",
            "    h2 B",
            "    section 4",
            "      h4 C",
            "    section 3",
            "      h3 D",
        ]
    );
}

#[test]
fn test_skipped_levels_nest_directly() {
    let nodes = fragment(vec![h(1, "Top"), h(4, "Deep")]);

    let top = section(&nodes[0]);
    let deep = section(&top.children[1]);
    assert_eq!(deep.rank, 4);
    assert_eq!(deep.data.rank(), 4);
}

#[test]
fn test_shallower_heading_after_deep_start() {
    let nodes = fragment(vec![h(3, "Three"), h(2, "Two"), h(3, "Nested")]);

    assert_eq!(
        outline(&nodes),
        vec![
            "section 3",
            "  h3 Three",
            "section 2",
            "  h2 Two",
            "  section 3",
            "    h3 Nested",
        ]
    );
}

#[test]
fn test_identifier_promoted_to_section() {
    let nodes = fragment(vec![h_id(2, "Usage", "usage")]);

    let usage = section(&nodes[0]);
    assert_eq!(usage.id.as_deref(), Some("usage"));
    assert_eq!(usage.data.id(), Some("usage"));
    assert_eq!(usage.data.get("ariaLabelledby"), Some(json!("usage")));

    let heading = usage.heading().unwrap();
    assert_eq!(heading.id, None);
    assert_eq!(heading.href.as_deref(), Some("#usage"));
    assert_eq!(heading.as_tag.as_deref(), Some("h2"));
}

#[test]
fn test_heading_without_identifier() {
    let nodes = fragment(vec![h(1, "Plain")]);

    let plain = section(&nodes[0]);
    assert_eq!(plain.id, None);
    assert_eq!(plain.data.get("ariaLabelledby"), None);

    let heading = plain.heading().unwrap();
    assert_eq!(heading.href, None);
    assert_eq!(heading.as_tag.as_deref(), Some("h1"));
}

#[test]
fn test_rank_metadata_matches_heading_rank() {
    let nodes = fragment(vec![h(1, "a"), h(3, "b"), h(2, "c"), h(6, "d"), h(5, "e")]);

    let mut pending: Vec<&Node> = nodes.iter().collect();
    let mut checked = 0;
    while let Some(node) = pending.pop() {
        if let Node::Section(section) = node {
            let heading = section.heading().unwrap();
            assert_eq!(section.rank, heading.rank);
            assert_eq!(section.data.get("dataHeadingRank"), Some(json!(heading.rank)));
            for child in &section.children[1..] {
                assert!(child.rank().unwrap() > section.rank);
            }
            pending.extend(section.children.iter());
            checked += 1;
        }
    }
    assert_eq!(checked, 5);
}

#[test]
fn test_content_order_is_preserved() {
    let input = vec![
        p("0"),
        h(1, "a"),
        p("1"),
        h(2, "b"),
        p("2"),
        p("3"),
        h(1, "c"),
        p("4"),
    ];
    let options = SectionizeOptions::default().with_root_section(true);
    let Sectionized::Root(root) = sectionize(input, &options).unwrap() else {
        panic!("expected the root section");
    };

    let mut texts = Vec::new();
    let mut pending: Vec<&Node> = root.children.iter().rev().collect();
    while let Some(node) = pending.pop() {
        match node {
            Node::Content(content) => texts.push(content.text.as_str()),
            Node::Section(section) => pending.extend(section.children.iter().rev()),
            _ => {}
        }
    }
    assert_eq!(texts, vec!["0", "1", "2", "3", "4"]);
    assert_eq!(
        root.headings().iter().map(|h| h.text.as_str()).collect::<Vec<_>>(),
        vec!["a", "b", "c"]
    );
}

#[test]
fn test_static_properties_merged_into_every_section() {
    let options = SectionizeOptions::default()
        .with_property("className", "chapter")
        .with_property("ariaLabelledby", "overridden");
    let nodes = sectionize(vec![h_id(1, "A", "a"), h(2, "B")], &options)
        .unwrap()
        .into_nodes();

    let a = section(&nodes[0]);
    let b = section(&a.children[1]);
    for section in [a, b] {
        assert_eq!(section.data.get("className"), Some(json!("chapter")));
        assert_eq!(section.data.get("ariaLabelledby"), Some(json!("overridden")));
    }
    assert_eq!(a.data.id(), Some("a"));
    assert_eq!(a.data.properties().len(), 2);
    assert_eq!(b.data.properties(), a.data.properties());
}

#[test]
fn test_custom_property_names() {
    let mut options = SectionizeOptions::default();
    options.rank_property_name = "level".to_string();
    options.id_property_name = "labelledBy".to_string();
    let nodes = sectionize(vec![h_id(3, "A", "a")], &options)
        .unwrap()
        .into_nodes();

    let a = section(&nodes[0]);
    assert_eq!(a.data.get("level"), Some(json!(3)));
    assert_eq!(a.data.get("labelledBy"), Some(json!("a")));
    assert_eq!(a.data.get("dataHeadingRank"), None);
    assert_eq!(a.data.rank_key(), "level");
    assert_eq!(a.data.id_key(), "labelledBy");

    let value = serde_json::to_value(&a.data).unwrap();
    assert_eq!(value, json!({ "level": 3, "labelledBy": "a" }));
}

#[test]
fn test_doctype_is_rejected() {
    let err = sectionize(vec![p("x"), Node::Doctype], &SectionizeOptions::default())
        .unwrap_err();
    assert_eq!(err, SectionizeError::NotAFragment { index: 1 });
}

#[test]
fn test_rank_zero_heading_is_rejected() {
    let err = sectionize(vec![h(1, "ok"), h(0, "bad")], &SectionizeOptions::default())
        .unwrap_err();
    assert_eq!(err, SectionizeError::InvalidHeadingRank { index: 1, rank: 0 });
}

#[test]
fn test_empty_fragment() {
    assert!(fragment(Vec::new()).is_empty());

    let options = SectionizeOptions::default().with_root_section(true);
    let nodes = sectionize(Vec::new(), &options).unwrap().into_nodes();
    assert_eq!(nodes.len(), 1);
    assert!(section(&nodes[0]).children.is_empty());
}

#[test]
fn test_existing_sections_pass_through_as_content() {
    let inner = fragment(vec![h(2, "Inner")]).remove(0);
    let nodes = fragment(vec![h(1, "Outer"), inner.clone()]);

    let outer = section(&nodes[0]);
    assert_eq!(outer.children[1], inner);
}

#[test]
fn test_sectionizer_reuses_options() {
    let sectionizer =
        Sectionizer::new(SectionizeOptions::default().with_property("role", "region")).unwrap();

    let first = sectionizer.run(vec![h(1, "A")]).unwrap().into_nodes();
    let second = sectionizer.run(vec![h(1, "B")]).unwrap().into_nodes();
    assert_eq!(section(&first[0]).data.get("role"), Some(json!("region")));
    assert_eq!(section(&second[0]).heading().unwrap().text, "B");
    assert_eq!(sectionizer.options().properties.len(), 1);
}

#[test]
fn test_serialized_shape() {
    let options = SectionizeOptions::default().with_property("className", "s");
    let result = sectionize(vec![h_id(1, "Intro", "intro"), p("text")], &options).unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value,
        json!([{
            "type": "section",
            "rank": 1,
            "id": "intro",
            "data": {
                "dataHeadingRank": 1,
                "ariaLabelledby": "intro",
                "className": "s"
            },
            "children": [
                {
                    "type": "heading",
                    "tag": "h1",
                    "rank": 1,
                    "text": "Intro",
                    "href": "#intro",
                    "as": "h1"
                },
                { "type": "content", "kind": "p", "text": "text" }
            ]
        }])
    );
    assert!(matches!(value, Value::Array(_)));
}

#[test]
fn test_serialized_root_section_is_tagged() {
    let options = SectionizeOptions::default().with_root_section(true);
    let result = sectionize(vec![p("orphan text")], &options).unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["type"], json!("section"));
    assert_eq!(value["rank"], json!(0));
    assert_eq!(value["data"], json!({ "dataHeadingRank": 0 }));
    assert_eq!(value["children"][0]["text"], json!("orphan text"));
}
