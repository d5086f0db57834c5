//! Indented one-node-per-line rendering of a document tree.
//!
//! ```text
//! doc
//!   heading level=2
//!     "Title"
//!   paragraph
//!     "plain "
//!     "bold" [strong]
//! ```
//!
//! Element lines show the type name and attributes; text lines show the
//! quoted text. Active marks follow in brackets.

use crate::model::{MarkSet, Node};

pub fn render(node: &Node) -> String {
    let mut lines = Vec::new();
    render_into(node, 0, &mut lines);
    lines.join("\n")
}

fn render_into(node: &Node, indent: usize, lines: &mut Vec<String>) {
    let mut line = "  ".repeat(indent);
    match node.text() {
        Some(text) => {
            line.push_str(&format!("{text:?}"));
        }
        None => {
            line.push_str(node.name());
            for (name, value) in node.attrs() {
                line.push_str(&format!(" {name}={value}"));
            }
        }
    }
    render_marks(node.marks(), &mut line);
    lines.push(line);

    for child in node.content() {
        render_into(child, indent + 1, lines);
    }
}

fn render_marks(marks: &MarkSet, line: &mut String) {
    if marks.is_empty() {
        return;
    }
    let rendered: Vec<String> = marks
        .iter()
        .map(|m| {
            let mut s = m.name().to_string();
            for (name, value) in m.attrs() {
                s.push_str(&format!(" {name}={value}"));
            }
            s
        })
        .collect();
    line.push_str(&format!(" [{}]", rendered.join(", ")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attrs;
    use crate::schema::{ContentModel, MarkSpec, NodeSpec, SchemaBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_attrs_marks_and_escaped_text() {
        let schema = SchemaBuilder::new()
            .node(NodeSpec::new("doc", ContentModel::Block))
            .node(NodeSpec::new("heading", ContentModel::Inline).attr("level", 1_i64))
            .node(NodeSpec::new("text", ContentModel::Leaf))
            .mark(MarkSpec::new("link").attr("href", ""))
            .build()
            .unwrap();
        let link = schema
            .mark_type("link")
            .unwrap()
            .create(attrs([("href", "u")]));
        let run = schema.text("a\nb", MarkSet::empty().add(link));
        let heading = schema.node(
            schema.node_type("heading").unwrap(),
            attrs([("level", 2_i64)]),
            vec![run],
            MarkSet::empty(),
        );
        let doc = schema.node(schema.top_node_type(), Default::default(), vec![heading], MarkSet::empty());

        assert_eq!(
            render(&doc),
            "doc\n  heading level=2\n    \"a\\nb\" [link href=\"u\"]"
        );
    }
}
