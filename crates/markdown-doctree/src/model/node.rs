use crate::model::{AttrValue, Attrs, MarkSet};
use crate::schema::NodeType;

/// An element of the finished document tree.
///
/// Text runs are nodes of the schema's text type and carry their string in
/// `text`. Nodes are only built through [`Schema::node`](crate::Schema::node)
/// and [`Schema::text`](crate::Schema::text); each owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    node_type: NodeType,
    attrs: Attrs,
    content: Vec<Node>,
    marks: MarkSet,
    text: Option<String>,
}

impl Node {
    pub(crate) fn new(node_type: NodeType, attrs: Attrs, content: Vec<Node>, marks: MarkSet) -> Self {
        Self {
            node_type,
            attrs,
            content,
            marks,
            text: None,
        }
    }

    pub(crate) fn new_text(node_type: NodeType, text: String, marks: MarkSet) -> Self {
        Self {
            node_type,
            attrs: Attrs::new(),
            content: Vec::new(),
            marks,
            text: Some(text),
        }
    }

    /// Extends a text run in place while it is still part of an open frame.
    pub(crate) fn push_text(&mut self, more: &str) {
        if let Some(text) = self.text.as_mut() {
            text.push_str(more);
        }
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn name(&self) -> &str {
        self.node_type.name()
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn content(&self) -> &[Node] {
        &self.content
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.content.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.content.len()
    }

    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_text(&self) -> bool {
        self.text.is_some()
    }

    /// All text in this subtree, concatenated in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.text {
            Some(text) => out.push_str(text),
            None => self.content.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Depth of the subtree rooted here; a node without children has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.content.iter().map(Node::depth).max().unwrap_or(0)
    }
}
