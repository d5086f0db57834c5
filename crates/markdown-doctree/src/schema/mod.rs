//! # Schema
//!
//! The node and mark catalog the tree builder works against, plus the parse
//! rules each type declares.
//!
//! ## Modules
//!
//! - **`types`**: `NodeSpec`/`MarkSpec` declarations and the `NodeType`/`MarkType`
//!   handles of a built schema
//! - **`rule`**: `ParseRule`, the closed set of `ParseKind`s and `AttrSource`
//!
//! A [`Schema`] owns the token handler table compiled from its rules. The
//! table is built on first use and shared by every later parse, from any
//! thread.

pub mod rule;
pub mod types;

use std::fmt;
use std::sync::OnceLock;

use log::{debug, warn};

use crate::error::SchemaError;
use crate::model::{Attrs, MarkSet, Node};
use crate::parsing::TokenHandlers;

pub use rule::{AttrSource, AttrsFn, CustomFn, ParseKind, ParseRule};
pub use types::{ContentModel, MarkSpec, MarkType, NodeSpec, NodeType, TypeRef};

/// Name of the node type used for text runs.
pub const TEXT_NODE: &str = "text";

/// Default name of the document root type.
pub const TOP_NODE: &str = "doc";

/// Collects node and mark declarations into a [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    nodes: Vec<NodeSpec>,
    marks: Vec<MarkSpec>,
    top_node: String,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            marks: Vec::new(),
            top_node: TOP_NODE.to_string(),
        }
    }

    pub fn node(mut self, spec: NodeSpec) -> Self {
        self.nodes.push(spec);
        self
    }

    pub fn mark(mut self, spec: MarkSpec) -> Self {
        self.marks.push(spec);
        self
    }

    pub fn top_node(mut self, name: impl Into<String>) -> Self {
        self.top_node = name.into();
        self
    }

    /// Attaches one more rule to an already declared node or mark type.
    pub fn add_rule(mut self, owner: &str, rule: ParseRule) -> Result<Self, SchemaError> {
        if let Some(spec) = self.nodes.iter_mut().find(|s| s.name == owner) {
            spec.rules.push(rule);
        } else if let Some(spec) = self.marks.iter_mut().find(|s| s.name == owner) {
            spec.rules.push(rule);
        } else {
            return Err(SchemaError::UnknownType(owner.to_string()));
        }
        Ok(self)
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut seen: Vec<&str> = Vec::new();
        for name in self
            .nodes
            .iter()
            .map(|s| s.name.as_str())
            .chain(self.marks.iter().map(|s| s.name.as_str()))
        {
            if seen.contains(&name) {
                return Err(SchemaError::DuplicateType(name.to_string()));
            }
            seen.push(name);
        }

        let nodes: Vec<NodeType> = self.nodes.into_iter().map(NodeType::new).collect();
        let marks: Vec<MarkType> = self.marks.into_iter().map(MarkType::new).collect();

        let find = |name: &str| nodes.iter().find(|t| t.name() == name).cloned();
        let top = find(&self.top_node).ok_or_else(|| SchemaError::MissingType(self.top_node.clone()))?;
        let text = find(TEXT_NODE).ok_or_else(|| SchemaError::MissingType(TEXT_NODE.to_string()))?;

        for node_type in &nodes {
            check_required_chain(node_type, &nodes)?;
        }

        Ok(Schema {
            nodes,
            marks,
            top,
            text,
            handlers: OnceLock::new(),
        })
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Following required children from `start` must end at a type without one.
fn check_required_chain(start: &NodeType, nodes: &[NodeType]) -> Result<(), SchemaError> {
    let mut current = start.clone();
    for _ in 0..=nodes.len() {
        let Some(child) = current.required_child() else {
            return Ok(());
        };
        current = nodes
            .iter()
            .find(|t| t.name() == child)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType(child.to_string()))?;
    }
    Err(SchemaError::RequiredChildCycle(start.name().to_string()))
}

/// A built node/mark catalog with its node and mark factories.
pub struct Schema {
    nodes: Vec<NodeType>,
    marks: Vec<MarkType>,
    top: NodeType,
    text: NodeType,
    handlers: OnceLock<TokenHandlers>,
}

impl Schema {
    pub fn node_types(&self) -> &[NodeType] {
        &self.nodes
    }

    pub fn mark_types(&self) -> &[MarkType] {
        &self.marks
    }

    pub fn node_type(&self, name: &str) -> Option<&NodeType> {
        self.nodes.iter().find(|t| t.name() == name)
    }

    pub fn mark_type(&self, name: &str) -> Option<&MarkType> {
        self.marks.iter().find(|t| t.name() == name)
    }

    pub fn top_node_type(&self) -> &NodeType {
        &self.top
    }

    /// Builds a node. Attributes are filled from the type's defaults and
    /// undeclared ones dropped; an empty node whose type requires a child
    /// gets one.
    ///
    /// Children the type's content model does not allow are dropped: a
    /// [`ContentModel::Leaf`] type keeps none, a [`ContentModel::Text`] type
    /// keeps text runs only.
    pub fn node(&self, node_type: &NodeType, attrs: Attrs, content: Vec<Node>, marks: MarkSet) -> Node {
        let mut content = content;
        match node_type.content_model() {
            ContentModel::Leaf if !content.is_empty() => {
                warn!("{} is a leaf, dropping {} children", node_type.name(), content.len());
                content.clear();
            }
            ContentModel::Text => {
                let before = content.len();
                content.retain(Node::is_text);
                if content.len() < before {
                    warn!(
                        "{} holds text only, dropping {} children",
                        node_type.name(),
                        before - content.len()
                    );
                }
            }
            _ => {}
        }
        if content.is_empty()
            && let Some(child_type) = node_type.required_child().and_then(|c| self.node_type(c))
        {
            content.push(self.node(child_type, Attrs::new(), Vec::new(), MarkSet::empty()));
        }
        Node::new(node_type.clone(), node_type.compute_attrs(attrs), content, marks)
    }

    /// Builds a text run.
    pub fn text(&self, text: impl Into<String>, marks: MarkSet) -> Node {
        Node::new_text(self.text.clone(), text.into(), marks)
    }

    /// The token handler table, compiled from the rules on first call.
    ///
    /// A failed build is not cached; every call reports it again.
    pub fn token_handlers(&self) -> Result<&TokenHandlers, SchemaError> {
        if let Some(handlers) = self.handlers.get() {
            return Ok(handlers);
        }
        let built = TokenHandlers::build(self)?;
        debug!("compiled {} token handlers", built.len());
        Ok(self.handlers.get_or_init(|| built))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("nodes", &self.nodes)
            .field("marks", &self.marks)
            .field("top", &self.top)
            .finish_non_exhaustive()
    }
}
