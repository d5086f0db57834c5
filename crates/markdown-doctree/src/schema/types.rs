use std::fmt;
use std::sync::Arc;

use crate::model::{AttrValue, Attrs, Mark};
use crate::schema::ParseRule;

/// What a node type may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentModel {
    /// Block children (paragraphs, lists, ...).
    Block,
    /// Inline children: text runs and inline leaves.
    Inline,
    /// Unstyled text only, e.g. a code block.
    Text,
    /// No children.
    Leaf,
}

/// Declaration of a node type, consumed by [`SchemaBuilder`](super::SchemaBuilder).
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub(crate) name: String,
    pub(crate) attrs: Attrs,
    pub(crate) content: ContentModel,
    pub(crate) required_child: Option<String>,
    pub(crate) rules: Vec<ParseRule>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>, content: ContentModel) -> Self {
        Self {
            name: name.into(),
            attrs: Attrs::new(),
            content,
            required_child: None,
            rules: Vec::new(),
        }
    }

    /// Declares an attribute and its default. Use `AttrValue::Null` for
    /// attributes without a meaningful default.
    pub fn attr(mut self, name: impl Into<String>, default: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), default.into());
        self
    }

    /// A node of this type built with no children gets one empty child of
    /// `name`.
    pub fn requires_child(mut self, name: impl Into<String>) -> Self {
        self.required_child = Some(name.into());
        self
    }

    pub fn rule(mut self, rule: ParseRule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Declaration of a mark type.
#[derive(Debug, Clone)]
pub struct MarkSpec {
    pub(crate) name: String,
    pub(crate) attrs: Attrs,
    pub(crate) rules: Vec<ParseRule>,
}

impl MarkSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attrs::new(),
            rules: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, default: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), default.into());
        self
    }

    pub fn rule(mut self, rule: ParseRule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Keeps declared attributes only, filling the missing ones from defaults.
fn compute_attrs(declared: &Attrs, mut given: Attrs) -> Attrs {
    declared
        .iter()
        .map(|(name, default)| {
            let value = given.remove(name).unwrap_or_else(|| default.clone());
            (name.clone(), value)
        })
        .collect()
}

/// A node type of a built schema. Cheap to clone; compared by name.
#[derive(Clone)]
pub struct NodeType(Arc<NodeSpec>);

impl NodeType {
    pub(crate) fn new(spec: NodeSpec) -> Self {
        Self(Arc::new(spec))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn content_model(&self) -> ContentModel {
        self.0.content
    }

    pub fn required_child(&self) -> Option<&str> {
        self.0.required_child.as_deref()
    }

    pub fn declared_attrs(&self) -> &Attrs {
        &self.0.attrs
    }

    pub fn rules(&self) -> &[ParseRule] {
        &self.0.rules
    }

    pub(crate) fn compute_attrs(&self, given: Attrs) -> Attrs {
        compute_attrs(&self.0.attrs, given)
    }
}

impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.name() == other.name()
    }
}

impl Eq for NodeType {}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeType({})", self.name())
    }
}

/// A mark type of a built schema. Cheap to clone; compared by name.
#[derive(Clone)]
pub struct MarkType(Arc<MarkSpec>);

impl MarkType {
    pub(crate) fn new(spec: MarkSpec) -> Self {
        Self(Arc::new(spec))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn declared_attrs(&self) -> &Attrs {
        &self.0.attrs
    }

    pub fn rules(&self) -> &[ParseRule] {
        &self.0.rules
    }

    /// Builds a mark of this type; undeclared attributes are dropped.
    pub fn create(&self, attrs: Attrs) -> Mark {
        Mark::new(self.clone(), compute_attrs(&self.0.attrs, attrs))
    }
}

impl PartialEq for MarkType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.name() == other.name()
    }
}

impl Eq for MarkType {}

impl fmt::Debug for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarkType({})", self.name())
    }
}

/// The type that owns a parse rule, handed to custom handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Node(NodeType),
    Mark(MarkType),
}

impl TypeRef {
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Node(t) => t.name(),
            TypeRef::Mark(t) => t.name(),
        }
    }

    pub fn as_node(&self) -> Option<&NodeType> {
        match self {
            TypeRef::Node(t) => Some(t),
            TypeRef::Mark(_) => None,
        }
    }

    pub fn as_mark(&self) -> Option<&MarkType> {
        match self {
            TypeRef::Mark(t) => Some(t),
            TypeRef::Node(_) => None,
        }
    }

    pub fn rules(&self) -> &[ParseRule] {
        match self {
            TypeRef::Node(t) => t.rules(),
            TypeRef::Mark(t) => t.rules(),
        }
    }
}
