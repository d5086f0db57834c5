//! Parse rules: how a node or mark type claims tokens.

use std::fmt;
use std::sync::Arc;

use crate::error::ParseError;
use crate::model::Attrs;
use crate::parsing::ParseState;
use crate::schema::TypeRef;
use crate::token::Token;

/// Computes attributes from the live parse state and the triggering token.
pub type AttrsFn = Arc<dyn Fn(&ParseState<'_>, &Token) -> Attrs + Send + Sync>;

/// A hand-written token handler. Receives the type that declared it.
pub type CustomFn =
    Arc<dyn Fn(&mut ParseState<'_>, &Token, &TypeRef) -> Result<(), ParseError> + Send + Sync>;

/// Where a rule gets the attributes of the node or mark it creates.
#[derive(Clone, Default)]
pub enum AttrSource {
    #[default]
    None,
    Static(Attrs),
    Computed(AttrsFn),
}

impl AttrSource {
    pub fn resolve(&self, state: &ParseState<'_>, token: &Token) -> Attrs {
        match self {
            AttrSource::None => Attrs::new(),
            AttrSource::Static(attrs) => attrs.clone(),
            AttrSource::Computed(f) => f(state, token),
        }
    }
}

impl fmt::Debug for AttrSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrSource::None => f.write_str("None"),
            AttrSource::Static(attrs) => f.debug_tuple("Static").field(attrs).finish(),
            AttrSource::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// What a rule does with the tokens it claims.
#[derive(Clone)]
pub enum ParseKind {
    /// `<token>_open` opens a frame of the owning node type, `<token>_close`
    /// closes it.
    Block,
    /// `<token>_open` activates a mark of the owning type, `<token>_close`
    /// deactivates every mark of that type.
    Mark,
    /// `<token>` appends a childless node of the owning type in place.
    Leaf,
    /// The claimed tokens are consumed without effect.
    Ignore,
    /// `<token>` runs a hand-written handler.
    Custom(CustomFn),
}

impl fmt::Debug for ParseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseKind::Block => f.write_str("Block"),
            ParseKind::Mark => f.write_str("Mark"),
            ParseKind::Leaf => f.write_str("Leaf"),
            ParseKind::Ignore => f.write_str("Ignore"),
            ParseKind::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A declaration attached to a node or mark type.
#[derive(Debug, Clone)]
pub struct ParseRule {
    pub token: String,
    pub kind: ParseKind,
    pub attrs: AttrSource,
    /// The construct arrives as one token carrying its text in `content`
    /// instead of an `_open` / `_close` pair.
    pub no_close_token: bool,
}

impl ParseRule {
    fn with_kind(token: impl Into<String>, kind: ParseKind) -> Self {
        Self {
            token: token.into(),
            kind,
            attrs: AttrSource::None,
            no_close_token: false,
        }
    }

    pub fn block(token: impl Into<String>) -> Self {
        Self::with_kind(token, ParseKind::Block)
    }

    pub fn mark(token: impl Into<String>) -> Self {
        Self::with_kind(token, ParseKind::Mark)
    }

    pub fn leaf(token: impl Into<String>) -> Self {
        Self::with_kind(token, ParseKind::Leaf)
    }

    pub fn ignore(token: impl Into<String>) -> Self {
        Self::with_kind(token, ParseKind::Ignore)
    }

    pub fn custom<F>(token: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut ParseState<'_>, &Token, &TypeRef) -> Result<(), ParseError>
            + Send
            + Sync
            + 'static,
    {
        Self::with_kind(token, ParseKind::Custom(Arc::new(handler)))
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = AttrSource::Static(attrs);
        self
    }

    pub fn computed_attrs<F>(mut self, f: F) -> Self
    where
        F: Fn(&ParseState<'_>, &Token) -> Attrs + Send + Sync + 'static,
    {
        self.attrs = AttrSource::Computed(Arc::new(f));
        self
    }

    pub fn no_close_token(mut self) -> Self {
        self.no_close_token = true;
        self
    }
}
