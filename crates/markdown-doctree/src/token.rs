//! Flat lexical tokens as produced by a markdown-it style tokenizer.
//!
//! Block constructs arrive as `<name>_open` / `<name>_close` pairs, leaf
//! constructs as a single token, and inline content of a block as one
//! `inline` token whose `children` hold the inline token stream.

use serde::{Deserialize, Deserializer, Serialize};

/// One token of the input stream. Empty strings and empty vectors stand for
/// "not present"; a `null` field in the input reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
    /// Token type name, e.g. `paragraph_open`, `text`, `hardbreak`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw HTML tag name, e.g. `h2` for a level-two heading.
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
    /// Attribute pairs in source order. Names may repeat; the first wins.
    #[serde(deserialize_with = "null_as_default")]
    pub attrs: Vec<(String, String)>,
    /// Literal text content.
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    /// Fence info string (language and params of a fenced code block).
    #[serde(deserialize_with = "null_as_default")]
    pub info: String,
    /// Inline children of an `inline` token.
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<Token>,
}

impl Token {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// `<name>_open`
    pub fn open(name: &str) -> Self {
        Self::new(format!("{name}_open"))
    }

    /// `<name>_close`
    pub fn close(name: &str) -> Self {
        Self::new(format!("{name}_close"))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new("text").with_content(content)
    }

    pub fn inline(children: Vec<Token>) -> Self {
        Self::new("inline").with_children(children)
    }

    pub fn softbreak() -> Self {
        Self::new("softbreak")
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_children(mut self, children: Vec<Token>) -> Self {
        self.children = children;
        self
    }

    /// Value of the first attribute called `name`, if any.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
