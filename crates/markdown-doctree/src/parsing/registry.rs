//! Compiles the parse rules of a schema into a table of token handlers.

use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::error::{ParseError, SchemaError};
use crate::parsing::ParseState;
use crate::schema::{AttrSource, CustomFn, MarkType, NodeType, ParseKind, ParseRule, Schema, TypeRef};
use crate::token::Token;

/// What happens when a token of a given type is consumed.
#[derive(Clone)]
pub enum Handler {
    OpenNode { node_type: NodeType, attrs: AttrSource },
    CloseNode,
    OpenMark { mark_type: MarkType, attrs: AttrSource },
    CloseMark { mark_type: MarkType },
    /// A childless node appended in place.
    Leaf { node_type: NodeType, attrs: AttrSource },
    /// Open, add the token's content as text, close.
    NodeWithContent { node_type: NodeType, attrs: AttrSource },
    /// Activate, add the token's content as text, deactivate.
    MarkWithContent { mark_type: MarkType, attrs: AttrSource },
    Custom { owner: TypeRef, run: CustomFn },
    Ignore,
    Text,
    Inline,
    SoftBreak,
}

impl Handler {
    pub fn handle(&self, state: &mut ParseState<'_>, token: &Token) -> Result<(), ParseError> {
        match self {
            Handler::OpenNode { node_type, attrs } => {
                let attrs = attrs.resolve(state, token);
                state.open_node(node_type.clone(), attrs);
            }
            Handler::CloseNode => state.close_node(),
            Handler::OpenMark { mark_type, attrs } => {
                let mark = mark_type.create(attrs.resolve(state, token));
                state.open_mark(mark);
            }
            Handler::CloseMark { mark_type } => state.close_mark(mark_type),
            Handler::Leaf { node_type, attrs } => {
                let attrs = attrs.resolve(state, token);
                state.add_node(node_type, attrs, Vec::new());
            }
            Handler::NodeWithContent { node_type, attrs } => {
                let attrs = attrs.resolve(state, token);
                state.open_node(node_type.clone(), attrs);
                state.add_text(without_trailing_newline(&token.content));
                state.close_node();
            }
            Handler::MarkWithContent { mark_type, attrs } => {
                let mark = mark_type.create(attrs.resolve(state, token));
                state.open_mark(mark);
                state.add_text(&token.content);
                state.close_mark(mark_type);
            }
            Handler::Custom { owner, run } => return run(state, token, owner),
            Handler::Ignore => {}
            Handler::Text => state.add_text(&token.content),
            Handler::Inline => return state.parse_tokens(&token.children),
            Handler::SoftBreak => state.add_text("\n"),
        }
        Ok(())
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::OpenNode { node_type, .. } => write!(f, "OpenNode({})", node_type.name()),
            Handler::CloseNode => f.write_str("CloseNode"),
            Handler::OpenMark { mark_type, .. } => write!(f, "OpenMark({})", mark_type.name()),
            Handler::CloseMark { mark_type } => write!(f, "CloseMark({})", mark_type.name()),
            Handler::Leaf { node_type, .. } => write!(f, "Leaf({})", node_type.name()),
            Handler::NodeWithContent { node_type, .. } => {
                write!(f, "NodeWithContent({})", node_type.name())
            }
            Handler::MarkWithContent { mark_type, .. } => {
                write!(f, "MarkWithContent({})", mark_type.name())
            }
            Handler::Custom { owner, .. } => write!(f, "Custom({})", owner.name()),
            Handler::Ignore => f.write_str("Ignore"),
            Handler::Text => f.write_str("Text"),
            Handler::Inline => f.write_str("Inline"),
            Handler::SoftBreak => f.write_str("SoftBreak"),
        }
    }
}

/// Strips exactly one trailing `\n`, as tokenizers leave it on code content.
pub fn without_trailing_newline(text: &str) -> &str {
    text.strip_suffix('\n').unwrap_or(text)
}

/// Token type name → handler, for one schema.
#[derive(Debug)]
pub struct TokenHandlers {
    handlers: HashMap<String, Handler>,
}

impl TokenHandlers {
    /// Compiles every rule of every node and mark type of `schema`.
    ///
    /// Rules may replace the built-in `text`, `inline` and `softbreak`
    /// handlers, but no two rules may claim the same token type.
    pub fn build(schema: &Schema) -> Result<Self, SchemaError> {
        let mut handlers = HashMap::new();
        let mut owners: HashMap<String, String> = HashMap::new();

        let owned = schema
            .node_types()
            .iter()
            .cloned()
            .map(TypeRef::Node)
            .chain(schema.mark_types().iter().cloned().map(TypeRef::Mark));

        for owner in owned {
            for rule in owner.rules() {
                for (key, handler) in compile(&owner, rule)? {
                    if let Some(first) = owners.get(&key) {
                        return Err(SchemaError::DuplicateToken {
                            token: key,
                            first: first.clone(),
                            second: owner.name().to_string(),
                        });
                    }
                    trace!("{key} -> {handler:?}");
                    owners.insert(key.clone(), owner.name().to_string());
                    handlers.insert(key, handler);
                }
            }
        }

        handlers.entry("text".into()).or_insert(Handler::Text);
        handlers.entry("inline".into()).or_insert(Handler::Inline);
        handlers.entry("softbreak".into()).or_insert(Handler::SoftBreak);

        Ok(Self { handlers })
    }

    pub fn get(&self, kind: &str) -> Option<&Handler> {
        self.handlers.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered token type names, sorted.
    pub fn token_kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

fn compile(owner: &TypeRef, rule: &ParseRule) -> Result<Vec<(String, Handler)>, SchemaError> {
    let invalid = |reason: &str| SchemaError::InvalidRule {
        owner: owner.name().to_string(),
        token: rule.token.clone(),
        reason: reason.to_string(),
    };
    if rule.token.is_empty() {
        return Err(invalid("token name is empty"));
    }

    let token = &rule.token;
    let pair = |open: Handler, close: Handler| {
        vec![
            (format!("{token}_open"), open),
            (format!("{token}_close"), close),
        ]
    };
    let attrs = rule.attrs.clone();

    let compiled = match (&rule.kind, owner) {
        (ParseKind::Block, TypeRef::Node(node_type)) if rule.no_close_token => {
            vec![(
                token.clone(),
                Handler::NodeWithContent {
                    node_type: node_type.clone(),
                    attrs,
                },
            )]
        }
        (ParseKind::Block, TypeRef::Node(node_type)) => pair(
            Handler::OpenNode {
                node_type: node_type.clone(),
                attrs,
            },
            Handler::CloseNode,
        ),
        (ParseKind::Block, TypeRef::Mark(_)) => {
            return Err(invalid("`block` rules belong on node types"));
        }
        (ParseKind::Mark, TypeRef::Mark(mark_type)) if rule.no_close_token => {
            vec![(
                token.clone(),
                Handler::MarkWithContent {
                    mark_type: mark_type.clone(),
                    attrs,
                },
            )]
        }
        (ParseKind::Mark, TypeRef::Mark(mark_type)) => pair(
            Handler::OpenMark {
                mark_type: mark_type.clone(),
                attrs,
            },
            Handler::CloseMark {
                mark_type: mark_type.clone(),
            },
        ),
        (ParseKind::Mark, TypeRef::Node(_)) => {
            return Err(invalid("`mark` rules belong on mark types"));
        }
        (ParseKind::Leaf, TypeRef::Node(node_type)) => vec![(
            token.clone(),
            Handler::Leaf {
                node_type: node_type.clone(),
                attrs,
            },
        )],
        (ParseKind::Leaf, TypeRef::Mark(_)) => {
            return Err(invalid("`leaf` rules belong on node types"));
        }
        (ParseKind::Ignore, _) if rule.no_close_token => vec![(token.clone(), Handler::Ignore)],
        (ParseKind::Ignore, _) => pair(Handler::Ignore, Handler::Ignore),
        (ParseKind::Custom(run), owner) => vec![(
            token.clone(),
            Handler::Custom {
                owner: owner.clone(),
                run: run.clone(),
            },
        )],
    };
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ContentModel, MarkSpec, NodeSpec, SchemaBuilder};
    use pretty_assertions::assert_eq;

    fn base() -> SchemaBuilder {
        SchemaBuilder::new()
            .node(NodeSpec::new("doc", ContentModel::Block))
            .node(NodeSpec::new("text", ContentModel::Leaf))
    }

    #[test]
    fn compiles_each_rule_kind_to_its_keys() {
        let schema = base()
            .node(NodeSpec::new("paragraph", ContentModel::Inline).rule(ParseRule::block("paragraph")))
            .node(
                NodeSpec::new("code_block", ContentModel::Text)
                    .rule(ParseRule::block("code_block").no_close_token()),
            )
            .node(NodeSpec::new("horizontal_rule", ContentModel::Leaf).rule(ParseRule::leaf("hr")))
            .node(
                NodeSpec::new("html", ContentModel::Leaf)
                    .rule(ParseRule::ignore("html_block").no_close_token())
                    .rule(ParseRule::ignore("front_matter")),
            )
            .mark(MarkSpec::new("em").rule(ParseRule::mark("em")))
            .mark(MarkSpec::new("code").rule(ParseRule::mark("code_inline").no_close_token()))
            .build()
            .unwrap();

        let handlers = schema.token_handlers().unwrap();
        assert_eq!(
            handlers.token_kinds(),
            [
                "code_block",
                "code_inline",
                "em_close",
                "em_open",
                "front_matter_close",
                "front_matter_open",
                "hr",
                "html_block",
                "inline",
                "paragraph_close",
                "paragraph_open",
                "softbreak",
                "text",
            ]
        );
        assert!(matches!(handlers.get("hr"), Some(Handler::Leaf { .. })));
        assert!(matches!(handlers.get("em_close"), Some(Handler::CloseMark { .. })));
        assert!(matches!(handlers.get("code_block"), Some(Handler::NodeWithContent { .. })));
    }

    #[test]
    fn mark_rule_on_node_type_is_rejected() {
        let schema = base()
            .node(NodeSpec::new("paragraph", ContentModel::Inline).rule(ParseRule::mark("paragraph")))
            .build()
            .unwrap();

        let err = schema.token_handlers().unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidRule { ref owner, ref token, .. }
                if owner == "paragraph" && token == "paragraph"
        ));
    }

    #[test]
    fn block_rule_on_mark_type_is_rejected() {
        let schema = base()
            .mark(MarkSpec::new("em").rule(ParseRule::block("em")))
            .build()
            .unwrap();

        assert!(matches!(
            schema.token_handlers(),
            Err(SchemaError::InvalidRule { .. })
        ));
    }

    #[test]
    fn empty_token_name_is_rejected() {
        let schema = base()
            .node(NodeSpec::new("hr", ContentModel::Leaf).rule(ParseRule::leaf("")))
            .build()
            .unwrap();

        assert!(matches!(
            schema.token_handlers(),
            Err(SchemaError::InvalidRule { .. })
        ));
    }

    #[test]
    fn two_types_claiming_one_token_is_rejected() {
        let schema = base()
            .mark(MarkSpec::new("em").rule(ParseRule::mark("em")))
            .mark(MarkSpec::new("italic").rule(ParseRule::mark("em")))
            .build()
            .unwrap();

        assert_eq!(
            schema.token_handlers().unwrap_err(),
            SchemaError::DuplicateToken {
                token: "em_open".into(),
                first: "em".into(),
                second: "italic".into(),
            }
        );
    }

    #[test]
    fn rules_may_replace_builtins() {
        let schema = base()
            .node(NodeSpec::new("hard_break", ContentModel::Leaf).rule(ParseRule::leaf("softbreak")))
            .build()
            .unwrap();

        let handlers = schema.token_handlers().unwrap();
        assert!(matches!(handlers.get("softbreak"), Some(Handler::Leaf { .. })));
        assert!(matches!(handlers.get("text"), Some(Handler::Text)));
    }

    #[test]
    fn table_is_built_once_per_schema() {
        let schema = base().build().unwrap();
        let first = schema.token_handlers().unwrap() as *const TokenHandlers;
        let second = schema.token_handlers().unwrap() as *const TokenHandlers;
        assert_eq!(first, second);
    }

    #[test]
    fn strips_one_trailing_newline_only() {
        assert_eq!(without_trailing_newline("a\n\n"), "a\n");
        assert_eq!(without_trailing_newline("a"), "a");
        assert_eq!(without_trailing_newline(""), "");
    }
}
