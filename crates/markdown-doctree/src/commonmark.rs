//! A ready-made schema for the CommonMark token vocabulary of markdown-it.
//!
//! | Node            | Tokens                         |
//! |-----------------|--------------------------------|
//! | paragraph       | `paragraph_open/close`         |
//! | blockquote      | `blockquote_open/close`        |
//! | heading         | `heading_open/close` (`hN` tag)|
//! | code_block      | `code_block`, `fence`          |
//! | horizontal_rule | `hr`                           |
//! | bullet_list     | `bullet_list_open/close`       |
//! | ordered_list    | `ordered_list_open/close`      |
//! | list_item       | `list_item_open/close`         |
//! | image           | `image`                        |
//! | hard_break      | `hardbreak`                    |
//!
//! Marks: `em`, `strong`, `link` (`href`, `title`) and `code`
//! (`code_inline`, a single token carrying its text).

use crate::error::{ParseError, SchemaError};
use crate::model::{AttrValue, Attrs, attrs};
use crate::parsing::{ParseState, without_trailing_newline};
use crate::schema::{ContentModel, MarkSpec, NodeSpec, ParseRule, Schema, SchemaBuilder, TypeRef};
use crate::token::Token;

pub fn builder() -> SchemaBuilder {
    SchemaBuilder::new()
        .node(NodeSpec::new("doc", ContentModel::Block))
        .node(NodeSpec::new("paragraph", ContentModel::Inline).rule(ParseRule::block("paragraph")))
        .node(NodeSpec::new("blockquote", ContentModel::Block).rule(ParseRule::block("blockquote")))
        .node(
            NodeSpec::new("heading", ContentModel::Inline)
                .attr("level", 1_i64)
                .rule(ParseRule::block("heading").computed_attrs(|_, token| heading_attrs(token))),
        )
        .node(
            NodeSpec::new("code_block", ContentModel::Text)
                .attr("params", "")
                .rule(ParseRule::custom("code_block", code_block))
                .rule(ParseRule::custom("fence", code_block)),
        )
        .node(NodeSpec::new("horizontal_rule", ContentModel::Leaf).rule(ParseRule::leaf("hr")))
        .node(NodeSpec::new("bullet_list", ContentModel::Block).rule(ParseRule::block("bullet_list")))
        .node(
            NodeSpec::new("ordered_list", ContentModel::Block)
                .attr("order", 1_i64)
                .rule(ParseRule::block("ordered_list").computed_attrs(|_, token| ordered_list_attrs(token))),
        )
        .node(
            NodeSpec::new("list_item", ContentModel::Block)
                .requires_child("paragraph")
                .rule(ParseRule::block("list_item")),
        )
        .node(
            NodeSpec::new("image", ContentModel::Leaf)
                .attr("src", "")
                .attr("alt", AttrValue::Null)
                .attr("title", AttrValue::Null)
                .rule(ParseRule::leaf("image").computed_attrs(|_, token| image_attrs(token))),
        )
        .node(NodeSpec::new("hard_break", ContentModel::Leaf).rule(ParseRule::leaf("hardbreak")))
        .node(NodeSpec::new("text", ContentModel::Leaf))
        .mark(MarkSpec::new("em").rule(ParseRule::mark("em")))
        .mark(MarkSpec::new("strong").rule(ParseRule::mark("strong")))
        .mark(
            MarkSpec::new("link")
                .attr("href", "")
                .attr("title", AttrValue::Null)
                .rule(ParseRule::mark("link").computed_attrs(|_, token| link_attrs(token))),
        )
        .mark(MarkSpec::new("code").rule(ParseRule::mark("code_inline").no_close_token()))
}

pub fn schema() -> Result<Schema, SchemaError> {
    builder().build()
}

/// `h3` → level 3. Anything unparsable falls back to 1.
fn heading_attrs(token: &Token) -> Attrs {
    let level = token
        .tag
        .strip_prefix('h')
        .and_then(|l| l.parse::<i64>().ok())
        .unwrap_or(1);
    attrs([("level", level)])
}

fn ordered_list_attrs(token: &Token) -> Attrs {
    let order = token
        .attr("order")
        .and_then(|o| o.trim().parse::<i64>().ok())
        .unwrap_or(1);
    attrs([("order", order)])
}

fn link_attrs(token: &Token) -> Attrs {
    attrs([
        ("href", AttrValue::from(token.attr("href").unwrap_or_default())),
        ("title", token.attr("title").into()),
    ])
}

fn image_attrs(token: &Token) -> Attrs {
    let alt = token
        .children
        .first()
        .map(|c| c.content.as_str())
        .or(Some(token.content.as_str()))
        .filter(|a| !a.is_empty());
    attrs([
        ("src", AttrValue::from(token.attr("src").unwrap_or_default())),
        ("alt", alt.into()),
        ("title", token.attr("title").into()),
    ])
}

/// Indented and fenced code both arrive as one token; the fence info string
/// becomes `params`.
fn code_block(state: &mut ParseState<'_>, token: &Token, owner: &TypeRef) -> Result<(), ParseError> {
    if let Some(node_type) = owner.as_node() {
        state.open_node(node_type.clone(), attrs([("params", token.info.trim())]));
        state.add_text(without_trailing_newline(&token.content));
        state.close_node();
    }
    Ok(())
}
