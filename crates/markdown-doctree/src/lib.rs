//! # markdown-doctree
//!
//! Turns the flat token stream of a CommonMark tokenizer into a typed
//! document tree: block nodes containing other nodes or text runs, each text
//! run carrying the set of marks (emphasis, strong, link, ...) active on it.
//!
//! ## Architecture Overview
//!
//! ```text
//! Token stream → TokenHandlers → ParseState → Node
//!                (from Schema)   (frame stack)
//! ```
//!
//! Node and mark types declare which tokens they claim through
//! [`ParseRule`]s. The [`Schema`] compiles those rules once into a table of
//! handlers keyed by token type name, and every parse of that schema reuses
//! it. The tokenizer itself is not part of this crate.
//!
//! ## Quick Start
//!
//! ```
//! use markdown_doctree::{Token, commonmark, parse};
//!
//! let schema = commonmark::schema().unwrap();
//! let tokens = vec![
//!     Token::open("paragraph"),
//!     Token::inline(vec![
//!         Token::text("a "),
//!         Token::open("em"),
//!         Token::text("b"),
//!         Token::close("em"),
//!     ]),
//!     Token::close("paragraph"),
//! ];
//!
//! let doc = parse(&schema, &tokens).unwrap();
//! assert_eq!(doc.child(0).unwrap().child_count(), 2);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! markdown-doctree/
//! ├── lib.rs          # This file - public API
//! ├── error.rs        # SchemaError, ParseError
//! ├── token.rs        # Token input records
//! ├── model/          # Attrs, Node, Mark, MarkSet
//! ├── schema/         # NodeType/MarkType catalog and ParseRules
//! ├── parsing/        # TokenHandlers, ParseState, parse()
//! └── commonmark.rs   # Schema for the markdown-it token vocabulary
//! ```

pub mod commonmark;
pub mod error;
pub mod model;
pub mod parsing;
pub mod schema;
pub mod token;

pub use error::{ParseError, SchemaError};
pub use model::{AttrValue, Attrs, Mark, MarkSet, Node, attrs};
pub use parsing::{ParseState, TokenHandlers, parse};
pub use schema::{
    AttrSource, ContentModel, MarkSpec, MarkType, NodeSpec, NodeType, ParseKind, ParseRule, Schema,
    SchemaBuilder, TypeRef,
};
pub use token::Token;
