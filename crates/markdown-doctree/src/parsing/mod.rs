//! # Token Stream → Document Tree
//!
//! ## Pipeline
//!
//! ```text
//! Tokens → TokenHandlers (per schema, cached) → ParseState (frame stack) → Node
//! ```
//!
//! 1. The schema's handler table is fetched, compiling it from the parse
//!    rules on first use ([`registry`]).
//! 2. A fresh [`ParseState`] starts with one root frame and dispatches every
//!    token to its handler, recursing into `inline` children ([`state`]).
//! 3. Whatever is still open after the last token is closed, so truncated
//!    input still yields a single well-formed root.
//!
//! ## Modules
//!
//! - **`registry`**: `TokenHandlers` and the `Handler` variants
//! - **`state`**: `ParseState`, the tree builder handlers drive
//! - **`snapshot`**: indented text rendering of a tree, for tests and debugging

pub mod registry;
pub mod snapshot;
pub mod state;

pub use registry::{Handler, TokenHandlers, without_trailing_newline};
pub use state::ParseState;

use crate::error::ParseError;
use crate::model::Node;
use crate::schema::Schema;
use crate::token::Token;

/// Converts a full token stream into the document root.
pub fn parse(schema: &Schema, tokens: &[Token]) -> Result<Node, ParseError> {
    let handlers = schema.token_handlers()?;
    let mut state = ParseState::new(schema, handlers);
    state.parse_tokens(tokens)?;
    Ok(state.finish())
}
