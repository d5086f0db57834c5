//! # Document Model
//!
//! The values the tree builder produces:
//!
//! - **`attrs`**: `AttrValue` and the ordered `Attrs` bag
//! - **`node`**: immutable `Node` tree, text runs included
//! - **`mark`**: `Mark` style annotations compared by type and attributes
//! - **`mark_set`**: the deduplicated `MarkSet` active on a text run

pub mod attrs;
pub mod mark;
pub mod mark_set;
pub mod node;

pub use attrs::{AttrValue, Attrs, attrs};
pub use mark::Mark;
pub use mark_set::MarkSet;
pub use node::Node;
