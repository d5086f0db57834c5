use log::{trace, warn};

use crate::error::ParseError;
use crate::model::{Attrs, Mark, MarkSet, Node};
use crate::parsing::TokenHandlers;
use crate::schema::{MarkType, NodeType, Schema};
use crate::token::Token;

/// A node under construction.
#[derive(Debug)]
struct Frame {
    node_type: NodeType,
    attrs: Attrs,
    content: Vec<Node>,
}

impl Frame {
    fn new(node_type: NodeType, attrs: Attrs) -> Self {
        Self {
            node_type,
            attrs,
            content: Vec::new(),
        }
    }
}

/// Stack-based tree builder driven by token handlers.
///
/// Starts with a single root frame of the schema's top node type. Handlers
/// push and pop frames, append text and leaves to the top frame, and toggle
/// the active marks. [`finish`](Self::finish) closes whatever is still open
/// and returns the root.
pub struct ParseState<'s> {
    schema: &'s Schema,
    handlers: &'s TokenHandlers,
    stack: Vec<Frame>,
    marks: MarkSet,
}

impl<'s> ParseState<'s> {
    pub fn new(schema: &'s Schema, handlers: &'s TokenHandlers) -> Self {
        Self {
            schema,
            handlers,
            stack: vec![Frame::new(schema.top_node_type().clone(), Attrs::new())],
            marks: MarkSet::empty(),
        }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// The marks that text added now would carry.
    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    /// Number of open frames, the root included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn top_type(&self) -> Option<&NodeType> {
        self.stack.last().map(|f| &f.node_type)
    }

    /// Dispatches each token to its handler, in order.
    pub fn parse_tokens(&mut self, tokens: &[Token]) -> Result<(), ParseError> {
        let handlers = self.handlers;
        for token in tokens {
            let handler = handlers
                .get(&token.kind)
                .ok_or_else(|| ParseError::UnsupportedToken(token.kind.clone()))?;
            trace!("{} at depth {}", token.kind, self.stack.len());
            handler.handle(self, token)?;
        }
        Ok(())
    }

    /// Appends a text run with the active marks, merging it into the previous
    /// run when that one carries the same marks. Empty text is dropped.
    pub fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if let Some(last) = top.content.last_mut()
            && last.is_text()
            && last.marks() == &self.marks
        {
            last.push_text(text);
            return;
        }
        top.content.push(self.schema.text(text, self.marks.clone()));
    }

    pub fn open_mark(&mut self, mark: Mark) {
        self.marks = self.marks.add(mark);
    }

    /// Deactivates every mark of `mark_type`, whatever its attributes.
    pub fn close_mark(&mut self, mark_type: &MarkType) {
        self.marks = self.marks.remove_type(mark_type);
    }

    pub fn open_node(&mut self, node_type: NodeType, attrs: Attrs) {
        self.stack.push(Frame::new(node_type, attrs));
    }

    /// Closes the top frame and appends the finished node to its parent.
    ///
    /// The node carries the marks active at the moment of closing; the active
    /// set is then cleared, so marks left open across a block boundary do not
    /// leak into the following blocks. The root frame is only closed by
    /// [`finish`](Self::finish); a close arriving with nothing else open is
    /// ignored.
    pub fn close_node(&mut self) {
        if self.stack.len() <= 1 {
            warn!("ignoring close token with no open node");
            return;
        }
        if let Some(frame) = self.stack.pop() {
            let node = self.build(frame);
            if let Some(parent) = self.stack.last_mut() {
                parent.content.push(node);
            }
        }
    }

    /// Appends a finished node to the top frame without opening a frame for
    /// it. Used for leaves such as rules, images and hard breaks.
    pub fn add_node(&mut self, node_type: &NodeType, attrs: Attrs, content: Vec<Node>) {
        let node = self.schema.node(node_type, attrs, content, self.marks.clone());
        if let Some(top) = self.stack.last_mut() {
            top.content.push(node);
        }
    }

    /// Closes every open frame, root last, and returns the root.
    pub fn finish(mut self) -> Node {
        if self.stack.len() > 1 {
            warn!(
                "closing {} unclosed node(s) at end of input",
                self.stack.len() - 1
            );
        }
        let mut root = None;
        while let Some(frame) = self.stack.pop() {
            let node = self.build(frame);
            match self.stack.last_mut() {
                Some(parent) => parent.content.push(node),
                None => root = Some(node),
            }
        }
        root.unwrap_or_else(|| {
            let top = self.schema.top_node_type();
            self.schema.node(top, Attrs::new(), Vec::new(), MarkSet::empty())
        })
    }

    fn build(&mut self, frame: Frame) -> Node {
        let marks = std::mem::take(&mut self.marks);
        self.schema
            .node(&frame.node_type, frame.attrs, frame.content, marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ContentModel, MarkSpec, NodeSpec, SchemaBuilder};
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        SchemaBuilder::new()
            .node(NodeSpec::new("doc", ContentModel::Block))
            .node(NodeSpec::new("paragraph", ContentModel::Inline))
            .node(NodeSpec::new("hard_break", ContentModel::Leaf))
            .node(NodeSpec::new("text", ContentModel::Leaf))
            .mark(MarkSpec::new("em"))
            .mark(MarkSpec::new("strong"))
            .build()
            .unwrap()
    }

    fn with_state<R>(f: impl FnOnce(&Schema, &mut ParseState<'_>) -> R) -> R {
        let schema = schema();
        let handlers = schema.token_handlers().unwrap();
        let mut state = ParseState::new(&schema, handlers);
        f(&schema, &mut state)
    }

    fn em(schema: &Schema) -> Mark {
        schema.mark_type("em").unwrap().create(Attrs::new())
    }

    #[test]
    fn starts_with_root_frame_only() {
        with_state(|schema, state| {
            assert_eq!(state.depth(), 1);
            assert_eq!(state.top_type(), Some(schema.top_node_type()));
            assert!(state.marks().is_empty());
        });
    }

    #[test]
    fn same_marks_merge_into_one_run() {
        let paragraph = with_state(|schema, state| {
            state.open_node(schema.node_type("paragraph").unwrap().clone(), Attrs::new());
            state.add_text("foo");
            state.add_text("bar");
            state.close_node();
            assert_eq!(state.depth(), 1);
            state.stack[0].content[0].clone()
        });

        assert_eq!(paragraph.child_count(), 1);
        assert_eq!(paragraph.child(0).unwrap().text(), Some("foobar"));
    }

    #[test]
    fn different_marks_split_runs() {
        let paragraph = with_state(|schema, state| {
            state.open_node(schema.node_type("paragraph").unwrap().clone(), Attrs::new());
            state.add_text("plain");
            state.open_mark(em(schema));
            state.add_text("styled");
            state.close_mark(schema.mark_type("em").unwrap());
            state.add_text("plain again");
            state.close_node();
            state.stack[0].content[0].clone()
        });

        let runs: Vec<_> = paragraph
            .content()
            .iter()
            .map(|n| (n.text().unwrap_or_default(), n.marks().len()))
            .collect();
        assert_eq!(runs, [("plain", 0), ("styled", 1), ("plain again", 0)]);
    }

    #[test]
    fn empty_text_is_not_appended() {
        with_state(|_, state| {
            state.add_text("");
            assert!(state.stack[0].content.is_empty());
            state.add_text(" ");
            assert_eq!(state.stack[0].content.len(), 1);
        });
    }

    #[test]
    fn add_node_appends_leaf_without_frame() {
        with_state(|schema, state| {
            state.open_node(schema.node_type("paragraph").unwrap().clone(), Attrs::new());
            state.add_text("a");
            state.add_node(schema.node_type("hard_break").unwrap(), Attrs::new(), Vec::new());
            assert_eq!(state.depth(), 2);
            state.add_text("b");

            let names: Vec<_> = state.stack[1].content.iter().map(Node::name).collect();
            assert_eq!(names, ["text", "hard_break", "text"]);
        });
    }

    #[test]
    fn leaf_carries_active_marks() {
        with_state(|schema, state| {
            state.open_mark(em(schema));
            state.add_node(schema.node_type("hard_break").unwrap(), Attrs::new(), Vec::new());
            assert_eq!(state.stack[0].content[0].marks().len(), 1);
        });
    }

    // A mark still open when its block closes styles the closed node and is
    // then forgotten; nothing after the block inherits it.
    #[test]
    fn close_node_applies_then_clears_stray_marks() {
        with_state(|schema, state| {
            let paragraph = schema.node_type("paragraph").unwrap().clone();
            state.open_node(paragraph.clone(), Attrs::new());
            state.open_mark(em(schema));
            state.add_text("unterminated");
            state.close_node();

            assert!(state.marks().is_empty());
            let closed = &state.stack[0].content[0];
            assert!(closed.marks().contains(&em(schema)));
            assert!(closed.child(0).unwrap().marks().contains(&em(schema)));

            state.open_node(paragraph, Attrs::new());
            state.add_text("next");
            state.close_node();
            let next = &state.stack[0].content[1];
            assert!(next.child(0).unwrap().marks().is_empty());
        });
    }

    #[test]
    fn stray_close_keeps_root_open() {
        with_state(|_, state| {
            state.close_node();
            assert_eq!(state.depth(), 1);
            state.add_text("still here");
            assert_eq!(state.stack[0].content.len(), 1);
        });
    }

    #[test]
    fn finish_unwinds_open_frames_in_order() {
        let schema = schema();
        let handlers = schema.token_handlers().unwrap();
        let mut state = ParseState::new(&schema, handlers);
        let paragraph = schema.node_type("paragraph").unwrap().clone();

        state.open_node(paragraph, Attrs::new());
        state.add_text("one");
        state.add_node(schema.node_type("hard_break").unwrap(), Attrs::new(), Vec::new());
        state.add_text("two");

        let root = state.finish();
        assert_eq!(root.name(), "doc");
        let unclosed = root.child(0).unwrap();
        assert_eq!(unclosed.name(), "paragraph");
        let names: Vec<_> = unclosed.content().iter().map(Node::name).collect();
        assert_eq!(names, ["text", "hard_break", "text"]);
        assert_eq!(unclosed.text_content(), "onetwo");
    }

    #[test]
    fn unsupported_token_names_its_type() {
        with_state(|_, state| {
            let err = state
                .parse_tokens(&[Token::text("ok"), Token::new("bogus_token")])
                .unwrap_err();
            assert_eq!(err, ParseError::UnsupportedToken("bogus_token".into()));
        });
    }
}
