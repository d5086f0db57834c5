use crate::model::Mark;
use crate::schema::MarkType;

/// The marks active on a run of inline content.
///
/// Holds no two marks with the same type and attributes. Marks of one type
/// with different attributes may coexist. Every update returns a new set;
/// insertion order is kept so output is deterministic, but equality ignores
/// it.
#[derive(Debug, Clone, Default, Eq)]
pub struct MarkSet(Vec<Mark>);

impl MarkSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// The set with `mark` appended, or an unchanged copy if an identical
    /// mark is already present.
    pub fn add(&self, mark: Mark) -> Self {
        if self.contains(&mark) {
            return self.clone();
        }
        let mut marks = self.0.clone();
        marks.push(mark);
        Self(marks)
    }

    /// The set without any mark of `mark_type`, whatever its attributes.
    pub fn remove_type(&self, mark_type: &MarkType) -> Self {
        Self(
            self.0
                .iter()
                .filter(|m| !m.is_type(mark_type))
                .cloned()
                .collect(),
        )
    }

    pub fn contains(&self, mark: &Mark) -> bool {
        self.0.contains(mark)
    }

    pub fn has_type(&self, mark_type: &MarkType) -> bool {
        self.0.iter().any(|m| m.is_type(mark_type))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for MarkSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|m| other.contains(m))
    }
}

impl<'a> IntoIterator for &'a MarkSet {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        iter.into_iter().fold(MarkSet::empty(), |set, m| set.add(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attrs;
    use crate::schema::{MarkSpec, NodeSpec, SchemaBuilder};
    use crate::{ContentModel, Schema};

    fn schema() -> Schema {
        SchemaBuilder::new()
            .node(NodeSpec::new("doc", ContentModel::Block))
            .node(NodeSpec::new("text", ContentModel::Leaf))
            .mark(MarkSpec::new("em"))
            .mark(MarkSpec::new("strong"))
            .mark(MarkSpec::new("link").attr("href", "").attr("title", None::<&str>))
            .build()
            .unwrap()
    }

    fn mark(schema: &Schema, name: &str) -> Mark {
        schema.mark_type(name).unwrap().create(Default::default())
    }

    fn link(schema: &Schema, href: &str) -> Mark {
        schema
            .mark_type("link")
            .unwrap()
            .create(attrs([("href", href)]))
    }

    #[test]
    fn add_appends_in_order() {
        let schema = schema();
        let set = MarkSet::empty()
            .add(mark(&schema, "strong"))
            .add(mark(&schema, "em"));

        let names: Vec<_> = set.iter().map(Mark::name).collect();
        assert_eq!(names, ["strong", "em"]);
    }

    #[test]
    fn add_is_idempotent() {
        let schema = schema();
        let once = MarkSet::empty().add(link(&schema, "a"));
        let twice = once.add(link(&schema, "a"));

        assert_eq!(twice.len(), 1);
        assert_eq!(once, twice);
    }

    #[test]
    fn same_type_with_different_attrs_coexists() {
        let schema = schema();
        let set = MarkSet::empty()
            .add(link(&schema, "a"))
            .add(link(&schema, "b"));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_type_ignores_attrs() {
        let schema = schema();
        let link_type = schema.mark_type("link").unwrap();
        let set = MarkSet::empty()
            .add(link(&schema, "a"))
            .add(mark(&schema, "em"))
            .add(link(&schema, "b"));

        let removed = set.remove_type(link_type);
        assert_eq!(removed.len(), 1);
        assert!(!removed.has_type(link_type));
        // the original is untouched
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn remove_absent_type_is_noop() {
        let schema = schema();
        let set = MarkSet::empty().add(mark(&schema, "em"));

        assert_eq!(set.remove_type(schema.mark_type("strong").unwrap()), set);
    }

    #[test]
    fn equality_ignores_order() {
        let schema = schema();
        let a = MarkSet::empty()
            .add(mark(&schema, "em"))
            .add(mark(&schema, "strong"));
        let b = MarkSet::empty()
            .add(mark(&schema, "strong"))
            .add(mark(&schema, "em"));

        assert_eq!(a, b);
        assert_ne!(a, MarkSet::empty().add(mark(&schema, "em")));
    }
}
