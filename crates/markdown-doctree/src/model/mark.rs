use crate::model::{AttrValue, Attrs};
use crate::schema::MarkType;

/// An inline style annotation. Two marks are equal when their types and
/// attributes are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    mark_type: MarkType,
    attrs: Attrs,
}

impl Mark {
    pub(crate) fn new(mark_type: MarkType, attrs: Attrs) -> Self {
        Self { mark_type, attrs }
    }

    pub fn mark_type(&self) -> &MarkType {
        &self.mark_type
    }

    pub fn name(&self) -> &str {
        self.mark_type.name()
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn is_type(&self, mark_type: &MarkType) -> bool {
        &self.mark_type == mark_type
    }
}
