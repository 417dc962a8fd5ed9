//! Utilities to traverse layout trees using the visitor pattern.

use ragged_buffer::ByteBuffer;
use ragged_error::{RaggedExpect, RaggedResult};

use crate::{Content, Index};

/// Receives the named buffers and children of one node, in the order its form names them.
pub trait ContentVisitor {
    /// Visit a child of this node.
    fn visit_child(&mut self, _name: &str, _content: &Content) -> RaggedResult<()> {
        Ok(())
    }

    /// Visit an integer buffer of this node.
    fn visit_index(&mut self, _name: &str, _index: &Index) -> RaggedResult<()> {
        Ok(())
    }

    /// Visit a raw data buffer of this node.
    fn visit_buffer(&mut self, _name: &str, _buffer: &ByteBuffer) -> RaggedResult<()> {
        Ok(())
    }
}

/// Visitor to flatten a layout tree.
#[derive(Default, Debug)]
pub struct ChildrenVisitor {
    /// The children visited so far.
    pub children: Vec<Content>,
}

/// Visitor to flatten a layout tree while keeping each child's name.
#[derive(Default, Debug)]
pub struct NamedChildrenVisitor {
    /// The children visited so far, with their names.
    pub children: Vec<(String, Content)>,
}

impl ContentVisitor for ChildrenVisitor {
    fn visit_child(&mut self, _name: &str, content: &Content) -> RaggedResult<()> {
        self.children.push(content.clone());
        Ok(())
    }
}

impl ContentVisitor for NamedChildrenVisitor {
    fn visit_child(&mut self, name: &str, content: &Content) -> RaggedResult<()> {
        self.children.push((name.to_string(), content.clone()));
        Ok(())
    }
}

impl Content {
    /// The direct children of this node, with the names used for them in buffer keys.
    pub fn named_children(&self) -> Vec<(String, Content)> {
        let mut visitor = NamedChildrenVisitor::default();
        self.accept(&mut visitor)
            .ragged_expect("Failed to get children from Content");
        visitor.children
    }
}

#[cfg(test)]
mod tests {
    use ragged_buffer::buffer;

    use super::*;
    use crate::{NumpyArray, RecordArray, UnionArray};

    #[test]
    fn record_children_by_field() {
        let record: Content = RecordArray::try_new(
            vec![
                NumpyArray::new(buffer![1i64]).into(),
                NumpyArray::new(buffer![2.0f32]).into(),
            ],
            Some(vec!["x".into(), "y".into()]),
            None,
        )
        .unwrap()
        .into();
        let names: Vec<String> = record.named_children().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn union_children_by_position() {
        let union: Content = UnionArray::try_new(
            Index::from(vec![0i8, 1]),
            Index::from(vec![0i64, 0]),
            vec![
                NumpyArray::new(buffer![1i64]).into(),
                NumpyArray::new(buffer![2.0f32]).into(),
            ],
        )
        .unwrap()
        .into();
        let mut visitor = ChildrenVisitor::default();
        union.accept(&mut visitor).unwrap();
        assert_eq!(visitor.children.len(), 2);
        let names: Vec<String> = union.named_children().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["content0", "content1"]);
    }
}
