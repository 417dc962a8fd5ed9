use ragged_buffer::ByteBuffer;
use ragged_error::{RaggedExpect, RaggedResult};

use crate::visitor::ContentVisitor;
use crate::{Content, Index};

impl Content {
    /// Total size of the layout in bytes, including all children and buffers.
    pub fn nbytes(&self) -> usize {
        let mut visitor = NBytesVisitor::default();
        self.accept(&mut visitor)
            .ragged_expect("Failed to get nbytes from Content");
        visitor.0
    }
}

#[derive(Default)]
struct NBytesVisitor(usize);

impl ContentVisitor for NBytesVisitor {
    fn visit_child(&mut self, _name: &str, content: &Content) -> RaggedResult<()> {
        self.0 += content.nbytes();
        Ok(())
    }

    fn visit_index(&mut self, _name: &str, index: &Index) -> RaggedResult<()> {
        self.0 += index.nbytes();
        Ok(())
    }

    fn visit_buffer(&mut self, _name: &str, buffer: &ByteBuffer) -> RaggedResult<()> {
        self.0 += buffer.len();
        Ok(())
    }
}
