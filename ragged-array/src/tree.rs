use std::fmt::{self};

use humansize::{DECIMAL, format_size};
use ragged_buffer::ByteBuffer;
use ragged_error::RaggedResult;

use crate::visitor::ContentVisitor;
use crate::{Content, Index};

impl Content {
    /// A multi-line rendering of the node tree, with the size of every buffer.
    pub fn tree_display(&self) -> impl fmt::Display + '_ {
        TreeDisplayWrapper(self)
    }
}

struct TreeDisplayWrapper<'a>(&'a Content);

impl fmt::Display for TreeDisplayWrapper<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut content_fmt = TreeFormatter {
            fmt,
            indent: "".to_string(),
            total_size: None,
        };
        content_fmt.format("root", self.0)
    }
}

struct TreeFormatter<'a, 'b: 'a> {
    fmt: &'a mut fmt::Formatter<'b>,
    indent: String,
    total_size: Option<usize>,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 100_f64;
    }
    100_f64 * part as f64 / whole as f64
}

impl<'a, 'b: 'a> TreeFormatter<'a, 'b> {
    fn format(&mut self, name: &str, content: &Content) -> fmt::Result {
        let nbytes = content.nbytes();
        let total_size = self.total_size.unwrap_or(nbytes);
        writeln!(
            self,
            "{}: {} {} nbytes={} ({:.2}%)",
            name,
            content.class_name(),
            content,
            format_size(nbytes, DECIMAL),
            percent(nbytes, total_size)
        )?;

        let mut buffers = BufferCollector::default();
        content.accept(&mut buffers).map_err(|_| fmt::Error)?;

        self.indent(|i| {
            if !content.parameters().is_empty() {
                write!(i, "parameters:")?;
                for (key, value) in content.parameters().iter() {
                    write!(i.fmt, " {key}={value}")?;
                }
                writeln!(i.fmt)?;
            }
            for (name, index) in &buffers.indices {
                writeln!(
                    i,
                    "{}: {} {} ({:.2}%)",
                    name,
                    index,
                    format_size(index.nbytes(), DECIMAL),
                    percent(index.nbytes(), nbytes)
                )?;
            }
            for (name, buffer) in &buffers.buffers {
                writeln!(
                    i,
                    "{} (align={}): {} ({:.2}%)",
                    name,
                    buffer.alignment(),
                    format_size(buffer.len(), DECIMAL),
                    percent(buffer.len(), nbytes)
                )?;
            }
            Ok(())
        })?;

        let old_total_size = self.total_size;
        self.total_size = Some(nbytes);
        self.indent(|i| {
            for (name, child) in content.named_children() {
                i.format(&name, &child)?;
            }
            Ok(())
        })?;

        self.total_size = old_total_size;
        Ok(())
    }

    fn indent<F>(&mut self, indented: F) -> fmt::Result
    where
        F: FnOnce(&mut TreeFormatter) -> fmt::Result,
    {
        let original_ident = self.indent.clone();
        self.indent += "  ";
        let res = indented(self);
        self.indent = original_ident;
        res
    }

    fn write_fmt(&mut self, fmt: fmt::Arguments<'_>) -> fmt::Result {
        write!(self.fmt, "{}{}", self.indent, fmt)
    }
}

#[derive(Default)]
struct BufferCollector {
    indices: Vec<(String, Index)>,
    buffers: Vec<(String, ByteBuffer)>,
}

impl ContentVisitor for BufferCollector {
    fn visit_index(&mut self, name: &str, index: &Index) -> RaggedResult<()> {
        self.indices.push((name.to_string(), index.clone()));
        Ok(())
    }

    fn visit_buffer(&mut self, name: &str, buffer: &ByteBuffer) -> RaggedResult<()> {
        self.buffers.push((name.to_string(), buffer.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ragged_buffer::buffer;

    use crate::{Content, Index, ListOffsetArray, NumpyArray};

    #[test]
    fn renders_each_node() {
        let list: Content = ListOffsetArray::try_new(
            Index::from(vec![0i64, 2, 3]),
            NumpyArray::new(buffer![1i32, 2, 3]).into(),
        )
        .unwrap()
        .into();
        let rendered = list.tree_display().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "root: ListOffsetArray 2 * var * int32 nbytes=36 B (100.00%)",
                "  offsets: Indexi64[0, 2, 3] 24 B (66.67%)",
                "  content: NumpyArray 3 * int32 nbytes=12 B (33.33%)",
                "    data (align=4): 12 B (100.00%)",
            ]
        );
    }
}
