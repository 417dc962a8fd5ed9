//! Flattening a layout into named buffers, and rebuilding it from them.
//!
//! A layout travels as the triple of its [`Form`] with form keys, its length, and a
//! [`BufferMap`] from `"{form_key}-{attribute}"` to raw little-endian bytes.

use std::collections::BTreeMap;

use ragged_buffer::{Alignment, ByteBuffer};
use ragged_error::{RaggedResult, ragged_bail, ragged_err};
use ragged_form::{Form, IndexType};

use crate::backend::Backend;
use crate::visitor::ContentVisitor;
use crate::{
    BitMaskedArray, ByteMaskedArray, Content, Index, IndexedArray, IndexedOptionArray, ListArray,
    ListOffsetArray, NumpyArray, RecordArray, RegularArray, UnionArray,
};

/// Named buffers, keyed by `"{form_key}-{attribute}"`.
pub type BufferMap = BTreeMap<String, ByteBuffer>;

/// How [`to_buffers`] names the nodes of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferOptions {
    /// The prefix of every form key.
    pub form_key_prefix: String,
    /// The number given to the root node; the others follow in preorder.
    pub id_start: usize,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            form_key_prefix: "node".to_string(),
            id_start: 0,
        }
    }
}

/// The serialized representation of a layout.
#[derive(Debug, Clone)]
pub struct ToBuffers {
    /// The form of the layout, with a form key on every node.
    pub form: Form,
    /// The number of top-level elements.
    pub length: usize,
    /// The buffers named by the form.
    pub buffers: BufferMap,
}

/// Flatten `content` into a form with keys, its length, and the buffers the form names.
pub fn to_buffers(
    content: &Content,
    options: &BufferOptions,
    backend: &dyn Backend,
) -> RaggedResult<ToBuffers> {
    log::debug!(
        "flattening {} into buffers keyed by {}",
        content.class_name(),
        options.form_key_prefix
    );
    let form = content.form_with_keys(&options.form_key_prefix, options.id_start);
    let mut buffers = BufferMap::new();
    collect(content, &form, &mut buffers, backend)?;
    log::debug!(
        "flattened {} elements into {} buffers of {} bytes",
        content.len(),
        buffers.len(),
        buffers.values().map(ByteBuffer::len).sum::<usize>()
    );
    Ok(ToBuffers {
        form,
        length: content.len(),
        buffers,
    })
}

fn collect(
    content: &Content,
    form: &Form,
    buffers: &mut BufferMap,
    backend: &dyn Backend,
) -> RaggedResult<()> {
    let mut collector = BufferCollector {
        form,
        children: form.children().into_iter(),
        buffers,
        backend,
    };
    content.accept(&mut collector)
}

struct BufferCollector<'a> {
    form: &'a Form,
    children: std::vec::IntoIter<&'a Form>,
    buffers: &'a mut BufferMap,
    backend: &'a dyn Backend,
}

impl BufferCollector<'_> {
    fn insert(&mut self, name: &str, buffer: &ByteBuffer, alignment: Alignment) -> RaggedResult<()> {
        let key = self.form.buffer_key(name)?;
        let buffer = self.backend.as_contiguous_buffer(buffer, alignment)?;
        self.buffers.insert(key, buffer);
        Ok(())
    }
}

impl ContentVisitor for BufferCollector<'_> {
    fn visit_child(&mut self, name: &str, content: &Content) -> RaggedResult<()> {
        let form = self
            .children
            .next()
            .ok_or_else(|| ragged_err!(InvalidSerde: "form has no child for {name}"))?;
        collect(content, form, self.buffers, self.backend)
    }

    fn visit_index(&mut self, name: &str, index: &Index) -> RaggedResult<()> {
        let alignment = Alignment::new(index.index_type().byte_width());
        self.insert(name, &index.to_byte_buffer(), alignment)
    }

    fn visit_buffer(&mut self, name: &str, buffer: &ByteBuffer) -> RaggedResult<()> {
        let alignment = match self.form {
            Form::Numpy(numpy) => Alignment::new(numpy.primitive().byte_width()),
            _ => Alignment::none(),
        };
        self.insert(name, buffer, alignment)
    }
}

/// Rebuild a layout of `length` elements from a form with keys and the buffers it names.
///
/// Only the keys the form names are read, so a form pruned by
/// [`Form::select_columns`] materializes only the selected columns. Buffers may be longer
/// than needed; each is sliced to the length its node requires.
pub fn from_buffers(
    form: &Form,
    length: usize,
    buffers: &BufferMap,
    backend: &dyn Backend,
) -> RaggedResult<Content> {
    log::debug!(
        "rebuilding {length} elements of {} from {} buffers",
        form.class_name(),
        buffers.len()
    );
    let content = build(form, length, buffers, backend)?;
    log::debug!("rebuilt {} ({} bytes)", content, content.nbytes());
    Ok(content)
}

fn read_bytes(
    form: &Form,
    attribute: &str,
    nbytes: usize,
    alignment: Alignment,
    buffers: &BufferMap,
    backend: &dyn Backend,
) -> RaggedResult<ByteBuffer> {
    let key = form.buffer_key(attribute)?;
    let buffer = buffers
        .get(&key)
        .ok_or_else(|| ragged_err!(InvalidSerde: "buffer {key} is missing"))?;
    if buffer.len() < nbytes {
        ragged_bail!(
            InvalidSerde: "buffer {key} holds {} bytes but {nbytes} are needed",
            buffer.len()
        );
    }
    backend.as_contiguous_buffer(&buffer.slice(0..nbytes), alignment)
}

fn read_index(
    form: &Form,
    attribute: &str,
    index_type: IndexType,
    len: usize,
    buffers: &BufferMap,
    backend: &dyn Backend,
) -> RaggedResult<Index> {
    let width = index_type.byte_width();
    let nbytes = checked(len.checked_mul(width), form, attribute)?;
    let bytes = read_bytes(form, attribute, nbytes, Alignment::new(width), buffers, backend)?;
    Index::from_byte_buffer(index_type, bytes)
}

fn checked(value: Option<usize>, form: &Form, attribute: &str) -> RaggedResult<usize> {
    value.ok_or_else(|| {
        ragged_err!(
            InvalidSerde: "{} of {} overflows at the requested length",
            attribute,
            form.class_name()
        )
    })
}

/// One past the largest non-negative entry, or 0.
fn reach(positions: impl Iterator<Item = i64>) -> RaggedResult<usize> {
    positions
        .filter(|p| *p >= 0)
        .max()
        .map_or(Ok(0), |max| Ok(usize::try_from(max)? + 1))
}

fn build(
    form: &Form,
    length: usize,
    buffers: &BufferMap,
    backend: &dyn Backend,
) -> RaggedResult<Content> {
    let index = |attribute: &str, index_type: IndexType, len: usize| {
        read_index(form, attribute, index_type, len, buffers, backend)
    };
    let child = |child: &Form, len: usize| build(child, len, buffers, backend);

    let content: Content = match form {
        Form::Numpy(f) => {
            let alignment = Alignment::new(f.primitive().byte_width());
            let nbytes = checked(length.checked_mul(f.item_width()?), form, "data")?;
            let data = read_bytes(form, "data", nbytes, alignment, buffers, backend)?;
            let mut shape = vec![length];
            shape.extend_from_slice(f.inner_shape());
            NumpyArray::try_new(data, f.primitive(), shape)?.into()
        }
        Form::Regular(f) => {
            let content_len = checked(length.checked_mul(f.size()), form, "content")?;
            RegularArray::try_with_length(child(f.content(), content_len)?, f.size(), length)?
                .into()
        }
        Form::ListOffset(f) => {
            let len = checked(length.checked_add(1), form, "offsets")?;
            let offsets = index("offsets", f.offsets(), len)?;
            let content_len = usize::try_from(offsets.get(length))?;
            ListOffsetArray::try_new(offsets, child(f.content(), content_len)?)?.into()
        }
        Form::List(f) => {
            let starts = index("starts", f.starts(), length)?;
            let stops = index("stops", f.stops(), length)?;
            let content_len = starts
                .iter()
                .zip(stops.iter())
                .filter(|(start, stop)| start != stop)
                .map(|(_, stop)| stop)
                .max()
                .map_or(Ok(0), usize::try_from)?;
            ListArray::try_new(starts, stops, child(f.content(), content_len)?)?.into()
        }
        Form::Indexed(f) => {
            let gather = index("index", f.index(), length)?;
            let content_len = reach(gather.iter())?;
            IndexedArray::try_new(gather, child(f.content(), content_len)?)?.into()
        }
        Form::IndexedOption(f) => {
            let gather = index("index", f.index(), length)?;
            let content_len = reach(gather.iter())?;
            IndexedOptionArray::try_new(gather, child(f.content(), content_len)?)?.into()
        }
        Form::ByteMasked(f) => ByteMaskedArray::try_new(
            index("mask", f.mask(), length)?,
            child(f.content(), length)?,
            f.valid_when(),
        )?
        .into(),
        Form::BitMasked(f) => BitMaskedArray::try_new(
            index("mask", f.mask(), length.div_ceil(8))?,
            child(f.content(), length)?,
            f.valid_when(),
            length,
            f.lsb_order(),
        )?
        .into(),
        Form::Union(f) => {
            let tags = index("tags", f.tags(), length)?;
            let positions = index("index", f.index(), length)?;
            let contents = f
                .contents()
                .iter()
                .enumerate()
                .map(|(tag, branch)| {
                    let tag = i64::try_from(tag)?;
                    let branch_len = reach(
                        tags.iter()
                            .zip(positions.iter())
                            .filter(|(t, _)| *t == tag)
                            .map(|(_, position)| position),
                    )?;
                    child(branch, branch_len)
                })
                .collect::<RaggedResult<Vec<_>>>()?;
            UnionArray::try_new(tags, positions, contents)?.into()
        }
        Form::Record(f) => RecordArray::try_new(
            f.contents()
                .iter()
                .map(|field| child(field, length))
                .collect::<RaggedResult<Vec<_>>>()?,
            f.field_names().map(<[String]>::to_vec),
            Some(length),
        )?
        .into(),
    };
    Ok(content.with_parameters(form.parameters().clone()))
}
