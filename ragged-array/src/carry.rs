//! Structural gather of the top-level elements of a layout.

use ragged_buffer::Buffer;
use ragged_error::{RaggedResult, ragged_err};

use crate::backend::Backend;
use crate::{
    ByteMaskedArray, Content, Index, IndexedArray, IndexedOptionArray, ListArray, NumpyArray,
    RecordArray, RegularArray, UnionArray,
};

impl Content {
    /// The elements at the positions in `carry`, in that order, with repeats.
    ///
    /// Only index buffers and leaf rows are gathered. List nodes keep their content and
    /// gather their starts and stops instead.
    pub fn carry(&self, carry: &Index, backend: &dyn Backend) -> RaggedResult<Content> {
        let len = self.len();
        if let Some(bad) = carry
            .iter()
            .find(|p| !usize::try_from(*p).is_ok_and(|p| p < len))
        {
            let bad = usize::try_from(bad.unsigned_abs()).unwrap_or(usize::MAX);
            return Err(ragged_err!(OutOfBounds: bad, 0, len));
        }

        let carried: Content = match self {
            Content::Numpy(c) => {
                let data = backend.index_into(c.data(), c.item_width(), carry)?;
                let mut shape = vec![carry.len()];
                shape.extend_from_slice(c.inner_shape());
                NumpyArray::try_new(data, c.ptype(), shape)?.into()
            }
            Content::Regular(c) => {
                let content = if c.size() == 0 {
                    c.content().clone()
                } else {
                    let size = i64::try_from(c.size())?;
                    let expanded: Buffer<i64> = carry
                        .iter()
                        .flat_map(|p| p * size..(p + 1) * size)
                        .collect();
                    c.content().carry(&Index::I64(expanded), backend)?
                };
                RegularArray::try_with_length(content, c.size(), carry.len())?.into()
            }
            Content::ListOffset(c) => ListArray::try_new(
                c.starts().take(carry, backend)?,
                c.stops().take(carry, backend)?,
                c.content().clone(),
            )?
            .into(),
            Content::List(c) => ListArray::try_new(
                c.starts().take(carry, backend)?,
                c.stops().take(carry, backend)?,
                c.content().clone(),
            )?
            .into(),
            Content::Indexed(c) => {
                IndexedArray::try_new(c.index().take(carry, backend)?, c.content().clone())?.into()
            }
            Content::IndexedOption(c) => {
                IndexedOptionArray::try_new(c.index().take(carry, backend)?, c.content().clone())?
                    .into()
            }
            Content::ByteMasked(c) => ByteMaskedArray::try_new(
                c.mask().take(carry, backend)?,
                c.content().carry(carry, backend)?,
                c.valid_when(),
            )?
            .into(),
            Content::BitMasked(c) => {
                return Content::from(c.to_byte_masked()?).carry(carry, backend);
            }
            Content::Union(c) => UnionArray::try_new(
                c.tags().take(carry, backend)?,
                c.index().take(carry, backend)?,
                c.contents().to_vec(),
            )?
            .into(),
            Content::Record(c) => RecordArray::try_new(
                c.contents()
                    .iter()
                    .map(|field| field.carry(carry, backend))
                    .collect::<RaggedResult<Vec<_>>>()?,
                c.field_names().map(<[String]>::to_vec),
                Some(carry.len()),
            )?
            .into(),
        };
        Ok(carried.with_parameters(self.parameters().clone()))
    }
}
