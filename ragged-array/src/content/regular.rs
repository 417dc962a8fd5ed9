use ragged_buffer::Buffer;
use ragged_error::{RaggedResult, ragged_bail, ragged_err};
use ragged_form::{PType, Parameters};

use crate::backend::Backend;
use crate::{Content, Index, ListOffsetArray};

/// Lists of one fixed `size` over a flat content.
///
/// The length is `content.len() / size`; when `size` is zero the content carries no
/// information about the length, so it is given explicitly as `zeros_length`.
#[derive(Debug, Clone)]
pub struct RegularArray {
    content: Box<Content>,
    size: usize,
    length: usize,
    parameters: Parameters,
}

impl RegularArray {
    /// Lists of `size` elements of `content`. `zeros_length` is the length when `size` is 0.
    pub fn try_new(content: Content, size: usize, zeros_length: usize) -> RaggedResult<Self> {
        let length = match size {
            0 => zeros_length,
            _ => content.len() / size,
        };
        Ok(Self {
            content: Box::new(content),
            size,
            length,
            parameters: Parameters::default(),
        })
    }

    /// Exactly `length` lists of `size` elements; content past `length * size` is unreachable.
    pub fn try_with_length(content: Content, size: usize, length: usize) -> RaggedResult<Self> {
        let needed = length
            .checked_mul(size)
            .ok_or_else(|| ragged_err!("{length} lists of size {size} overflow"))?;
        if needed > content.len() {
            ragged_bail!(
                "{length} lists of size {size} need {needed} elements, content has {}",
                content.len()
            );
        }
        Ok(Self {
            content: Box::new(content),
            size,
            length,
            parameters: Parameters::default(),
        })
    }

    /// The list elements, `len() * size()` of which are reachable.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The fixed list size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of lists.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether there are no lists.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The implicit offsets `0, size, 2 * size, ...`, made explicit.
    pub fn offsets(&self, backend: &dyn Backend) -> RaggedResult<Index> {
        let mut offsets = backend.allocate(PType::Int64, self.length + 1)?;
        let size = i64::try_from(self.size)?;
        for i in 0..=i64::try_from(self.length)? {
            offsets.extend_from_slice(&(i * size).to_le_bytes());
        }
        Ok(Index::I64(Buffer::from_byte_buffer(offsets.freeze())))
    }

    /// The same lists with explicit 64-bit offsets.
    pub fn to_list_offset_array64(&self, backend: &dyn Backend) -> RaggedResult<ListOffsetArray> {
        Ok(
            ListOffsetArray::try_new(self.offsets(backend)?, self.content().clone())?
                .with_parameters(self.parameters.clone()),
        )
    }
}

impl_content_common!(RegularArray, Regular);

#[cfg(test)]
mod tests {
    use ragged_buffer::buffer;

    use super::*;
    use crate::NumpyArray;
    use crate::backend::CpuBackend;

    #[test]
    fn length_from_content() {
        let regular =
            RegularArray::try_new(NumpyArray::new(buffer![0i64; 10]).into(), 3, 0).unwrap();
        assert_eq!(regular.len(), 3);
        let empty = RegularArray::try_new(NumpyArray::new(buffer![0i64; 0]).into(), 0, 7).unwrap();
        assert_eq!(empty.len(), 7);
    }

    #[test]
    fn explicit_length() {
        let content: Content = NumpyArray::new(Buffer::from_iter(0i64..10)).into();
        let regular = RegularArray::try_with_length(content.clone(), 2, 2).unwrap();
        assert_eq!(regular.len(), 2);
        let list = regular.to_list_offset_array64(&CpuBackend).unwrap();
        assert_eq!(list.offsets().iter().collect::<Vec<_>>(), vec![0, 2, 4]);

        let err = RegularArray::try_with_length(content.clone(), 3, 4).unwrap_err();
        assert!(err.to_string().contains("need 12 elements"), "{err}");
        assert!(RegularArray::try_with_length(content, 2, usize::MAX).is_err());
    }

    #[test]
    fn explicit_offsets() {
        let regular = RegularArray::try_new(
            NumpyArray::new(Buffer::from_iter(0i32..15)).into(),
            5,
            0,
        )
        .unwrap();
        let list = regular.to_list_offset_array64(&CpuBackend).unwrap();
        assert_eq!(
            list.offsets().iter().collect::<Vec<_>>(),
            vec![0, 5, 10, 15]
        );
        assert_eq!(list.content().len(), 15);
    }
}
