use itertools::Itertools;
use ragged_error::{RaggedResult, ragged_bail};
use ragged_form::{IndexType, Parameters};

use crate::backend::Backend;
use crate::{Content, Index, RegularArray};

/// Variable-length lists: list `i` spans `content[offsets[i]..offsets[i + 1]]`.
#[derive(Debug, Clone)]
pub struct ListOffsetArray {
    offsets: Index,
    content: Box<Content>,
    parameters: Parameters,
}

impl ListOffsetArray {
    /// Lists delimited by `offsets`, which must be non-empty, start at a non-negative
    /// position, never decrease, and end within `content`.
    pub fn try_new(offsets: Index, content: Content) -> RaggedResult<Self> {
        offsets
            .index_type()
            .check("ListOffsetArray offsets", IndexType::LIST_KINDS)?;
        if offsets.is_empty() {
            ragged_bail!("ListOffsetArray offsets must have at least one entry");
        }
        if offsets.get(0) < 0 {
            ragged_bail!("ListOffsetArray offsets must not be negative");
        }
        if let Some((i, _)) = offsets
            .iter()
            .tuple_windows()
            .find_position(|(start, stop)| stop < start)
        {
            ragged_bail!("ListOffsetArray offsets decrease at position {}", i + 1);
        }
        let last = offsets.get(offsets.len() - 1);
        if usize::try_from(last)? > content.len() {
            ragged_bail!(
                "ListOffsetArray offsets end at {last} past content of length {}",
                content.len()
            );
        }
        Ok(Self {
            offsets,
            content: Box::new(content),
            parameters: Parameters::default(),
        })
    }

    /// The `len() + 1` list boundaries.
    pub fn offsets(&self) -> &Index {
        &self.offsets
    }

    /// The list elements.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The number of lists.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether there are no lists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The start of each list.
    pub fn starts(&self) -> Index {
        self.offsets.slice(0, self.len())
    }

    /// The stop of each list.
    pub fn stops(&self) -> Index {
        self.offsets.slice(1, self.offsets.len())
    }

    /// The lengths of the lists.
    pub fn list_lengths(&self) -> impl Iterator<Item = i64> + '_ {
        self.offsets
            .iter()
            .tuple_windows()
            .map(|(start, stop)| stop - start)
    }

    /// The same lists as a [`RegularArray`], or `None` if they do not all have one length.
    pub fn to_regular_array(&self, backend: &dyn Backend) -> RaggedResult<Option<RegularArray>> {
        let size = match self.list_lengths().all_equal_value() {
            Ok(size) => usize::try_from(size)?,
            Err(None) => 0,
            Err(Some(_)) => return Ok(None),
        };
        let start = self.offsets.get(0);
        let stop = self.offsets.get(self.len());
        let content = if start == 0 && usize::try_from(stop)? == self.content().len() {
            self.content().clone()
        } else {
            self.content().carry(&Index::from_i64s(IndexType::I64, start..stop)?, backend)?
        };
        Ok(Some(
            RegularArray::try_with_length(content, size, self.len())?
                .with_parameters(self.parameters.clone()),
        ))
    }
}

impl_content_common!(ListOffsetArray, ListOffset);

#[cfg(test)]
mod tests {
    use ragged_buffer::Buffer;
    use rstest::rstest;

    use super::*;
    use crate::NumpyArray;
    use crate::backend::CpuBackend;

    fn numbers(n: i64) -> Content {
        NumpyArray::new(Buffer::from_iter(0..n)).into()
    }

    #[rstest]
    #[case(vec![], "at least one entry")]
    #[case(vec![-1, 2], "must not be negative")]
    #[case(vec![0, 3, 2], "decrease at position 2")]
    #[case(vec![0, 6], "past content of length 5")]
    fn invalid_offsets(#[case] offsets: Vec<i64>, #[case] message: &str) {
        let err = ListOffsetArray::try_new(Index::from(offsets), numbers(5)).unwrap_err();
        assert!(err.to_string().contains(message), "{err}");
    }

    #[test]
    fn rejects_byte_offsets() {
        assert!(ListOffsetArray::try_new(Index::from(vec![0u8, 1]), numbers(5)).is_err());
    }

    #[test]
    fn starts_and_stops() {
        let list = ListOffsetArray::try_new(Index::from(vec![0i32, 2, 2, 5]), numbers(5)).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.starts().iter().collect::<Vec<_>>(), vec![0, 2, 2]);
        assert_eq!(list.stops().iter().collect::<Vec<_>>(), vec![2, 2, 5]);
        assert_eq!(list.list_lengths().collect::<Vec<_>>(), vec![2, 0, 3]);
    }

    #[test]
    fn uniform_lists_become_regular() {
        let list = ListOffsetArray::try_new(Index::from(vec![1i64, 3, 5]), numbers(6)).unwrap();
        let regular = list.to_regular_array(&CpuBackend).unwrap().unwrap();
        assert_eq!(regular.size(), 2);
        assert_eq!(regular.len(), 2);
        assert_eq!(regular.content().len(), 4);

        let trailing = ListOffsetArray::try_new(Index::from(vec![0i64, 2, 4]), numbers(10)).unwrap();
        let regular = trailing.to_regular_array(&CpuBackend).unwrap().unwrap();
        assert_eq!(regular.len(), 2);
        assert_eq!(regular.content().len(), 4);

        let ragged = ListOffsetArray::try_new(Index::from(vec![0i64, 1, 3]), numbers(3)).unwrap();
        assert!(ragged.to_regular_array(&CpuBackend).unwrap().is_none());
    }

    #[test]
    fn empty_lists_become_regular() {
        let list = ListOffsetArray::try_new(Index::from(vec![0i64]), numbers(0)).unwrap();
        let regular = list.to_regular_array(&CpuBackend).unwrap().unwrap();
        assert_eq!(regular.size(), 0);
        assert_eq!(regular.len(), 0);
    }
}
