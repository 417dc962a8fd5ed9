use ragged_buffer::Buffer;
use ragged_error::{RaggedResult, ragged_bail, ragged_err};
use ragged_form::{IndexType, Parameters};

use crate::backend::Backend;
use crate::{Content, Index, ListOffsetArray};

/// Variable-length lists: list `i` spans `content[starts[i]..stops[i]]`.
///
/// Unlike [`ListOffsetArray`], lists may overlap, leave gaps, or appear out of order.
#[derive(Debug, Clone)]
pub struct ListArray {
    starts: Index,
    stops: Index,
    content: Box<Content>,
    parameters: Parameters,
}

impl ListArray {
    /// Lists delimited by `starts` and `stops` of the same kind. `stops` may be longer than
    /// `starts`; only the first `starts.len()` entries are used.
    pub fn try_new(starts: Index, stops: Index, content: Content) -> RaggedResult<Self> {
        starts
            .index_type()
            .check("ListArray starts", IndexType::LIST_KINDS)?;
        if starts.index_type() != stops.index_type() {
            return Err(ragged_err!(MismatchedTypes: starts.index_type(), stops.index_type()));
        }
        if stops.len() < starts.len() {
            ragged_bail!(
                "ListArray has {} stops for {} starts",
                stops.len(),
                starts.len()
            );
        }
        for (i, (start, stop)) in starts.iter().zip(stops.iter()).enumerate() {
            if start == stop {
                continue;
            }
            if stop < start || start < 0 {
                ragged_bail!("ListArray list {i} spans {start}..{stop}");
            }
            if usize::try_from(stop)? > content.len() {
                ragged_bail!(
                    "ListArray list {i} ends at {stop} past content of length {}",
                    content.len()
                );
            }
        }
        let stops = stops.slice(0, starts.len());
        Ok(Self {
            starts,
            stops,
            content: Box::new(content),
            parameters: Parameters::default(),
        })
    }

    /// The start of each list.
    pub fn starts(&self) -> &Index {
        &self.starts
    }

    /// The stop of each list.
    pub fn stops(&self) -> &Index {
        &self.stops
    }

    /// The list elements.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The number of lists.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Whether there are no lists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The same lists with explicit 64-bit offsets. The content is reused when the lists are
    /// contiguous and in order, otherwise it is gathered through `backend`.
    pub fn to_list_offset_array64(&self, backend: &dyn Backend) -> RaggedResult<ListOffsetArray> {
        let content_len = self.content.len();
        let contiguous = (1..self.len()).all(|i| self.starts.get(i) == self.stops.get(i - 1))
            && self.starts.iter().all(|start| start >= 0)
            && self.starts.iter().zip(self.stops.iter()).all(|(start, stop)| start <= stop)
            && self
                .stops
                .iter()
                .all(|stop| usize::try_from(stop).is_ok_and(|stop| stop <= content_len));
        if contiguous {
            let mut offsets: Vec<i64> = self.starts.iter().collect();
            offsets.push(self.stops.try_get(self.len().wrapping_sub(1)).unwrap_or(0));
            return Ok(
                ListOffsetArray::try_new(Index::from(offsets), self.content().clone())?
                    .with_parameters(self.parameters.clone()),
            );
        }

        log::debug!(
            "gathering content of {} non-contiguous lists into offsets",
            self.len()
        );
        let mut offsets = Vec::with_capacity(self.len() + 1);
        let mut carry = Vec::new();
        offsets.push(0i64);
        for (start, stop) in self.starts.iter().zip(self.stops.iter()) {
            carry.extend(start..stop.max(start));
            offsets.push(i64::try_from(carry.len())?);
        }
        let content = self
            .content()
            .carry(&Index::I64(Buffer::copy_from(carry)), backend)?;
        Ok(ListOffsetArray::try_new(Index::from(offsets), content)?
            .with_parameters(self.parameters.clone()))
    }
}

impl_content_common!(ListArray, List);
