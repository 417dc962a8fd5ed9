use arrow_buffer::BooleanBuffer;
use ragged_error::{RaggedResult, ragged_bail};
use ragged_form::{IndexType, Parameters};

use crate::{Content, Index};

fn check_index(what: &str, index: &Index, content: &Content, allow_missing: bool) -> RaggedResult<()> {
    let len = content.len();
    for (i, position) in index.iter().enumerate() {
        let in_range = usize::try_from(position).is_ok_and(|p| p < len);
        if !in_range && !(allow_missing && position < 0) {
            ragged_bail!("{what} entry {i} is {position}, outside content of length {len}");
        }
    }
    Ok(())
}

/// A dense gather: element `i` is `content[index[i]]`.
#[derive(Debug, Clone)]
pub struct IndexedArray {
    index: Index,
    content: Box<Content>,
    parameters: Parameters,
}

impl IndexedArray {
    /// Gather `content` through `index`, every entry of which must address it.
    pub fn try_new(index: Index, content: Content) -> RaggedResult<Self> {
        index
            .index_type()
            .check("IndexedArray index", IndexType::LIST_KINDS)?;
        check_index("IndexedArray index", &index, &content, false)?;
        Ok(Self {
            index,
            content: Box::new(content),
            parameters: Parameters::default(),
        })
    }

    /// The gather positions.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// The gathered elements.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl_content_common!(IndexedArray, Indexed);

/// A gather with missing values: element `i` is `content[index[i]]`, or missing when
/// `index[i]` is negative.
#[derive(Debug, Clone)]
pub struct IndexedOptionArray {
    index: Index,
    content: Box<Content>,
    parameters: Parameters,
}

impl IndexedOptionArray {
    /// Gather `content` through a signed `index`, negative entries marking missing values.
    pub fn try_new(index: Index, content: Content) -> RaggedResult<Self> {
        index
            .index_type()
            .check("IndexedOptionArray index", IndexType::OPTION_KINDS)?;
        check_index("IndexedOptionArray index", &index, &content, true)?;
        Ok(Self {
            index,
            content: Box::new(content),
            parameters: Parameters::default(),
        })
    }

    /// The gather positions, negative for missing values.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// The gathered elements.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The number of elements, missing or not.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Which elements are present.
    pub fn validity(&self) -> BooleanBuffer {
        BooleanBuffer::collect_bool(self.len(), |i| self.index.get(i) >= 0)
    }
}

impl_content_common!(IndexedOptionArray, IndexedOption);
