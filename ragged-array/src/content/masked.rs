use arrow_buffer::BooleanBuffer;
use ragged_buffer::Buffer;
use ragged_error::{RaggedResult, ragged_bail};
use ragged_form::{IndexType, Parameters};

use crate::{Content, Index};

/// Missing values marked by one byte per element: element `i` is present when
/// `(mask[i] != 0) == valid_when`.
#[derive(Debug, Clone)]
pub struct ByteMaskedArray {
    mask: Index,
    content: Box<Content>,
    valid_when: bool,
    parameters: Parameters,
}

impl ByteMaskedArray {
    /// Mask the first `mask.len()` elements of `content`.
    pub fn try_new(mask: Index, content: Content, valid_when: bool) -> RaggedResult<Self> {
        mask.index_type()
            .check("ByteMaskedArray mask", &[IndexType::I8])?;
        if mask.len() > content.len() {
            ragged_bail!(
                "ByteMaskedArray mask of length {} is longer than its content of length {}",
                mask.len(),
                content.len()
            );
        }
        Ok(Self {
            mask,
            content: Box::new(content),
            valid_when,
            parameters: Parameters::default(),
        })
    }

    /// One byte per element.
    pub fn mask(&self) -> &Index {
        &self.mask
    }

    /// The masked elements.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The mask value marking a present element.
    pub fn valid_when(&self) -> bool {
        self.valid_when
    }

    /// The number of elements, missing or not.
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether element `idx` is present.
    pub fn is_valid(&self, idx: usize) -> bool {
        (self.mask.get(idx) != 0) == self.valid_when
    }

    /// Which elements are present.
    pub fn validity(&self) -> BooleanBuffer {
        BooleanBuffer::collect_bool(self.len(), |i| self.is_valid(i))
    }
}

impl_content_common!(ByteMaskedArray, ByteMasked);

/// Missing values marked by one packed bit per element: element `i` is present when its bit
/// equals `valid_when`. Bits are numbered from the least significant end of each byte when
/// `lsb_order` is set, from the most significant end otherwise.
#[derive(Debug, Clone)]
pub struct BitMaskedArray {
    mask: Index,
    content: Box<Content>,
    valid_when: bool,
    length: usize,
    lsb_order: bool,
    parameters: Parameters,
}

impl BitMaskedArray {
    /// Mask the first `length` elements of `content` with packed bits.
    pub fn try_new(
        mask: Index,
        content: Content,
        valid_when: bool,
        length: usize,
        lsb_order: bool,
    ) -> RaggedResult<Self> {
        mask.index_type()
            .check("BitMaskedArray mask", &[IndexType::U8])?;
        if mask.len() * 8 < length {
            ragged_bail!(
                "BitMaskedArray mask of {} bytes cannot cover {length} elements",
                mask.len()
            );
        }
        if length > content.len() {
            ragged_bail!(
                "BitMaskedArray length {length} is longer than its content of length {}",
                content.len()
            );
        }
        Ok(Self {
            mask,
            content: Box::new(content),
            valid_when,
            length,
            lsb_order,
            parameters: Parameters::default(),
        })
    }

    /// The packed bits, at least `len().div_ceil(8)` bytes.
    pub fn mask(&self) -> &Index {
        &self.mask
    }

    /// The masked elements.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The bit value marking a present element.
    pub fn valid_when(&self) -> bool {
        self.valid_when
    }

    /// Whether bits are numbered from the least significant end of each byte.
    pub fn lsb_order(&self) -> bool {
        self.lsb_order
    }

    /// The number of elements, missing or not.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether element `idx` is present.
    pub fn is_valid(&self, idx: usize) -> bool {
        let byte = self.mask.get(idx / 8);
        let shift = if self.lsb_order { idx % 8 } else { 7 - idx % 8 };
        ((byte >> shift) & 1 == 1) == self.valid_when
    }

    /// Which elements are present.
    pub fn validity(&self) -> BooleanBuffer {
        BooleanBuffer::collect_bool(self.length, |i| self.is_valid(i))
    }

    /// The same elements with one mask byte per element, `1` marking a present element.
    pub fn to_byte_masked(&self) -> RaggedResult<ByteMaskedArray> {
        let mask: Buffer<i8> = self.validity().iter().map(i8::from).collect();
        Ok(
            ByteMaskedArray::try_new(Index::I8(mask), self.content().clone(), true)?
                .with_parameters(self.parameters.clone()),
        )
    }
}

impl_content_common!(BitMaskedArray, BitMasked);
