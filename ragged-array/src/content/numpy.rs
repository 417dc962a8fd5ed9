use ragged_buffer::{Alignment, Buffer, ByteBuffer};
use ragged_error::{RaggedResult, ragged_bail, ragged_err};
use ragged_form::{NativePType, PType, Parameters};

use crate::{Content, RegularArray};

/// A leaf buffer of scalars of arbitrary rank, stored row-major.
#[derive(Debug, Clone)]
pub struct NumpyArray {
    data: ByteBuffer,
    ptype: PType,
    shape: Vec<usize>,
    parameters: Parameters,
}

impl NumpyArray {
    /// A leaf over raw little-endian `data` with the given `shape`.
    ///
    /// The buffer must hold exactly the product of `shape` values of `ptype`.
    pub fn try_new(data: ByteBuffer, ptype: PType, shape: Vec<usize>) -> RaggedResult<Self> {
        if shape.is_empty() {
            ragged_bail!("NumpyArray must have at least one dimension");
        }
        let expected = checked_product(&shape[1..])
            .and_then(|inner| inner.checked_mul(ptype.byte_width()))
            .and_then(|item| item.checked_mul(shape[0]))
            .ok_or_else(|| {
                ragged_err!("NumpyArray of {ptype} with shape {} overflows", ShapeDisplay(&shape))
            })?;
        if data.len() != expected {
            ragged_bail!(
                "NumpyArray of {ptype} with shape {} needs {expected} bytes, found {}",
                ShapeDisplay(&shape),
                data.len()
            );
        }
        Ok(Self {
            data: data.aligned(Alignment::new(ptype.byte_width())),
            ptype,
            shape,
            parameters: Parameters::default(),
        })
    }

    /// A one-dimensional leaf over a typed buffer.
    pub fn new<T: NativePType>(buffer: Buffer<T>) -> Self {
        Self {
            shape: vec![buffer.len()],
            data: buffer.into_byte_buffer(),
            ptype: T::PTYPE,
            parameters: Parameters::default(),
        }
    }

    /// A one-dimensional leaf of booleans, one byte per value.
    pub fn from_bools(values: impl IntoIterator<Item = bool>) -> Self {
        let data: ByteBuffer = values.into_iter().map(u8::from).collect();
        Self {
            shape: vec![data.len()],
            data,
            ptype: PType::Bool,
            parameters: Parameters::default(),
        }
    }

    /// Reinterpret the same data with a different shape.
    pub fn try_with_shape(self, shape: Vec<usize>) -> RaggedResult<Self> {
        let parameters = self.parameters;
        Ok(Self::try_new(self.data, self.ptype, shape)?.with_parameters(parameters))
    }

    /// The raw little-endian bytes.
    pub fn data(&self) -> &ByteBuffer {
        &self.data
    }

    /// The scalar kind.
    pub fn ptype(&self) -> PType {
        self.ptype
    }

    /// The full shape, outermost dimension first.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The dimensions below the outermost one.
    pub fn inner_shape(&self) -> &[usize] {
        &self.shape[1..]
    }

    /// The number of outermost elements.
    pub fn len(&self) -> usize {
        self.shape[0]
    }

    /// Whether there are no outermost elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of bytes in one outermost element.
    pub fn item_width(&self) -> usize {
        self.inner_shape().iter().product::<usize>() * self.ptype.byte_width()
    }

    /// The values as a typed buffer, sharing storage.
    pub fn typed<T: NativePType>(&self) -> RaggedResult<Buffer<T>> {
        if T::PTYPE != self.ptype {
            return Err(ragged_err!(MismatchedTypes: T::PTYPE, self.ptype));
        }
        Ok(Buffer::from_byte_buffer(self.data.clone()))
    }

    /// Express a rank-N leaf as nested [`RegularArray`]s over a flat leaf. A one-dimensional
    /// leaf is returned as is.
    pub fn to_regular_array(&self) -> RaggedResult<Content> {
        if self.shape.len() == 1 {
            return Ok(self.clone().into());
        }
        let total = self.data.len() / self.ptype.byte_width();
        let mut out: Content = Self::try_new(self.data.clone(), self.ptype, vec![total])?.into();
        for dim in (1..self.shape.len()).rev() {
            let length = checked_product(&self.shape[..dim]).ok_or_else(|| {
                ragged_err!("NumpyArray shape {} overflows", ShapeDisplay(&self.shape))
            })?;
            out = RegularArray::try_with_length(out, self.shape[dim], length)?.into();
        }
        Ok(out.with_parameters(self.parameters.clone()))
    }
}

impl_content_common!(NumpyArray, Numpy);

fn checked_product(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, dim| acc.checked_mul(*dim))
}

struct ShapeDisplay<'a>(&'a [usize]);

impl std::fmt::Display for ShapeDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{dim}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use ragged_buffer::buffer;
    use rstest::rstest;

    use super::*;

    #[test]
    fn shape_must_match_bytes() {
        let data = buffer![1i32, 2, 3, 4, 5, 6].into_byte_buffer();
        let array = NumpyArray::try_new(data.clone(), PType::Int32, vec![2, 3]).unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.item_width(), 12);
        assert!(NumpyArray::try_new(data.clone(), PType::Int32, vec![4]).is_err());
        assert!(NumpyArray::try_new(data, PType::Int32, vec![]).is_err());
    }

    #[rstest]
    #[case(vec![1 << 32, 1 << 32])]
    #[case(vec![0, 1 << 32, 1 << 32])]
    #[case(vec![usize::MAX, 2])]
    fn oversized_shapes_are_rejected(#[case] shape: Vec<usize>) {
        let err = NumpyArray::try_new(ByteBuffer::empty(), PType::Int8, shape).unwrap_err();
        assert!(err.to_string().contains("overflows"), "{err}");
    }

    #[test]
    fn typed_access() {
        let array = NumpyArray::new(buffer![1.5f64, 2.5]);
        assert_eq!(array.typed::<f64>().unwrap().as_slice(), &[1.5, 2.5]);
        assert!(array.typed::<i64>().is_err());
    }

    #[test]
    fn zero_width_inner_dimension() {
        let array = NumpyArray::try_new(ByteBuffer::empty(), PType::Int32, vec![3, 0]).unwrap();
        assert_eq!(array.len(), 3);
        let Content::Regular(regular) = array.to_regular_array().unwrap() else {
            panic!("expected a RegularArray");
        };
        assert_eq!(regular.size(), 0);
        assert_eq!(regular.len(), 3);
        assert_eq!(regular.content().len(), 0);
    }

    #[test]
    fn rank_three_to_regular() {
        let data = Buffer::from_iter(0i16..24).into_byte_buffer();
        let array = NumpyArray::try_new(data, PType::Int16, vec![2, 3, 4]).unwrap();
        let regular = array.to_regular_array().unwrap();
        assert_eq!(regular.to_string(), "2 * 3 * 4 * int16");
        assert_eq!(regular.children()[0].len(), 6);
    }
}
