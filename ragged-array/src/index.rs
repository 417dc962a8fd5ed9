//! Typed integer buffers used as offsets, starts, stops, gathers, tags, and masks.

use std::fmt::{Display, Formatter};

use ragged_buffer::{Buffer, ByteBuffer};
use ragged_error::{RaggedResult, ragged_bail, ragged_err, ragged_panic};
use ragged_form::{IndexType, NativePType};

use crate::backend::Backend;
use crate::content::NumpyArray;

/// A 1-D integer buffer whose kind is one of the [`IndexType`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Index {
    /// Signed bytes
    I8(Buffer<i8>),
    /// Unsigned bytes
    U8(Buffer<u8>),
    /// Signed 32-bit integers
    I32(Buffer<i32>),
    /// Unsigned 32-bit integers
    U32(Buffer<u32>),
    /// Signed 64-bit integers
    I64(Buffer<i64>),
}

macro_rules! match_each_index {
    ($self:expr, | $b:ident | $body:expr) => {
        match $self {
            Index::I8($b) => $body,
            Index::U8($b) => $body,
            Index::I32($b) => $body,
            Index::U32($b) => $body,
            Index::I64($b) => $body,
        }
    };
}

impl Index {
    /// The kind of this index.
    pub fn index_type(&self) -> IndexType {
        match self {
            Index::I8(_) => IndexType::I8,
            Index::U8(_) => IndexType::U8,
            Index::I32(_) => IndexType::I32,
            Index::U32(_) => IndexType::U32,
            Index::I64(_) => IndexType::I64,
        }
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        match_each_index!(self, |b| b.len())
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of bytes held.
    pub fn nbytes(&self) -> usize {
        match_each_index!(self, |b| b.nbytes())
    }

    /// The entry at `idx`, widened to `i64`, or `None` when out of range.
    pub fn try_get(&self, idx: usize) -> Option<i64> {
        match self {
            Index::I8(b) => b.get(idx).copied().map(i64::from),
            Index::U8(b) => b.get(idx).copied().map(i64::from),
            Index::I32(b) => b.get(idx).copied().map(i64::from),
            Index::U32(b) => b.get(idx).copied().map(i64::from),
            Index::I64(b) => b.get(idx).copied(),
        }
    }

    /// The entry at `idx`, widened to `i64`.
    ///
    /// ## Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn get(&self, idx: usize) -> i64 {
        self.try_get(idx)
            .unwrap_or_else(|| ragged_panic!(ragged_err!(OutOfBounds: idx, 0, self.len())))
    }

    /// Iterate the entries, widened to `i64`.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// The entries `start..stop`, sharing storage.
    pub fn slice(&self, start: usize, stop: usize) -> Index {
        match self {
            Index::I8(b) => Index::I8(b.slice(start..stop)),
            Index::U8(b) => Index::U8(b.slice(start..stop)),
            Index::I32(b) => Index::I32(b.slice(start..stop)),
            Index::U32(b) => Index::U32(b.slice(start..stop)),
            Index::I64(b) => Index::I64(b.slice(start..stop)),
        }
    }

    /// The largest entry, if any.
    pub fn max(&self) -> Option<i64> {
        self.iter().max()
    }

    /// The raw little-endian bytes of this index, sharing storage.
    pub fn to_byte_buffer(&self) -> ByteBuffer {
        match_each_index!(self, |b| b.clone().into_byte_buffer())
    }

    /// Reinterpret `buffer` as an index of kind `index_type`, copying only if misaligned.
    pub fn from_byte_buffer(index_type: IndexType, buffer: ByteBuffer) -> RaggedResult<Index> {
        if buffer.len() % index_type.byte_width() != 0 {
            ragged_bail!(
                InvalidSerde: "{} bytes do not hold a whole number of {} entries",
                buffer.len(),
                index_type
            );
        }
        Ok(match index_type {
            IndexType::I8 => Index::I8(Buffer::from_byte_buffer(buffer)),
            IndexType::U8 => Index::U8(Buffer::from_byte_buffer(buffer)),
            IndexType::I32 => Index::I32(Buffer::from_byte_buffer(buffer)),
            IndexType::U32 => Index::U32(Buffer::from_byte_buffer(buffer)),
            IndexType::I64 => Index::I64(Buffer::from_byte_buffer(buffer)),
        })
    }

    /// Build an index of kind `index_type`, failing if a value does not fit.
    pub fn from_i64s(
        index_type: IndexType,
        values: impl IntoIterator<Item = i64>,
    ) -> RaggedResult<Index> {
        fn narrow<T: NativePType>(
            index_type: IndexType,
            values: impl IntoIterator<Item = i64>,
        ) -> RaggedResult<Buffer<T>> {
            use num_traits::NumCast;

            values
                .into_iter()
                .map(|v| {
                    <T as NumCast>::from(v).ok_or_else(|| {
                        ragged_err!("value {v} does not fit in an index of kind {index_type}")
                    })
                })
                .collect::<RaggedResult<Buffer<T>>>()
        }

        Ok(match index_type {
            IndexType::I8 => Index::I8(narrow(index_type, values)?),
            IndexType::U8 => Index::U8(narrow(index_type, values)?),
            IndexType::I32 => Index::I32(narrow(index_type, values)?),
            IndexType::U32 => Index::U32(narrow(index_type, values)?),
            IndexType::I64 => Index::I64(values.into_iter().collect()),
        })
    }

    /// Gather the entries at the positions in `carry`.
    pub fn take(&self, carry: &Index, backend: &dyn Backend) -> RaggedResult<Index> {
        let width = self.index_type().byte_width();
        let gathered = backend.index_into(&self.to_byte_buffer(), width, carry)?;
        Index::from_byte_buffer(self.index_type(), gathered)
    }

    /// View this index as a one-dimensional leaf array.
    pub fn to_numpy(&self) -> NumpyArray {
        match_each_index!(self, |b| NumpyArray::new(b.clone()))
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Index{}[", self.index_type())?;
        for (i, value) in self.iter().take(16).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        if self.len() > 16 {
            write!(f, ", ...")?;
        }
        write!(f, "]")
    }
}

macro_rules! index_from {
    ($T:ty, $variant:ident) => {
        impl From<Buffer<$T>> for Index {
            fn from(value: Buffer<$T>) -> Self {
                Index::$variant(value)
            }
        }

        impl From<Vec<$T>> for Index {
            fn from(value: Vec<$T>) -> Self {
                Index::$variant(Buffer::copy_from(value))
            }
        }
    };
}

index_from!(i8, I8);
index_from!(u8, U8);
index_from!(i32, I32);
index_from!(u32, U32);
index_from!(i64, I64);

#[cfg(test)]
mod tests {
    use ragged_buffer::buffer;
    use ragged_form::{IndexType, PType};

    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn widened_access() {
        let index = Index::from(buffer![-1i32, 4, 7]);
        assert_eq!(index.get(0), -1);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![-1, 4, 7]);
        assert_eq!(index.max(), Some(7));
        assert_eq!(index.try_get(3), None);
        assert_eq!(index.slice(1, 3).iter().collect::<Vec<_>>(), vec![4, 7]);

        assert_eq!(Index::from(vec![-128i8]).try_get(0), Some(-128));
        assert_eq!(Index::from(vec![255u8]).try_get(0), Some(255));
        assert_eq!(Index::from(vec![u32::MAX]).get(0), 4_294_967_295);
    }

    #[test]
    #[should_panic]
    fn get_out_of_bounds() {
        Index::from(vec![0u8]).get(1);
    }

    #[test]
    fn narrowing() {
        let index = Index::from_i64s(IndexType::U32, [0, 5, 9]).unwrap();
        assert_eq!(index, Index::from(vec![0u32, 5, 9]));
        assert!(Index::from_i64s(IndexType::U8, [256]).is_err());
        assert!(Index::from_i64s(IndexType::U32, [-1]).is_err());
    }

    #[test]
    fn bytes_round_trip() {
        let index = Index::from(vec![3i64, 1, 2]);
        let bytes = index.to_byte_buffer();
        assert_eq!(bytes.len(), 24);
        assert_eq!(Index::from_byte_buffer(IndexType::I64, bytes).unwrap(), index);
        assert!(Index::from_byte_buffer(IndexType::I32, ByteBuffer::from(vec![0u8; 6])).is_err());
    }

    #[test]
    fn take() {
        let index = Index::from(vec![10i32, 20, 30]);
        let taken = index
            .take(&Index::from(vec![2i64, 0, 0]), &CpuBackend)
            .unwrap();
        assert_eq!(taken, Index::from(vec![30i32, 10, 10]));
    }

    #[test]
    fn to_numpy() {
        let numpy = Index::from(vec![1u8, 0, 1]).to_numpy();
        assert_eq!(numpy.ptype(), PType::UInt8);
        assert_eq!(numpy.len(), 3);
    }

    #[test]
    fn display() {
        assert_eq!(Index::from(vec![0i64, 2, 4]).to_string(), "Indexi64[0, 2, 4]");
    }
}
