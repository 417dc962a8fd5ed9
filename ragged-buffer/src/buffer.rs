use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ops::{Bound, Deref, RangeBounds};

use bytes::Bytes;
use ragged_error::{RaggedExpect, ragged_panic};

use crate::debug::Preview;
use crate::{Alignment, BufferMut, ByteBuffer};

/// Immutable, reference-counted storage for a run of `T`s, aligned to at least `T`.
#[derive(Clone)]
pub struct Buffer<T> {
    bytes: Bytes,
    length: usize,
    alignment: Alignment,
    _marker: PhantomData<T>,
}

impl<T> Buffer<T> {
    pub(crate) fn from_parts(bytes: Bytes, length: usize, alignment: Alignment) -> Self {
        Self {
            bytes,
            length,
            alignment,
            _marker: PhantomData,
        }
    }

    /// Copy `values` into a new buffer.
    pub fn copy_from(values: impl AsRef<[T]>) -> Self {
        BufferMut::copy_from(values).freeze()
    }

    /// A buffer with no elements.
    pub fn empty() -> Self {
        BufferMut::empty().freeze()
    }

    /// Reinterpret raw bytes as `T`s. The bytes are copied only when they are misaligned for `T`.
    ///
    /// ## Panics
    ///
    /// Panics unless the byte length is a multiple of `size_of::<T>()`.
    pub fn from_byte_buffer(buffer: ByteBuffer) -> Self {
        let width = size_of::<T>();
        if buffer.len() % width != 0 {
            ragged_panic!("{} bytes do not divide into items of {width} bytes", buffer.len());
        }
        let alignment = Alignment::of::<T>();
        let bytes = buffer.aligned(alignment).bytes;
        let length = bytes.len() / width;
        Self::from_parts(bytes, length, alignment)
    }

    /// The number of `T`s held.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether no `T`s are held.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The alignment this buffer guarantees.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// The size in bytes.
    pub fn nbytes(&self) -> usize {
        self.bytes.len()
    }

    /// View the elements as a slice.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        if self.length == 0 {
            return &[];
        }
        // SAFETY: every constructor places the bytes on an alignment suited to `T`.
        unsafe { std::slice::from_raw_parts(self.bytes.as_ptr().cast(), self.length) }
    }

    /// View the elements as little-endian bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Iterate the elements by reference.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.as_slice().iter()
    }

    /// The elements in `range`, sharing storage with `self`.
    ///
    /// # Panics
    ///
    /// Panics if the range is decreasing or extends past the end of the buffer.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        let (begin, end) = resolve_range(&range, self.len());
        if begin == end {
            return BufferMut::with_capacity_aligned(0, self.alignment).freeze();
        }
        let width = size_of::<T>();
        Self::from_parts(
            self.bytes.slice(begin * width..end * width),
            end - begin,
            self.alignment,
        )
    }

    /// Reinterpret as raw bytes without copying.
    pub fn into_byte_buffer(self) -> ByteBuffer {
        ByteBuffer::from_parts(self.bytes, self.length * size_of::<T>(), self.alignment)
    }

    /// This buffer realigned to `alignment`, copying only when the current storage does not
    /// already satisfy it.
    pub fn aligned(self, alignment: Alignment) -> Self {
        if self.is_empty() {
            BufferMut::with_capacity_aligned(0, alignment).freeze()
        } else if self.bytes.as_ptr().align_offset(*alignment) == 0 {
            Self { alignment, ..self }
        } else {
            BufferMut::copy_from_aligned(self.as_slice(), alignment).freeze()
        }
    }
}

/// The `[begin, end)` element positions named by `range` over `len` elements.
fn resolve_range(range: &impl RangeBounds<usize>, len: usize) -> (usize, usize) {
    let begin = match range.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n.checked_add(1).ragged_expect("range start overflows"),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&n) => n.checked_add(1).ragged_expect("range end overflows"),
        Bound::Excluded(&n) => n,
        Bound::Unbounded => len,
    };
    if begin > end || end > len {
        ragged_panic!("range {begin}..{end} is not within 0..{len}");
    }
    (begin, end)
}

impl<T: Debug> Debug for Buffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("length", &self.length)
            .field("alignment", &self.alignment)
            .field("values", &Preview(self.as_slice()))
            .finish()
    }
}

impl<T> PartialEq for Buffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<T> Eq for Buffer<T> {}

impl<T> Deref for Buffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> AsRef<[T]> for Buffer<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> FromIterator<T> for Buffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        BufferMut::from_iter(iter).freeze()
    }
}

/// Byte buffers need no alignment, so a `Vec<u8>` converts without copying.
impl From<Vec<u8>> for ByteBuffer {
    fn from(value: Vec<u8>) -> Self {
        Self::from(Bytes::from(value))
    }
}

/// Byte buffers need no alignment, so `Bytes` converts without copying.
impl From<Bytes> for ByteBuffer {
    fn from(bytes: Bytes) -> Self {
        let length = bytes.len();
        Self::from_parts(bytes, length, Alignment::of::<u8>())
    }
}

impl<T> From<BufferMut<T>> for Buffer<T> {
    fn from(value: BufferMut<T>) -> Self {
        value.freeze()
    }
}

/// Iterator over the elements of a `Buffer<T>` by value.
pub struct BufferIterator<T> {
    buffer: Buffer<T>,
    index: usize,
}

impl<T: Copy> Iterator for BufferIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.buffer.as_slice().get(self.index).copied()?;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<T: Copy> IntoIterator for Buffer<T> {
    type Item = T;
    type IntoIter = BufferIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        BufferIterator {
            buffer: self,
            index: 0,
        }
    }
}
