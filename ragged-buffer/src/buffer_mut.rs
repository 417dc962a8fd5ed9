use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use bytes::{Buf, BytesMut};
use ragged_error::ragged_panic;

use crate::debug::Preview;
use crate::{Alignment, Buffer};

/// A growable run of `T`s whose storage starts on its alignment as it grows.
///
/// Layout builders append offsets, indexes and gathered values here and then [`freeze`] the
/// result into a shared [`Buffer`].
///
/// [`freeze`]: BufferMut::freeze
pub struct BufferMut<T> {
    bytes: BytesMut,
    length: usize,
    alignment: Alignment,
    _marker: PhantomData<T>,
}

/// Empty storage with room for `nbytes`, starting on an `alignment` boundary.
fn aligned_storage(nbytes: usize, alignment: Alignment) -> BytesMut {
    let mut bytes = BytesMut::with_capacity(nbytes + *alignment);
    let padding = bytes.as_ptr().align_offset(*alignment);
    bytes.resize(padding, 0);
    bytes.advance(padding);
    bytes
}

impl<T> BufferMut<T> {
    /// Room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_aligned(capacity, Alignment::of::<T>())
    }

    /// Room for `capacity` elements, starting on an `alignment` boundary.
    ///
    /// ## Panics
    ///
    /// Panics if `alignment` is weaker than the alignment of `T`.
    pub fn with_capacity_aligned(capacity: usize, alignment: Alignment) -> Self {
        if !alignment.is_aligned_to(Alignment::of::<T>()) {
            ragged_panic!(
                "alignment {alignment} is weaker than the {} required",
                Alignment::of::<T>()
            );
        }
        Self {
            bytes: aligned_storage(capacity * size_of::<T>(), alignment),
            length: 0,
            alignment,
            _marker: PhantomData,
        }
    }

    /// No elements.
    pub fn empty() -> Self {
        Self::with_capacity(0)
    }

    /// A copy of `values`.
    pub fn copy_from(values: impl AsRef<[T]>) -> Self {
        Self::copy_from_aligned(values, Alignment::of::<T>())
    }

    /// A copy of `values`, starting on an `alignment` boundary.
    pub fn copy_from_aligned(values: impl AsRef<[T]>, alignment: Alignment) -> Self {
        let values = values.as_ref();
        let mut buffer = Self::with_capacity_aligned(values.len(), alignment);
        buffer.extend_from_slice(values);
        buffer
    }

    /// The number of `T`s held.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether no `T`s are held.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// How many `T`s fit before the storage moves.
    pub fn capacity(&self) -> usize {
        self.bytes.capacity() / size_of::<T>()
    }

    /// The alignment this buffer guarantees.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// View the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        if self.length == 0 {
            return &[];
        }
        // SAFETY: the storage starts on an alignment suited to `T` and holds `length` items.
        unsafe { std::slice::from_raw_parts(self.bytes.as_ptr().cast(), self.length) }
    }

    /// Grow the storage for `additional` more elements. `BytesMut` does not keep the alignment
    /// of a reallocation, so growing copies into fresh aligned storage.
    fn grow(&mut self, additional: usize) {
        let needed = (self.length + additional) * size_of::<T>();
        if self.bytes.capacity() >= needed {
            return;
        }
        let mut bytes = aligned_storage(needed.max(self.bytes.capacity() * 2), self.alignment);
        bytes.extend_from_slice(&self.bytes);
        self.bytes = bytes;
    }

    /// Append one element.
    pub fn push(&mut self, value: T) {
        self.extend_from_slice(std::slice::from_ref(&value));
    }

    /// Append every element of `values`.
    pub fn extend_from_slice(&mut self, values: &[T]) {
        self.grow(values.len());
        // SAFETY: `values` is a live slice, so its bytes may be read.
        let raw = unsafe {
            std::slice::from_raw_parts(values.as_ptr().cast::<u8>(), size_of_val(values))
        };
        self.bytes.extend_from_slice(raw);
        self.length += values.len();
    }

    /// Share the elements as an immutable [`Buffer`] without copying.
    pub fn freeze(self) -> Buffer<T> {
        Buffer::from_parts(self.bytes.freeze(), self.length, self.alignment)
    }
}

impl<T: Debug> Debug for BufferMut<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferMut")
            .field("length", &self.length)
            .field("alignment", &self.alignment)
            .field("values", &Preview(self.as_slice()))
            .finish()
    }
}

impl<T> Extend<T> for BufferMut<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.grow(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for BufferMut<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buffer = Self::empty();
        buffer.extend(iter);
        buffer
    }
}

#[cfg(test)]
mod test {
    use crate::{Alignment, BufferMut};

    #[test]
    fn growth_keeps_alignment() {
        let mut buf = BufferMut::<i64>::with_capacity_aligned(1, Alignment::new(64));
        for i in 0..100 {
            buf.push(i);
        }
        assert_eq!(buf.as_slice().as_ptr().align_offset(64), 0);
        assert_eq!(buf.len(), 100);
        assert_eq!(buf.as_slice()[99], 99);
    }

    #[test]
    fn extend_then_freeze() {
        let mut buf = BufferMut::copy_from([1i32, 2, 3]);
        buf.extend_from_slice(&[4, 5]);
        buf.extend([6, 7]);
        assert_eq!(buf.freeze().as_slice(), &[1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    #[should_panic]
    fn weaker_alignment_than_item() {
        BufferMut::<u64>::with_capacity_aligned(4, Alignment::new(2));
    }
}
