#![deny(missing_docs)]

//! An aligned byte buffer implementation for ragged arrays.
//!
//! Every node of a ragged layout keeps its data (scalars, offsets, indices, masks) in a
//! [`Buffer`]. Buffers are immutable once frozen, cheap to clone, and share their storage across
//! slices, so structurally identical views of the same data never copy it.
//!
//! # Alignment
//!
//! A `Buffer<T>` is always aligned to at least the alignment of `T`, so it can be reinterpreted
//! as a `&[T]` without copying. Reinterpreting a [`ByteBuffer`] as a typed buffer only copies when
//! the underlying bytes are misaligned.

pub use alignment::*;
pub use buffer::*;
pub use buffer_mut::*;

mod alignment;
mod buffer;
mod buffer_mut;
mod debug;
mod macros;

/// An immutable buffer of `u8`.
pub type ByteBuffer = Buffer<u8>;

/// A mutable buffer of `u8`.
pub type ByteBufferMut = BufferMut<u8>;
