//! The capability interface through which layouts touch buffer memory.
//!
//! Layout operations never allocate or gather buffers directly. They go through a
//! [`Backend`] handle passed explicitly by the caller, so the same structural code serves any
//! memory space a backend can address.

use std::fmt::{Debug, Display, Formatter};

use ragged_buffer::{Alignment, ByteBuffer, ByteBufferMut};
use ragged_error::{RaggedResult, ragged_bail, ragged_err};
use ragged_form::PType;

use crate::Index;

/// A memory space holding buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// Main memory
    Cpu,
    /// A CUDA device, by ordinal
    Cuda(usize),
}

impl Display for Device {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
        }
    }
}

/// The buffer capabilities a layout needs from a numeric backend.
pub trait Backend: Debug + Send + Sync {
    /// The device this backend allocates on.
    fn device(&self) -> Device;

    /// Allocate an empty buffer with capacity for `len` values of `ptype`, aligned to the
    /// width of `ptype`.
    fn allocate(&self, ptype: PType, len: usize) -> RaggedResult<ByteBufferMut>;

    /// A contiguous buffer with the same bytes as `buffer`, aligned to `alignment`.
    fn as_contiguous_buffer(
        &self,
        buffer: &ByteBuffer,
        alignment: Alignment,
    ) -> RaggedResult<ByteBuffer>;

    /// Gather the `item_width`-byte rows of `buffer` at the positions listed in `index`.
    fn index_into(
        &self,
        buffer: &ByteBuffer,
        item_width: usize,
        index: &Index,
    ) -> RaggedResult<ByteBuffer>;

    /// Copy `buffer` to `device`.
    fn to_device(&self, buffer: &ByteBuffer, device: Device) -> RaggedResult<ByteBuffer>;
}

/// A [`Backend`] over main memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

impl Backend for CpuBackend {
    fn device(&self) -> Device {
        Device::Cpu
    }

    fn allocate(&self, ptype: PType, len: usize) -> RaggedResult<ByteBufferMut> {
        Ok(ByteBufferMut::with_capacity_aligned(
            len * ptype.byte_width(),
            Alignment::new(ptype.byte_width()),
        ))
    }

    fn as_contiguous_buffer(
        &self,
        buffer: &ByteBuffer,
        alignment: Alignment,
    ) -> RaggedResult<ByteBuffer> {
        if !buffer.is_empty() && buffer.as_bytes().as_ptr().align_offset(*alignment) != 0 {
            log::debug!(
                "copying {} byte buffer to realign it to {alignment}",
                buffer.len()
            );
        }
        Ok(buffer.clone().aligned(alignment))
    }

    fn index_into(
        &self,
        buffer: &ByteBuffer,
        item_width: usize,
        index: &Index,
    ) -> RaggedResult<ByteBuffer> {
        let bytes = buffer.as_slice();
        let rows = bytes.len().checked_div(item_width).unwrap_or(usize::MAX);
        let mut out =
            ByteBufferMut::with_capacity_aligned(index.len() * item_width, buffer.alignment());
        for position in index.iter() {
            let row = usize::try_from(position)
                .ok()
                .filter(|row| *row < rows)
                .ok_or_else(|| {
                    let position = usize::try_from(position.unsigned_abs()).unwrap_or(usize::MAX);
                    ragged_err!(OutOfBounds: position, 0, rows)
                })?;
            out.extend_from_slice(&bytes[row * item_width..(row + 1) * item_width]);
        }
        Ok(out.freeze())
    }

    fn to_device(&self, buffer: &ByteBuffer, device: Device) -> RaggedResult<ByteBuffer> {
        if device != Device::Cpu {
            ragged_bail!(NotImplemented: "to_device", format!("CpuBackend to {device}"));
        }
        Ok(buffer.clone())
    }
}

#[cfg(test)]
mod tests {
    use ragged_buffer::{Buffer, buffer};

    use super::*;

    #[test]
    fn gather_rows() {
        let data = buffer![1i16, 2, 3, 4, 5, 6].into_byte_buffer();
        let gathered = CpuBackend
            .index_into(&data, 4, &Index::from(vec![2i64, 0]))
            .unwrap();
        assert_eq!(
            Buffer::<i16>::from_byte_buffer(gathered).as_slice(),
            &[5, 6, 1, 2]
        );
    }

    #[test]
    fn gather_out_of_bounds() {
        let data = buffer![1i16, 2].into_byte_buffer();
        assert!(
            CpuBackend
                .index_into(&data, 2, &Index::from(vec![2i64]))
                .is_err()
        );
        assert!(
            CpuBackend
                .index_into(&data, 2, &Index::from(vec![-1i64]))
                .is_err()
        );
    }

    #[test]
    fn zero_width_rows() {
        let gathered = CpuBackend
            .index_into(&ByteBuffer::empty(), 0, &Index::from(vec![0i64, 7]))
            .unwrap();
        assert!(gathered.is_empty());
    }

    #[test]
    fn allocate_aligned() {
        let buffer = CpuBackend.allocate(PType::Float64, 4).unwrap();
        assert!(buffer.capacity() >= 32);
        assert_eq!(buffer.alignment(), Alignment::new(8));
    }

    #[test]
    fn transfers() {
        let data = ByteBuffer::from(vec![1u8, 2]);
        assert_eq!(CpuBackend.to_device(&data, Device::Cpu).unwrap(), data);
        let err = CpuBackend.to_device(&data, Device::Cuda(0)).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("function to_device not implemented for CpuBackend to cuda:0")
        );
    }
}
