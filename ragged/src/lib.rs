#![deny(missing_docs)]

//! Nested, variable-length, heterogeneous arrays backed by flat buffers.
//!
//! This crate gathers the layout nodes and operations of `ragged-array` at its root, and
//! the buffer, error and form crates under their own modules.

pub use ragged_array::*;
pub use {ragged_buffer as buffer, ragged_error as error, ragged_form as form};
