#![cfg(target_endian = "little")]
#![deny(missing_docs)]

//! The schema of ragged arrays.
//!
//! A [`Form`] mirrors the node tree of a layout one-to-one but holds only type information:
//! scalar kinds, index kinds, parameters, and the `form_key` that names each node's buffers.
//! Forms answer depth and field queries, render type strings, project columns, and travel as
//! JSON next to the buffers they describe.

pub use form::*;
pub use index_type::*;
pub use parameters::*;
pub use ptype::*;

mod columns;
mod depth;
mod display;
mod form;
mod index_type;
mod json;
mod keys;
mod parameters;
mod ptype;
