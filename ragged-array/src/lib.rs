#![cfg(target_endian = "little")]
#![deny(missing_docs)]

//! Buffer-backed layouts of nested, variable-length, heterogeneous arrays.
//!
//! A layout is a tree of [`Content`] nodes. Leaves hold contiguous scalars, and the nodes
//! above them add list dimensions, indirection, missing values, unions and records, each
//! through one or two integer [`Index`] buffers. Every node has a matching
//! [`Form`](ragged_form::Form) that describes its type without its data.
//!
//! Structural operations such as [`from_regular`] and [`to_regular`] are written on top of
//! [`recursively_apply`], which walks a layout depth-first and rebuilds it from the nodes a
//! caller-supplied function chooses. Layouts flatten into named buffers with [`to_buffers`]
//! and come back with [`from_buffers`].

pub use backend::*;
pub use buffers::*;
pub use content::*;
pub use index::*;
pub use operations::*;
pub use traversal::*;
pub use visitor::*;

mod backend;
mod buffers;
mod carry;
mod content;
mod index;
mod json;
mod nbytes;
mod operations;
mod traversal;
mod tree;
mod visitor;
