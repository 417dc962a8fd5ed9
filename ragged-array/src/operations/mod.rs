//! Structural operations built on [`recursively_apply`](crate::recursively_apply).

pub use from_regular::*;
pub use is_tuple::*;
pub use to_device::*;
pub use to_regular::*;

mod from_regular;
mod is_tuple;
mod to_device;
mod to_regular;
