//! The prelude exports the structs which are useful in representing
//! instructions and their fields.  Providing this prelude is the main
//! purpose of the base crate.
pub use super::error::*;
pub use super::field::*;
pub use super::instruction::*;
pub use super::register::Register;
pub use super::{u4, u12, u20, u24};
