//! The `base` crate defines the things about the instruction set
//! which are useful in both the emulator and other associated tools.
//! The idea is that an assembler depends on the base crate but does
//! not need to depend on the emulator library itself.

mod error;
mod field;

pub mod instruction;
pub mod prelude;
pub mod register;

pub use crate::error::ConversionFailed;
pub use crate::field::*;

#[macro_export]
macro_rules! u4 {
    ($n:expr) => {
        $crate::prelude::Unsigned4Bit::new::<{ $n }>()
    };
}

#[macro_export]
macro_rules! u12 {
    ($n:expr) => {
        $crate::prelude::Unsigned12Bit::new::<{ $n }>()
    };
}

#[macro_export]
macro_rules! u20 {
    ($n:expr) => {
        $crate::prelude::Unsigned20Bit::new::<{ $n }>()
    };
}

#[macro_export]
macro_rules! u24 {
    ($n:expr) => {
        $crate::prelude::Unsigned24Bit::new::<{ $n }>()
    };
}

#[test]
fn test_u4() {
    use prelude::Unsigned4Bit;
    let m: Unsigned4Bit = u4!(13_u8);
    let n: Unsigned4Bit = Unsigned4Bit::try_from(13_u32).expect("test data should be in range");
    assert_eq!(m, n);
}

#[test]
fn test_u20() {
    use prelude::Unsigned20Bit;
    let p: Unsigned20Bit = u20!(1 << 19);
    let q: Unsigned20Bit =
        Unsigned20Bit::try_from(1u32 << 19).expect("test data should be in range");
    assert_eq!(p, q);
}
