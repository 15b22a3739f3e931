//! Unsigned types of the various bit widths which occur as fields of
//! an instruction word.  A 32-bit instruction is carved up into
//! 4-bit fields (opcode, condition, registers, ALU operation) and
//! immediate fields 12, 16, 20 or 24 bits wide.  Keeping each width
//! as its own type means that a value which has been range-checked
//! once (by the assembler, say) cannot silently overflow into the
//! neighbouring field when the word is packed.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter, LowerHex};
use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::error::ConversionFailed;


/// This macro implements conversions from native types to Unsigned*Bit
/// which are always possible (e.g. From<u8> for Unsigned12Bit).
macro_rules! from_native_type_to_self {
    ($SelfT:ty, $($from:ty)*) => {
        $(
            impl From<$from> for $SelfT {
                fn from(n: $from) -> Self {
                    Self {
                        bits: n.into(),
                    }
                }
            }
        )*
    }
}

/// This macro implements conversions from Unsigned*Bit to native
/// types which are always possible (e.g. From<Unsigned4Bit> for i16).
macro_rules! from_self_to_native_type {
    ($SelfT:ty, $($to:ty)*) => {
        $(
            impl From<$SelfT> for $to {
                fn from(n: $SelfT) -> $to {
                    // The value range of n.bits is narrower than the
                    // range of $InnerT, so this cast cannot lose
                    // information even where $to is signed.
                    n.bits as $to
                }
            }
        )*
    }
}

/// This macro implements conversions from Unsigned*Bit to native
/// types where the conversion may not always fit.  For example
/// TryFrom<Unsigned20Bit> for u8.
macro_rules! try_from_self_to_native_type {
    ($SelfT:ty, $($to:ty)*) => {
        $(
            impl TryFrom<$SelfT> for $to {
                type Error = ConversionFailed;
                fn try_from(n: $SelfT) -> Result<$to, ConversionFailed> {
                    <$to>::try_from(n.bits).map_err(|_| ConversionFailed::TooLarge)
                }
            }
        )*
    }
}

/// This macro implements a conversions from native types to
/// Unsigned*Bit where the conversion may not always fit.  For example
/// TryFrom<u32> for Unsigned16Bit.
macro_rules! try_from_native_type_to_self {
    ($SelfT:ty, $InnerT:ty, $($from:ty)*) => {
        $(
            impl TryFrom<$from> for $SelfT {
                type Error = ConversionFailed;
                fn try_from(n: $from) -> Result<Self, ConversionFailed> {
                    let bits: $InnerT = match n.try_into() {
                        Err(_) => {
                            // Because $InnerT is unsigned, we know
                            // that n < 0 is always an error case.
                            #[allow(unused_comparisons)]
                            if n < 0 {
                                return Err(ConversionFailed::TooSmall);
                            } else {
                                return Err(ConversionFailed::TooLarge);
                            }
                        }
                        Ok(value) if value > Self::VALUE_BITS => {
                            return Err(ConversionFailed::TooLarge);
                        }
                        Ok(value) => value,
                    };
                    Ok(
                        Self {
                            bits,
                        }
                    )
                }
            }
        )*
    }
}

/// This macro implements the base functionality of the field types.
/// `SelfT` is the name of the type we are defining, `BITS` is its
/// width and `InnerT` is the native type which stores those bits.
macro_rules! unsigned_field_impl {
    ($SelfT:ty, $BITS:expr, $InnerT:ty) => {
        impl $SelfT {
            pub const BITS: u32 = $BITS;
            const MODULUS: u64 = 1 << $BITS;
            const VALUE_BITS: $InnerT = (Self::MODULUS - 1) as $InnerT;

            pub const MAX: Self = Self {
                bits: Self::VALUE_BITS,
            };
            pub const ZERO: Self = Self { bits: 0 };
            pub const ONE: Self = Self { bits: 1 };
            pub const MIN: Self = Self::ZERO;

            // This will always fail at compile time, so no need to
            // hide it.  It's pub so that it can be used in u4!() and
            // similar.
            pub const fn new<const N: $InnerT>() -> $SelfT {
                type Word = $SelfT;
                struct Helper<const M: $InnerT>;
                impl<const M: $InnerT> Helper<M> {
                    const U: Word = {
                        if M > Word::MAX.bits {
                            panic!("input value is out of range")
                        } else {
                            Word {
                                bits: Word::MAX.bits & M,
                            }
                        }
                    };
                }
                Helper::<N>::U
            }

            /// Keep only those low-order bits of `value` which fit
            /// into the field.  This is what the decoder does when it
            /// slices a field out of an instruction word.
            pub const fn truncating(value: u32) -> Self {
                Self {
                    bits: (value & (Self::VALUE_BITS as u32)) as $InnerT,
                }
            }

            /// Accept `value` if it can be represented in the field
            /// either as an unsigned quantity or as a two's
            /// complement signed one, and return its low-order bits.
            /// For an N-bit field, the accepted range is -2^(N-1) to
            /// 2^N - 1 inclusive.
            pub fn try_from_signed_or_unsigned(value: i64) -> Result<Self, ConversionFailed> {
                let lowest: i64 = -((Self::MODULUS / 2) as i64);
                let highest: i64 = (Self::MODULUS - 1) as i64;
                if value < lowest {
                    Err(ConversionFailed::TooSmall)
                } else if value > highest {
                    Err(ConversionFailed::TooLarge)
                } else {
                    // Truncation to u32 keeps the two's complement
                    // representation of negative values.
                    Ok(Self::truncating(value as u32))
                }
            }

            pub const fn is_zero(&self) -> bool {
                self.bits == 0
            }

            pub const fn bits(&self) -> u32 {
                self.bits as u32
            }

            /// Interpret the field as a two's complement quantity and
            /// widen it to 32 bits.
            pub const fn sign_extend(&self) -> i32 {
                let shift = 32 - $BITS;
                ((self.bits as u32) << shift) as i32 >> shift
            }
        }

        impl Default for $SelfT {
            fn default() -> Self {
                Self { bits: 0 }
            }
        }

        impl Display for $SelfT {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
                Display::fmt(&self.bits, f)
            }
        }

        impl LowerHex for $SelfT {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
                LowerHex::fmt(&self.bits, f)
            }
        }

        impl Debug for $SelfT {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                write!(f, concat!(stringify!($SelfT), "{{bits: {:#x}}}"), self.bits)
            }
        }

        impl Hash for $SelfT {
            fn hash<H>(&self, state: &mut H)
            where
                H: Hasher,
            {
                self.bits.hash(state)
            }
        }

        impl<T> PartialEq<T> for $SelfT
        where
            T: TryInto<$SelfT> + Copy,
        {
            fn eq(&self, other: &T) -> bool {
                let converted: Result<$SelfT, _> = (*other).try_into();
                match converted {
                    Ok(rhs) => self.bits == rhs.bits,
                    Err(_) => false,
                }
            }
        }

        impl Eq for $SelfT {}

        impl PartialOrd<$SelfT> for $SelfT {
            fn partial_cmp(&self, other: &$SelfT) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $SelfT {
            fn cmp(&self, other: &$SelfT) -> Ordering {
                self.bits.cmp(&other.bits)
            }
        }

        impl std::ops::BitAnd<$InnerT> for $SelfT {
            type Output = Self;
            fn bitand(self, mask: $InnerT) -> Self {
                Self {
                    bits: self.bits & mask,
                }
            }
        }

        #[cfg(test)]
        impl proptest::arbitrary::Arbitrary for $SelfT {
            type Parameters = ();
            type Strategy = proptest::strategy::BoxedStrategy<Self>;

            fn arbitrary_with(_args: ()) -> Self::Strategy {
                use proptest::strategy::Strategy;
                (0..=Self::VALUE_BITS).prop_map(|bits| Self { bits }).boxed()
            }
        }
    };
}

/// `Unsigned4Bit` holds a major opcode, a condition code, an ALU
/// operation or a register number.
#[derive(Clone, Copy, Serialize)]
pub struct Unsigned4Bit {
    pub(crate) bits: u8,
}

/// `Unsigned12Bit` is the immediate operand of the ALU-immediate
/// instructions.
#[derive(Clone, Copy, Serialize)]
pub struct Unsigned12Bit {
    pub(crate) bits: u16,
}

/// `Unsigned16Bit` is the address offset of loads and stores.
#[derive(Clone, Copy, Serialize)]
pub struct Unsigned16Bit {
    pub(crate) bits: u16,
}

/// `Unsigned20Bit` is the immediate of `ldi`, `ldis`, `ldiu`, `jsr`,
/// `bdec` and the `ext` instructions.
#[derive(Clone, Copy, Serialize)]
pub struct Unsigned20Bit {
    pub(crate) bits: u32,
}

/// `Unsigned24Bit` is the word offset of the `b` instruction.
#[derive(Clone, Copy, Serialize)]
pub struct Unsigned24Bit {
    pub(crate) bits: u32,
}

unsigned_field_impl!(Unsigned4Bit, 4, u8);
unsigned_field_impl!(Unsigned12Bit, 12, u16);
unsigned_field_impl!(Unsigned16Bit, 16, u16);
unsigned_field_impl!(Unsigned20Bit, 20, u32);
unsigned_field_impl!(Unsigned24Bit, 24, u32);

////////////////////////////////////////////////////////////////////////
// Unsigned4Bit
////////////////////////////////////////////////////////////////////////

// all the things that Unsigned4Bit always fits into
from_self_to_native_type!(Unsigned4Bit, u8 i8 u16 i16 u32 i32 u64 i64 usize isize);
// all the things that may not fit into Unsigned4Bit
try_from_native_type_to_self!(Unsigned4Bit, u8, u8 i8 u16 i16 u32 i32 u64 i64 usize isize);

////////////////////////////////////////////////////////////////////////
// Unsigned12Bit
////////////////////////////////////////////////////////////////////////

// all the things that always fit into Unsigned12Bit
from_native_type_to_self!(Unsigned12Bit, u8);
// all the things that Unsigned12Bit always fits into
from_self_to_native_type!(Unsigned12Bit, u16 i16 u32 i32 u64 i64 usize isize);
// all the things that Unsigned12Bit may not fit into
try_from_self_to_native_type!(Unsigned12Bit, u8 i8);
// all the things that may not fit into Unsigned12Bit
try_from_native_type_to_self!(Unsigned12Bit, u16, u16 i16 u32 i32 u64 i64 usize isize);

////////////////////////////////////////////////////////////////////////
// Unsigned16Bit
////////////////////////////////////////////////////////////////////////

// all the things that always fit into Unsigned16Bit
from_native_type_to_self!(Unsigned16Bit, u8 u16);
// all the things that Unsigned16Bit always fits into
from_self_to_native_type!(Unsigned16Bit, u16 u32 i32 u64 i64 usize isize);
// all the things that Unsigned16Bit may not fit into
try_from_self_to_native_type!(Unsigned16Bit, u8 i8 i16);
// all the things that may not fit into Unsigned16Bit
try_from_native_type_to_self!(Unsigned16Bit, u16, i8 i16 u32 i32 u64 i64 usize isize);

////////////////////////////////////////////////////////////////////////
// Unsigned20Bit
////////////////////////////////////////////////////////////////////////

// all the things that always fit into Unsigned20Bit
from_native_type_to_self!(Unsigned20Bit, u8 u16);
// all the things that Unsigned20Bit always fits into
from_self_to_native_type!(Unsigned20Bit, u32 i32 u64 i64 usize isize);
// all the things that Unsigned20Bit may not fit into
try_from_self_to_native_type!(Unsigned20Bit, u8 i8 u16 i16);
// all the things that may not fit into Unsigned20Bit
try_from_native_type_to_self!(Unsigned20Bit, u32, i8 i16 u32 i32 u64 i64 usize isize);

////////////////////////////////////////////////////////////////////////
// Unsigned24Bit
////////////////////////////////////////////////////////////////////////

// all the things that always fit into Unsigned24Bit
from_native_type_to_self!(Unsigned24Bit, u8 u16);
// all the things that Unsigned24Bit always fits into
from_self_to_native_type!(Unsigned24Bit, u32 i32 u64 i64 usize isize);
// all the things that Unsigned24Bit may not fit into
try_from_self_to_native_type!(Unsigned24Bit, u8 i8 u16 i16);
// all the things that may not fit into Unsigned24Bit
try_from_native_type_to_self!(Unsigned24Bit, u32, i8 i16 u32 i32 u64 i64 usize isize);
