//! Register names.
//!
//! There are 16 general-purpose registers.  Three of them have
//! special roles and are usually referred to by their alias:
//!
//! | Index | Alias | Role |
//! |-------|-------|------|
//! | 13    | `sp`  | stack pointer (adjusted by `push`/`pop`) |
//! | 14    | `lr`  | link register (written by `jsr`) |
//! | 15    | `pc`  | program counter |
//!
//! The aliases are only names for indices; the register file itself
//! is a single array.
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

#[cfg(test)]
use test_strategy::Arbitrary;

use super::field::Unsigned4Bit;

#[cfg_attr(test, derive(Arbitrary))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Register(Unsigned4Bit);

impl Register {
    pub const COUNT: usize = 16;
    pub const SP: Register = Register(Unsigned4Bit::new::<13>());
    pub const LR: Register = Register(Unsigned4Bit::new::<14>());
    pub const PC: Register = Register(Unsigned4Bit::new::<15>());

    pub fn index(&self) -> usize {
        usize::from(self.0)
    }

    pub fn field(&self) -> Unsigned4Bit {
        self.0
    }

    /// Look up a register by name.  Accepts `r0`..`r15`, `sp`, `lr`
    /// and `pc` in any letter case.
    pub fn from_name(name: &str) -> Option<Register> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "sp" => Some(Register::SP),
            "lr" => Some(Register::LR),
            "pc" => Some(Register::PC),
            _ => {
                let digits = lower.strip_prefix('r')?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let n: u32 = digits.parse().ok()?;
                Unsigned4Bit::try_from(n).ok().map(Register)
            }
        }
    }
}

impl From<Unsigned4Bit> for Register {
    fn from(field: Unsigned4Bit) -> Register {
        Register(field)
    }
}

impl TryFrom<u8> for Register {
    type Error = super::error::ConversionFailed;
    fn try_from(n: u8) -> Result<Register, Self::Error> {
        Unsigned4Bit::try_from(n).map(Register)
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self.index() {
            13 => f.write_str("sp"),
            14 => f.write_str("lr"),
            15 => f.write_str("pc"),
            n => write!(f, "r{n}"),
        }
    }
}
