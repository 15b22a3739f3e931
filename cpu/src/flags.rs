//! The condition flags and the evaluation of instruction conditions.
use std::fmt::{self, Display, Formatter};

use base::prelude::*;
use serde::Serialize;

use crate::alu::AluOutput;

/// The Z, N and C flags.  They change only when an ALU-class
/// instruction executes or when `rti` restores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Flags {
    pub zero: bool,
    pub negative: bool,
    pub carry: bool,
}

impl Flags {
    /// The value the flags take on reset.
    pub const RESET: Flags = Flags {
        zero: true,
        negative: false,
        carry: false,
    };

    pub fn from_alu(out: &AluOutput) -> Flags {
        Flags {
            zero: out.zero,
            negative: out.negative,
            carry: out.carry,
        }
    }

    /// Pack the flags in the layout of the saved interrupt status:
    /// N in bit 0, Z in bit 1, C in bit 2.
    pub fn pack(&self) -> u8 {
        u8::from(self.negative) | (u8::from(self.zero) << 1) | (u8::from(self.carry) << 2)
    }

    pub fn unpack(status: u8) -> Flags {
        Flags {
            negative: status & 0b001 != 0,
            zero: status & 0b010 != 0,
            carry: status & 0b100 != 0,
        }
    }

    /// Decide whether an instruction with condition `cond` should
    /// execute.
    pub fn satisfies(&self, cond: Condition) -> bool {
        let Flags {
            zero: z,
            negative: n,
            carry: c,
        } = *self;
        match u8::from(cond.code()) {
            8 => !z,
            9 => z,
            10 => !c,
            11 => c,
            12 => !n && !z,
            13 => !n || z,
            14 => n && !z,
            15 => n || z,
            _ => true,
        }
    }
}

impl Default for Flags {
    fn default() -> Flags {
        Flags::RESET
    }
}

impl Display for Flags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let show = |set: bool, name: char| if set { name } else { '-' };
        write!(
            f,
            "{}{}{}",
            show(self.zero, 'Z'),
            show(self.negative, 'N'),
            show(self.carry, 'C')
        )
    }
}
