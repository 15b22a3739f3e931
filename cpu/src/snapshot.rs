//! A copy of the programmer-visible state of a [`crate::Cpu`], for
//! display and for serialization.
use std::fmt::{self, Display, Formatter};

use base::prelude::Register;
use serde::Serialize;

use crate::control::{SavedContext, State};
use crate::flags::Flags;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub state: State,
    pub pc: u32,
    pub next_pc: u32,
    pub registers: [u32; Register::COUNT],
    pub flags: Flags,
    pub interrupts_masked: bool,
    pub in_interrupt: bool,
    pub saved: SavedContext,
    pub irq_ack: u8,
    /// The contents of the instruction register.
    pub instruction: u32,
    pub disassembly: String,
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        writeln!(
            f,
            "state {:<8} pc {:08x}  next {:08x}  flags {}  ir {:08x}  {}",
            self.state, self.pc, self.next_pc, self.flags, self.instruction, self.disassembly
        )?;
        for (row, chunk) in self.registers.chunks(4).enumerate() {
            for (col, value) in chunk.iter().enumerate() {
                let index = u8::try_from(row * 4 + col).map_err(|_| fmt::Error)?;
                let name = Register::try_from(index).map_err(|_| fmt::Error)?;
                write!(f, "{:>4} {:08x}  ", name.to_string(), value)?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "interrupts {}{}  epc {:08x}  elr {:08x}  estatus {:03b}",
            if self.interrupts_masked {
                "masked"
            } else {
                "enabled"
            },
            if self.in_interrupt {
                ", in handler"
            } else {
                ""
            },
            self.saved.epc,
            self.saved.elr,
            self.saved.estatus
        )
    }
}
