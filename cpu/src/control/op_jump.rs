//! ## Control transfer opcodes
//!
//! - b: [`Cpu::op_branch`]
//! - bdec: [`Cpu::op_bdec`]
//! - jsr: [`Cpu::op_jsr`]
//! - ext (rts, rti, sei, cli): [`Cpu::op_ext`]
//!
//! All of these change only `next_pc` (never `pc` itself) so the
//! change takes effect at the next FETCH.
use tracing::{Level, event};

use base::prelude::*;

use crate::control::{Cpu, State};
use crate::flags::Flags;

impl Cpu {
    /// Branch offsets count words relative to the address of the
    /// branch instruction.
    fn branch_target(&self, words: i32) -> u32 {
        self.pc().wrapping_add((words as u32) << 2)
    }

    pub(super) fn op_branch(&mut self, offset: Unsigned24Bit) -> State {
        self.next_pc = self.branch_target(offset.sign_extend());
        State::Fetch
    }

    /// Decrement `rd` and branch, unless `rd` is already zero (in
    /// which case nothing happens).
    pub(super) fn op_bdec(&mut self, rd: Register, offset: Unsigned20Bit) -> State {
        let count = self.register(rd);
        if count != 0 {
            self.set_register(rd, count - 1);
            self.next_pc = self.branch_target(offset.sign_extend());
        }
        State::Fetch
    }

    /// The return address saved in `lr` is the address of the `jsr`
    /// itself.  The target is computed before `lr` is written, so
    /// `jsr lr, n` jumps relative to the old value of `lr`.
    pub(super) fn op_jsr(&mut self, rd: Register, target: Unsigned20Bit) -> State {
        self.next_pc = self.register(rd).wrapping_add(u32::from(target));
        self.set_register(Register::LR, self.pc());
        State::Fetch
    }

    pub(super) fn op_ext(&mut self, function: ExtFunction, imm: Unsigned20Bit) -> State {
        if function == ExtFunction::RETURN {
            self.next_pc = self.register(Register::LR);
        } else if function == ExtFunction::RETURN_FROM_INTERRUPT {
            let saved = self.saved;
            event!(
                Level::DEBUG,
                "returning from interrupt to {:08x}",
                saved.epc
            );
            self.in_interrupt = false;
            self.next_pc = saved.epc;
            self.set_register(Register::LR, saved.elr);
            self.flags = Flags::unpack(saved.estatus);
        } else if function == ExtFunction::SET_INTERRUPT_MASK {
            self.interrupts_masked = u32::from(imm) & 1 != 0;
            event!(
                Level::DEBUG,
                "interrupts {}",
                if self.interrupts_masked {
                    "masked"
                } else {
                    "unmasked"
                }
            );
        } else {
            event!(
                Level::DEBUG,
                "ext function {} does nothing",
                function.field()
            );
        }
        State::Fetch
    }
}
