//! Implementations of the ALU-class and load-immediate opcodes.
use tracing::{Level, event};

use base::prelude::*;

use crate::alu;
use crate::control::{Cpu, State};
use crate::flags::Flags;

impl Cpu {
    /// Implements `alu` and `alui`.  The first operand is always
    /// `rs1`; the caller supplies the second (a register or the
    /// zero-extended immediate).
    pub(super) fn op_alu(&mut self, op: AluOp, rd: Register, rs1: Register, b: u32) -> State {
        let a = self.register(rs1);
        let out = alu::apply(op, a, b, self.flags.carry);
        event!(
            Level::TRACE,
            "{op}({a:#x}, {b:#x}) = {:#x}, carry {}",
            out.result,
            out.carry
        );
        self.set_register(rd, out.result);
        self.flags = Flags::from_alu(&out);
        State::Fetch
    }

    /// Implements `ldi`, `ldis` and `ldiu`.
    pub(super) fn op_load_immediate(
        &mut self,
        kind: ImmediateKind,
        rd: Register,
        imm: Unsigned20Bit,
    ) -> State {
        self.set_register(rd, kind.widen(imm));
        State::Fetch
    }
}
