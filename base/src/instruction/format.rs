//! Human-oriented formatting for instructions (or parts of
//! instructions).  The output is the text the assembler accepts.
use std::fmt::{self, Display, Formatter};

use crate::instruction::{
    AluOp, Condition, ExtFunction, ImmediateKind, Instruction, Operation, SymbolicInstruction,
};
use crate::prelude::*;

impl Display for AluOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(self.mnemonic())
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(self.suffix())
    }
}

fn write_mnemonic(
    f: &mut Formatter<'_>,
    base: &str,
    condition: &Condition,
) -> Result<(), fmt::Error> {
    write!(f, "{base}{condition}")
}

impl Display for SymbolicInstruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let cond = &self.condition;
        match &self.operation {
            Operation::Alu { op, rd, rs1, rs2 } => {
                write_mnemonic(f, op.mnemonic(), cond)?;
                write!(f, " {rd}, {rs1}, {rs2}")
            }
            Operation::AluImmediate { op, rd, rs1, imm } => {
                write!(f, "{}i{cond} {rd}, {rs1}, {imm:#x}", op.mnemonic())
            }
            Operation::LoadImmediate { kind, rd, imm } => {
                let name = match kind {
                    ImmediateKind::Zero => "ldi",
                    ImmediateKind::Signed => "ldis",
                    ImmediateKind::Upper => "ldiu",
                };
                write_mnemonic(f, name, cond)?;
                write!(f, " {rd}, {imm:#x}")
            }
            Operation::Load {
                size,
                rd,
                rs1,
                offset,
            } => {
                write!(f, "ld{}{cond} {rd}, {rs1}, {offset:#x}", size.suffix())
            }
            Operation::Store {
                size,
                rd,
                rs1,
                offset,
            } => {
                write!(f, "st{}{cond} {rd}, {rs1}, {offset:#x}", size.suffix())
            }
            Operation::Branch { offset } => {
                write_mnemonic(f, "b", cond)?;
                write!(f, " {}", offset.sign_extend())
            }
            Operation::BranchDecrement { rd, offset } => {
                write_mnemonic(f, "bdec", cond)?;
                write!(f, " {rd}, {}", offset.sign_extend())
            }
            Operation::JumpSubroutine { rd, target } => {
                write_mnemonic(f, "jsr", cond)?;
                write!(f, " {rd}, {target:#x}")
            }
            Operation::Ext { function, imm } => {
                let imm = u32::from(*imm);
                let name = if *function == ExtFunction::RETURN && imm == 0 {
                    Some("rts")
                } else if *function == ExtFunction::RETURN_FROM_INTERRUPT && imm == 0 {
                    Some("rti")
                } else if *function == ExtFunction::SET_INTERRUPT_MASK && imm <= 1 {
                    Some(if imm == 1 { "sei" } else { "cli" })
                } else {
                    None
                };
                match name {
                    Some(name) => write_mnemonic(f, name, cond),
                    None => write!(f, ".WORD {:#010x}", Instruction::from(self).bits()),
                }
            }
            Operation::Reserved { .. } => {
                write!(f, ".WORD {:#010x}", Instruction::from(self).bits())
            }
        }
    }
}

/// Words which have no exact assembler spelling (a non-zero low byte
/// in a register-form ALU instruction, or a condition code without a
/// mnemonic) are shown as `.WORD` directives, so that the output
/// always assembles back to the same word.
impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let sym = SymbolicInstruction::from(self);
        let nameless_condition =
            sym.condition != Condition::ALWAYS && sym.condition.suffix().is_empty();
        if nameless_condition || Instruction::from(&sym).bits() != self.bits() {
            write!(f, ".WORD {:#010x}", self.bits())
        } else {
            write!(f, "{sym}")
        }
    }
}
