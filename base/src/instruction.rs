//! Binary and symbolic representations of instructions.
//!
//! An instruction occupies one 32-bit word.  The top 8 bits are the
//! same for every instruction; the remaining 24 bits are carved up
//! differently for each class of instruction:
//!
//! | Bits 31-28 | Bits 27-24 | Bits 23-0                              |
//! |------------|------------|----------------------------------------|
//! | Opcode     | Condition  | class-specific operand fields          |
//!
//! The class-specific layouts are:
//!
//! | Class                 | 23-20 | 19-16 | 15-12 | 11-8 | 7-0   |
//! |-----------------------|-------|-------|-------|------|-------|
//! | ALU (register form)   | Rd    | Rs1   | aluop | Rs2  | zero  |
//! | ALU (immediate form)  | Rd    | Rs1   | aluop | imm12       ||
//! | ldi/ldis/ldiu/jsr/bdec| Rd    | imm20                      |||
//! | loads and stores      | Rd    | Rs1   | imm16               |||
//! | b                     | imm24                             ||||
//! | ext                   | function | imm20                   |||
//!
//! [`Instruction`] is the raw word.  [`SymbolicInstruction`] is the
//! same thing broken down into its fields, and is what the assembler
//! builds and what the emulator executes.  Every 32-bit word decodes
//! to some [`SymbolicInstruction`]; words with opcode 11 decode to
//! [`Operation::Reserved`].

use std::fmt::{self, Debug, Formatter};

use serde::Serialize;

#[cfg(test)]
use test_strategy::{proptest, Arbitrary};

use super::prelude::*;

mod format;

/// The major opcode occupies the top 4 bits of the instruction word
/// and selects how the rest of the word is decoded.
#[repr(u8)]
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum Opcode {
    Alu = 0,
    AluImmediate = 1,
    Ldi = 2,
    Ldis = 3,
    Ldb = 4,
    Ldh = 5,
    Ldw = 6,
    Ldiu = 7,
    Stb = 8,
    Sth = 9,
    Stw = 10,
    Reserved = 11,
    B = 12,
    Bdec = 13,
    Jsr = 14,
    Ext = 15,
}

impl Opcode {
    pub fn number(&self) -> u8 {
        *self as u8
    }
}

impl From<Unsigned4Bit> for Opcode {
    fn from(n: Unsigned4Bit) -> Opcode {
        use Opcode::*;
        match u8::from(n) {
            0 => Alu,
            1 => AluImmediate,
            2 => Ldi,
            3 => Ldis,
            4 => Ldb,
            5 => Ldh,
            6 => Ldw,
            7 => Ldiu,
            8 => Stb,
            9 => Sth,
            10 => Stw,
            11 => Reserved,
            12 => B,
            13 => Bdec,
            14 => Jsr,
            _ => Ext,
        }
    }
}

/// The condition under which an instruction executes.  Instructions
/// whose condition is not satisfied are skipped.
///
/// Only codes 0 and 8 to 15 have a mnemonic; codes 1 to 7 are
/// treated as "always".
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub struct Condition(Unsigned4Bit);

impl Condition {
    pub const ALWAYS: Condition = Condition(u4!(0));
    pub const NE: Condition = Condition(u4!(8));
    pub const EQ: Condition = Condition(u4!(9));
    pub const CC: Condition = Condition(u4!(10));
    pub const CS: Condition = Condition(u4!(11));
    pub const GT: Condition = Condition(u4!(12));
    pub const GE: Condition = Condition(u4!(13));
    pub const LT: Condition = Condition(u4!(14));
    pub const LE: Condition = Condition(u4!(15));

    const SUFFIXES: [(&'static str, Condition); 8] = [
        ("ne", Condition::NE),
        ("eq", Condition::EQ),
        ("cc", Condition::CC),
        ("cs", Condition::CS),
        ("gt", Condition::GT),
        ("ge", Condition::GE),
        ("lt", Condition::LT),
        ("le", Condition::LE),
    ];

    pub fn code(&self) -> Unsigned4Bit {
        self.0
    }

    /// Look up a two-letter mnemonic suffix such as `eq`.  Letter
    /// case is not significant.
    pub fn from_suffix(suffix: &str) -> Option<Condition> {
        Self::SUFFIXES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(suffix))
            .map(|(_, cond)| *cond)
    }

    /// The mnemonic suffix of this condition.  This is empty for
    /// "always" and for the codes which have no mnemonic.
    pub fn suffix(&self) -> &'static str {
        Self::SUFFIXES
            .iter()
            .find(|(_, cond)| cond == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }
}

impl Default for Condition {
    fn default() -> Condition {
        Condition::ALWAYS
    }
}

impl From<Unsigned4Bit> for Condition {
    fn from(code: Unsigned4Bit) -> Condition {
        Condition(code)
    }
}

/// The sixteen operations of the ALU.
#[repr(u8)]
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum AluOp {
    Add = 0,
    Sub = 1,
    Adc = 2,
    Sbc = 3,
    Not = 4,
    And = 5,
    Or = 6,
    Xor = 7,
    Shl = 8,
    Shr = 9,
    Asl = 10,
    Asr = 11,
    Sl4 = 12,
    Sl16 = 13,
    Sr4 = 14,
    Sr16 = 15,
}

impl AluOp {
    pub const ALL: [AluOp; 16] = [
        AluOp::Add,
        AluOp::Sub,
        AluOp::Adc,
        AluOp::Sbc,
        AluOp::Not,
        AluOp::And,
        AluOp::Or,
        AluOp::Xor,
        AluOp::Shl,
        AluOp::Shr,
        AluOp::Asl,
        AluOp::Asr,
        AluOp::Sl4,
        AluOp::Sl16,
        AluOp::Sr4,
        AluOp::Sr16,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn mnemonic(&self) -> &'static str {
        use AluOp::*;
        match self {
            Add => "add",
            Sub => "sub",
            Adc => "adc",
            Sbc => "sbc",
            Not => "not",
            And => "and",
            Or => "or",
            Xor => "xor",
            Shl => "shl",
            Shr => "shr",
            Asl => "asl",
            Asr => "asr",
            Sl4 => "sl4",
            Sl16 => "sl16",
            Sr4 => "sr4",
            Sr16 => "sr16",
        }
    }

    pub fn from_mnemonic(name: &str) -> Option<AluOp> {
        Self::ALL
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(name))
            .copied()
    }
}

impl From<Unsigned4Bit> for AluOp {
    fn from(n: Unsigned4Bit) -> AluOp {
        Self::ALL[usize::from(n)]
    }
}

/// How much data a load or store moves.  This is selected by the
/// bottom two bits of the major opcode.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum TransferSize {
    Byte,
    Half,
    Word,
}

impl TransferSize {
    pub fn from_opcode_bits(opcode: Unsigned4Bit) -> TransferSize {
        match u8::from(opcode) & 0b11 {
            0 => TransferSize::Byte,
            1 => TransferSize::Half,
            _ => TransferSize::Word,
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            TransferSize::Byte => "b",
            TransferSize::Half => "h",
            TransferSize::Word => "w",
        }
    }
}

/// How the 20-bit immediate of the load-immediate instructions is
/// widened to 32 bits.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum ImmediateKind {
    /// `ldi`: zero-extended.
    Zero,
    /// `ldis`: sign-extended.
    Signed,
    /// `ldiu`: placed in the upper 20 bits, low 12 bits cleared.
    Upper,
}

impl ImmediateKind {
    pub fn widen(&self, imm: Unsigned20Bit) -> u32 {
        match self {
            ImmediateKind::Zero => u32::from(imm),
            ImmediateKind::Signed => imm.sign_extend() as u32,
            ImmediateKind::Upper => u32::from(imm) << 12,
        }
    }
}

/// The sub-function of an `ext` instruction, carried in the Rd
/// field.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub struct ExtFunction(Unsigned4Bit);

impl ExtFunction {
    /// Return from subroutine (`rts`).
    pub const RETURN: ExtFunction = ExtFunction(u4!(0));
    /// Return from interrupt (`rti`).
    pub const RETURN_FROM_INTERRUPT: ExtFunction = ExtFunction(u4!(1));
    /// Set the interrupt mask from bit 0 of the immediate (`sei`,
    /// `cli`).
    pub const SET_INTERRUPT_MASK: ExtFunction = ExtFunction(u4!(2));

    pub fn field(&self) -> Unsigned4Bit {
        self.0
    }
}

impl From<Unsigned4Bit> for ExtFunction {
    fn from(n: Unsigned4Bit) -> ExtFunction {
        ExtFunction(n)
    }
}

/// The operation performed by an instruction, with its operands.
/// There is one variant per class of instruction.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum Operation {
    Alu {
        op: AluOp,
        rd: Register,
        rs1: Register,
        rs2: Register,
    },
    AluImmediate {
        op: AluOp,
        rd: Register,
        rs1: Register,
        imm: Unsigned12Bit,
    },
    LoadImmediate {
        kind: ImmediateKind,
        rd: Register,
        imm: Unsigned20Bit,
    },
    /// Load `rd` from the address `rs1 + offset`.
    Load {
        size: TransferSize,
        rd: Register,
        rs1: Register,
        offset: Unsigned16Bit,
    },
    /// Store `rs1` at the address `rd + offset`.
    Store {
        size: TransferSize,
        rd: Register,
        rs1: Register,
        offset: Unsigned16Bit,
    },
    /// Branch by `offset` words relative to the branch instruction.
    Branch { offset: Unsigned24Bit },
    /// Decrement `rd` and branch by `offset` words unless `rd` was
    /// already zero.
    BranchDecrement { rd: Register, offset: Unsigned20Bit },
    /// Call the subroutine at `rd + target`.
    JumpSubroutine { rd: Register, target: Unsigned20Bit },
    Ext {
        function: ExtFunction,
        imm: Unsigned20Bit,
    },
    /// Opcode 11, which does nothing.
    Reserved { bits: Unsigned24Bit },
}

impl Operation {
    pub fn opcode(&self) -> Opcode {
        match self {
            Operation::Alu { .. } => Opcode::Alu,
            Operation::AluImmediate { .. } => Opcode::AluImmediate,
            Operation::LoadImmediate { kind, .. } => match kind {
                ImmediateKind::Zero => Opcode::Ldi,
                ImmediateKind::Signed => Opcode::Ldis,
                ImmediateKind::Upper => Opcode::Ldiu,
            },
            Operation::Load { size, .. } => match size {
                TransferSize::Byte => Opcode::Ldb,
                TransferSize::Half => Opcode::Ldh,
                TransferSize::Word => Opcode::Ldw,
            },
            Operation::Store { size, .. } => match size {
                TransferSize::Byte => Opcode::Stb,
                TransferSize::Half => Opcode::Sth,
                TransferSize::Word => Opcode::Stw,
            },
            Operation::Branch { .. } => Opcode::B,
            Operation::BranchDecrement { .. } => Opcode::Bdec,
            Operation::JumpSubroutine { .. } => Opcode::Jsr,
            Operation::Ext { .. } => Opcode::Ext,
            Operation::Reserved { .. } => Opcode::Reserved,
        }
    }

    /// Pack the operands into the low 24 bits of an instruction
    /// word.
    fn operand_bits(&self) -> u32 {
        fn reg(r: &Register, shift: u32) -> u32 {
            u32::from(r.field()) << shift
        }
        match self {
            Operation::Alu { op, rd, rs1, rs2 } => {
                reg(rd, 20) | reg(rs1, 16) | (u32::from(op.number()) << 12) | reg(rs2, 8)
            }
            Operation::AluImmediate { op, rd, rs1, imm } => {
                reg(rd, 20) | reg(rs1, 16) | (u32::from(op.number()) << 12) | u32::from(*imm)
            }
            Operation::LoadImmediate { rd, imm, .. } => reg(rd, 20) | u32::from(*imm),
            Operation::Load {
                rd, rs1, offset, ..
            }
            | Operation::Store {
                rd, rs1, offset, ..
            } => reg(rd, 20) | reg(rs1, 16) | u32::from(*offset),
            Operation::Branch { offset } => u32::from(*offset),
            Operation::BranchDecrement { rd, offset } => reg(rd, 20) | u32::from(*offset),
            Operation::JumpSubroutine { rd, target } => reg(rd, 20) | u32::from(*target),
            Operation::Ext { function, imm } => {
                (u32::from(function.field()) << 20) | u32::from(*imm)
            }
            Operation::Reserved { bits } => u32::from(*bits),
        }
    }
}

/// A raw instruction word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction(u32);

impl Instruction {
    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn opcode(&self) -> Opcode {
        Opcode::from(self.opcode_field())
    }

    pub fn opcode_field(&self) -> Unsigned4Bit {
        Unsigned4Bit::truncating(self.0 >> 28)
    }

    pub fn condition(&self) -> Condition {
        Condition::from(Unsigned4Bit::truncating(self.0 >> 24))
    }

    pub fn rd(&self) -> Register {
        Register::from(Unsigned4Bit::truncating(self.0 >> 20))
    }

    pub fn rs1(&self) -> Register {
        Register::from(Unsigned4Bit::truncating(self.0 >> 16))
    }

    pub fn alu_op(&self) -> AluOp {
        AluOp::from(Unsigned4Bit::truncating(self.0 >> 12))
    }

    pub fn rs2(&self) -> Register {
        Register::from(Unsigned4Bit::truncating(self.0 >> 8))
    }

    pub fn imm12(&self) -> Unsigned12Bit {
        Unsigned12Bit::truncating(self.0)
    }

    pub fn imm16(&self) -> Unsigned16Bit {
        Unsigned16Bit::truncating(self.0)
    }

    pub fn imm20(&self) -> Unsigned20Bit {
        Unsigned20Bit::truncating(self.0)
    }

    pub fn imm24(&self) -> Unsigned24Bit {
        Unsigned24Bit::truncating(self.0)
    }
}

impl From<u32> for Instruction {
    fn from(w: u32) -> Instruction {
        Instruction(w)
    }
}

impl From<Instruction> for u32 {
    fn from(inst: Instruction) -> u32 {
        inst.0
    }
}

impl Debug for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let sym = SymbolicInstruction::from(self);
        write!(f, "{:<32} {:08x}", sym.to_string(), self.0)
    }
}

/// An instruction broken down into its component fields.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub struct SymbolicInstruction {
    pub condition: Condition,
    pub operation: Operation,
}

impl SymbolicInstruction {
    /// An unconditional instruction.
    pub fn always(operation: Operation) -> SymbolicInstruction {
        SymbolicInstruction {
            condition: Condition::ALWAYS,
            operation,
        }
    }
}

impl From<&SymbolicInstruction> for Instruction {
    fn from(s: &SymbolicInstruction) -> Instruction {
        let op_bits: u32 = u32::from(s.operation.opcode().number()) << 28;
        let cond_bits: u32 = u32::from(s.condition.code()) << 24;
        Instruction(op_bits | cond_bits | s.operation.operand_bits())
    }
}

fn decode_alu(inst: &Instruction) -> Operation {
    Operation::Alu {
        op: inst.alu_op(),
        rd: inst.rd(),
        rs1: inst.rs1(),
        rs2: inst.rs2(),
    }
}

fn decode_alu_immediate(inst: &Instruction) -> Operation {
    Operation::AluImmediate {
        op: inst.alu_op(),
        rd: inst.rd(),
        rs1: inst.rs1(),
        imm: inst.imm12(),
    }
}

fn decode_load_immediate(inst: &Instruction, kind: ImmediateKind) -> Operation {
    Operation::LoadImmediate {
        kind,
        rd: inst.rd(),
        imm: inst.imm20(),
    }
}

fn decode_load(inst: &Instruction) -> Operation {
    Operation::Load {
        size: TransferSize::from_opcode_bits(inst.opcode_field()),
        rd: inst.rd(),
        rs1: inst.rs1(),
        offset: inst.imm16(),
    }
}

fn decode_store(inst: &Instruction) -> Operation {
    Operation::Store {
        size: TransferSize::from_opcode_bits(inst.opcode_field()),
        rd: inst.rd(),
        rs1: inst.rs1(),
        offset: inst.imm16(),
    }
}

fn decode_branch(inst: &Instruction) -> Operation {
    Operation::Branch {
        offset: inst.imm24(),
    }
}

fn decode_branch_decrement(inst: &Instruction) -> Operation {
    Operation::BranchDecrement {
        rd: inst.rd(),
        offset: inst.imm20(),
    }
}

fn decode_jump_subroutine(inst: &Instruction) -> Operation {
    Operation::JumpSubroutine {
        rd: inst.rd(),
        target: inst.imm20(),
    }
}

fn decode_ext(inst: &Instruction) -> Operation {
    Operation::Ext {
        function: ExtFunction::from(inst.rd().field()),
        imm: inst.imm20(),
    }
}

impl From<&Instruction> for Operation {
    fn from(inst: &Instruction) -> Operation {
        match inst.opcode() {
            Opcode::Alu => decode_alu(inst),
            Opcode::AluImmediate => decode_alu_immediate(inst),
            Opcode::Ldi => decode_load_immediate(inst, ImmediateKind::Zero),
            Opcode::Ldis => decode_load_immediate(inst, ImmediateKind::Signed),
            Opcode::Ldiu => decode_load_immediate(inst, ImmediateKind::Upper),
            Opcode::Ldb | Opcode::Ldh | Opcode::Ldw => decode_load(inst),
            Opcode::Stb | Opcode::Sth | Opcode::Stw => decode_store(inst),
            Opcode::Reserved => Operation::Reserved {
                bits: inst.imm24(),
            },
            Opcode::B => decode_branch(inst),
            Opcode::Bdec => decode_branch_decrement(inst),
            Opcode::Jsr => decode_jump_subroutine(inst),
            Opcode::Ext => decode_ext(inst),
        }
    }
}

impl From<&Instruction> for SymbolicInstruction {
    fn from(inst: &Instruction) -> SymbolicInstruction {
        SymbolicInstruction {
            condition: inst.condition(),
            operation: Operation::from(inst),
        }
    }
}

/// Decode an instruction word.
pub fn disassemble_word(w: u32) -> SymbolicInstruction {
    SymbolicInstruction::from(&Instruction(w))
}

#[cfg(test)]
#[proptest]
fn reversible_disassembly(input: SymbolicInstruction) {
    let inst: Instruction = Instruction::from(&input);
    let bits = inst.bits();
    let symbolic_disassembly = SymbolicInstruction::from(&inst);
    assert_eq!(
        symbolic_disassembly, input,
        "input {input:?} assembled to {bits:08x} which disassembled differently"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: u8) -> Register {
        Register::try_from(n).expect("valid register number")
    }

    #[test]
    fn test_opcode_value_round_trip() {
        for n in 0..16_u8 {
            let field = Unsigned4Bit::try_from(n).expect("valid test data");
            assert_eq!(Opcode::from(field).number(), n);
            assert_eq!(AluOp::from(field).number(), n);
        }
    }

    #[test]
    fn test_condition_suffixes() {
        assert_eq!(Condition::from_suffix("EQ"), Some(Condition::EQ));
        assert_eq!(Condition::from_suffix("le"), Some(Condition::LE));
        assert_eq!(Condition::from_suffix("al"), None);
        assert_eq!(Condition::CS.suffix(), "cs");
        assert_eq!(Condition::ALWAYS.suffix(), "");
        assert_eq!(Condition::from(u4!(3)).suffix(), "");
        assert_eq!(u8::from(Condition::NE.code()), 8);
        assert_eq!(u8::from(Condition::LE.code()), 15);
    }

    #[test]
    fn test_alu_mnemonics() {
        assert_eq!(AluOp::from_mnemonic("SL16"), Some(AluOp::Sl16));
        assert_eq!(AluOp::from_mnemonic("sbc"), Some(AluOp::Sbc));
        assert_eq!(AluOp::from_mnemonic("mul"), None);
    }

    #[test]
    fn test_encode_alu_register_form() {
        // addeq r2, r0, r1
        let sym = SymbolicInstruction {
            condition: Condition::EQ,
            operation: Operation::Alu {
                op: AluOp::Add,
                rd: r(2),
                rs1: r(0),
                rs2: r(1),
            },
        };
        assert_eq!(Instruction::from(&sym).bits(), 0x0920_0100);
    }

    #[test]
    fn test_alu_low_byte_is_ignored() {
        let sym = disassemble_word(0x0920_01ff);
        assert_eq!(
            sym.operation,
            Operation::Alu {
                op: AluOp::Add,
                rd: r(2),
                rs1: r(0),
                rs2: r(1),
            }
        );
    }

    #[test]
    fn test_decode_ldi() {
        // ldi r0, 5
        assert_eq!(
            disassemble_word(0x2000_0005),
            SymbolicInstruction::always(Operation::LoadImmediate {
                kind: ImmediateKind::Zero,
                rd: r(0),
                imm: u20!(5),
            })
        );
    }

    #[test]
    fn test_decode_transfer_sizes() {
        // ldh r1, r2, 6
        match disassemble_word(0x5012_0006).operation {
            Operation::Load {
                size,
                rd,
                rs1,
                offset,
            } => {
                assert_eq!(size, TransferSize::Half);
                assert_eq!(rd, r(1));
                assert_eq!(rs1, r(2));
                assert_eq!(offset, 6);
            }
            other => panic!("expected a load, got {other:?}"),
        }
        // stw sp, r1, 0
        match disassemble_word(0xA0D1_0000).operation {
            Operation::Store { size, rd, rs1, .. } => {
                assert_eq!(size, TransferSize::Word);
                assert_eq!(rd, Register::SP);
                assert_eq!(rs1, r(1));
            }
            other => panic!("expected a store, got {other:?}"),
        }
    }

    #[test]
    fn test_backward_branch_offset() {
        let offset = Unsigned24Bit::try_from_signed_or_unsigned(-2).expect("in range");
        let inst = Instruction::from(&SymbolicInstruction::always(Operation::Branch { offset }));
        assert_eq!(inst.bits(), 0xC0FF_FFFE);
        assert_eq!(inst.imm24().sign_extend(), -2);
    }

    #[test]
    fn test_reserved_opcode_decodes() {
        assert_eq!(
            disassemble_word(0xB012_3456).operation,
            Operation::Reserved {
                bits: u24!(0x12_3456)
            }
        );
    }

    #[test]
    fn test_immediate_widening() {
        assert_eq!(ImmediateKind::Zero.widen(u20!(0xF_FFFF)), 0x000F_FFFF);
        assert_eq!(ImmediateKind::Signed.widen(u20!(0xF_FFFF)), 0xFFFF_FFFF);
        assert_eq!(ImmediateKind::Signed.widen(u20!(0x7_FFFF)), 0x0007_FFFF);
        assert_eq!(ImmediateKind::Upper.widen(u20!(0xABCDE)), 0xABCD_E000);
    }

    #[test]
    fn test_transfer_size_from_opcode_bits() {
        assert_eq!(TransferSize::from_opcode_bits(u4!(4)), TransferSize::Byte);
        assert_eq!(TransferSize::from_opcode_bits(u4!(9)), TransferSize::Half);
        assert_eq!(TransferSize::from_opcode_bits(u4!(10)), TransferSize::Word);
        assert_eq!(TransferSize::from_opcode_bits(u4!(11)), TransferSize::Word);
    }
}
