//! Translation of one instruction line into a machine word.
//!
//! The mnemonic may carry a two-letter condition suffix (`addeq`,
//! `bne`).  ALU operations take an `i` suffix (before the condition)
//! to select the immediate form, as in `subine r1, r1, 1`.  The
//! pseudo-instructions `push rX` and `pop rX` stand for
//! `stw sp, rX, 0` and `ldw rX, sp, 4`.
use base::prelude::*;

use super::parser::Operand;
use super::symtab::SymbolTable;
use super::types::{ErrorKind, LineError, LineNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    /// Collects label addresses; labels not yet defined count as 0.
    First,
    /// Generates output; every label must be defined.
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Addressing {
    /// A label stands for its address.
    Absolute,
    /// A label stands for its distance in words from the current
    /// instruction.
    Relative,
}

/// Where we are in the program, and what we know so far.
pub(crate) struct Context<'a> {
    pub(crate) line: LineNumber,
    /// The address of the word being assembled.
    pub(crate) address: u32,
    pub(crate) pass: Pass,
    pub(crate) symtab: &'a SymbolTable,
}

impl Context<'_> {
    pub(crate) fn error<S: Into<String>>(&self, kind: ErrorKind, msg: S) -> LineError {
        LineError::new(self.line, kind, msg)
    }

    fn register(&self, operand: &Operand) -> Result<Register, LineError> {
        match operand {
            Operand::Name(name) => Register::from_name(name).ok_or_else(|| {
                self.error(
                    ErrorKind::BadRegister,
                    format!("'{name}' is not a register"),
                )
            }),
            other => Err(self.error(
                ErrorKind::BadRegister,
                format!("expected a register but got '{other}'"),
            )),
        }
    }

    /// The numeric value of an immediate operand.
    pub(crate) fn value(&self, operand: &Operand, addressing: Addressing) -> Result<i64, LineError> {
        match operand {
            Operand::Number(n) => Ok(*n),
            Operand::Name(name) => match self.symtab.lookup(name) {
                Some(address) => Ok(match addressing {
                    Addressing::Absolute => i64::from(address),
                    Addressing::Relative => (i64::from(address) - i64::from(self.address)) >> 2,
                }),
                None if Register::from_name(name).is_some() => Err(self.error(
                    ErrorKind::BadImmediate,
                    format!("register '{name}' given where a value is needed"),
                )),
                None => match self.pass {
                    Pass::First => Ok(0),
                    Pass::Second => Err(self.error(
                        ErrorKind::UndefinedLabel,
                        format!("label '{name}' is not defined"),
                    )),
                },
            },
            Operand::Str(_) => Err(self.error(
                ErrorKind::BadImmediate,
                "a string cannot be used as an immediate value",
            )),
        }
    }

    /// The value of an immediate operand, checked against the range
    /// of an N-bit field (-2^(N-1) to 2^N - 1).
    pub(crate) fn field<T, F>(
        &self,
        operand: &Operand,
        addressing: Addressing,
        bits: u32,
        convert: F,
    ) -> Result<T, LineError>
    where
        F: Fn(i64) -> Result<T, ConversionFailed>,
    {
        let value = self.value(operand, addressing)?;
        convert(value).map_err(|_| {
            self.error(
                ErrorKind::OutOfRange,
                format!("{value} does not fit into a {bits}-bit field"),
            )
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Mnemonic {
    Alu(AluOp),
    AluImmediate(AluOp),
    LoadImmediate(ImmediateKind),
    Load(TransferSize),
    Store(TransferSize),
    Branch,
    BranchDecrement,
    JumpSubroutine,
    Ext(ExtFunction, Unsigned20Bit),
    Push,
    Pop,
}

impl Mnemonic {
    fn operand_count(&self) -> usize {
        match self {
            Mnemonic::Ext(..) => 0,
            Mnemonic::Branch | Mnemonic::Push | Mnemonic::Pop => 1,
            Mnemonic::LoadImmediate(_) | Mnemonic::BranchDecrement | Mnemonic::JumpSubroutine => 2,
            Mnemonic::Alu(_) | Mnemonic::AluImmediate(_) | Mnemonic::Load(_) | Mnemonic::Store(_) => 3,
        }
    }
}

/// Look up a mnemonic with no condition suffix.  `name` is in lower
/// case.
fn base_mnemonic(name: &str) -> Option<Mnemonic> {
    let m = match name {
        "ldi" => Mnemonic::LoadImmediate(ImmediateKind::Zero),
        "ldis" => Mnemonic::LoadImmediate(ImmediateKind::Signed),
        "ldiu" => Mnemonic::LoadImmediate(ImmediateKind::Upper),
        "ldb" => Mnemonic::Load(TransferSize::Byte),
        "ldh" => Mnemonic::Load(TransferSize::Half),
        "ldw" => Mnemonic::Load(TransferSize::Word),
        "stb" => Mnemonic::Store(TransferSize::Byte),
        "sth" => Mnemonic::Store(TransferSize::Half),
        "stw" => Mnemonic::Store(TransferSize::Word),
        "b" => Mnemonic::Branch,
        "bdec" => Mnemonic::BranchDecrement,
        "jsr" => Mnemonic::JumpSubroutine,
        "rts" => Mnemonic::Ext(ExtFunction::RETURN, Unsigned20Bit::ZERO),
        "rti" => Mnemonic::Ext(ExtFunction::RETURN_FROM_INTERRUPT, Unsigned20Bit::ZERO),
        "sei" => Mnemonic::Ext(ExtFunction::SET_INTERRUPT_MASK, Unsigned20Bit::ONE),
        "cli" => Mnemonic::Ext(ExtFunction::SET_INTERRUPT_MASK, Unsigned20Bit::ZERO),
        "push" => Mnemonic::Push,
        "pop" => Mnemonic::Pop,
        _ => {
            if let Some(op) = AluOp::from_mnemonic(name) {
                Mnemonic::Alu(op)
            } else {
                let stem = name.strip_suffix('i')?;
                Mnemonic::AluImmediate(AluOp::from_mnemonic(stem)?)
            }
        }
    };
    Some(m)
}

/// Split a mnemonic into its operation and condition.  A mnemonic
/// of three or more letters whose last two letters are a condition
/// code always has those letters taken as the condition.
fn split_mnemonic(word: &str) -> Option<(Mnemonic, Condition)> {
    let lower = word.to_ascii_lowercase();
    if lower.len() >= 3 && lower.is_char_boundary(lower.len() - 2) {
        let (stem, suffix) = lower.split_at(lower.len() - 2);
        if let Some(condition) = Condition::from_suffix(suffix) {
            return base_mnemonic(stem).map(|m| (m, condition));
        }
    }
    base_mnemonic(&lower).map(|m| (m, Condition::ALWAYS))
}

/// Assemble one instruction into a 32-bit word.
pub(crate) fn encode_instruction(
    ctx: &Context<'_>,
    word: &str,
    operands: &[Operand],
) -> Result<u32, LineError> {
    let (mnemonic, condition) = split_mnemonic(word).ok_or_else(|| {
        ctx.error(
            ErrorKind::UnknownMnemonic,
            format!("'{word}' is not a known instruction"),
        )
    })?;
    let expected = mnemonic.operand_count();
    if operands.len() != expected {
        return Err(ctx.error(
            ErrorKind::OperandCount,
            format!(
                "'{word}' takes {expected} operand(s) but {} were given",
                operands.len()
            ),
        ));
    }
    let reg = |i: usize| ctx.register(&operands[i]);
    let operation = match mnemonic {
        Mnemonic::Alu(op) => Operation::Alu {
            op,
            rd: reg(0)?,
            rs1: reg(1)?,
            rs2: reg(2)?,
        },
        Mnemonic::AluImmediate(op) => Operation::AluImmediate {
            op,
            rd: reg(0)?,
            rs1: reg(1)?,
            imm: ctx.field(
                &operands[2],
                Addressing::Absolute,
                Unsigned12Bit::BITS,
                Unsigned12Bit::try_from_signed_or_unsigned,
            )?,
        },
        Mnemonic::LoadImmediate(kind) => Operation::LoadImmediate {
            kind,
            rd: reg(0)?,
            imm: ctx.field(
                &operands[1],
                Addressing::Absolute,
                Unsigned20Bit::BITS,
                Unsigned20Bit::try_from_signed_or_unsigned,
            )?,
        },
        Mnemonic::Load(size) | Mnemonic::Store(size) => {
            let rd = reg(0)?;
            let rs1 = reg(1)?;
            let offset = ctx.field(
                &operands[2],
                Addressing::Absolute,
                Unsigned16Bit::BITS,
                Unsigned16Bit::try_from_signed_or_unsigned,
            )?;
            if matches!(mnemonic, Mnemonic::Load(_)) {
                Operation::Load {
                    size,
                    rd,
                    rs1,
                    offset,
                }
            } else {
                Operation::Store {
                    size,
                    rd,
                    rs1,
                    offset,
                }
            }
        }
        Mnemonic::Branch => Operation::Branch {
            offset: ctx.field(
                &operands[0],
                Addressing::Relative,
                Unsigned24Bit::BITS,
                Unsigned24Bit::try_from_signed_or_unsigned,
            )?,
        },
        Mnemonic::BranchDecrement => Operation::BranchDecrement {
            rd: reg(0)?,
            offset: ctx.field(
                &operands[1],
                Addressing::Relative,
                Unsigned20Bit::BITS,
                Unsigned20Bit::try_from_signed_or_unsigned,
            )?,
        },
        Mnemonic::JumpSubroutine => Operation::JumpSubroutine {
            rd: reg(0)?,
            target: ctx.field(
                &operands[1],
                Addressing::Absolute,
                Unsigned20Bit::BITS,
                Unsigned20Bit::try_from_signed_or_unsigned,
            )?,
        },
        Mnemonic::Ext(function, imm) => Operation::Ext { function, imm },
        Mnemonic::Push => Operation::Store {
            size: TransferSize::Word,
            rd: Register::SP,
            rs1: reg(0)?,
            offset: Unsigned16Bit::ZERO,
        },
        Mnemonic::Pop => Operation::Load {
            size: TransferSize::Word,
            rd: reg(0)?,
            rs1: Register::SP,
            offset: Unsigned16Bit::new::<4>(),
        },
    };
    Ok(Instruction::from(&SymbolicInstruction {
        condition,
        operation,
    })
    .bits())
}
