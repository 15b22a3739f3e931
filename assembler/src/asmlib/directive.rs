//! The assembler directives:
//! - `.ORG address` moves the location counter;
//! - `.WORD value` emits one word (a number or a label);
//! - `.STR "text"` packs the text four characters to a word, first
//!   character in the least significant byte, zero-padding the last
//!   word;
//! - `.STRW "text"` emits one word per character.
//!
//! An empty string emits a single zero word.
use base::prelude::ConversionFailed;

use super::encode::{Addressing, Context};
use super::lexer::rx;
use super::parser::Operand;
use super::types::{ErrorKind, LineError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Effect {
    Origin(u32),
    Emit(Vec<u32>),
}

fn word_value(value: i64) -> Result<u32, ConversionFailed> {
    if value < -(1_i64 << 31) {
        Err(ConversionFailed::TooSmall)
    } else if value > i64::from(u32::MAX) {
        Err(ConversionFailed::TooLarge)
    } else {
        // Truncation keeps the two's complement representation.
        Ok(value as u32)
    }
}

/// Process the escape sequences in the body of a string literal.
fn unescape(ctx: &Context<'_>, body: &str) -> Result<Vec<u8>, LineError> {
    let mut result = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        let byte = if ch == '\\' {
            match chars.next() {
                Some('n') => b'\n',
                Some('t') => b'\t',
                Some('r') => b'\r',
                Some('0') => 0,
                Some('\\') => b'\\',
                Some('"') => b'"',
                Some('x') => {
                    let digits: String = chars.by_ref().take(2).collect();
                    if !rx::HEX_ESCAPE.is_match(&digits) {
                        return Err(ctx.error(
                            ErrorKind::Syntax,
                            format!("'\\x{digits}' should be followed by two hex digits"),
                        ));
                    }
                    let value = u8::from_str_radix(&digits, 16).map_err(|_| {
                        ctx.error(ErrorKind::Syntax, format!("bad escape '\\x{digits}'"))
                    })?;
                    if !value.is_ascii() {
                        return Err(ctx.error(
                            ErrorKind::Syntax,
                            format!("'\\x{digits}' is not an ASCII character"),
                        ));
                    }
                    value
                }
                Some(other) => {
                    return Err(ctx.error(
                        ErrorKind::Syntax,
                        format!("unknown escape sequence '\\{other}'"),
                    ));
                }
                None => {
                    return Err(ctx.error(ErrorKind::Syntax, "string ends with '\\'"));
                }
            }
        } else if ch.is_ascii() {
            // is_ascii guarantees the conversion is lossless.
            ch as u8
        } else {
            return Err(ctx.error(
                ErrorKind::Syntax,
                format!("'{ch}' is not an ASCII character"),
            ));
        };
        result.push(byte);
    }
    Ok(result)
}

fn pack_bytes(bytes: &[u8]) -> Vec<u32> {
    if bytes.is_empty() {
        return vec![0];
    }
    bytes
        .chunks(4)
        .map(|chunk| {
            let mut quad = [0_u8; 4];
            quad[..chunk.len()].copy_from_slice(chunk);
            u32::from_le_bytes(quad)
        })
        .collect()
}

fn one_word_per_byte(bytes: &[u8]) -> Vec<u32> {
    if bytes.is_empty() {
        return vec![0];
    }
    bytes.iter().map(|&b| u32::from(b)).collect()
}

fn string_operand<'a>(ctx: &Context<'_>, operand: &'a Operand) -> Result<&'a str, LineError> {
    match operand {
        Operand::Str(body) => Ok(body),
        other => Err(ctx.error(
            ErrorKind::Syntax,
            format!("expected a string in double quotes but got '{other}'"),
        )),
    }
}

pub(crate) fn apply_directive(
    ctx: &Context<'_>,
    name: &str,
    operands: &[Operand],
) -> Result<Effect, LineError> {
    let directive = name.to_ascii_uppercase();
    if !matches!(directive.as_str(), ".ORG" | ".WORD" | ".STR" | ".STRW") {
        return Err(ctx.error(
            ErrorKind::UnknownMnemonic,
            format!("'{name}' is not a known directive"),
        ));
    }
    let [operand] = operands else {
        return Err(ctx.error(
            ErrorKind::OperandCount,
            format!("{name} takes 1 operand but {} were given", operands.len()),
        ));
    };
    match directive.as_str() {
        ".ORG" => match operand {
            Operand::Number(n) => u32::try_from(*n).map(Effect::Origin).map_err(|_| {
                ctx.error(
                    ErrorKind::OutOfRange,
                    format!("{n} is not a valid address"),
                )
            }),
            other => Err(ctx.error(
                ErrorKind::BadImmediate,
                format!("the origin must be a number, not '{other}'"),
            )),
        },
        ".WORD" => {
            let value = ctx.field(operand, Addressing::Absolute, 32, word_value)?;
            Ok(Effect::Emit(vec![value]))
        }
        ".STR" => {
            let bytes = unescape(ctx, string_operand(ctx, operand)?)?;
            Ok(Effect::Emit(pack_bytes(&bytes)))
        }
        _ => {
            let bytes = unescape(ctx, string_operand(ctx, operand)?)?;
            Ok(Effect::Emit(one_word_per_byte(&bytes)))
        }
    }
}
