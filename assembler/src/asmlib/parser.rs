//! Classifies each source line and breaks it into its parts.
//!
//! A line is one of
//! - blank (perhaps with a comment), which produces nothing;
//! - a label definition `name:` which starts in the first column;
//! - a directive (`.ORG`, `.WORD`, `.STR`, `.STRW`) or an instruction,
//!   either of which must be indented.
use std::fmt::{self, Display, Formatter};
use std::num::IntErrorKind;

use super::lexer::{Token, rx, tokenise};
use super::types::{ErrorKind, LineError, LineNumber};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operand {
    Number(i64),
    /// A register or a label.
    Name(String),
    /// The body of a string literal, escapes not yet processed.
    Str(String),
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Name(name) => f.write_str(name),
            Operand::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement {
    Label(String),
    Directive {
        name: String,
        operands: Vec<Operand>,
    },
    Instruction {
        mnemonic: String,
        operands: Vec<Operand>,
    },
}

pub(crate) fn parse_number(line: LineNumber, text: &str) -> Result<i64, LineError> {
    let not_a_number = || {
        LineError::new(
            line,
            ErrorKind::BadImmediate,
            format!("'{text}' is not a number"),
        )
    };
    let caps = rx::NUMBER.captures(text).ok_or_else(not_a_number)?;
    let (digits, radix) = if let Some(m) = caps.name("hex") {
        (m.as_str(), 16)
    } else if let Some(m) = caps.name("oct") {
        (m.as_str(), 8)
    } else if let Some(m) = caps.name("bin") {
        (m.as_str(), 2)
    } else if let Some(m) = caps.name("dec") {
        (m.as_str(), 10)
    } else {
        return Err(not_a_number());
    };
    let sign = if caps.name("sign").is_some() { "-" } else { "" };
    let cleaned: String = digits.chars().filter(|&ch| ch != '_').collect();
    i64::from_str_radix(&format!("{sign}{cleaned}"), radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => LineError::new(
            line,
            ErrorKind::OutOfRange,
            format!("'{text}' is too large for any field"),
        ),
        _ => not_a_number(),
    })
}

fn convert_operand(line: LineNumber, token: &Token) -> Result<Operand, LineError> {
    match token {
        Token::Number(text) => parse_number(line, text).map(Operand::Number),
        Token::Name(name) => Ok(Operand::Name(name.clone())),
        Token::Str(body) => Ok(Operand::Str(body.clone())),
        Token::Comma | Token::Colon => Err(LineError::new(
            line,
            ErrorKind::Syntax,
            "unexpected punctuation in operand",
        )),
    }
}

fn parse_operands(line: LineNumber, tokens: &[Token]) -> Result<Vec<Operand>, LineError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    tokens
        .split(|tok| *tok == Token::Comma)
        .map(|group| match group {
            [single] => convert_operand(line, single),
            [] => Err(LineError::new(line, ErrorKind::Syntax, "missing operand")),
            _ => Err(LineError::new(
                line,
                ErrorKind::Syntax,
                "expected ',' between operands",
            )),
        })
        .collect()
}

/// Parse one line of source.  Returns `None` for blank lines.
pub(crate) fn parse_line(line: LineNumber, text: &str) -> Result<Option<Statement>, LineError> {
    let tokens = tokenise(text).map_err(|offset| {
        LineError::new(
            line,
            ErrorKind::Syntax,
            format!("unexpected input at column {}", offset + 1),
        )
    })?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let indented = text.starts_with([' ', '\t']);
    if !indented {
        return match tokens.as_slice() {
            [Token::Name(name), Token::Colon] => Ok(Some(Statement::Label(name.clone()))),
            _ => Err(LineError::new(
                line,
                ErrorKind::Syntax,
                "a line starting in the first column must be a label definition, like 'loop:'",
            )),
        };
    }
    match tokens.split_first() {
        Some((Token::Name(word), rest)) => {
            let operands = parse_operands(line, rest)?;
            if word.starts_with('.') {
                Ok(Some(Statement::Directive {
                    name: word.clone(),
                    operands,
                }))
            } else {
                Ok(Some(Statement::Instruction {
                    mnemonic: word.clone(),
                    operands,
                }))
            }
        }
        _ => Err(LineError::new(
            line,
            ErrorKind::Syntax,
            "expected an instruction or a directive",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Operand {
        Operand::Name(s.to_string())
    }

    fn parse_ok(text: &str) -> Option<Statement> {
        match parse_line(1, text) {
            Ok(stmt) => stmt,
            Err(e) => panic!("failed to parse {text:?}: {e}"),
        }
    }

    fn parse_err(text: &str) -> ErrorKind {
        match parse_line(1, text) {
            Ok(stmt) => panic!("expected {text:?} to be rejected, got {stmt:?}"),
            Err(e) => e.kind,
        }
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_number(1, "42"), Ok(42));
        assert_eq!(parse_number(1, "-42"), Ok(-42));
        assert_eq!(parse_number(1, "0x1f"), Ok(31));
        assert_eq!(parse_number(1, "-0x10"), Ok(-16));
        assert_eq!(parse_number(1, "0o17"), Ok(15));
        assert_eq!(parse_number(1, "0b1010"), Ok(10));
        assert_eq!(parse_number(1, "1_000"), Ok(1000));
        assert_eq!(parse_number(1, "0xFFFFFFFF"), Ok(0xFFFF_FFFF));
    }

    #[test]
    fn test_bad_numbers() {
        assert_eq!(
            parse_number(1, "12ab").map_err(|e| e.kind),
            Err(ErrorKind::BadImmediate)
        );
        assert_eq!(
            parse_number(1, "0x_").map_err(|e| e.kind),
            Err(ErrorKind::BadImmediate)
        );
        assert_eq!(
            parse_number(1, "0x1_0000_0000_0000_0000").map_err(|e| e.kind),
            Err(ErrorKind::OutOfRange)
        );
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse_ok(""), None);
        assert_eq!(parse_ok("      "), None);
        assert_eq!(parse_ok("# header"), None);
        assert_eq!(parse_ok("    # indented comment"), None);
    }

    #[test]
    fn test_label() {
        assert_eq!(parse_ok("loop:"), Some(Statement::Label("loop".to_string())));
        assert_eq!(
            parse_ok("end:   # trailing comment"),
            Some(Statement::Label("end".to_string()))
        );
    }

    #[test]
    fn test_instruction() {
        assert_eq!(
            parse_ok("\tldw r1, sp, 0x4"),
            Some(Statement::Instruction {
                mnemonic: "ldw".to_string(),
                operands: vec![name("r1"), name("sp"), Operand::Number(4)],
            })
        );
        assert_eq!(
            parse_ok("    rts"),
            Some(Statement::Instruction {
                mnemonic: "rts".to_string(),
                operands: vec![],
            })
        );
    }

    #[test]
    fn test_directive() {
        assert_eq!(
            parse_ok(r#"    .STR "hi # there""#),
            Some(Statement::Directive {
                name: ".STR".to_string(),
                operands: vec![Operand::Str("hi # there".to_string())],
            })
        );
    }

    #[test]
    fn test_syntax_errors() {
        // Unindented instruction.
        assert_eq!(parse_err("ldi r1, 2"), ErrorKind::Syntax);
        // Label followed by an instruction on the same line.
        assert_eq!(parse_err("loop: ldi r1, 2"), ErrorKind::Syntax);
        // Indented label.
        assert_eq!(parse_err("    loop:"), ErrorKind::Syntax);
        assert_eq!(parse_err("    ldi r1 2"), ErrorKind::Syntax);
        assert_eq!(parse_err("    ldi r1,, 2"), ErrorKind::Syntax);
        assert_eq!(parse_err("    ldi r1, 2,"), ErrorKind::Syntax);
        assert_eq!(parse_err("    ldi r1, %"), ErrorKind::Syntax);
        assert_eq!(parse_err("    0x10"), ErrorKind::Syntax);
    }

    #[test]
    fn test_bad_immediate_is_not_a_syntax_error() {
        assert_eq!(parse_err("    ldi r1, 9z"), ErrorKind::BadImmediate);
    }
}
