use std::error::Error;
use std::ffi::{OsStr, OsString};
use std::fmt::{self, Display, Formatter};
use std::io::Error as IoError;
use std::path::PathBuf;

pub type LineNumber = usize;

/// The category of an assembly error.  Each category has its own
/// process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The line is not a label, a directive or an instruction, or
    /// an operand is malformed.
    Syntax,
    /// The opcode mnemonic or directive name is not known.
    UnknownMnemonic,
    /// An immediate operand is not a number or a label.
    BadImmediate,
    /// The instruction or directive has the wrong number of
    /// operands.
    OperandCount,
    /// A label is used but never defined.
    UndefinedLabel,
    BadRegister,
    /// A value does not fit into its field.
    OutOfRange,
}

impl ErrorKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::Syntax => 1,
            ErrorKind::UnknownMnemonic => 2,
            ErrorKind::BadImmediate => 3,
            ErrorKind::OperandCount => 4,
            ErrorKind::UndefinedLabel => 5,
            ErrorKind::BadRegister => 6,
            ErrorKind::OutOfRange => 7,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::UnknownMnemonic => "unknown mnemonic",
            ErrorKind::BadImmediate => "bad immediate value",
            ErrorKind::OperandCount => "wrong number of operands",
            ErrorKind::UndefinedLabel => "undefined label",
            ErrorKind::BadRegister => "bad register",
            ErrorKind::OutOfRange => "value out of range",
        })
    }
}

/// An error in the assembly source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// Counted from 1.
    pub line: LineNumber,
    pub kind: ErrorKind,
    pub msg: String,
}

impl LineError {
    pub(crate) fn new<S: Into<String>>(line: LineNumber, kind: ErrorKind, msg: S) -> LineError {
        LineError {
            line,
            kind,
            msg: msg.into(),
        }
    }
}

impl Display for LineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.msg)
    }
}

impl Error for LineError {}

#[derive(Debug)]
pub enum AssemblerFailure {
    Asm(LineError),
    IoErrorOnInput {
        filename: OsString,
        error: IoError,
        line_number: Option<LineNumber>,
    },
    IoErrorOnOutput {
        filename: Option<PathBuf>,
        error: IoError,
    },
}

impl AssemblerFailure {
    /// The process exit status which reports this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AssemblerFailure::Asm(e) => e.kind.exit_code(),
            AssemblerFailure::IoErrorOnInput { .. } | AssemblerFailure::IoErrorOnOutput { .. } => {
                8
            }
        }
    }
}

impl From<LineError> for AssemblerFailure {
    fn from(e: LineError) -> AssemblerFailure {
        AssemblerFailure::Asm(e)
    }
}

fn write_os_string(f: &mut Formatter<'_>, s: &OsStr) -> Result<(), fmt::Error> {
    match s.to_str() {
        Some(unicode_name) => f.write_str(unicode_name),
        None => write!(
            f,
            "{} (some non-Unicode characters changed to make it printable)",
            s.to_string_lossy(),
        ),
    }
}

impl Display for AssemblerFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            AssemblerFailure::Asm(e) => Display::fmt(e, f),
            AssemblerFailure::IoErrorOnInput {
                filename,
                error,
                line_number,
            } => {
                f.write_str("I/O error reading input file ")?;
                write_os_string(f, filename)?;
                if let Some(n) = line_number {
                    write!(f, " at line {n}")?;
                }
                write!(f, ": {error}")
            }
            AssemblerFailure::IoErrorOnOutput { filename, error } => match filename {
                Some(name) => write!(f, "I/O error writing output file {}: {error}", name.display()),
                None => write!(f, "I/O error writing output: {error}"),
            },
        }
    }
}

impl Error for AssemblerFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::Syntax,
            ErrorKind::UnknownMnemonic,
            ErrorKind::BadImmediate,
            ErrorKind::OperandCount,
            ErrorKind::UndefinedLabel,
            ErrorKind::BadRegister,
            ErrorKind::OutOfRange,
        ];
        let mut codes: Vec<i32> = kinds.iter().map(ErrorKind::exit_code).collect();
        codes.push(
            AssemblerFailure::IoErrorOnOutput {
                filename: None,
                error: IoError::other("disk full"),
            }
            .exit_code(),
        );
        let count = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), count);
        assert!(codes.iter().all(|&c| c != 0));
    }

    #[test]
    fn test_display() {
        let e = LineError::new(12, ErrorKind::BadRegister, "'r16' is not a register");
        assert_eq!(
            e.to_string(),
            "line 12: bad register: 'r16' is not a register"
        );
    }
}
