use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{Level, event, span};

use super::directive::{Effect, apply_directive};
use super::encode::{Context, Pass, encode_instruction};
use super::parser::{Statement, parse_line};
use super::symtab::SymbolTable;
use super::types::{AssemblerFailure, LineError};

mod image;
#[cfg(test)]
mod tests;

pub use image::ImageError;

/// An assembled program: the words of the image in the order in
/// which they were emitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    words: Vec<u32>,
}

impl Program {
    #[must_use]
    pub fn from_words(words: Vec<u32>) -> Program {
        Program { words }
    }

    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    #[must_use]
    pub fn into_words(self) -> Vec<u32> {
        self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Write the program image: one word per line, as eight
    /// lower-case hexadecimal digits.
    ///
    /// # Errors
    /// Fails when `writer` does.
    pub fn write_hex<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for word in &self.words {
            writeln!(writer, "{word:08x}")?;
        }
        writer.flush()
    }
}

/// Walk over the whole source once.  The first pass records the
/// address of each label; the second generates the output.
fn run_pass<S: AsRef<str>>(
    source_lines: &[S],
    pass: Pass,
    symtab: &mut SymbolTable,
) -> Result<Vec<u32>, LineError> {
    let span = span!(Level::DEBUG, "pass", pass = ?pass);
    let _enter = span.enter();
    let mut address: u32 = 0;
    let mut output: Vec<u32> = Vec::new();
    for (index, text) in source_lines.iter().enumerate() {
        let line = index + 1;
        let Some(statement) = parse_line(line, text.as_ref())? else {
            continue;
        };
        match statement {
            Statement::Label(name) => {
                if pass == Pass::First {
                    symtab.define(&name, address, line)?;
                }
            }
            Statement::Directive { name, operands } => {
                let ctx = Context {
                    line,
                    address,
                    pass,
                    symtab: &*symtab,
                };
                match apply_directive(&ctx, &name, &operands)? {
                    Effect::Origin(origin) => {
                        event!(Level::TRACE, "line {line}: origin {origin:#x}");
                        address = origin;
                    }
                    Effect::Emit(words) => {
                        for word in words {
                            output.push(word);
                            address = address.wrapping_add(4);
                        }
                    }
                }
            }
            Statement::Instruction { mnemonic, operands } => {
                let ctx = Context {
                    line,
                    address,
                    pass,
                    symtab: &*symtab,
                };
                output.push(encode_instruction(&ctx, &mnemonic, &operands)?);
                address = address.wrapping_add(4);
            }
        }
    }
    Ok(output)
}

fn assemble_lines<S: AsRef<str>>(source_lines: &[S]) -> Result<Program, LineError> {
    let mut symtab = SymbolTable::default();
    run_pass(source_lines, Pass::First, &mut symtab)?;
    let words = run_pass(source_lines, Pass::Second, &mut symtab)?;
    event!(
        Level::INFO,
        "assembled {} lines into {} words",
        source_lines.len(),
        words.len()
    );
    Ok(Program { words })
}

/// Assemble a complete source text.
///
/// # Errors
/// The first error in the source stops assembly.
pub fn assemble_source(source: &str) -> Result<Program, LineError> {
    let lines: Vec<&str> = source.lines().collect();
    assemble_lines(&lines)
}

fn write_output(program: &Program, output_file: Option<&Path>) -> Result<(), AssemblerFailure> {
    match output_file {
        Some(path) => {
            let on_error = |error| AssemblerFailure::IoErrorOnOutput {
                filename: Some(path.to_path_buf()),
                error,
            };
            let file = File::create(path).map_err(on_error)?;
            program.write_hex(BufWriter::new(file)).map_err(on_error)
        }
        None => program
            .write_hex(io::stdout().lock())
            .map_err(|error| AssemblerFailure::IoErrorOnOutput {
                filename: None,
                error,
            }),
    }
}

/// Assemble `input_file` and write the program image to
/// `output_file` (or to standard output if that is `None`).
///
/// # Errors
/// Reports I/O errors on either file and errors in the source.
pub fn assemble_file(
    input_file: &OsStr,
    output_file: Option<&Path>,
) -> Result<Program, AssemblerFailure> {
    let input = OpenOptions::new()
        .read(true)
        .open(input_file)
        .map_err(|e| AssemblerFailure::IoErrorOnInput {
            filename: input_file.to_owned(),
            error: e,
            line_number: None,
        })?;
    let mut source_lines: Vec<String> = Vec::new();
    for (line, input_item) in BufReader::new(input)
        .lines()
        .enumerate()
        .map(|(n, sl)| (n + 1, sl))
    {
        match input_item {
            Err(e) => {
                return Err(AssemblerFailure::IoErrorOnInput {
                    filename: input_file.to_owned(),
                    error: e,
                    line_number: Some(line),
                });
            }
            Ok(source_line) => {
                source_lines.push(source_line);
            }
        }
    }

    let program = assemble_lines(&source_lines)?;
    write_output(&program, output_file)?;
    Ok(program)
}
