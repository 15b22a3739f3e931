#![deny(unsafe_code)]

use std::error::Error;
use std::ffi::OsString;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io::{self, BufWriter, Write};

use clap::ArgAction::Set;
use clap::Parser;
use tracing::{Level, event, span};
use tracing_subscriber::prelude::*;

use assembler::{ImageError, Program};
use base::prelude::*;

const ABOUT: &str = "Disassembler for program images of the 32-bit CPU";

/// Prints each word of a program image with its address and its
/// disassembly.
#[derive(Parser, Debug)]
#[clap(version, about = ABOUT, long_about = None)]
struct Cli {
    /// File from which the program image (one hexadecimal word per
    /// line) is read.
    #[clap(action = Set)]
    input: OsString,
}

#[derive(Debug)]
enum Fail {
    ReadFailed(String),
    BadImage(ImageError),
    WriteFailed(io::Error),
    InitialisationFailure(String),
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::ReadFailed(message) | Fail::InitialisationFailure(message) => {
                f.write_str(message)
            }
            Fail::BadImage(e) => e.fmt(f),
            Fail::WriteFailed(e) => write!(f, "failed to write output: {e}"),
        }
    }
}

impl Error for Fail {}

fn disassemble<W: Write>(program: &Program, mut out: W) -> io::Result<()> {
    for (index, word) in program.words().iter().enumerate() {
        let address = index * 4;
        writeln!(
            out,
            "{address:08x}: {word:08x}  {}",
            Instruction::from(*word)
        )?;
    }
    out.flush()
}

fn run_disassembler() -> Result<(), Fail> {
    let cli = Cli::parse();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("warn"))
        .map_err(|e| {
            Fail::InitialisationFailure(format!(
                "failed to initialise tracing filter (perhaps there is a problem with environment variables): {e}"
            ))
        })?;
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let span = span!(Level::ERROR, "disassemble", input=?cli.input);
    let _enter = span.enter();
    let text = fs::read_to_string(&cli.input).map_err(|e| {
        Fail::ReadFailed(format!(
            "failed to read {}: {e}",
            cli.input.to_string_lossy()
        ))
    })?;
    let program = Program::from_hex(&text).map_err(Fail::BadImage)?;
    event!(Level::DEBUG, "read {} words", program.len());
    disassemble(&program, BufWriter::new(io::stdout().lock())).map_err(Fail::WriteFailed)
}

fn main() {
    if let Err(e) = run_disassembler() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing() {
        let program = Program::from_words(vec![0x0920_0100, 0xC0FF_FFFE]);
        let mut buf: Vec<u8> = Vec::new();
        disassemble(&program, &mut buf).expect("writing to a Vec succeeds");
        assert_eq!(
            String::from_utf8(buf).expect("output is ASCII"),
            "00000000: 09200100  addeq r2, r0, r1\n00000004: c0fffffe  b -2\n"
        );
    }
}
