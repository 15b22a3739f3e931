#![deny(unsafe_code)]

use std::error::Error;
use std::ffi::OsString;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use clap::ArgAction::Set;
use clap::Parser;
use tracing::{Level, event, span};
use tracing_subscriber::prelude::*;

use assembler::*;

/// Assembler for the 32-bit CPU.  The program image (one hexadecimal
/// word per line) is written to standard output unless an output
/// file is given.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// File from which assembly source is read.
    #[clap(action = Set)]
    input: OsString,

    /// File to which the program image is written.
    #[clap(action = Set, short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(Debug)]
enum Fail {
    AsmFail(AssemblerFailure),
    /// We were not able to correctly initialise the assembler.
    InitialisationFailure(String),
}

impl Fail {
    fn exit_code(&self) -> i32 {
        match self {
            Fail::AsmFail(e) => e.exit_code(),
            Fail::InitialisationFailure(_) => 9,
        }
    }
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::AsmFail(assembler_failure) => assembler_failure.fmt(f),
            Fail::InitialisationFailure(msg) => f.write_str(msg.as_str()),
        }
    }
}

impl Error for Fail {}

fn run_assembler() -> Result<(), Fail> {
    let cli = Cli::parse();

    // The program image may go to stdout, so log to stderr and only
    // report warnings unless RUST_LOG asks for more.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("warn"))
    {
        Err(e) => {
            return Err(Fail::InitialisationFailure(format!(
                "failed to initialise tracing filter (perhaps there is a problem with environment variables): {e}"
            )));
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let span = span!(Level::ERROR, "assemble", input=?cli.input, output=?cli.output);
    let _enter = span.enter();
    match assemble_file(&cli.input, cli.output.as_deref()) {
        Ok(program) => {
            event!(Level::INFO, "assembly succeeded: {} words", program.len());
            Ok(())
        }
        Err(e) => {
            event!(Level::DEBUG, "assembly failed: {:?}", e);
            Err(Fail::AsmFail(e))
        }
    }
}

fn main() {
    match run_assembler() {
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}
