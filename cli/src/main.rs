#![deny(unsafe_code)]

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::ArgAction::{Append, Set, SetTrue};
use clap::Parser;
use serde::Serialize;
use termcolor::StandardStream;
use tracing::{Level, event};
use tracing_subscriber::prelude::*;

use assembler::{AssemblerFailure, ImageError, Program, assemble_source};
use cpu::{MemoryConfiguration, Snapshot};

mod report;
mod schedule;
mod simulation;

use schedule::{InterruptSchedule, IrqEvent};
use simulation::Simulation;

/// Simulate the 32-bit CPU running a program, then print the state
/// of the machine.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Program image (one hexadecimal word per line), or assembly
    /// source if --source is given or the name ends in ".s".
    #[clap(action = Set)]
    program: PathBuf,

    /// Assemble the program before running it.
    #[clap(action = SetTrue, long)]
    source: bool,

    /// Number of clock cycles to run for.
    #[clap(action = Set, long, default_value_t = 300)]
    cycles: usize,

    /// Size of the RAM in 32-bit words.
    #[clap(action = Set, long, default_value_t = 65536)]
    memory_words: usize,

    /// Value (in hexadecimal) read from addresses outside the RAM.
    #[clap(action = Set, long, value_parser = parse_hex_word, default_value = "0")]
    fill_word: u32,

    /// Raise interrupt line LINE (0-3) at clock cycle STEP and hold
    /// it until it is acknowledged.  May be given more than once.
    #[clap(action = Append, long = "irq", value_name = "STEP:LINE")]
    irq: Vec<IrqEvent>,

    /// Print the final state as JSON.
    #[clap(action = SetTrue, long)]
    json: bool,
}

fn parse_hex_word(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16)
        .map_err(|e| format!("'{s}' is not a 32-bit hexadecimal value: {e}"))
}

#[derive(Debug)]
enum Fail {
    ReadFailed { path: PathBuf, error: io::Error },
    Assembly(AssemblerFailure),
    BadImage(ImageError),
    WriteFailed(io::Error),
    Json(serde_json::Error),
    InitialisationFailure(String),
}

impl Fail {
    /// Assembly errors keep the assembler's exit status.  Failures
    /// to read, decode or write files share its I/O status.
    fn exit_code(&self) -> i32 {
        match self {
            Fail::Assembly(e) => e.exit_code(),
            Fail::ReadFailed { .. } | Fail::BadImage(_) | Fail::WriteFailed(_) | Fail::Json(_) => 8,
            Fail::InitialisationFailure(_) => 9,
        }
    }
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::ReadFailed { path, error } => {
                write!(f, "failed to read {}: {error}", path.display())
            }
            Fail::Assembly(e) => e.fmt(f),
            Fail::BadImage(e) => e.fmt(f),
            Fail::WriteFailed(e) => write!(f, "failed to write output: {e}"),
            Fail::Json(e) => write!(f, "failed to generate JSON: {e}"),
            Fail::InitialisationFailure(msg) => f.write_str(msg),
        }
    }
}

impl Error for Fail {}

fn is_assembly_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "s")
}

fn load_program(path: &Path, force_source: bool) -> Result<Vec<u32>, Fail> {
    let text = fs::read_to_string(path).map_err(|error| Fail::ReadFailed {
        path: path.to_path_buf(),
        error,
    })?;
    let program = if force_source || is_assembly_source(path) {
        event!(Level::INFO, "assembling {}", path.display());
        assemble_source(&text).map_err(|e| Fail::Assembly(AssemblerFailure::from(e)))?
    } else {
        Program::from_hex(&text).map_err(Fail::BadImage)?
    };
    Ok(program.into_words())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    cycles: usize,
    #[serde(flatten)]
    snapshot: &'a Snapshot,
}

fn run_simulator() -> Result<(), Fail> {
    let cli = Cli::parse();

    // See
    // https://docs.rs/tracing-subscriber/0.2.19/tracing_subscriber/fmt/index.html#filtering-events-with-environment-variables
    // for instructions on how to select which trace messages get
    // printed.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
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

    let program = load_program(&cli.program, cli.source)?;
    let mem_config = MemoryConfiguration {
        words: cli.memory_words,
        fill_word: cli.fill_word,
        ack_delay: 0,
    };
    let mut sim = Simulation::new(&program, &mem_config, InterruptSchedule::new(cli.irq));
    sim.run(cli.cycles);
    let snapshot = sim.snapshot();

    if cli.json {
        let report = JsonReport {
            cycles: sim.cycles(),
            snapshot: &snapshot,
        };
        let text = serde_json::to_string_pretty(&report).map_err(Fail::Json)?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{text}")
            .and_then(|()| handle.flush())
            .map_err(Fail::WriteFailed)
    } else {
        let mut out = StandardStream::stdout(report::get_colour_choice());
        report::write_snapshot(&mut out, &snapshot, sim.cycles()).map_err(Fail::WriteFailed)
    }
}

fn main() {
    match run_simulator() {
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}
