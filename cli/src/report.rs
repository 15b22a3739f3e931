//! Prints the final machine state, in colour when writing to a
//! terminal.
use std::io::{self, Write};

use termcolor::{self, ColorChoice, ColorSpec, WriteColor};

use base::prelude::Register;
use cpu::Snapshot;

pub(crate) fn get_colour_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn heading() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_bold(true).set_fg(Some(termcolor::Color::Cyan));
    spec
}

fn nonzero() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(termcolor::Color::Yellow));
    spec
}

fn write_labelled<W: WriteColor>(out: &mut W, label: &str, value: &str) -> io::Result<()> {
    out.set_color(&heading())?;
    write!(out, "{label}")?;
    out.reset()?;
    write!(out, " {value}")
}

/// Write `snapshot`, taken after `cycles` clock cycles.
pub(crate) fn write_snapshot<W: WriteColor>(
    out: &mut W,
    snapshot: &Snapshot,
    cycles: usize,
) -> io::Result<()> {
    writeln!(out, "after {cycles} cycles:")?;
    write_labelled(out, "state", &format!("{:<8}", snapshot.state))?;
    write_labelled(out, " pc", &format!("{:08x}", snapshot.pc))?;
    write_labelled(out, " next", &format!("{:08x}", snapshot.next_pc))?;
    write_labelled(out, " flags", &snapshot.flags.to_string())?;
    write_labelled(
        out,
        " ir",
        &format!("{:08x}  {}", snapshot.instruction, snapshot.disassembly),
    )?;
    writeln!(out)?;

    for (index, value) in snapshot.registers.iter().enumerate() {
        let name = u8::try_from(index)
            .ok()
            .and_then(|n| Register::try_from(n).ok())
            .map_or_else(|| format!("r{index}"), |r| r.to_string());
        write!(out, "{name:>4} ")?;
        if *value != 0 {
            out.set_color(&nonzero())?;
        }
        write!(out, "{value:08x}")?;
        out.reset()?;
        if index % 4 == 3 {
            writeln!(out)?;
        } else {
            write!(out, "  ")?;
        }
    }

    let mode = match (snapshot.interrupts_masked, snapshot.in_interrupt) {
        (true, true) => "masked, in handler",
        (true, false) => "masked",
        (false, true) => "enabled, in handler",
        (false, false) => "enabled",
    };
    write_labelled(out, "interrupts", mode)?;
    write_labelled(out, " ack", &format!("{:04b}", snapshot.irq_ack))?;
    write_labelled(
        out,
        " epc",
        &format!(
            "{:08x}  elr {:08x}  estatus {:03b}",
            snapshot.saved.epc, snapshot.saved.elr, snapshot.saved.estatus
        ),
    )?;
    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpu::{Cpu, InterruptLines};

    #[test]
    fn test_plain_report() {
        let mut cpu = Cpu::new();
        cpu.step(None, InterruptLines::NONE);
        let mut out = termcolor::NoColor::new(Vec::new());
        write_snapshot(&mut out, &cpu.snapshot(), 1).expect("writing to a Vec succeeds");
        let text = String::from_utf8(out.into_inner()).expect("report is ASCII");
        assert!(text.starts_with("after 1 cycles:\nstate FETCH"), "{text}");
        assert!(text.contains("  sp 00000000"), "{text}");
        assert!(text.contains("interrupts masked ack 0000"), "{text}");
        assert!(text.contains("estatus 010"), "{text}");
    }
}
