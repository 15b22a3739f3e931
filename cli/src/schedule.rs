//! Interrupt requests raised by the simulator on behalf of imaginary
//! devices.  Each request is given as `STEP:LINE` on the command
//! line.  A request stays raised until the processor acknowledges
//! it.
use std::str::FromStr;

use tracing::{Level, event};

use cpu::InterruptLines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IrqEvent {
    /// The clock cycle (counting from 0) at which the line is raised.
    pub(crate) step: usize,
    pub(crate) line: u8,
}

impl FromStr for IrqEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<IrqEvent, String> {
        let (step, line) = s
            .split_once(':')
            .ok_or_else(|| format!("'{s}' should have the form STEP:LINE"))?;
        let step: usize = step
            .trim()
            .parse()
            .map_err(|e| format!("'{step}' is not a valid step number: {e}"))?;
        let line: u8 = match line.trim().parse() {
            Ok(n) if n < 4 => n,
            _ => {
                return Err(format!(
                    "'{line}' is not an interrupt line (there are four, numbered 0 to 3)"
                ));
            }
        };
        Ok(IrqEvent { step, line })
    }
}

#[derive(Debug, Default)]
pub(crate) struct InterruptSchedule {
    /// Sorted by step.
    events: Vec<IrqEvent>,
    next: usize,
    pending: InterruptLines,
}

impl InterruptSchedule {
    pub(crate) fn new(mut events: Vec<IrqEvent>) -> InterruptSchedule {
        events.sort_by_key(|e| e.step);
        InterruptSchedule {
            events,
            next: 0,
            pending: InterruptLines::NONE,
        }
    }

    /// The request lines to present to the processor in cycle
    /// `step`.  `acknowledged` is the processor's acknowledge output,
    /// which withdraws the matching requests.
    pub(crate) fn lines_for(&mut self, step: usize, acknowledged: InterruptLines) -> InterruptLines {
        if acknowledged.any() {
            self.pending = InterruptLines::new(self.pending.bits() & !acknowledged.bits());
        }
        while let Some(event) = self.events.get(self.next) {
            if event.step > step {
                break;
            }
            event!(
                Level::DEBUG,
                "cycle {step}: raising interrupt line {}",
                event.line
            );
            self.pending = self.pending | InterruptLines::line(event.line);
            self.next += 1;
        }
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            "40:2".parse::<IrqEvent>(),
            Ok(IrqEvent { step: 40, line: 2 })
        );
        assert!("40".parse::<IrqEvent>().is_err());
        assert!("x:1".parse::<IrqEvent>().is_err());
        assert!("10:4".parse::<IrqEvent>().is_err());
    }

    #[test]
    fn test_request_held_until_acknowledged() {
        let mut schedule = InterruptSchedule::new(vec![
            IrqEvent { step: 5, line: 3 },
            IrqEvent { step: 2, line: 1 },
        ]);
        assert_eq!(schedule.lines_for(0, InterruptLines::NONE), InterruptLines::NONE);
        assert_eq!(schedule.lines_for(2, InterruptLines::NONE), InterruptLines::line(1));
        assert_eq!(schedule.lines_for(3, InterruptLines::NONE), InterruptLines::line(1));
        // Acknowledging line 1 withdraws it; line 3 arrives later.
        assert_eq!(schedule.lines_for(4, InterruptLines::line(1)), InterruptLines::NONE);
        assert_eq!(schedule.lines_for(5, InterruptLines::NONE), InterruptLines::line(3));
    }

    #[test]
    fn test_late_start_catches_up() {
        let mut schedule = InterruptSchedule::new(vec![IrqEvent { step: 1, line: 0 }]);
        assert_eq!(schedule.lines_for(10, InterruptLines::NONE), InterruptLines::line(0));
    }
}
