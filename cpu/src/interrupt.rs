//! Interrupt request lines and their priority encoding.
use serde::Serialize;

/// The state of the four interrupt request (or acknowledge) lines.
/// Line 0 is bit 0 and has the highest priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct InterruptLines(u8);

impl InterruptLines {
    pub const NONE: InterruptLines = InterruptLines(0);

    /// Only the bottom four bits of `bits` are significant.
    pub fn new(bits: u8) -> InterruptLines {
        InterruptLines(bits & 0b1111)
    }

    pub fn line(n: u8) -> InterruptLines {
        InterruptLines::new(1 << (n & 0b11))
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn any(&self) -> bool {
        self.0 != 0
    }

    pub fn is_raised(&self, n: u8) -> bool {
        n < 4 && self.0 & (1 << n) != 0
    }
}

impl std::ops::BitOr for InterruptLines {
    type Output = InterruptLines;
    fn bitor(self, other: InterruptLines) -> InterruptLines {
        InterruptLines(self.0 | other.0)
    }
}

/// Where the interrupt with the highest pending priority is
/// serviced, and which acknowledge line is raised for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptVector {
    pub address: u32,
    pub acknowledge: InterruptLines,
}

/// Choose the vector for the highest-priority request in `pending`.
///
/// Lines 0, 1 and 2 are each tested individually; anything else
/// (which in practice is only line 3) falls through to the last
/// entry.  Callers must only use the result when some line is
/// raised.
pub fn select_vector(pending: InterruptLines) -> InterruptVector {
    let (slot, ack) = if pending.is_raised(0) {
        (1, 0b0001)
    } else if pending.is_raised(1) {
        (2, 0b0010)
    } else if pending.is_raised(2) {
        (3, 0b0100)
    } else {
        (4, 0b1000)
    };
    InterruptVector {
        address: slot << 3,
        acknowledge: InterruptLines::new(ack),
    }
}
