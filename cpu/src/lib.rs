//! This crate emulates the processor: its arithmetic unit, its
//! control unit, and the bus over which it talks to memory.
#![crate_name = "cpu"]

mod alu;
mod bus;
mod control;
mod flags;
mod interrupt;
mod memory;
mod snapshot;

pub use alu::{AluOutput, apply};
pub use bus::{Bus, BusRequest};
pub use control::{Cpu, SavedContext, State};
pub use flags::Flags;
pub use interrupt::{InterruptLines, InterruptVector, select_vector};
pub use memory::{Memory, MemoryConfiguration};
pub use snapshot::Snapshot;
