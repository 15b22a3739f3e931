//! A processor connected to a RAM holding the program, with the
//! interrupt request lines driven from a schedule.
use tracing::{Level, event, span};

use cpu::{Cpu, Memory, MemoryConfiguration, Snapshot};

use crate::schedule::InterruptSchedule;

pub(crate) struct Simulation {
    cpu: Cpu,
    memory: Memory,
    schedule: InterruptSchedule,
    cycles: usize,
}

impl Simulation {
    /// Load `program` at address 0 of a fresh RAM.  The processor
    /// starts in its reset state.
    pub(crate) fn new(
        program: &[u32],
        config: &MemoryConfiguration,
        schedule: InterruptSchedule,
    ) -> Simulation {
        let mut memory = Memory::new(config);
        let loaded = memory.load(0, program);
        event!(
            Level::INFO,
            "loaded {loaded} words into a RAM of {} words",
            memory.size_in_words()
        );
        Simulation {
            cpu: Cpu::new(),
            memory,
            schedule,
            cycles: 0,
        }
    }

    /// Run for `count` clock cycles.
    pub(crate) fn run(&mut self, count: usize) {
        let span = span!(Level::INFO, "run", count);
        let _enter = span.enter();
        for _ in 0..count {
            let irq = self.schedule.lines_for(self.cycles, self.cpu.irq_ack());
            self.cpu.clock(&mut self.memory, irq);
            self.cycles += 1;
        }
        event!(
            Level::INFO,
            "stopped after {} cycles at pc {:08x}",
            self.cycles,
            self.cpu.pc()
        );
    }

    pub(crate) fn cycles(&self) -> usize {
        self.cycles
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        self.cpu.snapshot()
    }

    #[cfg(test)]
    pub(crate) fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    #[cfg(test)]
    pub(crate) fn memory(&self) -> &Memory {
        &self.memory
    }
}
