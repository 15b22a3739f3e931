//! The control unit: a state machine which fetches, decodes and
//! executes instructions.
//!
//! Each call to [`Cpu::step`] is one clock cycle.  The caller passes
//! in the bus responder's answer to whatever request the processor
//! was making during that cycle (see [`Cpu::bus_request`]) and the
//! current state of the interrupt request lines.
//!
//! Values which the hardware would compute combinationally (the bus
//! request, the effective address of a load or store, the ALU inputs
//! and the outcome of the condition test) are recomputed from the
//! current state whenever they are needed.  Registers, flags and the
//! machine state change only inside `step`.
//!
//! A typical instruction takes three cycles: FETCH, DECODE and
//! EXECUTE.  Loads and stores take one more (LOAD or STORE) and any
//! cycle in which the bus responder withholds the acknowledge is
//! repeated.  An instruction whose condition is not met returns to
//! FETCH straight from DECODE.
//!
//! Interrupt requests are sampled in DECODE and acted on by the
//! following FETCH, so an instruction which has started executing
//! always runs to completion.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use tracing::{Level, event, span};

use base::prelude::*;

use crate::bus::{Bus, BusRequest};
use crate::flags::Flags;
use crate::interrupt::{InterruptLines, select_vector};
use crate::snapshot::Snapshot;

mod op_alu;
mod op_jump;
mod op_loadstore;


/// The states of the control unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum State {
    Reset,
    Fetch,
    Decode,
    Execute,
    Load,
    Store,
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.pad(match self {
            State::Reset => "RESET",
            State::Fetch => "FETCH",
            State::Decode => "DECODE",
            State::Execute => "EXECUTE",
            State::Load => "LOAD",
            State::Store => "STORE",
        })
    }
}

/// The machine state saved on entry to an interrupt handler and
/// restored by `rti`.  There is only one of these, since interrupts
/// do not nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SavedContext {
    /// The address execution resumes at.
    pub epc: u32,
    /// The link register of the interrupted code.
    pub elr: u32,
    /// The flags of the interrupted code, packed as by
    /// [`Flags::pack`].
    pub estatus: u8,
}

impl SavedContext {
    const RESET: SavedContext = SavedContext {
        epc: 0,
        elr: 0,
        estatus: 0b010,
    };
}

/// A processor: register file, flags and control state.
#[derive(Debug, Clone)]
pub struct Cpu {
    regs: [u32; Register::COUNT],
    flags: Flags,
    state: State,
    next_pc: u32,

    /// The word most recently returned by an instruction fetch.
    fetched: u32,
    /// The instruction register.
    ir: Instruction,
    decoded: SymbolicInstruction,

    /// Interrupts are ignored while this is set.
    interrupts_masked: bool,
    in_interrupt: bool,
    /// Interrupt requests as sampled by the last DECODE.
    pending_irq: InterruptLines,
    irq_ack: InterruptLines,
    saved: SavedContext,

    /// Address and data of the last acknowledged load.
    transfer_address: u32,
    load_data: u32,
}

impl Default for Cpu {
    fn default() -> Cpu {
        Cpu::new()
    }
}

impl Cpu {
    /// Create a processor in the RESET state.  Its first step
    /// performs the reset.
    pub fn new() -> Cpu {
        let ir = Instruction::from(0_u32);
        Cpu {
            regs: [0; Register::COUNT],
            flags: Flags::RESET,
            state: State::Reset,
            next_pc: 0,
            fetched: 0,
            ir,
            decoded: SymbolicInstruction::from(&ir),
            interrupts_masked: true,
            in_interrupt: false,
            pending_irq: InterruptLines::NONE,
            irq_ack: InterruptLines::NONE,
            saved: SavedContext::RESET,
            transfer_address: 0,
            load_data: 0,
        }
    }

    /// Assert the reset input.  The reset takes effect on the next
    /// step, whatever the processor is doing.
    pub fn reset(&mut self) {
        event!(Level::DEBUG, "reset requested in state {}", self.state);
        self.state = State::Reset;
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn registers(&self) -> &[u32; Register::COUNT] {
        &self.regs
    }

    pub fn register(&self, r: Register) -> u32 {
        self.regs[r.index()]
    }

    pub fn pc(&self) -> u32 {
        self.register(Register::PC)
    }

    pub fn next_pc(&self) -> u32 {
        self.next_pc
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn interrupts_masked(&self) -> bool {
        self.interrupts_masked
    }

    pub fn in_interrupt(&self) -> bool {
        self.in_interrupt
    }

    pub fn saved_context(&self) -> SavedContext {
        self.saved
    }

    /// The interrupt acknowledge output.
    pub fn irq_ack(&self) -> InterruptLines {
        self.irq_ack
    }

    /// The contents of the instruction register.
    pub fn instruction(&self) -> Instruction {
        self.ir
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            pc: self.pc(),
            next_pc: self.next_pc,
            registers: self.regs,
            flags: self.flags,
            interrupts_masked: self.interrupts_masked,
            in_interrupt: self.in_interrupt,
            saved: self.saved,
            irq_ack: self.irq_ack.bits(),
            instruction: self.ir.bits(),
            disassembly: self.ir.to_string(),
        }
    }

    fn set_register(&mut self, r: Register, value: u32) {
        self.regs[r.index()] = value;
    }

    /// True when the next FETCH will enter an interrupt handler.
    fn interrupt_is_due(&self) -> bool {
        self.pending_irq.any() && !self.in_interrupt && !self.interrupts_masked
    }

    /// The request the processor is presenting to the bus in its
    /// current state, if any.
    pub fn bus_request(&self) -> Option<BusRequest> {
        match self.state {
            State::Fetch => {
                let address = if self.interrupt_is_due() {
                    select_vector(self.pending_irq).address
                } else {
                    self.next_pc
                };
                Some(BusRequest::read(address, BusRequest::ALL_LANES))
            }
            State::Execute => self.transfer_request(),
            State::Reset | State::Decode | State::Load | State::Store => None,
        }
    }

    /// Perform one clock cycle, exchanging the current bus request
    /// (if any) with `bus`.
    pub fn clock<B: Bus>(&mut self, bus: &mut B, irq: InterruptLines) {
        let ack = match self.bus_request() {
            Some(request) => bus.respond(&request),
            None => None,
        };
        self.step(ack, irq);
    }

    /// Perform one clock cycle.  `ack` is the bus responder's answer
    /// to [`Cpu::bus_request`]: `None` if it did not acknowledge, or
    /// the data it returned.  An acknowledge given when no request is
    /// outstanding is ignored.
    pub fn step(&mut self, ack: Option<u32>, irq: InterruptLines) {
        let span = span!(Level::TRACE, "step", state=%self.state, pc=self.pc());
        let _enter = span.enter();
        let next = match self.state {
            State::Reset => {
                self.perform_reset();
                State::Fetch
            }
            State::Fetch => self.fetch(ack),
            State::Decode => self.decode(irq),
            State::Execute => self.execute(ack),
            State::Load => self.complete_load(),
            State::Store => State::Fetch,
        };
        if next != self.state {
            event!(Level::TRACE, "{} -> {}", self.state, next);
        }
        self.state = next;
    }

    fn perform_reset(&mut self) {
        event!(Level::DEBUG, "reset");
        let ir = self.ir;
        *self = Cpu::new();
        // The instruction register is not affected by reset.
        self.ir = ir;
        self.decoded = SymbolicInstruction::from(&ir);
    }

    fn fetch(&mut self, ack: Option<u32>) -> State {
        let entering_interrupt = self.interrupt_is_due();
        if entering_interrupt {
            let vector = select_vector(self.pending_irq);
            self.irq_ack = vector.acknowledge;
            self.set_register(Register::PC, vector.address);
            self.saved = SavedContext {
                epc: self.next_pc,
                elr: self.register(Register::LR),
                estatus: self.flags.pack(),
            };
        } else {
            self.set_register(Register::PC, self.next_pc);
        }
        match ack {
            None => State::Fetch,
            Some(word) => {
                self.fetched = word;
                if entering_interrupt {
                    event!(
                        Level::DEBUG,
                        "entering interrupt handler at {:08x} (ack {:04b}), will resume at {:08x}",
                        self.pc(),
                        self.irq_ack.bits(),
                        self.saved.epc
                    );
                    self.in_interrupt = true;
                }
                State::Decode
            }
        }
    }

    fn decode(&mut self, irq: InterruptLines) -> State {
        self.pending_irq = irq;
        self.irq_ack = InterruptLines::NONE;
        self.ir = Instruction::from(self.fetched);
        self.decoded = SymbolicInstruction::from(&self.ir);
        self.next_pc = self.pc().wrapping_add(4);
        if self.flags.satisfies(self.decoded.condition) {
            State::Execute
        } else {
            event!(
                Level::DEBUG,
                "condition of {} at {:08x} not met, skipping it",
                self.decoded,
                self.pc()
            );
            State::Fetch
        }
    }

    fn execute(&mut self, ack: Option<u32>) -> State {
        event!(Level::TRACE, "executing {}", self.decoded);
        match self.decoded.operation {
            Operation::Alu { op, rd, rs1, rs2 } => {
                let b = self.register(rs2);
                self.op_alu(op, rd, rs1, b)
            }
            Operation::AluImmediate { op, rd, rs1, imm } => self.op_alu(op, rd, rs1, u32::from(imm)),
            Operation::LoadImmediate { kind, rd, imm } => self.op_load_immediate(kind, rd, imm),
            Operation::Load { rs1, .. } => self.op_load(rs1, ack),
            Operation::Store { rd, .. } => self.op_store(rd, ack),
            Operation::Branch { offset } => self.op_branch(offset),
            Operation::BranchDecrement { rd, offset } => self.op_bdec(rd, offset),
            Operation::JumpSubroutine { rd, target } => self.op_jsr(rd, target),
            Operation::Ext { function, imm } => self.op_ext(function, imm),
            Operation::Reserved { .. } => {
                event!(
                    Level::DEBUG,
                    "reserved opcode at {:08x} does nothing",
                    self.pc()
                );
                State::Fetch
            }
        }
    }
}
