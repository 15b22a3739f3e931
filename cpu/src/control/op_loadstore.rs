//! Implementations of the load and store opcodes
//! - ldb, ldh, ldw: [`Cpu::op_load`], then [`Cpu::complete_load`]
//! - stb, sth, stw: [`Cpu::op_store`]
//!
//! Loads use the address `rs1 + offset` and stores use `rd + offset`
//! (the offset is zero-extended).  The byte lanes selected depend on
//! the transfer size and the bottom bits of the address:
//!
//! | Size | Select                         | Data lanes                 |
//! |------|--------------------------------|----------------------------|
//! | byte | `1 << a[1:0]`                  | the selected byte          |
//! | half | `0b0011` or `0b1100` by `a[1]` | lower or upper half        |
//! | word | `0b1111`                       | all                        |
//!
//! A load whose `rs1` is `sp` increments `sp` by 4 and a store whose
//! `rd` is `sp` decrements it by 4; this is what makes `pop` and
//! `push` work.

use tracing::{Level, event};

use base::prelude::*;

use crate::bus::BusRequest;
use crate::control::{Cpu, State};

fn select_lanes(size: TransferSize, address: u32) -> u8 {
    match size {
        TransferSize::Byte => 1 << (address & 0b11),
        TransferSize::Half if address & 0b10 != 0 => 0b1100,
        TransferSize::Half => 0b0011,
        TransferSize::Word => BusRequest::ALL_LANES,
    }
}

fn place_store_data(size: TransferSize, address: u32, value: u32) -> u32 {
    match size {
        TransferSize::Byte => (value & 0xFF) << (8 * (address & 0b11)),
        TransferSize::Half if address & 0b10 != 0 => value << 16,
        TransferSize::Half => value & 0xFFFF,
        TransferSize::Word => value,
    }
}

fn extract_load_data(size: TransferSize, address: u32, data: u32) -> u32 {
    match size {
        TransferSize::Byte => (data >> (8 * (address & 0b11))) & 0xFF,
        TransferSize::Half if address & 0b10 != 0 => data >> 16,
        TransferSize::Half => data & 0xFFFF,
        TransferSize::Word => data,
    }
}

impl Cpu {
    /// The bus request made by the instruction being executed, if it
    /// is a load or a store.
    pub(super) fn transfer_request(&self) -> Option<BusRequest> {
        match self.decoded.operation {
            Operation::Load {
                size, rs1, offset, ..
            } => {
                let address = self.register(rs1).wrapping_add(u32::from(offset));
                Some(BusRequest::read(address, select_lanes(size, address)))
            }
            Operation::Store {
                size,
                rd,
                rs1,
                offset,
            } => {
                let address = self.register(rd).wrapping_add(u32::from(offset));
                let data = place_store_data(size, address, self.register(rs1));
                Some(BusRequest::write(
                    address,
                    data,
                    select_lanes(size, address),
                ))
            }
            _ => None,
        }
    }

    fn adjust_stack_pointer(&mut self, delta: i32) {
        let sp = self.register(Register::SP).wrapping_add(delta as u32);
        self.set_register(Register::SP, sp);
    }

    pub(super) fn op_load(&mut self, rs1: Register, ack: Option<u32>) -> State {
        let Some(data) = ack else {
            return State::Execute;
        };
        let Some(request) = self.transfer_request() else {
            return State::Fetch;
        };
        self.transfer_address = request.address;
        self.load_data = data;
        if rs1 == Register::SP {
            self.adjust_stack_pointer(4);
        }
        State::Load
    }

    /// The LOAD state: write the loaded value into `rd`.
    pub(super) fn complete_load(&mut self) -> State {
        if let Operation::Load { size, rd, .. } = self.decoded.operation {
            let value = extract_load_data(size, self.transfer_address, self.load_data);
            event!(
                Level::TRACE,
                "loaded {:#x} from {:08x} into {}",
                value,
                self.transfer_address,
                rd
            );
            self.set_register(rd, value);
        }
        State::Fetch
    }

    pub(super) fn op_store(&mut self, rd: Register, ack: Option<u32>) -> State {
        if ack.is_none() {
            return State::Execute;
        }
        if rd == Register::SP {
            self.adjust_stack_pointer(-4);
        }
        State::Store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_lanes() {
        assert_eq!(select_lanes(TransferSize::Byte, 0x100), 0b0001);
        assert_eq!(select_lanes(TransferSize::Byte, 0x103), 0b1000);
        assert_eq!(select_lanes(TransferSize::Half, 0x100), 0b0011);
        assert_eq!(select_lanes(TransferSize::Half, 0x102), 0b1100);
        assert_eq!(select_lanes(TransferSize::Half, 0x103), 0b1100);
        assert_eq!(select_lanes(TransferSize::Word, 0x101), 0b1111);
    }

    #[test]
    fn test_store_data_placement() {
        assert_eq!(place_store_data(TransferSize::Byte, 2, 0x1234_56AB), 0x00AB_0000);
        assert_eq!(place_store_data(TransferSize::Half, 0, 0x1234_5678), 0x0000_5678);
        assert_eq!(place_store_data(TransferSize::Half, 2, 0x0000_5678), 0x5678_0000);
        assert_eq!(place_store_data(TransferSize::Word, 3, 0x1234_5678), 0x1234_5678);
    }

    #[test]
    fn test_load_data_extraction() {
        assert_eq!(extract_load_data(TransferSize::Byte, 1, 0x1122_3344), 0x33);
        assert_eq!(extract_load_data(TransferSize::Byte, 3, 0xFF22_3344), 0xFF);
        assert_eq!(extract_load_data(TransferSize::Half, 0, 0x1122_3344), 0x3344);
        assert_eq!(extract_load_data(TransferSize::Half, 2, 0x8122_3344), 0x8122);
        assert_eq!(extract_load_data(TransferSize::Word, 0, 0x1122_3344), 0x1122_3344);
    }
}
