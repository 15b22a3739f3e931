//! The memory bus, from the point of view of the processor.
//!
//! The processor is the only requester.  While a request is
//! outstanding the processor holds its address, data and byte-select
//! outputs stable; the responder eventually acknowledges it.  A
//! responder that never acknowledges simply stalls the processor.
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// One bus transaction as driven by the processor.  The strobe is
/// implied by the existence of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusRequest {
    pub address: u32,
    /// Outbound data; meaningful only for writes.
    pub data: u32,
    /// Bit `n` selects byte lane `n` (bits `8n..8n+7` of the word).
    pub select: u8,
    pub write: bool,
}

impl BusRequest {
    pub const ALL_LANES: u8 = 0b1111;

    pub fn read(address: u32, select: u8) -> BusRequest {
        BusRequest {
            address,
            data: 0,
            select,
            write: false,
        }
    }

    pub fn write(address: u32, data: u32, select: u8) -> BusRequest {
        BusRequest {
            address,
            data,
            select,
            write: true,
        }
    }

    /// Expand the byte-select lanes into a 32-bit mask.
    pub fn lane_mask(&self) -> u32 {
        (0..4)
            .filter(|lane| self.select & (1 << lane) != 0)
            .fold(0, |mask, lane| mask | (0xFF << (8 * lane)))
    }
}

impl Display for BusRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        if self.write {
            write!(
                f,
                "write {:08x} <- {:08x} sel {:04b}",
                self.address, self.data, self.select
            )
        } else {
            write!(f, "read {:08x} sel {:04b}", self.address, self.select)
        }
    }
}

/// Something which services the processor's bus requests.
pub trait Bus {
    /// Service `request` for one cycle.  Returns `None` to withhold
    /// the acknowledge, or `Some(data)` to acknowledge it.  For
    /// writes the returned data is ignored.
    fn respond(&mut self, request: &BusRequest) -> Option<u32>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn respond(&mut self, request: &BusRequest) -> Option<u32> {
        (**self).respond(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_mask() {
        assert_eq!(BusRequest::read(0, 0b1111).lane_mask(), 0xFFFF_FFFF);
        assert_eq!(BusRequest::read(0, 0b0001).lane_mask(), 0x0000_00FF);
        assert_eq!(BusRequest::read(0, 0b1100).lane_mask(), 0xFFFF_0000);
        assert_eq!(BusRequest::read(0, 0b0100).lane_mask(), 0x00FF_0000);
        assert_eq!(BusRequest::read(0, 0).lane_mask(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            BusRequest::write(0x100, 0xAB, 0b0001).to_string(),
            "write 00000100 <- 000000ab sel 0001"
        );
        assert_eq!(
            BusRequest::read(0x8, BusRequest::ALL_LANES).to_string(),
            "read 00000008 sel 1111"
        );
    }
}
