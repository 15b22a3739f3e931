//! A RAM which responds to the processor's bus requests.
//!
//! The RAM is an array of 32-bit words.  Bus addresses are byte
//! addresses; the bottom two bits of the address are ignored and
//! the byte-select lanes decide which bytes of the word are written.
//! Reads always return the whole word, and it is up to the processor
//! to pick out the bytes it wants.
//!
//! Locations beyond the end of the RAM read as a configurable fill
//! word and ignore writes.
use tracing::{Level, event};

use crate::bus::{Bus, BusRequest};

/// How to build a [`Memory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfiguration {
    /// The size of the RAM in 32-bit words.
    pub words: usize,
    /// The value read from locations outside the RAM.
    pub fill_word: u32,
    /// How many cycles each request is kept waiting before it is
    /// acknowledged.  Zero acknowledges in the same cycle.
    pub ack_delay: u32,
}

impl Default for MemoryConfiguration {
    fn default() -> MemoryConfiguration {
        MemoryConfiguration {
            words: 1 << 16,
            fill_word: 0,
            ack_delay: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Memory {
    words: Vec<u32>,
    fill_word: u32,
    ack_delay: u32,
    waited: u32,
    /// The request whose delay `waited` is counting.
    pending: Option<BusRequest>,
}

impl Memory {
    pub fn new(config: &MemoryConfiguration) -> Memory {
        Memory {
            words: vec![0; config.words],
            fill_word: config.fill_word,
            ack_delay: config.ack_delay,
            waited: 0,
            pending: None,
        }
    }

    /// Build a RAM holding exactly `image`, starting at address 0.
    pub fn with_image(image: &[u32], fill_word: u32) -> Memory {
        Memory {
            words: image.to_vec(),
            fill_word,
            ack_delay: 0,
            waited: 0,
            pending: None,
        }
    }

    pub fn size_in_words(&self) -> usize {
        self.words.len()
    }

    /// Copy `image` into the RAM starting at byte address `base`.
    /// Words which would fall outside the RAM are dropped, and the
    /// number of words actually loaded is returned.
    pub fn load(&mut self, base: u32, image: &[u32]) -> usize {
        let start = (base >> 2) as usize;
        let mut loaded = 0;
        for (offset, word) in image.iter().enumerate() {
            match self.words.get_mut(start + offset) {
                Some(slot) => {
                    *slot = *word;
                    loaded += 1;
                }
                None => {
                    event!(
                        Level::WARN,
                        "program image does not fit in memory; {} words dropped",
                        image.len() - offset
                    );
                    break;
                }
            }
        }
        loaded
    }

    /// Read the word containing byte address `address`.
    pub fn read_word(&self, address: u32) -> u32 {
        self.words
            .get((address >> 2) as usize)
            .copied()
            .unwrap_or(self.fill_word)
    }

    /// Update those bytes of the word containing `address` which are
    /// enabled in `select`.
    pub fn write_word(&mut self, address: u32, data: u32, select: u8) {
        let request = BusRequest::write(address, data, select);
        let mask = request.lane_mask();
        match self.words.get_mut((address >> 2) as usize) {
            Some(slot) => {
                *slot = (*slot & !mask) | (data & mask);
            }
            None => {
                event!(
                    Level::WARN,
                    "ignoring write to {:08x}, which is outside memory",
                    address
                );
            }
        }
    }
}

impl Bus for Memory {
    fn respond(&mut self, request: &BusRequest) -> Option<u32> {
        if self.pending.as_ref() != Some(request) {
            self.pending = Some(*request);
            self.waited = 0;
        }
        if self.waited < self.ack_delay {
            self.waited += 1;
            return None;
        }
        self.waited = 0;
        self.pending = None;
        event!(Level::TRACE, "memory: {}", request);
        if request.write {
            self.write_word(request.address, request.data, request.select);
            Some(0)
        } else {
            Some(self.read_word(request.address))
        }
    }
}
