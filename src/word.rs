use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::DecodeError;
use crate::instructions::{Slot, Slots};

/// One machine word: opcode, N, R2 and R1 nibbles followed by a 16-bit payload.
/// Always renders as exactly eight upper-case hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Word(u32);

/// Nibble positions, counted from the left of the rendered word.
pub const OPCODE_POS: usize = 0;
pub const N_POS: usize = 1;
pub const R2_POS: usize = 2;
pub const R1_POS: usize = 3;

pub const WORD_DIGITS: usize = 8;

impl Word {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Packs four leading nibbles (index 0 is the opcode) and the payload.
    pub fn pack(nibbles: [u8; 4], payload: u16) -> Self {
        let head = nibbles
            .iter()
            .fold(0u32, |acc, &n| (acc << 4) | (n & 0xF) as u32);
        Self((head << 16) | payload as u32)
    }

    pub fn nibble(self, pos: usize) -> u8 {
        debug_assert!(pos < 4);
        ((self.0 >> (28 - 4 * pos)) & 0xF) as u8
    }

    pub fn payload(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Zeroes every operand slot outside `keep`, and the payload unless `keep`
    /// holds [`Slots::PAYLOAD`]. The opcode nibble is always kept.
    pub fn masked(self, keep: Slots) -> Self {
        let mut nibbles = [self.nibble(OPCODE_POS), 0, 0, 0];
        for slot in Slot::ALL {
            if keep.contains(slot.flag()) {
                nibbles[slot.pos()] = self.nibble(slot.pos());
            }
        }
        let payload = if keep.contains(Slots::PAYLOAD) { self.payload() } else { 0 };
        Self::pack(nibbles, payload)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

impl FromStr for Word {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| DecodeError::MalformedWord {
            word: s.to_string(),
            reason: reason.to_string(),
        };
        if s.chars().count() != WORD_DIGITS {
            return Err(malformed("expected exactly 8 hex digits"));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed("contains a non-hex character"));
        }
        u32::from_str_radix(s, 16)
            .map(Word)
            .map_err(|_| malformed("not a hex number"))
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
