use std::fmt;

use serde::Serialize;

/// A register operand as written in one hex digit.
///
/// `1`..`D` name the thirteen general registers. `E` reads a fresh random value and
/// `F` reads the word's 16-bit payload; neither can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Register {
    Numbered(u8),
    Random,
    Immediate,
}

impl Register {
    pub const RANDOM: u8 = 0xE;
    pub const IMMEDIATE: u8 = 0xF;

    pub fn from_nibble(n: u8) -> Option<Self> {
        match n {
            1..=0xD => Some(Register::Numbered(n)),
            Self::RANDOM => Some(Register::Random),
            Self::IMMEDIATE => Some(Register::Immediate),
            _ => None,
        }
    }

    /// Case-insensitive; `0` and anything outside `1`-`F` is rejected.
    pub fn from_char(c: char) -> Option<Self> {
        let n = c.to_digit(16)?;
        Self::from_nibble(n as u8)
    }

    pub fn nibble(self) -> u8 {
        match self {
            Register::Numbered(n) => n,
            Register::Random => Self::RANDOM,
            Register::Immediate => Self::IMMEDIATE,
        }
    }

    pub fn to_char(self) -> char {
        // nibble() is always 1..=15
        char::from_digit(self.nibble() as u32, 16)
            .unwrap_or('0')
            .to_ascii_uppercase()
    }

    pub fn is_sentinel(self) -> bool {
        !matches!(self, Register::Numbered(_))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_registers() {
        assert_eq!(Register::from_char('1'), Some(Register::Numbered(1)));
        assert_eq!(Register::from_char('d'), Some(Register::Numbered(13)));
        assert_eq!(Register::from_char('E'), Some(Register::Random));
        assert_eq!(Register::from_char('f'), Some(Register::Immediate));
        assert_eq!(Register::from_char('0'), None);
        assert_eq!(Register::from_char('G'), None);
    }

    #[test]
    fn renders_upper_case() {
        assert_eq!(Register::Numbered(10).to_string(), "A");
        assert_eq!(Register::Immediate.to_string(), "F");
        assert!(Register::Random.is_sentinel());
        assert!(!Register::Numbered(3).is_sentinel());
    }
}
