use std::fmt;

use bitflags::bitflags;
use serde::Serialize;

use crate::error::EncodeError;
use crate::register::Register;
use crate::word::{N_POS, R1_POS, R2_POS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Opcode {
    Jump,
    JumpIfZero,
    JumpIfNegative,
    Add,
    Subtract,
    Multiply,
    Divide,
    WriteToRam,
    Input,
    WritePixel,
    ResetScreen,
    LoadImmediate,
    LoadFromRam,
    /// Blank or comment-only line; never encoded.
    Comment,
}

impl Opcode {
    pub fn desc(self) -> Option<&'static InstrDesc> {
        TABLE.iter().find(|d| d.op == self)
    }

    pub fn code(self) -> Option<u8> {
        self.desc().map(|d| d.code)
    }

    pub fn mnemonic(self) -> Option<&'static str> {
        self.desc().map(|d| d.mnemonic)
    }
}

/// Nibble slots a register operand can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    N,
    R2,
    R1,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::N, Slot::R2, Slot::R1];

    pub fn pos(self) -> usize {
        match self {
            Slot::N => N_POS,
            Slot::R2 => R2_POS,
            Slot::R1 => R1_POS,
        }
    }

    pub fn flag(self) -> Slots {
        match self {
            Slot::N => Slots::N,
            Slot::R2 => Slots::R2,
            Slot::R1 => Slots::R1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slots: u8 {
const N = 1 << 0;
const R2 = 1 << 1;
const R1 = 1 << 2;
const PAYLOAD = 1 << 3;
}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Compare,
    Dest,
    SrcA,
    SrcB,
    Data,
    Address,
}

impl Role {
    pub fn is_write(self) -> bool {
        matches!(self, Role::Dest)
    }
}

/// Separator written before an operand. The first operand always follows a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sep {
    Space,
    Comma,
}

#[derive(Debug, Clone, Copy)]
pub struct OperandDesc {
    pub role: Role,
    pub slot: Slot,
    pub sep: Sep,
}

/// Who owns the trailing 16-bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Always `0000`; no literal may be written.
    Forbidden,
    /// Jump target; literal required.
    Address,
    /// Loaded constant; literal required.
    Value,
    /// Feeds every source operand written `F`. Optional otherwise.
    Immediate,
}

impl Payload {
    /// Inclusive bounds on the total operand token count for `regs` registers.
    pub fn arity(self, regs: usize) -> (usize, usize) {
        match self {
            Payload::Forbidden => (regs, regs),
            Payload::Address | Payload::Value => (regs + 1, regs + 1),
            Payload::Immediate => (regs, regs + 1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub op: Opcode,
    pub mnemonic: &'static str,
    pub code: u8,
    pub operands: &'static [OperandDesc],
    pub payload: Payload,
    pub fixed: Option<(Slot, u8)>,
}

impl InstrDesc {
    pub fn used_slots(&self) -> Slots {
        let mut used = self
            .operands
            .iter()
            .fold(Slots::empty(), |acc, o| acc | o.slot.flag());
        if let Some((slot, _)) = self.fixed {
            used |= slot.flag();
        }
        if self.payload != Payload::Forbidden {
            used |= Slots::PAYLOAD;
        }
        used
    }
}

const fn reg(role: Role, slot: Slot, sep: Sep) -> OperandDesc {
    OperandDesc { role, slot, sep }
}

const NONE: &[OperandDesc] = &[];
const COMPARE_PAIR: &[OperandDesc] = &[
    reg(Role::Compare, Slot::R2, Sep::Space),
    reg(Role::Compare, Slot::R1, Sep::Comma),
];
// a,b dest
const ARITH: &[OperandDesc] = &[
    reg(Role::SrcA, Slot::R2, Sep::Space),
    reg(Role::SrcB, Slot::R1, Sep::Comma),
    reg(Role::Dest, Slot::N, Sep::Space),
];
const DEST: &[OperandDesc] = &[reg(Role::Dest, Slot::N, Sep::Space)];
const RAM_WRITE: &[OperandDesc] = &[
    reg(Role::Data, Slot::R2, Sep::Space),
    reg(Role::Address, Slot::R1, Sep::Space),
];
// color,position
const PIXEL: &[OperandDesc] = &[
    reg(Role::Data, Slot::R2, Sep::Space),
    reg(Role::Address, Slot::R1, Sep::Comma),
];
const RAM_READ: &[OperandDesc] = &[
    reg(Role::Dest, Slot::N, Sep::Space),
    reg(Role::Address, Slot::R1, Sep::Space),
];

const JUMP_N: Option<(Slot, u8)> = Some((Slot::N, Register::IMMEDIATE));

pub static TABLE: &[InstrDesc] = &[
    InstrDesc {
        op: Opcode::Jump,
        mnemonic: "JMP",
        code: 0x1,
        operands: NONE,
        payload: Payload::Address,
        fixed: JUMP_N,
    },
    InstrDesc {
        op: Opcode::JumpIfZero,
        mnemonic: "JMZ",
        code: 0x2,
        operands: COMPARE_PAIR,
        payload: Payload::Address,
        fixed: JUMP_N,
    },
    InstrDesc {
        op: Opcode::JumpIfNegative,
        mnemonic: "JNG",
        code: 0x3,
        operands: COMPARE_PAIR,
        payload: Payload::Address,
        fixed: JUMP_N,
    },
    InstrDesc {
        op: Opcode::Add,
        mnemonic: "ADD",
        code: 0x4,
        operands: ARITH,
        payload: Payload::Immediate,
        fixed: None,
    },
    InstrDesc {
        op: Opcode::Subtract,
        mnemonic: "SUB",
        code: 0x5,
        operands: ARITH,
        payload: Payload::Immediate,
        fixed: None,
    },
    InstrDesc {
        op: Opcode::Multiply,
        mnemonic: "MUL",
        code: 0x6,
        operands: ARITH,
        payload: Payload::Immediate,
        fixed: None,
    },
    InstrDesc {
        op: Opcode::Divide,
        mnemonic: "DIV",
        code: 0x7,
        operands: ARITH,
        payload: Payload::Immediate,
        fixed: None,
    },
    InstrDesc {
        op: Opcode::WriteToRam,
        mnemonic: "WTR",
        code: 0x8,
        operands: RAM_WRITE,
        payload: Payload::Immediate,
        fixed: None,
    },
    InstrDesc {
        op: Opcode::Input,
        mnemonic: "INP",
        code: 0x9,
        operands: DEST,
        payload: Payload::Forbidden,
        fixed: None,
    },
    InstrDesc {
        op: Opcode::WritePixel,
        mnemonic: "WOP",
        code: 0xA,
        operands: PIXEL,
        payload: Payload::Immediate,
        fixed: None,
    },
    InstrDesc {
        op: Opcode::ResetScreen,
        mnemonic: "RES",
        code: 0xB,
        operands: NONE,
        payload: Payload::Forbidden,
        fixed: None,
    },
    InstrDesc {
        op: Opcode::LoadImmediate,
        mnemonic: "LDI",
        code: 0xC,
        operands: DEST,
        payload: Payload::Value,
        fixed: None,
    },
    InstrDesc {
        op: Opcode::LoadFromRam,
        mnemonic: "LDR",
        code: 0xD,
        operands: RAM_READ,
        payload: Payload::Immediate,
        fixed: None,
    },
];

/// Whole-token, case-insensitive.
pub fn lookup_mnemonic(text: &str) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.mnemonic.eq_ignore_ascii_case(text))
}

pub fn lookup_code(code: u8) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.code == code)
}

/// One source line after parsing, or one word after decoding.
/// `regs` follows the operand order of the opcode's table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub op: Opcode,
    pub regs: Vec<Register>,
    pub literal: Option<u16>,
}

impl Instruction {
    pub fn comment() -> Self {
        Self { op: Opcode::Comment, regs: Vec::new(), literal: None }
    }

    pub fn is_comment(&self) -> bool {
        self.op == Opcode::Comment
    }

    /// Operand count, write-role and payload-ownership rules checked by the
    /// parser and the encoder.
    pub fn validate(&self) -> Result<(), EncodeError> {
        let Some(desc) = self.op.desc() else {
            if self.regs.is_empty() && self.literal.is_none() {
                return Ok(());
            }
            return Err(EncodeError::malformed(";", "a comment carries no operands"));
        };
        let mn = desc.mnemonic;
        if self.regs.len() != desc.operands.len() {
            return Err(EncodeError::malformed(
                mn,
                format!(
                    "expected {} register operand(s), found {}",
                    desc.operands.len(),
                    self.regs.len()
                ),
            ));
        }
        for (operand, reg) in desc.operands.iter().zip(&self.regs) {
            if operand.role.is_write() && reg.is_sentinel() {
                return Err(EncodeError::malformed(mn, format!("register {reg} cannot be written")));
            }
        }
        let reads_immediate = self.regs.contains(&Register::Immediate);
        match (desc.payload, self.literal) {
            (Payload::Forbidden, Some(_)) => Err(EncodeError::malformed(mn, "takes no literal")),
            (Payload::Address | Payload::Value, None) => {
                Err(EncodeError::malformed(mn, "missing literal payload"))
            }
            (Payload::Address, Some(_)) if reads_immediate => Err(EncodeError::malformed(
                mn,
                "register F conflicts with the jump address in the payload",
            )),
            (Payload::Value, Some(_)) if reads_immediate => Err(EncodeError::malformed(
                mn,
                "register F conflicts with the loaded value in the payload",
            )),
            (Payload::Immediate, None) if reads_immediate => {
                Err(EncodeError::malformed(mn, "register F needs a literal payload"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_and_in_range() {
        for (i, a) in TABLE.iter().enumerate() {
            assert!((0x1..=0xD).contains(&a.code), "{}", a.mnemonic);
            for b in &TABLE[i + 1..] {
                assert_ne!(a.code, b.code);
                assert_ne!(a.mnemonic, b.mnemonic);
            }
        }
        assert_eq!(TABLE.len(), 13);
        assert_eq!(Opcode::Comment.code(), None);
        assert_eq!(Opcode::Comment.mnemonic(), None);
    }

    #[test]
    fn operands_never_share_a_slot() {
        for d in TABLE {
            let mut seen = Slots::empty();
            for o in d.operands {
                assert!(!seen.contains(o.slot.flag()), "{}", d.mnemonic);
                seen |= o.slot.flag();
            }
            if let Some((slot, _)) = d.fixed {
                assert!(!seen.contains(slot.flag()), "{}", d.mnemonic);
            }
            assert_eq!(d.operands.first().map(|o| o.sep).unwrap_or(Sep::Space), Sep::Space);
        }
    }

    #[test]
    fn used_slots_follow_layout() {
        let jmp = lookup_mnemonic("jmp").unwrap();
        assert_eq!(jmp.used_slots(), Slots::N | Slots::PAYLOAD);
        let res = lookup_mnemonic("RES").unwrap();
        assert_eq!(res.used_slots(), Slots::empty());
        let add = lookup_code(0x4).unwrap();
        assert_eq!(add.used_slots(), Slots::all());
    }

    #[test]
    fn lookup_is_whole_token() {
        assert!(lookup_mnemonic("AD").is_none());
        assert!(lookup_mnemonic("ADDR").is_none());
        assert!(lookup_mnemonic("").is_none());
        assert_eq!(lookup_mnemonic("Ldr").map(|d| d.op), Some(Opcode::LoadFromRam));
    }
}
