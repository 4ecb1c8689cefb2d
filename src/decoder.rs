use crate::error::DecodeError;
use crate::instructions::{lookup_code, Instruction, Payload};
use crate::register::Register;
use crate::word::{Word, OPCODE_POS};

/// Parses and decodes an eight-digit word.
pub fn decode(text: &str) -> Result<Instruction, DecodeError> {
    decode_raw(text.parse()?)
}

/// Inverse of [`crate::encoder::encode`]. Nibbles the opcode's layout does not
/// read are ignored, so the result renders the canonical form of the word. A
/// register slot the layout reads must not be `0`.
pub fn decode_raw(word: Word) -> Result<Instruction, DecodeError> {
    let code = word.nibble(OPCODE_POS);
    let desc = lookup_code(code).ok_or_else(|| DecodeError::UnknownOpcode {
        word: word.to_string(),
        nibble: code,
    })?;
    let used = word.masked(desc.used_slots());

    let regs = desc
        .operands
        .iter()
        .map(|operand| {
            Register::from_nibble(used.nibble(operand.slot.pos())).ok_or_else(|| {
                DecodeError::MalformedWord {
                    word: word.to_string(),
                    reason: format!("{} register slot of {} is empty", operand.slot, desc.mnemonic),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let literal = match desc.payload {
        Payload::Forbidden => None,
        _ => Some(used.payload()),
    };
    Ok(Instruction { op: desc.op, regs, literal })
}
