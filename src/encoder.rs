use crate::error::EncodeError;
use crate::instructions::Instruction;
use crate::word::{Word, OPCODE_POS};

/// Packs an instruction into its word. Comments produce no word.
pub fn encode(inst: &Instruction) -> Result<Option<Word>, EncodeError> {
    inst.validate()?;
    let Some(desc) = inst.op.desc() else {
        return Ok(None);
    };
    let mut nibbles = [0u8; 4];
    nibbles[OPCODE_POS] = desc.code;
    if let Some((slot, value)) = desc.fixed {
        nibbles[slot.pos()] = value;
    }
    for (operand, reg) in desc.operands.iter().zip(&inst.regs) {
        nibbles[operand.slot.pos()] = reg.nibble();
    }
    Ok(Some(Word::pack(nibbles, inst.literal.unwrap_or(0))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::Opcode;
    use crate::register::Register;

    #[test]
    fn comment_has_no_word() {
        assert_eq!(encode(&Instruction::comment()).unwrap(), None);
    }

    #[test]
    fn jump_if_negative_keeps_n_nibble() {
        let inst = Instruction {
            op: Opcode::JumpIfNegative,
            regs: vec![Register::Numbered(1), Register::Random],
            literal: Some(0x00F0),
        };
        assert_eq!(encode(&inst).unwrap().unwrap().to_string(), "3F1E00F0");
    }

    #[test]
    fn hand_built_instruction_is_validated() {
        let inst = Instruction { op: Opcode::ResetScreen, regs: vec![Register::Numbered(1)], literal: None };
        assert!(matches!(encode(&inst), Err(EncodeError::MalformedOperands { .. })));
    }
}
