use std::fmt;

use crate::instructions::{Instruction, Sep};

/// Canonical text: mnemonic, register digits joined per the layout, and the
/// literal as four upper-case digits when present. Comments render empty.
pub fn fmt_instruction(inst: &Instruction) -> String {
    let Some(desc) = inst.op.desc() else {
        return String::new();
    };
    let mut s = String::from(desc.mnemonic);
    for (i, (operand, reg)) in desc.operands.iter().zip(&inst.regs).enumerate() {
        s.push(if i > 0 && operand.sep == Sep::Comma { ',' } else { ' ' });
        s.push(reg.to_char());
    }
    if let Some(lit) = inst.literal {
        s.push_str(&format!(" {lit:04X}"));
    }
    s
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_instruction(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;
    use crate::parser::parse_line;

    #[test]
    fn decoded_words_render_payload() {
        assert_eq!(decode("42D30000").unwrap().to_string(), "ADD D,3 2 0000");
        assert_eq!(decode("A0AB0000").unwrap().to_string(), "WOP A,B 0000");
        assert_eq!(decode("D30F1234").unwrap().to_string(), "LDR 3 F 1234");
    }

    #[test]
    fn forbidden_payload_is_omitted() {
        assert_eq!(decode("9A000000").unwrap().to_string(), "INP A");
        assert_eq!(decode("B0000000").unwrap().to_string(), "RES");
    }

    #[test]
    fn parsed_lines_render_canonically() {
        assert_eq!(parse_line("add d,3 2").unwrap().to_string(), "ADD D,3 2");
        assert_eq!(parse_line("jmp 5").unwrap().to_string(), "JMP 0005");
        assert_eq!(fmt_instruction(&parse_line("; x").unwrap()), "");
    }
}
