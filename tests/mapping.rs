use nibble_asm::instructions::{lookup_code, lookup_mnemonic, Payload, TABLE};
use nibble_asm::{Opcode, Register};

#[test]
fn mnemonic_and_code_agree() {
    for d in TABLE {
        let by_name = lookup_mnemonic(d.mnemonic).unwrap();
        let by_code = lookup_code(d.code).unwrap();
        assert_eq!(by_name.op, d.op);
        assert_eq!(by_code.op, d.op);
        assert_eq!(d.op.code(), Some(d.code));
        assert_eq!(d.op.mnemonic(), Some(d.mnemonic));
    }
}

#[test]
fn opcode_codes() {
    let expect = [
        (Opcode::Jump, 0x1),
        (Opcode::JumpIfZero, 0x2),
        (Opcode::JumpIfNegative, 0x3),
        (Opcode::Add, 0x4),
        (Opcode::Subtract, 0x5),
        (Opcode::Multiply, 0x6),
        (Opcode::Divide, 0x7),
        (Opcode::WriteToRam, 0x8),
        (Opcode::Input, 0x9),
        (Opcode::WritePixel, 0xA),
        (Opcode::ResetScreen, 0xB),
        (Opcode::LoadImmediate, 0xC),
        (Opcode::LoadFromRam, 0xD),
    ];
    for (op, code) in expect {
        assert_eq!(op.code(), Some(code), "{op:?}");
    }
    assert_eq!(Opcode::Comment.code(), None);
    assert!(lookup_code(0x0).is_none());
    assert!(lookup_code(0xE).is_none());
    assert!(lookup_code(0xF).is_none());
}

#[test]
fn case_insensitive_lookup() {
    for name in ["add", "ADD", "Add", "aDD"] {
        assert_eq!(lookup_mnemonic(name).map(|d| d.op), Some(Opcode::Add), "{name}");
    }
    assert_eq!(lookup_mnemonic("mul").map(|d| d.op), Some(Opcode::Multiply));
}

#[test]
fn payload_owners() {
    let payload = |m: &str| lookup_mnemonic(m).unwrap().payload;
    assert_eq!(payload("JMP"), Payload::Address);
    assert_eq!(payload("LDI"), Payload::Value);
    assert_eq!(payload("RES"), Payload::Forbidden);
    assert_eq!(payload("INP"), Payload::Forbidden);
    assert_eq!(payload("WOP"), Payload::Immediate);
}

#[test]
fn register_digits() {
    let all: Vec<_> = "123456789ABCDEF".chars().map(|c| Register::from_char(c).unwrap()).collect();
    assert_eq!(all[0], Register::Numbered(1));
    assert_eq!(all[12], Register::Numbered(13));
    assert_eq!(all[13], Register::Random);
    assert_eq!(all[14], Register::Immediate);
    let back: String = all.iter().map(|r| r.to_char()).collect();
    assert_eq!(back, "123456789ABCDEF");
}
