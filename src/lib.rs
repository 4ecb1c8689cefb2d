pub mod decoder;
pub mod disasm;
pub mod encoder;
pub mod error;
pub mod image;
pub mod instructions;
pub mod parser;
pub mod register;
pub mod source;
pub mod word;

pub use error::{DecodeError, EncodeError, ErrorKind};
pub use instructions::{Instruction, Opcode};
pub use register::Register;
pub use word::Word;

/// Encodes one cleaned source line. `None` for blank and comment lines.
pub fn encode_line(text: &str) -> Result<Option<Word>, EncodeError> {
    let inst = parser::parse_line(text)?;
    encoder::encode(&inst)
}

/// Decodes one word into canonical assembly text.
pub fn decode_word(text: &str) -> Result<String, DecodeError> {
    decoder::decode(text).map(|inst| inst.to_string())
}
