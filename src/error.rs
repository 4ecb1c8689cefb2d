use serde::Serialize;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { mnemonic: String },
    #[error("malformed operands for {mnemonic}: {reason}")]
    MalformedOperands { mnemonic: &'static str, reason: String },
    #[error("invalid register `{token}` (expected 1-9 or A-F)")]
    InvalidRegister { token: String },
    #[error("invalid literal `{token}` (expected 1 to 4 hex digits)")]
    InvalidLiteral { token: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed word `{word}`: {reason}")]
    MalformedWord { word: String, reason: String },
    #[error("unknown opcode `{nibble:X}` in word `{word}`")]
    UnknownOpcode { word: String, nibble: u8 },
}

/// Flat tag for reports; one per error variant on either side of the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnknownMnemonic,
    MalformedOperands,
    InvalidRegister,
    InvalidLiteral,
    MalformedWord,
    UnknownOpcode,
}

impl EncodeError {
    pub(crate) fn malformed(mnemonic: &'static str, reason: impl Into<String>) -> Self {
        EncodeError::MalformedOperands { mnemonic, reason: reason.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::UnknownMnemonic { .. } => ErrorKind::UnknownMnemonic,
            EncodeError::MalformedOperands { .. } => ErrorKind::MalformedOperands,
            EncodeError::InvalidRegister { .. } => ErrorKind::InvalidRegister,
            EncodeError::InvalidLiteral { .. } => ErrorKind::InvalidLiteral,
        }
    }
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::MalformedWord { .. } => ErrorKind::MalformedWord,
            DecodeError::UnknownOpcode { .. } => ErrorKind::UnknownOpcode,
        }
    }
}
