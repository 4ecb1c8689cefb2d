use crate::error::EncodeError;
use crate::instructions::{lookup_mnemonic, InstrDesc, Instruction, Sep};
use crate::register::Register;
use crate::source;

pub const LITERAL_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    /// Joined to the previous token by a comma rather than whitespace.
    comma: bool,
}

fn tokenize(rest: &str) -> Vec<Token<'_>> {
    rest.split_whitespace()
        .flat_map(|group| {
            group
                .split(',')
                .enumerate()
                .map(|(i, text)| Token { text, comma: i > 0 })
        })
        .collect()
}

/// Parses one cleaned line. Shape (token count, commas) is checked first, then
/// token contents, then the payload and sentinel rules of the opcode.
pub fn parse_line(line: &str) -> Result<Instruction, EncodeError> {
    let line = line.trim();
    if line.is_empty() || source::is_comment(line) {
        return Ok(Instruction::comment());
    }
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let desc = lookup_mnemonic(head).ok_or_else(|| EncodeError::UnknownMnemonic {
        mnemonic: head.to_string(),
    })?;

    let tokens = tokenize(rest);
    check_shape(desc, &tokens)?;

    let n = desc.operands.len();
    let regs = tokens[..n]
        .iter()
        .map(|t| parse_register(desc, t.text))
        .collect::<Result<Vec<_>, _>>()?;
    let literal = tokens.get(n).map(|t| parse_literal(t.text)).transpose()?;

    let inst = Instruction { op: desc.op, regs, literal };
    inst.validate()?;
    Ok(inst)
}

fn check_shape(desc: &InstrDesc, tokens: &[Token<'_>]) -> Result<(), EncodeError> {
    let mn = desc.mnemonic;
    let n = desc.operands.len();
    let (min, max) = desc.payload.arity(n);
    if tokens.len() < min || tokens.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{min} or {max}")
        };
        return Err(EncodeError::malformed(
            mn,
            format!("expected {expected} operand(s), found {}", tokens.len()),
        ));
    }
    if tokens.iter().any(|t| t.text.is_empty()) {
        return Err(EncodeError::malformed(mn, "empty operand"));
    }
    for (i, tok) in tokens.iter().enumerate() {
        let want_comma = desc.operands.get(i).map_or(false, |o| o.sep == Sep::Comma);
        match (want_comma, tok.comma) {
            (true, false) => {
                return Err(EncodeError::malformed(mn, format!("expected ',' before `{}`", tok.text)))
            }
            (false, true) => {
                return Err(EncodeError::malformed(mn, format!("unexpected ',' before `{}`", tok.text)))
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_register(desc: &InstrDesc, text: &str) -> Result<Register, EncodeError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Register::from_char(c).ok_or_else(|| EncodeError::InvalidRegister {
            token: text.to_string(),
        }),
        _ => Err(EncodeError::malformed(
            desc.mnemonic,
            format!("register operand `{text}` must be a single digit"),
        )),
    }
}

/// 1 to 4 hex digits, zero-padded on the left.
pub fn parse_literal(text: &str) -> Result<u16, EncodeError> {
    let invalid = || EncodeError::InvalidLiteral { token: text.to_string() };
    if text.is_empty() || text.len() > LITERAL_DIGITS || !text.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u16::from_str_radix(text, 16).map_err(|_| invalid())
}
