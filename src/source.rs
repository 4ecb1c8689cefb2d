//! Line cleaning ahead of the parser.
//!
//! Source files mark comments with `;`, `//` or `#`; everything from the first
//! marker to the end of the line is dropped. The language has no string
//! literals, so a marker is never quoted.

pub const COMMENT_MARKERS: [&str; 3] = [";", "//", "#"];

pub fn is_comment(line: &str) -> bool {
    let line = line.trim_start();
    COMMENT_MARKERS.iter().any(|m| line.starts_with(m))
}

/// Strips the comment, collapses whitespace runs to one space and trims both
/// ends. Spaces around a comma are dropped only when an operand stands to its
/// left, so a comma right after the mnemonic still reaches the parser.
pub fn clean_line(raw: &str) -> String {
    let end = COMMENT_MARKERS
        .iter()
        .filter_map(|m| raw.find(m))
        .min()
        .unwrap_or(raw.len());
    let code = raw[..end].replace(',', " , ");
    let tokens: Vec<&str> = code.split_whitespace().collect();
    let mut out = String::with_capacity(code.len());
    for (i, tok) in tokens.iter().enumerate() {
        let joins_left = i >= 2 && *tok == ",";
        let follows_comma = i > 0 && tokens[i - 1] == ",";
        if i > 0 && !joins_left && !follows_comma {
            out.push(' ');
        }
        out.push_str(tok);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_each_marker() {
        assert_eq!(clean_line("JMP 1234 ; loop"), "JMP 1234");
        assert_eq!(clean_line("JMP 1234 // loop"), "JMP 1234");
        assert_eq!(clean_line("JMP 1234# loop"), "JMP 1234");
        assert_eq!(clean_line("; only a comment"), "");
    }

    #[test]
    fn normalises_whitespace() {
        assert_eq!(clean_line("  ADD   D ,  3\t2  "), "ADD D,3 2");
        assert_eq!(clean_line("\t\t"), "");
    }

    #[test]
    fn comma_after_mnemonic_stays_apart() {
        assert_eq!(clean_line("JMP ,1234"), "JMP ,1234");
        assert_eq!(clean_line("JMP , 1234"), "JMP ,1234");
        assert_eq!(clean_line("WOP A , B"), "WOP A,B");
        assert_eq!(clean_line("ADD D,,3 2"), "ADD D,,3 2");
    }

    #[test]
    fn comment_detection() {
        assert!(is_comment("# x"));
        assert!(is_comment("  // x"));
        assert!(!is_comment("RES"));
        assert!(!is_comment("/ x"));
    }
}
