//! Logisim-style `v2.0 raw` memory images: a fixed header, then one word per line.

use crate::word::Word;

pub const FORMAT_LINE: &str = "v2.0 raw";
pub const HEADER: [&str; 2] = [FORMAT_LINE, "# nibble-asm image"];

pub fn render(words: &[Word], header: bool) -> String {
    let mut out = String::with_capacity((words.len() + HEADER.len()) * 9 + 32);
    if header {
        for line in HEADER {
            out.push_str(line);
            out.push('\n');
        }
    }
    for w in words {
        out.push_str(&w.to_string());
        out.push('\n');
    }
    out
}

/// Yields `(line_number, token)` for every word-like token in an image, skipping
/// the format line, `#` comments and blank lines. Line numbers start at 1.
pub fn words(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().flat_map(|(i, line)| {
        let body = line.split('#').next().unwrap_or("");
        let body = if i == 0 && body.trim() == FORMAT_LINE { "" } else { body };
        body.split_whitespace().map(move |tok| (i + 1, tok))
    })
}
