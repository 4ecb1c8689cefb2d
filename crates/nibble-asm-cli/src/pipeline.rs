use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use nibble_asm::decoder::decode_raw;
use nibble_asm::source::clean_line;
use nibble_asm::{encode_line, image, ErrorKind, Word};

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFailure {
    pub line: usize,
    pub text: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// One decoded word and where it came from in the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub line: usize,
    pub word: Word,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    pub lines: usize,
    pub output: Vec<T>,
    pub failures: Vec<LineFailure>,
}

impl<T> Report<T> {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

type Outcome<T> = std::result::Result<Option<T>, (ErrorKind, String)>;

pub fn assemble(source: &str, cfg: &Config) -> Result<Report<Word>> {
    let items: Vec<(usize, &str)> = source.lines().enumerate().map(|(i, l)| (i + 1, l)).collect();
    run(&items, cfg, |_, raw| {
        encode_line(&clean_line(raw)).map_err(|e| (e.kind(), e.to_string()))
    })
}

pub fn disassemble(text: &str, cfg: &Config) -> Result<Report<Listing>> {
    let items: Vec<(usize, &str)> = image::words(text).collect();
    run(&items, cfg, |line, tok| {
        let decoded = tok.parse::<Word>().and_then(|w| decode_raw(w).map(|inst| (w, inst)));
        match decoded {
            Ok((word, inst)) => Ok(Some(Listing { line, word, text: inst.to_string() })),
            Err(e) => Err((e.kind(), e.to_string())),
        }
    })
}

/// Codes every item on the pool, then walks the results in input order.
fn run<T, F>(items: &[(usize, &str)], cfg: &Config, code: F) -> Result<Report<T>>
where
    T: Send,
    F: Fn(usize, &str) -> Outcome<T> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.jobs.unwrap_or(0))
        .build()?;
    let results: Vec<Outcome<T>> =
        pool.install(|| items.par_iter().map(|&(line, text)| code(line, text)).collect());

    let mut report = Report { lines: items.len(), output: Vec::new(), failures: Vec::new() };
    for (&(line, text), result) in items.iter().zip(results) {
        match result {
            Ok(Some(v)) => {
                debug!(line, text, "coded");
                report.output.push(v);
            }
            Ok(None) => debug!(line, "comment"),
            Err((kind, message)) => {
                debug!(line, ?kind, %message, "failed");
                report.failures.push(LineFailure { line, text: text.trim().to_string(), kind, message });
                if !cfg.continue_on_error {
                    break;
                }
            }
        }
    }
    info!(
        lines = report.lines,
        emitted = report.output.len(),
        failed = report.failures.len(),
        "pass complete"
    );
    Ok(report)
}
