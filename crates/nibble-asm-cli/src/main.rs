use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use nibble_asm::image;

mod config;
mod pipeline;
use config::Config;
use pipeline::{LineFailure, Report};

const DEFAULT_INPUT: &str = "input.txt";
const DEFAULT_IMAGE: &str = "output.bin";
const DEFAULT_LISTING: &str = "output.asm";

#[derive(Parser, Debug)]
#[command(author, version, about = "Nibble machine assembler and disassembler", long_about = None)]
struct Cli {
    /// JSON file with pipeline settings (continue_on_error, header, jobs)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Log a summary of each pass
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Log every line
    #[arg(short, long, global = true)]
    debug: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble source lines into a `v2.0 raw` word image
    Assemble {
        #[command(flatten)]
        io: IoArgs,
        /// Leave out the two-line image header
        #[arg(long)]
        no_header: bool,
    },
    /// Disassemble a word image back into assembly
    Disassemble {
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// Output file (default: output.bin / output.asm in the working directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Diagnostics format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Stop at the first failing line
    #[arg(long)]
    fail_fast: bool,
    /// Worker threads
    #[arg(long)]
    jobs: Option<usize>,
}

impl IoArgs {
    fn apply(&self, cfg: &mut Config) {
        if self.fail_fast {
            cfg.continue_on_error = false;
        }
        if self.jobs.is_some() {
            cfg.jobs = self.jobs;
        }
    }

    fn read_input(&self) -> Result<String> {
        std::fs::read_to_string(&self.input)
            .with_context(|| format!("reading {}", self.input.display()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat { Text, Json }

#[derive(Debug, Serialize)]
struct JsonReport<'a, T> {
    input: String,
    output: Option<String>,
    #[serde(flatten)]
    report: &'a Report<T>,
}

fn init_tracing(cli: &Cli) {
    let level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.cmd {
        Command::Assemble { io, no_header } => {
            io.apply(&mut cfg);
            if no_header {
                cfg.header = false;
            }
            let source = io.read_input()?;
            let report = pipeline::assemble(&source, &cfg)?;
            let out = io.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE));
            finish(&io, &out, &report, || image::render(&report.output, cfg.header))
        }
        Command::Disassemble { io } => {
            io.apply(&mut cfg);
            let text = io.read_input()?;
            let report = pipeline::disassemble(&text, &cfg)?;
            let out = io.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_LISTING));
            finish(&io, &out, &report, || {
                report.output.iter().map(|l| format!("{}\n", l.text)).collect()
            })
        }
    }
}

/// Writes the output only when every line succeeded, then prints diagnostics.
fn finish<T: Serialize>(
    io: &IoArgs,
    out: &Path,
    report: &Report<T>,
    render: impl FnOnce() -> String,
) -> Result<ExitCode> {
    let written = if report.is_ok() {
        std::fs::write(out, render()).with_context(|| format!("writing {}", out.display()))?;
        info!(path = %out.display(), "output written");
        true
    } else {
        false
    };

    match io.format {
        OutputFormat::Text => {
            for f in &report.failures {
                eprintln!("{}", fmt_failure(&io.input, f));
            }
            if written {
                println!("{} line(s) -> {} item(s) written to {}", report.lines, report.output.len(), out.display());
            } else {
                eprintln!("{} line(s) failed; {} not written", report.failures.len(), out.display());
            }
        }
        OutputFormat::Json => {
            let json = JsonReport {
                input: io.input.display().to_string(),
                output: written.then(|| out.display().to_string()),
                report,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(if written { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn fmt_failure(input: &Path, f: &LineFailure) -> String {
    format!("error: {}:{}: {} (in `{}`)", input.display(), f.line, f.message, f.text)
}
