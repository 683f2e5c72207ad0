//! Extract command - recover a hidden payload from a stego text.

use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use clap::Args;

use texthide::{extract_with_config, ExtractConfig, Technique};

use super::{read_text, write_output, CommandExecutor, Settings};

/// Recover a hidden payload from a stego text.
///
/// Without --technique every technique is tried and the most plausible
/// payload is returned.
///
/// Use -o/--output to write raw bytes to a file (required for binary data).
/// Without -o, output is printed as text (lossy UTF-8 conversion).
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Stego text file (`-` for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Technique: whitespace, synonym or word-length
    #[arg(short, long)]
    pub technique: Option<Technique>,

    /// Output file for the payload bytes
    #[arg(short, long, conflicts_with = "base64")]
    pub output: Option<PathBuf>,

    /// Print the payload as base64
    #[arg(long)]
    pub base64: bool,
}

impl CommandExecutor for ExtractCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let stego = read_text(&self.input)?;

        let config = ExtractConfig {
            technique: self.technique,
            table: &*settings.table,
            min_word_len: settings.config.min_word_len,
        };
        let detected = extract_with_config(&stego, &config).context("Failed to extract payload")?;

        if self.technique.is_none() {
            eprintln!("Detected technique: {}", detected.technique);
        }

        if self.output.is_some() {
            write_output(self.output.as_ref(), &detected.payload)
        } else if self.base64 {
            println!("{}", BASE64.encode(&detected.payload));
            Ok(())
        } else {
            println!("{}", detected.message());
            Ok(())
        }
    }
}
