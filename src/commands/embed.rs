//! Embed command - hide a message or file in a carrier text.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use clap::Args;

use texthide::{embed_with_config, EmbedConfig, Technique};

use super::{is_stdio, read_text, write_output, CommandExecutor, Settings};

/// Hide a message or file in a carrier text.
///
/// Without --technique the analyzer picks the best-suited technique for the
/// carrier and payload size. The stego text is printed to stdout unless
/// --output is given.
#[derive(Args, Debug)]
pub struct EmbedCommand {
    /// Carrier text file (`-` for stdin)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Text message to hide
    #[arg(short, long, conflicts_with_all = ["file", "base64"])]
    pub message: Option<String>,

    /// File whose bytes are hidden
    #[arg(short, long, conflicts_with_all = ["message", "base64"])]
    pub file: Option<PathBuf>,

    /// Payload given as base64
    #[arg(long, conflicts_with_all = ["message", "file"])]
    pub base64: Option<String>,

    /// Technique: whitespace, synonym or word-length
    #[arg(short, long)]
    pub technique: Option<Technique>,

    /// Write the stego text here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for EmbedCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let carrier = read_text(&self.carrier)?;
        let payload = self.payload()?;

        let mut config = EmbedConfig::from_config(&settings.config, &settings.table);
        config.technique = self.technique;

        let embedded = embed_with_config(&carrier, &payload, &config)
            .context("Failed to embed payload")?;

        if self.technique.is_none() {
            eprintln!("Using technique: {}", embedded.technique);
        }
        log::info!("{} of {} bits used", embedded.bits_used, embedded.capacity);

        write_output(self.output.as_ref(), embedded.stego_text.as_bytes())
    }
}

impl EmbedCommand {
    fn payload(&self) -> Result<Vec<u8>> {
        if let Some(message) = &self.message {
            return Ok(message.as_bytes().to_vec());
        }
        if let Some(path) = &self.file {
            return fs::read(path).with_context(|| format!("Failed to read {}", path.display()));
        }
        if let Some(data) = &self.base64 {
            return BASE64
                .decode(data.trim())
                .context("Invalid base64 payload");
        }

        if is_stdio(&self.carrier) {
            bail!("The carrier is read from stdin; pass the payload with --message, --file or --base64");
        }
        eprintln!("Reading message from stdin (Ctrl+D to finish):");
        let mut payload = Vec::new();
        io::stdin()
            .read_to_end(&mut payload)
            .context("Failed to read message from stdin")?;
        Ok(payload)
    }
}
