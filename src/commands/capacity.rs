//! Capacity command - show how much each technique can hide.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use texthide::{capacity_report, Carrier};

use super::{read_text, CommandExecutor, Settings};

/// Show how many bits each technique can hide in a carrier.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Carrier text file (`-` for stdin)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let carrier = Carrier::from_text(&read_text(&self.carrier)?);
        let report = capacity_report(&carrier, &settings.registry());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Carrier: {} words", report.words);
        println!();
        println!("{:<12} {:>8} {:>12}", "TECHNIQUE", "BITS", "MAX BYTES");
        for entry in &report.entries {
            match &entry.error {
                None => println!(
                    "{:<12} {:>8} {:>12}",
                    entry.technique, entry.bits, entry.max_payload_bytes
                ),
                Some(error) => println!("{:<12} {:>8} {:>12}  ({})", entry.technique, "-", "-", error),
            }
        }

        if let Some(largest) = report.largest() {
            println!();
            println!(
                "Largest: {} ({} bytes of payload)",
                largest.technique, largest.max_payload_bytes
            );
        }
        Ok(())
    }
}
