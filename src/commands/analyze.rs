//! Analyze command - rank the techniques for a carrier.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use texthide::analyzer::analyze_carrier;
use texthide::Carrier;

use super::{percent, read_text, CommandExecutor, Settings};

/// Rank the techniques for a carrier and payload size.
///
/// The score combines capacity margin, estimated detectability and how well
/// the carrier hides changes. Techniques that cannot hold the payload are
/// listed after the ones that can.
#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Carrier text file (`-` for stdin)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Payload size in bits
    #[arg(long, conflicts_with = "bytes", required_unless_present = "bytes")]
    pub bits: Option<usize>,

    /// Payload size in bytes
    #[arg(long, conflicts_with = "bits")]
    pub bytes: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CommandExecutor for AnalyzeCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let carrier = Carrier::from_text(&read_text(&self.carrier)?);
        let payload_bits = match (self.bits, self.bytes) {
            (Some(bits), _) => bits,
            (None, Some(bytes)) => bytes * 8,
            (None, None) => 0,
        };

        let report = analyze_carrier(
            &carrier,
            payload_bits,
            &settings.registry(),
            &settings.config.analyzer,
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        let profile = &report.profile;
        println!(
            "Carrier: {} words, {} characters, vocabulary diversity {}",
            profile.word_count,
            profile.char_count,
            percent(profile.vocabulary_diversity)
        );
        println!(
            "Synonym words: {} ({}), irregular gaps: {}",
            profile.synonym_words,
            percent(profile.synonym_density),
            percent(profile.irregular_whitespace_ratio)
        );
        println!(
            "Payload: {} bits ({} with length prefix)",
            report.payload_bits, report.required_bits
        );
        println!();

        for (rank, score) in report.rankings.iter().enumerate() {
            println!(
                "{}. {:<12} score {:.3}  capacity {:>6}  margin {}{}",
                rank + 1,
                score.technique,
                score.score,
                score.capacity,
                percent(score.margin),
                if score.viable { "" } else { "  [insufficient]" }
            );
            for warning in &score.warnings {
                println!("     - {}", warning);
            }
        }

        println!();
        match report.recommended() {
            Some(technique) => println!("Recommended: {}", technique),
            None => println!("No technique can hold this payload; use a longer carrier."),
        }
        println!("{}", report.explanation());
        Ok(())
    }
}
