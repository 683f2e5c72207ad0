//! Texthide - hide bytes in plain text
//!
//! A CLI tool for text steganography: whitespace variation, synonym
//! substitution and word-length encoding.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    AnalyzeCommand, CapacityCommand, CommandExecutor, EmbedCommand, ExtractCommand,
    SettingsArgs, SynonymsCommand,
};

/// Texthide - hide bytes in plain text
///
/// Hides a short payload in a text by changing whitespace, word choice or
/// word length, and recovers it bit for bit.
#[derive(Parser)]
#[command(name = "texthide")]
#[command(version)]
#[command(about = "Text steganography with whitespace, synonym and word-length techniques")]
#[command(long_about = None)]
struct Cli {
    /// Show progress information on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message or file in a carrier text
    Embed(EmbedCommand),

    /// Recover a hidden payload from a stego text
    Extract(ExtractCommand),

    /// Show how many bits each technique can hide in a carrier
    Capacity(CapacityCommand),

    /// Rank the techniques for a carrier and payload size
    Analyze(AnalyzeCommand),

    /// List or check the active synonym table
    Synonyms(SynonymsCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.target(env_logger::Target::Stderr).init();

    let settings = cli.settings.load()?;
    match &cli.command {
        Commands::Embed(cmd) => cmd.execute(&settings),
        Commands::Extract(cmd) => cmd.execute(&settings),
        Commands::Capacity(cmd) => cmd.execute(&settings),
        Commands::Analyze(cmd) => cmd.execute(&settings),
        Commands::Synonyms(cmd) => cmd.execute(&settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_settings_accepted_on_either_side_of_subcommand() {
        let before = Cli::try_parse_from([
            "texthide", "--config", "a.toml", "--synonyms", "s.toml", "capacity", "-c", "in.txt",
        ])
        .unwrap();
        let after = Cli::try_parse_from([
            "texthide", "capacity", "-c", "in.txt", "--config", "a.toml", "--synonyms", "s.toml",
        ])
        .unwrap();

        for cli in [before, after] {
            assert_eq!(cli.settings.config, Some(PathBuf::from("a.toml")));
            assert_eq!(cli.settings.synonyms, Some(PathBuf::from("s.toml")));
            assert!(matches!(cli.command, Commands::Capacity(_)));
        }
    }

    #[test]
    fn test_settings_default_to_none() {
        let cli = Cli::try_parse_from(["texthide", "synonyms", "--check"]).unwrap();
        assert_eq!(cli.settings.config, None);
        assert_eq!(cli.settings.synonyms, None);
    }
}
