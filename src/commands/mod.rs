//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.
//! This provides clean separation of concerns and makes adding new commands easy.

mod analyze;
mod capacity;
mod embed;
mod extract;
mod synonyms;

pub use analyze::AnalyzeCommand;
pub use capacity::CapacityCommand;
pub use embed::EmbedCommand;
pub use extract::ExtractCommand;
pub use synonyms::SynonymsCommand;

use std::borrow::Cow;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use texthide::{Registry, SynonymTable, TexthideConfig};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, settings: &Settings) -> Result<()>;
}

/// Options shared by every command, accepted before or after the subcommand.
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Configuration file [default: ~/.texthide/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Synonym table (TOML), replaces the one set in the configuration
    #[arg(long, global = true)]
    pub synonyms: Option<PathBuf>,
}

/// Loaded configuration and synonym table.
pub struct Settings {
    pub config: TexthideConfig,
    pub table: Cow<'static, SynonymTable>,
}

impl SettingsArgs {
    pub fn load(&self) -> Result<Settings> {
        let mut config = match &self.config {
            Some(path) => TexthideConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => TexthideConfig::load().context("Failed to load ~/.texthide/config.toml")?,
        };

        if let Some(path) = &self.synonyms {
            config.synonyms = Some(path.clone());
        }

        let table = config
            .synonym_table()
            .context("Failed to load synonym table")?;
        Ok(Settings { config, table })
    }
}

impl Settings {
    pub fn registry(&self) -> Registry<'_> {
        Registry::with_min_word_len(&self.table, self.config.min_word_len)
    }
}

/// Returns true if the path means stdin/stdout.
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Reads a text file, or stdin for `-`.
pub fn read_text(path: &Path) -> Result<String> {
    if is_stdio(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Writes bytes to a file, or stdout when no path is given.
pub fn write_output(path: Option<&PathBuf>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Renders a share as a percentage.
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
