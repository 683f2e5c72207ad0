//! Synonyms command - inspect the active synonym table.

use anyhow::{bail, Result};
use clap::Args;

use super::{CommandExecutor, Settings};

/// List or check the active synonym table.
///
/// With --check, fails if any word is claimed by two groups of equal
/// priority (such words cannot be used by any technique).
#[derive(Args, Debug)]
pub struct SynonymsCommand {
    /// Only validate the table
    #[arg(long)]
    pub check: bool,
}

impl CommandExecutor for SynonymsCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let table = &settings.table;
        let contested = table.contested_words();

        if !self.check {
            for group in table.groups() {
                println!(
                    "{:<14} {}/{} words  {} bits/word  priority {:>3}  {}",
                    group.name(),
                    group.len(),
                    group.declared_len(),
                    group.bits_per_word(),
                    group.priority(),
                    group.members().join(", ")
                );
            }
            println!();
        }

        println!(
            "{} groups, {} words, {} contested",
            table.groups().len(),
            table.word_count(),
            contested.len()
        );

        if !contested.is_empty() {
            for word in &contested {
                eprintln!("contested: {}", word);
            }
            if self.check {
                bail!("{} words are claimed by groups of equal priority", contested.len());
            }
        }
        Ok(())
    }
}
