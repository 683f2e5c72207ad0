//! Text steganography techniques.
//!
//! Every technique implements [`TechniqueEngine`]: a capacity query, an
//! embedder that writes an already framed bit stream into a carrier, and an
//! extractor that reads it back. All three walk the carrier's units in the
//! same left-to-right order, which is what makes extraction reproduce the
//! embedded bits.
//!
//! - [`whitespace`]: one bit per inter-word gap (single vs. double space)
//! - [`synonym`]: `floor(log2(n))` bits per word from an n-member synonym group
//! - [`word_length`]: one bit per content word, carried by length parity

pub mod synonym;
pub mod whitespace;
pub mod word_length;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StegoError;
use crate::frame::unframe_bits;
use crate::text::carrier::Carrier;
use crate::text::synonyms::SynonymTable;

pub use synonym::SynonymEngine;
pub use whitespace::WhitespaceEngine;
pub use word_length::{WordLengthEngine, DEFAULT_MIN_WORD_LEN};

/// Identifier of an embedding technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Technique {
    Whitespace,
    Synonym,
    WordLength,
}

impl Technique {
    /// All techniques, in registry order.
    pub const ALL: [Technique; 3] = [
        Technique::Whitespace,
        Technique::Synonym,
        Technique::WordLength,
    ];

    /// Stable name used on the command line and in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Technique::Whitespace => "whitespace",
            Technique::Synonym => "synonym",
            Technique::WordLength => "word-length",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unknown technique name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown technique '{0}' (expected whitespace, synonym or word-length)")]
pub struct UnknownTechnique(pub String);

impl FromStr for Technique {
    type Err = UnknownTechnique;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "whitespace" | "ws" => Ok(Technique::Whitespace),
            "synonym" | "synonyms" => Ok(Technique::Synonym),
            "word-length" | "word_length" | "wordlength" | "length" => Ok(Technique::WordLength),
            _ => Err(UnknownTechnique(s.to_string())),
        }
    }
}

/// Shared capability of every technique.
pub trait TechniqueEngine: Send + Sync {
    /// Which technique this engine implements.
    fn technique(&self) -> Technique;

    /// Bits the carrier can hold. Embedding a stream of at most this many
    /// bits never fails for lack of room.
    fn capacity(&self, carrier: &Carrier) -> Result<usize, StegoError>;

    /// Writes a framed bit stream into a copy of the carrier.
    fn embed(&self, carrier: &Carrier, bits: &[bool]) -> Result<Carrier, StegoError>;

    /// Reads one bit per unit, for every unit of the text, in embedding order.
    fn raw_bits(&self, stego: &Carrier) -> Result<Vec<bool>, StegoError>;

    /// Reads the frame back and returns the payload bits it declares.
    fn extract(&self, stego: &Carrier) -> Result<Vec<bool>, StegoError> {
        require_words(stego)?;
        Ok(unframe_bits(self.raw_bits(stego)?)?)
    }
}

/// Rejects texts without a single word.
pub(crate) fn require_words(carrier: &Carrier) -> Result<(), StegoError> {
    if carrier.is_empty() {
        return Err(StegoError::UnsupportedCarrier(
            "text is empty or contains no words".to_string(),
        ));
    }
    Ok(())
}

/// Fails with a capacity error when `required` exceeds `available`.
pub(crate) fn ensure_capacity(
    technique: Technique,
    required: usize,
    available: usize,
) -> Result<(), StegoError> {
    if required > available {
        return Err(StegoError::Capacity {
            technique,
            required,
            available,
        });
    }
    Ok(())
}

/// Maps technique identifiers to engines sharing one synonym table.
#[derive(Debug, Clone)]
pub struct Registry<'a> {
    whitespace: WhitespaceEngine,
    synonym: SynonymEngine<'a>,
    word_length: WordLengthEngine<'a>,
}

impl<'a> Registry<'a> {
    /// Creates a registry with the default content-word length.
    pub fn new(table: &'a SynonymTable) -> Self {
        Self::with_min_word_len(table, DEFAULT_MIN_WORD_LEN)
    }

    /// Creates a registry with a custom minimum content-word length.
    pub fn with_min_word_len(table: &'a SynonymTable, min_word_len: usize) -> Self {
        Self {
            whitespace: WhitespaceEngine,
            synonym: SynonymEngine::new(table),
            word_length: WordLengthEngine::new(table, min_word_len),
        }
    }

    /// Engine for a technique.
    pub fn get(&self, technique: Technique) -> &dyn TechniqueEngine {
        match technique {
            Technique::Whitespace => &self.whitespace,
            Technique::Synonym => &self.synonym,
            Technique::WordLength => &self.word_length,
        }
    }

    /// All engines in [`Technique::ALL`] order.
    pub fn engines(&self) -> impl Iterator<Item = &dyn TechniqueEngine> + '_ {
        Technique::ALL.into_iter().map(move |t| self.get(t))
    }

    /// The synonym table shared by the engines.
    pub fn table(&self) -> &'a SynonymTable {
        self.synonym.table()
    }

    /// Minimum content-word length used by the word-length engine.
    pub fn min_word_len(&self) -> usize {
        self.word_length.min_word_len()
    }
}
