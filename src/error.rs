//! Error type shared by every technique.

use thiserror::Error;

use crate::frame::FramingError;
use crate::stego::Technique;
use crate::text::synonyms::ContestedWord;

/// Errors surfaced by embedding, extraction and capacity queries.
///
/// Each variant is a distinct failure kind so callers can decide what to do
/// (try another technique, report corruption, fix the synonym table).
/// Embedding is all-or-nothing: on error no stego text is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The framed payload needs more bits than the carrier offers.
    #[error("{technique} needs {required} bits but the carrier holds only {available}")]
    Capacity {
        technique: Technique,
        required: usize,
        available: usize,
    },

    /// The extracted stream does not hold a consistent frame.
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    /// A word belongs to two synonym groups of equal priority.
    #[error("Word '{word}' at position {position} is claimed by synonym groups '{first}' and '{second}' with equal priority")]
    Ambiguity {
        word: String,
        /// Index of the word in the text, counting from zero.
        position: usize,
        first: String,
        second: String,
    },

    /// The carrier has no words to work with.
    #[error("Unsupported carrier: {0}")]
    UnsupportedCarrier(String),
}

impl StegoError {
    /// Builds an ambiguity error for a contested word found at `position`.
    pub fn ambiguity(contested: ContestedWord, position: usize) -> Self {
        StegoError::Ambiguity {
            word: contested.word,
            position,
            first: contested.first,
            second: contested.second,
        }
    }

    /// Missing bits for capacity errors.
    pub fn shortfall(&self) -> Option<usize> {
        match self {
            StegoError::Capacity {
                required,
                available,
                ..
            } => Some(required.saturating_sub(*available)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = StegoError::Capacity {
            technique: Technique::Whitespace,
            required: 40,
            available: 8,
        };
        assert_eq!(
            err.to_string(),
            "whitespace needs 40 bits but the carrier holds only 8"
        );
        assert_eq!(err.shortfall(), Some(32));
    }

    #[test]
    fn test_framing_conversion() {
        let err: StegoError = FramingError::TruncatedPrefix { available: 3 }.into();
        assert!(matches!(err, StegoError::Framing(_)));
        assert_eq!(err.shortfall(), None);
    }
}
