//! Whitespace variation.
//!
//! Each gap between two words carries one bit. The gap's *base* is the gap
//! with its leading spaces removed (a plain run of spaces has base `" "`):
//!
//! - bit 0 renders the base as is (`" "`, `"\n"`, `"\t"`)
//! - bit 1 prepends one space (`"  "`, `" \n"`, `" \t"`)
//!
//! A gap reads as 1 exactly when it starts with a space and is longer than
//! one character, so line breaks and indentation survive embedding.

use log::debug;

use super::{ensure_capacity, require_words, Technique, TechniqueEngine};
use crate::error::StegoError;
use crate::text::carrier::Carrier;

/// Whitespace-variation engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceEngine;

/// Renders a gap so that it encodes `bit`.
pub fn render_gap(gap: &str, bit: bool) -> String {
    let base = match gap.trim_start_matches(' ') {
        "" => " ",
        rest => rest,
    };
    if bit {
        format!(" {}", base)
    } else {
        base.to_string()
    }
}

/// Reads the bit a gap encodes.
pub fn gap_bit(gap: &str) -> bool {
    let mut chars = gap.chars();
    chars.next() == Some(' ') && chars.next().is_some()
}

impl TechniqueEngine for WhitespaceEngine {
    fn technique(&self) -> Technique {
        Technique::Whitespace
    }

    fn capacity(&self, carrier: &Carrier) -> Result<usize, StegoError> {
        Ok(carrier.gaps().len())
    }

    fn embed(&self, carrier: &Carrier, bits: &[bool]) -> Result<Carrier, StegoError> {
        require_words(carrier)?;
        let available = self.capacity(carrier)?;
        ensure_capacity(self.technique(), bits.len(), available)?;

        let mut stego = carrier.clone();
        for (i, &bit) in bits.iter().enumerate() {
            let gap = render_gap(&carrier.gaps()[i], bit);
            stego.set_gap(i, gap);
        }

        debug!("whitespace: wrote {} of {} gaps", bits.len(), available);
        Ok(stego)
    }

    fn raw_bits(&self, stego: &Carrier) -> Result<Vec<bool>, StegoError> {
        Ok(stego.gaps().iter().map(|gap| gap_bit(gap)).collect())
    }
}
