//! Capacity model.
//!
//! Capacities come from the engines' own unit scans, so a capacity of at
//! least `framed_len(payload)` bits guarantees that embedding succeeds.

use serde::Serialize;

use crate::error::StegoError;
use crate::frame::{framed_len, LENGTH_PREFIX_BITS};
use crate::stego::{Registry, Technique};
use crate::text::carrier::Carrier;
use crate::text::synonyms::SynonymTable;

/// Capacity of a text for one technique, with the default content-word length.
pub fn capacity(text: &str, technique: Technique, table: &SynonymTable) -> Result<usize, StegoError> {
    let carrier = Carrier::from_text(text);
    Registry::new(table).get(technique).capacity(&carrier)
}

/// Framed bits needed for a payload of `payload_bytes` bytes.
pub fn required_bits(payload_bytes: usize) -> usize {
    framed_len(payload_bytes * 8)
}

/// Largest whole-byte payload that fits in `capacity_bits`.
pub fn max_payload_bytes(capacity_bits: usize) -> usize {
    capacity_bits.saturating_sub(LENGTH_PREFIX_BITS) / 8
}

/// One technique's line in a [`CapacityReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityEntry {
    pub technique: Technique,
    /// Capacity in bits, 0 when the technique could not be evaluated.
    pub bits: usize,
    /// Largest byte payload that fits, framing included.
    pub max_payload_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Capacity of one carrier under every technique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityReport {
    pub words: usize,
    pub entries: Vec<CapacityEntry>,
}

impl CapacityReport {
    /// Capacity for a technique, 0 when it failed.
    pub fn bits(&self, technique: Technique) -> usize {
        self.entry(technique).map(|e| e.bits).unwrap_or(0)
    }

    pub fn entry(&self, technique: Technique) -> Option<&CapacityEntry> {
        self.entries.iter().find(|e| e.technique == technique)
    }

    /// Technique with the most room, ties going to registry order.
    pub fn largest(&self) -> Option<&CapacityEntry> {
        self.entries
            .iter()
            .filter(|e| e.error.is_none())
            .fold(None, |best: Option<&CapacityEntry>, e| match best {
                Some(b) if b.bits >= e.bits => Some(b),
                _ => Some(e),
            })
    }
}

/// Evaluates every technique of the registry on a carrier.
pub fn capacity_report(carrier: &Carrier, registry: &Registry) -> CapacityReport {
    let entries = registry
        .engines()
        .map(|engine| match engine.capacity(carrier) {
            Ok(bits) => CapacityEntry {
                technique: engine.technique(),
                bits,
                max_payload_bytes: max_payload_bytes(bits),
                error: None,
            },
            Err(e) => CapacityEntry {
                technique: engine.technique(),
                bits: 0,
                max_payload_bytes: 0,
                error: Some(e.to_string()),
            },
        })
        .collect();

    CapacityReport {
        words: carrier.word_count(),
        entries,
    }
}
