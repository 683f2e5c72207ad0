//! Embedding front end.
//!
//! Frames the payload, picks a technique (explicitly or through the
//! analyzer) and writes the frame into the carrier.

use log::{debug, info};

use crate::analyzer::{analyze_carrier, AnalyzerWeights};
use crate::config::TexthideConfig;
use crate::error::StegoError;
use crate::frame::{encode as frame_payload, frame_bits};
use crate::stego::{Registry, Technique, DEFAULT_MIN_WORD_LEN};
use crate::text::carrier::Carrier;
use crate::text::synonyms::SynonymTable;

/// Result of embedding a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedText {
    /// The carrier with the payload hidden in it.
    pub stego_text: String,
    /// Technique that was used.
    pub technique: Technique,
    /// Framed bits written, length prefix included.
    pub bits_used: usize,
    /// Capacity of the carrier for that technique.
    pub capacity: usize,
}

/// Configuration for the embedder.
#[derive(Debug, Clone)]
pub struct EmbedConfig<'a> {
    /// Technique to use; `None` lets the analyzer choose.
    pub technique: Option<Technique>,
    pub table: &'a SynonymTable,
    pub min_word_len: usize,
    pub weights: AnalyzerWeights,
}

impl<'a> EmbedConfig<'a> {
    /// Automatic technique choice with default settings.
    pub fn new(table: &'a SynonymTable) -> Self {
        Self {
            technique: None,
            table,
            min_word_len: DEFAULT_MIN_WORD_LEN,
            weights: AnalyzerWeights::default(),
        }
    }

    /// Settings taken from a loaded configuration.
    pub fn from_config(config: &TexthideConfig, table: &'a SynonymTable) -> Self {
        Self {
            technique: None,
            table,
            min_word_len: config.min_word_len,
            weights: config.analyzer.clone(),
        }
    }

    pub fn with_technique(mut self, technique: Technique) -> Self {
        self.technique = Some(technique);
        self
    }
}

/// Hides `payload` in `carrier` with the given technique.
///
/// # Errors
/// `Capacity` when the framed payload does not fit, `Ambiguity` when the
/// text contains a contested synonym, `UnsupportedCarrier` for empty text.
pub fn embed(
    carrier: &str,
    payload: &[u8],
    technique: Technique,
    table: &SynonymTable,
) -> Result<String, StegoError> {
    let config = EmbedConfig::new(table).with_technique(technique);
    Ok(embed_with_config(carrier, payload, &config)?.stego_text)
}

/// Hides an arbitrary bit sequence.
pub fn embed_bits(
    carrier: &str,
    bits: &[bool],
    technique: Technique,
    table: &SynonymTable,
) -> Result<String, StegoError> {
    let carrier = Carrier::from_text(carrier);
    let registry = Registry::new(table);
    let framed = frame_bits(bits)?;
    let stego = registry.get(technique).embed(&carrier, &framed)?;
    Ok(stego.render())
}

/// Hides `payload` using the settings in `config`.
pub fn embed_with_config(
    carrier: &str,
    payload: &[u8],
    config: &EmbedConfig,
) -> Result<EmbeddedText, StegoError> {
    let carrier = Carrier::from_text(carrier);
    let registry = Registry::with_min_word_len(config.table, config.min_word_len);
    let framed = frame_payload(payload)?;

    let technique = match config.technique {
        Some(technique) => technique,
        None => {
            let report = analyze_carrier(&carrier, payload.len() * 8, &registry, &config.weights);
            let chosen = report
                .best()
                .map(|s| s.technique)
                .unwrap_or(Technique::Whitespace);
            debug!(
                "analyzer picked {} (score {:.3})",
                chosen,
                report.best().map(|s| s.score).unwrap_or(0.0)
            );
            chosen
        }
    };

    let engine = registry.get(technique);
    let capacity = engine.capacity(&carrier)?;
    let stego = engine.embed(&carrier, &framed)?;

    info!(
        "embedded {} bytes with {} ({} of {} bits)",
        payload.len(),
        technique,
        framed.len(),
        capacity
    );

    Ok(EmbeddedText {
        stego_text: stego.render(),
        technique,
        bits_used: framed.len(),
        capacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::synonyms::default_table;

    const FOX: &str = "The quick brown fox jumps over the lazy dog";

    #[test]
    fn test_embed_whitespace_too_small() {
        let err = embed(FOX, &[0x05], Technique::Whitespace, default_table()).unwrap_err();
        assert_eq!(err.shortfall(), Some(32));
    }

    #[test]
    fn test_auto_choice_is_viable() {
        let carrier = "The quick brown fox jumps over the lazy dog. ".repeat(10);
        let config = EmbedConfig::new(default_table());
        let result = embed_with_config(&carrier, b"hi", &config).unwrap();

        assert_eq!(result.bits_used, 48);
        assert!(result.capacity >= 48);
        assert_ne!(result.stego_text, carrier);
    }

    #[test]
    fn test_auto_choice_reports_shortfall() {
        let config = EmbedConfig::new(default_table());
        let err = embed_with_config(FOX, b"x", &config).unwrap_err();
        // Synonym has the most room on this carrier.
        assert_eq!(
            err,
            StegoError::Capacity {
                technique: Technique::Synonym,
                required: 40,
                available: 11
            }
        );
    }

    #[test]
    fn test_embed_bits_frames_raw_bits() {
        let carrier = "alpha beta gamma delta ".repeat(10);
        let stego = embed_bits(&carrier, &[true, false, true], Technique::Whitespace, default_table())
            .unwrap();
        // Length prefix 3 (two set bits) plus the two set payload bits.
        assert_eq!(stego.matches("  ").count(), 4);
    }

    #[test]
    fn test_empty_carrier_rejected() {
        assert!(matches!(
            embed("   ", b"", Technique::Synonym, default_table()),
            Err(StegoError::UnsupportedCarrier(_))
        ));
    }
}
