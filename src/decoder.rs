//! Extraction front end.

use log::{debug, info};

use crate::error::StegoError;
use crate::frame::decode as unframe_payload;
use crate::stego::{require_words, Registry, Technique, DEFAULT_MIN_WORD_LEN};
use crate::text::carrier::Carrier;
use crate::text::synonyms::SynonymTable;

/// A payload together with the technique it was found with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedPayload {
    pub technique: Technique,
    pub payload: Vec<u8>,
}

impl DetectedPayload {
    /// The payload as text, with invalid UTF-8 replaced.
    pub fn message(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Configuration for the extractor.
#[derive(Debug, Clone)]
pub struct ExtractConfig<'a> {
    /// Technique to read with; `None` tries all of them.
    pub technique: Option<Technique>,
    pub table: &'a SynonymTable,
    pub min_word_len: usize,
}

impl<'a> ExtractConfig<'a> {
    pub fn new(table: &'a SynonymTable) -> Self {
        Self {
            technique: None,
            table,
            min_word_len: DEFAULT_MIN_WORD_LEN,
        }
    }

    pub fn with_technique(mut self, technique: Technique) -> Self {
        self.technique = Some(technique);
        self
    }

    pub fn with_min_word_len(mut self, min_word_len: usize) -> Self {
        self.min_word_len = min_word_len;
        self
    }
}

/// Recovers a byte payload embedded with `technique`.
///
/// # Errors
/// `Framing` when the text holds no complete frame (not stego text, wrong
/// technique or a modified text), `Ambiguity` for contested synonyms and
/// `UnsupportedCarrier` for text without words.
pub fn extract(stego: &str, technique: Technique, table: &SynonymTable) -> Result<Vec<u8>, StegoError> {
    let config = ExtractConfig::new(table).with_technique(technique);
    Ok(extract_with_config(stego, &config)?.payload)
}

/// Recovers a bit payload embedded with `technique`.
pub fn extract_bits(
    stego: &str,
    technique: Technique,
    table: &SynonymTable,
) -> Result<Vec<bool>, StegoError> {
    let registry = Registry::new(table);
    registry.get(technique).extract(&Carrier::from_text(stego))
}

/// Recovers a payload and decodes it as (lossy) UTF-8 text.
pub fn extract_message(
    stego: &str,
    technique: Technique,
    table: &SynonymTable,
) -> Result<String, StegoError> {
    let bytes = extract(stego, technique, table)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn extract_carrier(
    carrier: &Carrier,
    technique: Technique,
    registry: &Registry,
) -> Result<Vec<u8>, StegoError> {
    require_words(carrier)?;
    Ok(unframe_payload(registry.get(technique).raw_bits(carrier)?)?)
}

/// Recovers a payload using the settings in `config`.
pub fn extract_with_config(stego: &str, config: &ExtractConfig) -> Result<DetectedPayload, StegoError> {
    let registry = Registry::with_min_word_len(config.table, config.min_word_len);
    match config.technique {
        Some(technique) => {
            let carrier = Carrier::from_text(stego);
            let payload = extract_carrier(&carrier, technique, &registry)?;
            info!("extracted {} bytes with {}", payload.len(), technique);
            Ok(DetectedPayload { technique, payload })
        }
        None => extract_auto(stego, &registry),
    }
}

/// Tries every technique and returns the most plausible payload.
///
/// Plain text decodes as an empty whitespace frame, so a non-empty UTF-8
/// payload wins over any other non-empty payload, which wins over an empty
/// one. Fails with the first technique's error if none produced a frame.
pub fn extract_auto(stego: &str, registry: &Registry) -> Result<DetectedPayload, StegoError> {
    let carrier = Carrier::from_text(stego);
    let mut found: Vec<DetectedPayload> = Vec::new();
    let mut first_error = None;

    for technique in Technique::ALL {
        match extract_carrier(&carrier, technique, registry) {
            Ok(payload) => {
                debug!("{}: frame of {} bytes", technique, payload.len());
                found.push(DetectedPayload { technique, payload });
            }
            Err(e) => {
                debug!("{}: {}", technique, e);
                first_error.get_or_insert(e);
            }
        }
    }

    let rank = |p: &DetectedPayload| match (p.payload.is_empty(), std::str::from_utf8(&p.payload).is_ok()) {
        (false, true) => 0,
        (false, false) => 1,
        (true, _) => 2,
    };

    // min_by_key keeps the first of equal ranks, i.e. registry order.
    match found.into_iter().min_by_key(|p| rank(p)) {
        Some(detected) => {
            info!(
                "detected {} bytes hidden with {}",
                detected.payload.len(),
                detected.technique
            );
            Ok(detected)
        }
        None => Err(first_error.unwrap_or_else(|| {
            StegoError::UnsupportedCarrier("no technique produced a frame".to_string())
        })),
    }
}
