//! # Texthide - hide bytes in plain text
//!
//! Texthide hides a short binary payload inside natural-language text by
//! perturbing surface features, and recovers it bit for bit.
//!
//! ## Overview
//!
//! Three techniques are available, one per call:
//! - **Whitespace**: one bit per gap between words (single vs. double space)
//! - **Synonym**: a word from an `n`-member synonym group carries `floor(log2 n)` bits
//! - **Word length**: one bit per content word, carried by the parity of its length
//!
//! Every payload is framed with a 32-bit length prefix, so the extractor
//! knows where it ends. The [`analyzer`] ranks techniques for a carrier and
//! payload size and is used for automatic technique selection.
//!
//! ## Example Usage
//!
//! ```rust
//! use texthide::{embed, extract, default_table, Technique};
//!
//! let carrier = "The quick brown fox jumps over the lazy dog. ".repeat(10);
//! let table = default_table();
//!
//! let stego = embed(&carrier, b"hi", Technique::Synonym, table).unwrap();
//! assert_ne!(stego, carrier);
//!
//! let payload = extract(&stego, Technique::Synonym, table).unwrap();
//! assert_eq!(payload, b"hi");
//! ```
//!
//! ## Modules
//!
//! - [`frame`]: Length-prefixed bit framing
//! - [`stego`]: The technique engines and their registry
//! - [`text`]: Tokenization and synonym tables
//! - [`capacity`]: Per-technique capacity of a carrier
//! - [`analyzer`]: Suitability ranking
//! - [`encoder`] / [`decoder`]: Front API
//! - [`config`]: User configuration

pub mod analyzer;
pub mod capacity;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod stego;
pub mod text;

// Re-export commonly used types at the crate root
pub use analyzer::{analyze, AnalyzerWeights, SuitabilityReport, SuitabilityScore, TextProfile, Warning};
pub use capacity::{capacity, capacity_report, max_payload_bytes, required_bits, CapacityReport};
pub use config::{ConfigError, TexthideConfig};
pub use decoder::{
    extract, extract_auto, extract_bits, extract_message, extract_with_config, DetectedPayload,
    ExtractConfig,
};
pub use encoder::{embed, embed_bits, embed_with_config, EmbedConfig, EmbeddedText};
pub use error::StegoError;
pub use frame::FramingError;
pub use stego::{Registry, Technique, TechniqueEngine};
pub use text::carrier::Carrier;
pub use text::synonyms::{default_table, SynonymTable, SynonymTableError};
