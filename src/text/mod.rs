//! Text handling for the steganography engines.
//!
//! This module provides:
//! - Tokenization into words and the whitespace between them
//! - Case patterns reapplied to substituted words
//! - The synonym table shared by the synonym and word-length techniques

pub mod carrier;
pub mod synonyms;
pub mod tokenize;

pub use carrier::Carrier;
pub use synonyms::{default_table, group_priority, GroupDef, SynonymGroup, SynonymTable, SynonymTableError};
pub use tokenize::{is_content_word, is_stop_word, normalize_word, CasePattern, Word};
