//! Synonym substitution.
//!
//! A word owned by a group of `n >= 2` members carries `k = floor(log2(n))`
//! bits: the next `k` bits, read most-significant first, pick the member at
//! that index (taken modulo `n`, which never changes it since `2^k <= n`).
//! When fewer than `k` bits are left the value is zero-padded on the right.
//! Extraction maps each word back to `index mod 2^k`.

use log::debug;

use super::{ensure_capacity, require_words, Technique, TechniqueEngine};
use crate::error::StegoError;
use crate::text::carrier::Carrier;
use crate::text::synonyms::{SynonymGroup, SynonymTable};

/// Synonym-substitution engine.
#[derive(Debug, Clone, Copy)]
pub struct SynonymEngine<'a> {
    table: &'a SynonymTable,
}

/// A word that carries bits.
struct Slot<'t> {
    word_index: usize,
    group: &'t SynonymGroup,
    /// Canonical index of the word as currently written.
    index: usize,
    bits: usize,
}

impl<'a> SynonymEngine<'a> {
    pub fn new(table: &'a SynonymTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a SynonymTable {
        self.table
    }

    fn slots(&self, carrier: &Carrier) -> Result<Vec<Slot<'a>>, StegoError> {
        let mut slots = Vec::new();
        for (word_index, word) in carrier.words().iter().enumerate() {
            if word.core.is_empty() {
                continue;
            }
            let key = word.key();
            let group = match self.table.lookup(&key) {
                Ok(Some(group)) => group,
                Ok(None) => continue,
                Err(contested) => return Err(StegoError::ambiguity(contested, word_index)),
            };
            let bits = group.bits_per_word();
            if bits == 0 {
                continue;
            }
            if let Some(index) = group.index_of(&key) {
                slots.push(Slot {
                    word_index,
                    group,
                    index,
                    bits,
                });
            }
        }
        Ok(slots)
    }
}

impl TechniqueEngine for SynonymEngine<'_> {
    fn technique(&self) -> Technique {
        Technique::Synonym
    }

    fn capacity(&self, carrier: &Carrier) -> Result<usize, StegoError> {
        Ok(self.slots(carrier)?.iter().map(|s| s.bits).sum())
    }

    fn embed(&self, carrier: &Carrier, bits: &[bool]) -> Result<Carrier, StegoError> {
        require_words(carrier)?;
        let slots = self.slots(carrier)?;
        let available = slots.iter().map(|s| s.bits).sum();
        ensure_capacity(self.technique(), bits.len(), available)?;

        let mut stego = carrier.clone();
        let mut cursor = 0;
        let mut substituted = 0;
        for slot in &slots {
            if cursor >= bits.len() {
                break;
            }

            let mut value = 0usize;
            for _ in 0..slot.bits {
                let bit = bits.get(cursor).copied().unwrap_or(false);
                value = (value << 1) | bit as usize;
                cursor += 1;
            }

            let index = value % slot.group.len();
            if index != slot.index {
                let word = &carrier.words()[slot.word_index];
                stego.set_word(slot.word_index, word.with_core(&slot.group.members()[index]));
                substituted += 1;
            }
        }

        debug!(
            "synonym: {} bits over {} slots, {} words substituted",
            bits.len(),
            slots.len(),
            substituted
        );
        Ok(stego)
    }

    fn raw_bits(&self, stego: &Carrier) -> Result<Vec<bool>, StegoError> {
        let slots = self.slots(stego)?;
        let mut bits = Vec::with_capacity(slots.iter().map(|s| s.bits).sum());
        for slot in &slots {
            let value = slot.index % (1usize << slot.bits);
            for shift in (0..slot.bits).rev() {
                bits.push((value >> shift) & 1 == 1);
            }
        }
        Ok(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{encode, frame_bits};
    use crate::text::synonyms::{default_table, GroupDef};

    fn speed_table() -> SynonymTable {
        SynonymTable::from_defs([GroupDef::new(&["fast", "quick", "rapid"])]).unwrap()
    }

    #[test]
    fn test_capitalized_substitute() {
        let table = speed_table();
        let engine = SynonymEngine::new(&table);
        let carrier = Carrier::from_text("Fast cars.");

        // members: fast(0) quick(1) rapid(2); one bit per word.
        let stego = engine.embed(&carrier, &[true]).unwrap();
        assert_eq!(stego.render(), "Quick cars.");

        let stego = engine.embed(&carrier, &[false]).unwrap();
        assert_eq!(stego.render(), "Fast cars.");
    }

    #[test]
    fn test_upper_and_lower_case_preserved() {
        let table = speed_table();
        let engine = SynonymEngine::new(&table);
        let carrier = Carrier::from_text("FAST and fast");
        let stego = engine.embed(&carrier, &[true, true]).unwrap();
        assert_eq!(stego.render(), "QUICK and quick");
    }

    #[test]
    fn test_capacity_weights_by_group_size() {
        let table = default_table();
        let engine = SynonymEngine::new(table);
        let carrier = Carrier::from_text("The quick brown fox jumps over the lazy dog");
        // quick 2 + brown 1 + fox 1 + jumps 2 + over 1 + lazy 2 + dog 2
        assert_eq!(engine.capacity(&carrier).unwrap(), 11);
    }

    #[test]
    fn test_roundtrip_with_partial_last_slot() {
        let table = default_table();
        let engine = SynonymEngine::new(table);
        let sentence = "The quick brown fox jumps over the lazy dog. ";
        let carrier = Carrier::from_text(&sentence.repeat(5));

        // 33 framed bits cannot align with the 2-bit slots everywhere.
        let payload = vec![true];
        let framed = frame_bits(&payload).unwrap();
        let stego = engine.embed(&carrier, &framed).unwrap();

        let reparsed = Carrier::from_text(&stego.render());
        assert_eq!(engine.extract(&reparsed).unwrap(), payload);
    }

    #[test]
    fn test_roundtrip_bytes() {
        let table = default_table();
        let engine = SynonymEngine::new(table);
        let sentence = "The quick brown fox jumps over the lazy dog and the big happy child said hello. ";
        let carrier = Carrier::from_text(&sentence.repeat(8));
        let framed = encode(b"ok").unwrap();

        let stego = engine.embed(&carrier, &framed).unwrap();
        let reparsed = Carrier::from_text(&stego.render());
        let bytes = crate::frame::decode(engine.raw_bits(&reparsed).unwrap()).unwrap();
        assert_eq!(bytes, b"ok".to_vec());
    }

    #[test]
    fn test_one_bit_over_capacity() {
        let table = default_table();
        let engine = SynonymEngine::new(table);
        let carrier = Carrier::from_text(&"quick big fast huge ".repeat(4));
        let capacity = engine.capacity(&carrier).unwrap();

        let fits = vec![true; capacity];
        assert!(engine.embed(&carrier, &fits).is_ok());

        let over = vec![true; capacity + 1];
        assert_eq!(
            engine.embed(&carrier, &over).unwrap_err().shortfall(),
            Some(1)
        );
    }

    #[test]
    fn test_contested_word_is_ambiguous() {
        let table = SynonymTable::from_defs([
            GroupDef::new(&["bank", "shore"]),
            GroupDef::new(&["bank", "lender"]),
        ])
        .unwrap();
        let engine = SynonymEngine::new(&table);
        let carrier = Carrier::from_text("We walked to the bank today");

        let err = engine.capacity(&carrier).unwrap_err();
        assert!(matches!(
            err,
            StegoError::Ambiguity { ref word, position: 4, .. } if word == "bank"
        ));
        assert!(matches!(
            engine.raw_bits(&carrier),
            Err(StegoError::Ambiguity { .. })
        ));
    }

    #[test]
    fn test_words_outside_groups_untouched() {
        let table = speed_table();
        let engine = SynonymEngine::new(&table);
        let carrier = Carrier::from_text("slow, steady; fast!");
        let stego = engine.embed(&carrier, &[true]).unwrap();
        assert_eq!(stego.render(), "slow, steady; quick!");
    }
}
