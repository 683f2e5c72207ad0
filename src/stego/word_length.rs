//! Word-length encoding.
//!
//! Content words carry one bit in the parity of their length (even = 0,
//! odd = 1). A word is a slot only if its synonym group offers content words
//! of both parities, so any bit can be written by swapping in the
//! alphabetically first member of the needed parity. Words that could not be
//! flipped are never slots, which keeps capacity exact and lets extraction
//! find the same slots in the stego text.

use log::debug;

use super::{ensure_capacity, require_words, Technique, TechniqueEngine};
use crate::error::StegoError;
use crate::text::carrier::Carrier;
use crate::text::synonyms::{SynonymGroup, SynonymTable};
use crate::text::tokenize::is_content_word;

/// Words shorter than this are treated as function words.
pub const DEFAULT_MIN_WORD_LEN: usize = 3;

/// Word-length engine.
#[derive(Debug, Clone, Copy)]
pub struct WordLengthEngine<'a> {
    table: &'a SynonymTable,
    min_word_len: usize,
}

/// A flip-capable content word.
struct Slot<'t> {
    word_index: usize,
    odd: bool,
    /// First content member with even length.
    even_target: &'t str,
    /// First content member with odd length.
    odd_target: &'t str,
}

impl<'a> WordLengthEngine<'a> {
    pub fn new(table: &'a SynonymTable, min_word_len: usize) -> Self {
        Self {
            table,
            min_word_len,
        }
    }

    pub fn min_word_len(&self) -> usize {
        self.min_word_len
    }

    /// First content member of each parity, if the group has both.
    fn flip_targets(&self, group: &'a SynonymGroup) -> Option<(&'a str, &'a str)> {
        let mut even = None;
        let mut odd = None;
        for member in group.members() {
            if !is_content_word(member, self.min_word_len) {
                continue;
            }
            let slot = if member.chars().count() % 2 == 1 {
                &mut odd
            } else {
                &mut even
            };
            if slot.is_none() {
                *slot = Some(member.as_str());
            }
        }
        even.zip(odd)
    }

    fn slots(&self, carrier: &Carrier) -> Result<Vec<Slot<'a>>, StegoError> {
        let mut slots = Vec::new();
        for (word_index, word) in carrier.words().iter().enumerate() {
            if !is_content_word(&word.core, self.min_word_len) {
                continue;
            }
            let group = match self.table.lookup(&word.key()) {
                Ok(Some(group)) => group,
                Ok(None) => continue,
                Err(contested) => return Err(StegoError::ambiguity(contested, word_index)),
            };
            if let Some((even_target, odd_target)) = self.flip_targets(group) {
                slots.push(Slot {
                    word_index,
                    odd: word.core_len() % 2 == 1,
                    even_target,
                    odd_target,
                });
            }
        }
        Ok(slots)
    }
}

impl TechniqueEngine for WordLengthEngine<'_> {
    fn technique(&self) -> Technique {
        Technique::WordLength
    }

    fn capacity(&self, carrier: &Carrier) -> Result<usize, StegoError> {
        Ok(self.slots(carrier)?.len())
    }

    fn embed(&self, carrier: &Carrier, bits: &[bool]) -> Result<Carrier, StegoError> {
        require_words(carrier)?;
        let slots = self.slots(carrier)?;
        ensure_capacity(self.technique(), bits.len(), slots.len())?;

        let mut stego = carrier.clone();
        let mut flipped = 0;
        for (slot, &bit) in slots.iter().zip(bits) {
            if slot.odd == bit {
                continue;
            }
            let target = if bit { slot.odd_target } else { slot.even_target };
            let word = &carrier.words()[slot.word_index];
            stego.set_word(slot.word_index, word.with_core(target));
            flipped += 1;
        }

        debug!(
            "word-length: {} bits over {} slots, {} words flipped",
            bits.len(),
            slots.len(),
            flipped
        );
        Ok(stego)
    }

    fn raw_bits(&self, stego: &Carrier) -> Result<Vec<bool>, StegoError> {
        Ok(self.slots(stego)?.iter().map(|s| s.odd).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::frame_bits;
    use crate::text::synonyms::{default_table, GroupDef};

    const FOX: &str = "The quick brown fox jumps over the lazy dog";

    #[test]
    fn test_fox_has_seven_slots() {
        let engine = WordLengthEngine::new(default_table(), DEFAULT_MIN_WORD_LEN);
        let carrier = Carrier::from_text(FOX);
        assert_eq!(engine.capacity(&carrier).unwrap(), 7);

        // quick(5) brown(5) fox(3) jumps(5) over(4) lazy(4) dog(3)
        assert_eq!(
            engine.raw_bits(&carrier).unwrap(),
            vec![true, true, true, true, false, false, true]
        );
    }

    #[test]
    fn test_flip_uses_first_member_of_opposite_parity() {
        let engine = WordLengthEngine::new(default_table(), DEFAULT_MIN_WORD_LEN);
        let carrier = Carrier::from_text("Quick");

        // fast(4) quick(5) rapid(5) speedy(6) swift(5): first even is "fast".
        let stego = engine.embed(&carrier, &[false]).unwrap();
        assert_eq!(stego.render(), "Fast");

        let stego = engine.embed(&carrier, &[true]).unwrap();
        assert_eq!(stego.render(), "Quick");
    }

    #[test]
    fn test_non_flippable_words_are_not_slots() {
        let table = SynonymTable::from_defs([
            GroupDef::new(&["fox", "vixen"]),     // both odd
            GroupDef::new(&["cat", "feline"]),    // odd and even
        ])
        .unwrap();
        let engine = WordLengthEngine::new(&table, DEFAULT_MIN_WORD_LEN);
        let carrier = Carrier::from_text("fox cat fox cat");
        assert_eq!(engine.capacity(&carrier).unwrap(), 2);

        let stego = engine.embed(&carrier, &[false, true]).unwrap();
        assert_eq!(stego.render(), "fox feline fox cat");
        assert_eq!(engine.raw_bits(&stego).unwrap(), vec![false, true]);
    }

    #[test]
    fn test_short_and_stop_words_ignored() {
        let table = SynonymTable::from_defs([
            GroupDef::new(&["the", "these", "this"]),
            GroupDef::new(&["ox", "bull", "steer"]),
        ])
        .unwrap();
        let engine = WordLengthEngine::new(&table, DEFAULT_MIN_WORD_LEN);
        assert_eq!(engine.capacity(&Carrier::from_text("the ox")).unwrap(), 0);

        // "bull" is a slot; the short "ox" is never written as a substitute.
        let stego = engine.embed(&Carrier::from_text("bull"), &[true]).unwrap();
        assert_eq!(stego.render(), "steer");
    }

    #[test]
    fn test_roundtrip_on_repeated_fox() {
        let engine = WordLengthEngine::new(default_table(), DEFAULT_MIN_WORD_LEN);
        let carrier = Carrier::from_text(&[FOX; 6].join(". "));
        let payload = vec![true, false, true, true];
        let framed = frame_bits(&payload).unwrap();

        let stego = engine.embed(&carrier, &framed).unwrap();
        let reparsed = Carrier::from_text(&stego.render());
        assert_eq!(engine.extract(&reparsed).unwrap(), payload);
    }

    #[test]
    fn test_capacity_error_up_front() {
        let engine = WordLengthEngine::new(default_table(), DEFAULT_MIN_WORD_LEN);
        let carrier = Carrier::from_text(FOX);
        let framed = frame_bits(&[true, false, true, true]).unwrap();
        assert_eq!(
            engine.embed(&carrier, &framed).unwrap_err(),
            StegoError::Capacity {
                technique: Technique::WordLength,
                required: 36,
                available: 7
            }
        );
    }
}
