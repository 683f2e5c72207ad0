//! Tokenized carrier text.
//!
//! A carrier is kept as `leading, word, gap, word, ..., word, trailing`.
//! Rendering reproduces the input exactly, so techniques only ever rewrite the
//! parts they own (gaps or word cores) and everything else survives untouched.

use super::tokenize::Word;

/// A carrier or stego text split into words and the whitespace between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    leading: String,
    words: Vec<Word>,
    /// `gaps[i]` sits between `words[i]` and `words[i + 1]`.
    gaps: Vec<String>,
    trailing: String,
}

impl Carrier {
    /// Tokenizes a text.
    pub fn from_text(text: &str) -> Self {
        let mut leading = String::new();
        let mut words = Vec::new();
        let mut gaps = Vec::new();
        let mut pending_gap = String::new();
        let mut current = String::new();

        for c in text.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    words.push(Word::parse(&current));
                    current.clear();
                }
                if words.is_empty() {
                    leading.push(c);
                } else {
                    pending_gap.push(c);
                }
            } else {
                if current.is_empty() && !words.is_empty() {
                    gaps.push(std::mem::take(&mut pending_gap));
                }
                current.push(c);
            }
        }

        if !current.is_empty() {
            words.push(Word::parse(&current));
        }

        Self {
            leading,
            words,
            gaps,
            trailing: pending_gap,
        }
    }

    /// Words in reading order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Inter-word gaps in reading order.
    pub fn gaps(&self) -> &[String] {
        &self.gaps
    }

    /// Number of words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the text has no words at all.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Replaces the word at `index`.
    pub fn set_word(&mut self, index: usize, word: Word) {
        self.words[index] = word;
    }

    /// Replaces the gap at `index`.
    pub fn set_gap(&mut self, index: usize, gap: String) {
        self.gaps[index] = gap;
    }

    /// Renders the carrier back to text.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.estimated_len());
        out.push_str(&self.leading);
        for (i, word) in self.words.iter().enumerate() {
            word.render_into(&mut out);
            if let Some(gap) = self.gaps.get(i) {
                out.push_str(gap);
            }
        }
        out.push_str(&self.trailing);
        out
    }

    fn estimated_len(&self) -> usize {
        self.leading.len()
            + self.trailing.len()
            + self.gaps.iter().map(String::len).sum::<usize>()
            + self
                .words
                .iter()
                .map(|w| w.prefix.len() + w.core.len() + w.suffix.len())
                .sum::<usize>()
    }
}
