//! Word-level tokenization helpers.
//!
//! A word is a maximal run of non-whitespace characters. Its *core* runs from
//! the first to the last alphabetic character; anything outside the core
//! (quotes, punctuation, digits) is kept verbatim as prefix or suffix so that
//! substitutions never disturb the surrounding text.

/// Function words never used as word-length slots, even when long enough.
pub const STOP_WORDS: &[&str] = &[
    "all", "and", "any", "are", "but", "can", "did", "does", "for", "from", "had", "has",
    "have", "her", "him", "his", "its", "may", "nor", "not", "our", "she", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "those", "was", "were",
    "what", "when", "which", "who", "will", "with", "you", "your",
];

/// A single word split into its replaceable core and the untouched affixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Leading non-alphabetic characters.
    pub prefix: String,
    /// First through last alphabetic character; empty for words without letters.
    pub core: String,
    /// Trailing non-alphabetic characters.
    pub suffix: String,
}

impl Word {
    /// Splits a whitespace-free token into prefix, core and suffix.
    pub fn parse(token: &str) -> Self {
        let start = token.find(|c: char| c.is_alphabetic());
        let end = token
            .char_indices()
            .filter(|(_, c)| c.is_alphabetic())
            .last()
            .map(|(i, c)| i + c.len_utf8());

        match (start, end) {
            (Some(start), Some(end)) => Self {
                prefix: token[..start].to_string(),
                core: token[start..end].to_string(),
                suffix: token[end..].to_string(),
            },
            _ => Self {
                prefix: token.to_string(),
                core: String::new(),
                suffix: String::new(),
            },
        }
    }

    /// Returns the lowercase core used for synonym lookups.
    pub fn key(&self) -> String {
        normalize_word(&self.core)
    }

    /// Number of characters in the core.
    pub fn core_len(&self) -> usize {
        self.core.chars().count()
    }

    /// Returns a copy with the core replaced by `replacement`, keeping the
    /// original case pattern and affixes.
    pub fn with_core(&self, replacement: &str) -> Self {
        Self {
            prefix: self.prefix.clone(),
            core: CasePattern::detect(&self.core).apply(replacement),
            suffix: self.suffix.clone(),
        }
    }

    /// Appends the full word to `out`.
    pub fn render_into(&self, out: &mut String) {
        out.push_str(&self.prefix);
        out.push_str(&self.core);
        out.push_str(&self.suffix);
    }
}

/// Letter case of a word, reapplied to substitutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePattern {
    Lower,
    Capitalized,
    Upper,
    /// Anything else ("iPhone", "McDonald"); substitutes are written lowercase.
    Mixed,
}

impl CasePattern {
    /// Detects the case pattern of a word core.
    pub fn detect(word: &str) -> Self {
        let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
        let Some(first) = letters.first() else {
            return CasePattern::Lower;
        };

        let rest_lower = letters[1..].iter().all(|c| !c.is_uppercase());
        let rest_upper = letters[1..].iter().all(|c| !c.is_lowercase());

        if first.is_uppercase() {
            if letters.len() > 1 && rest_upper {
                CasePattern::Upper
            } else if rest_lower {
                CasePattern::Capitalized
            } else {
                CasePattern::Mixed
            }
        } else if rest_lower {
            CasePattern::Lower
        } else {
            CasePattern::Mixed
        }
    }

    /// Renders a lowercase word in this case pattern.
    pub fn apply(self, word: &str) -> String {
        match self {
            CasePattern::Lower | CasePattern::Mixed => word.to_lowercase(),
            CasePattern::Upper => word.to_uppercase(),
            CasePattern::Capitalized => {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// Normalizes a word for lookups (lowercase).
pub fn normalize_word(word: &str) -> String {
    word.to_lowercase()
}

/// Returns true if `word` (lowercase) keeps its letters under every case
/// pattern, so a substituted word always reads back as itself.
pub fn case_round_trips(word: &str) -> bool {
    let len = word.chars().count();
    [CasePattern::Upper, CasePattern::Capitalized]
        .into_iter()
        .all(|pattern| {
            let cased = pattern.apply(word);
            cased.chars().count() == len && normalize_word(&cased) == word
        })
}

/// Returns true if `word` is in the stop-word list (case-insensitive).
pub fn is_stop_word(word: &str) -> bool {
    let normalized = normalize_word(word);
    STOP_WORDS.binary_search(&normalized.as_str()).is_ok()
}

/// Returns true if `word` counts as a content word: at least `min_len`
/// characters long and not a stop word.
pub fn is_content_word(word: &str, min_len: usize) -> bool {
    word.chars().count() >= min_len && !is_stop_word(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_words_sorted() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOP_WORDS);
    }

    #[test]
    fn test_word_parse_affixes() {
        let word = Word::parse("\"Hello,");
        assert_eq!(word.prefix, "\"");
        assert_eq!(word.core, "Hello");
        assert_eq!(word.suffix, ",");

        let word = Word::parse("don't.");
        assert_eq!(word.core, "don't");
        assert_eq!(word.suffix, ".");

        let word = Word::parse("1984");
        assert_eq!(word.prefix, "1984");
        assert!(word.core.is_empty());
    }

    #[test]
    fn test_word_parse_unicode() {
        let word = Word::parse("¡niño!");
        assert_eq!(word.prefix, "¡");
        assert_eq!(word.core, "niño");
        assert_eq!(word.core_len(), 4);
        assert_eq!(word.suffix, "!");
    }

    #[test]
    fn test_case_pattern_detect() {
        assert_eq!(CasePattern::detect("fast"), CasePattern::Lower);
        assert_eq!(CasePattern::detect("Fast"), CasePattern::Capitalized);
        assert_eq!(CasePattern::detect("FAST"), CasePattern::Upper);
        assert_eq!(CasePattern::detect("I"), CasePattern::Capitalized);
        assert_eq!(CasePattern::detect("iPhone"), CasePattern::Mixed);
    }

    #[test]
    fn test_with_core_preserves_case_and_affixes() {
        let word = Word::parse("(Fast!");
        let replaced = word.with_core("quick");

        let mut out = String::new();
        replaced.render_into(&mut out);
        assert_eq!(out, "(Quick!");

        assert_eq!(Word::parse("FAST").with_core("rapid").core, "RAPID");
        assert_eq!(Word::parse("fast").with_core("swift").core, "swift");
    }

    #[test]
    fn test_case_round_trips() {
        assert!(case_round_trips("fast"));
        assert!(case_round_trips("niño"));
        assert!(!case_round_trips("straße"));
        assert_eq!(CasePattern::Upper.apply("straße"), "STRASSE");
        // Final sigma only survives when it is already final.
        assert!(case_round_trips("οδος"));
        assert!(!case_round_trips("οδοσ"));
    }

    #[test]
    fn test_content_words() {
        assert!(is_content_word("fox", 3));
        assert!(is_content_word("over", 3));
        assert!(!is_content_word("The", 3));
        assert!(!is_content_word("is", 3));
        assert!(!is_content_word("fox", 4));
    }
}
