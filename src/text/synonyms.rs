//! Synonym groups shared by the synonym and word-length techniques.
//!
//! Groups are loaded once and never mutated. Each group keeps its members in
//! alphabetical order, which is what turns "index within the group" into
//! hidden bits, so embedding and extraction agree without any shared state
//! beyond the table itself.
//!
//! A word listed in several groups belongs to exactly one of them, decided by
//! [`group_priority`]. When the strongest claimants tie, the word is
//! *contested*: it is removed from every group and techniques that meet it in
//! a text report an ambiguity instead of guessing.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tokenize::{case_round_trips, normalize_word};

/// Errors raised while building a synonym table.
#[derive(Error, Debug)]
pub enum SynonymTableError {
    #[error("Synonym group {index} has no words")]
    EmptyGroup { index: usize },

    #[error("Invalid synonym '{word}': entries must be single alphabetic words")]
    InvalidWord { word: String },

    #[error("Invalid synonym '{word}': its spelling changes with letter case")]
    CaseUnstable { word: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// One group as written in a synonym file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupDef {
    /// Interchangeable words, any order, any case.
    pub words: Vec<String>,

    /// Higher priority wins when a word is listed in several groups.
    #[serde(default)]
    pub priority: i32,
}

impl GroupDef {
    /// Creates a group with default priority.
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            words: words.iter().map(|w| w.as_ref().to_string()).collect(),
            priority: 0,
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// The synonym file format: a list of `[[group]]` tables.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct SynonymFile {
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupDef>,
}

/// A group after ownership resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymGroup {
    /// Every word the group was declared with, sorted.
    declared: Vec<String>,
    /// Words this group owns, sorted. Indices into this list carry the bits.
    members: Vec<String>,
    priority: i32,
}

impl SynonymGroup {
    /// Members this group owns, in canonical (alphabetical) order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Number of owned members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the group owns no words.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of declared words, before ownership resolution.
    pub fn declared_len(&self) -> usize {
        self.declared.len()
    }

    /// Configured priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Display name: the alphabetically first declared word.
    pub fn name(&self) -> &str {
        self.declared.first().map(String::as_str).unwrap_or("")
    }

    /// Canonical index of a normalized word.
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.members.binary_search_by(|m| m.as_str().cmp(word)).ok()
    }

    /// Bits one occurrence can carry: `floor(log2(len))`, zero below two members.
    pub fn bits_per_word(&self) -> usize {
        if self.members.len() < 2 {
            0
        } else {
            (usize::BITS - 1 - self.members.len().leading_zeros()) as usize
        }
    }
}

/// Orders two groups by precedence: `Less` means `a` wins.
///
/// Higher configured priority wins, then the group declared with more words.
/// `Equal` means the groups tie and a shared word cannot be assigned.
pub fn group_priority(a: &SynonymGroup, b: &SynonymGroup) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.declared.len().cmp(&a.declared.len()))
}

/// A word claimed by two groups of equal precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestedWord {
    pub word: String,
    /// Names of the two tied groups, in table order.
    pub first: String,
    pub second: String,
}

/// An immutable synonym lookup table.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    groups: Vec<SynonymGroup>,
    owners: HashMap<String, usize>,
    contested: HashMap<String, (usize, usize)>,
}

impl SynonymTable {
    /// Builds a table from group definitions.
    ///
    /// Words are lowercased and deduplicated; identical groups are merged,
    /// keeping the highest priority.
    pub fn from_defs<I>(defs: I) -> Result<Self, SynonymTableError>
    where
        I: IntoIterator<Item = GroupDef>,
    {
        let mut groups: Vec<SynonymGroup> = Vec::new();

        for (index, def) in defs.into_iter().enumerate() {
            let mut declared = Vec::with_capacity(def.words.len());
            for raw in &def.words {
                let word = normalize_word(raw.trim());
                if word.is_empty() || !word.chars().all(char::is_alphabetic) {
                    return Err(SynonymTableError::InvalidWord { word: raw.clone() });
                }
                if !case_round_trips(&word) {
                    return Err(SynonymTableError::CaseUnstable { word: raw.clone() });
                }
                declared.push(word);
            }
            declared.sort();
            declared.dedup();

            if declared.is_empty() {
                return Err(SynonymTableError::EmptyGroup { index });
            }

            match groups.iter_mut().find(|g| g.declared == declared) {
                Some(existing) => existing.priority = existing.priority.max(def.priority),
                None => groups.push(SynonymGroup {
                    declared,
                    members: Vec::new(),
                    priority: def.priority,
                }),
            }
        }

        // Precedence first, then declared words, so the order never depends
        // on the order groups were listed in.
        groups.sort_by(|a, b| group_priority(a, b).then_with(|| a.declared.cmp(&b.declared)));

        let mut claims: HashMap<String, Vec<usize>> = HashMap::new();
        for (gi, group) in groups.iter().enumerate() {
            for word in &group.declared {
                claims.entry(word.clone()).or_default().push(gi);
            }
        }

        let mut owners = HashMap::with_capacity(claims.len());
        let mut contested = HashMap::new();
        for (word, claimants) in claims {
            // Claimants are already in precedence order.
            let first = claimants[0];
            match claimants.get(1) {
                Some(&second)
                    if group_priority(&groups[first], &groups[second]) == Ordering::Equal =>
                {
                    contested.insert(word, (first, second));
                }
                _ => {
                    owners.insert(word, first);
                }
            }
        }

        for (word, &gi) in &owners {
            groups[gi].members.push(word.clone());
        }
        for group in &mut groups {
            group.members.sort();
        }

        Ok(Self {
            groups,
            owners,
            contested,
        })
    }

    /// Parses a TOML synonym file.
    pub fn from_toml_str(content: &str) -> Result<Self, SynonymTableError> {
        let file: SynonymFile = toml::from_str(content)?;
        Self::from_defs(file.groups)
    }

    /// Loads a TOML synonym file from disk.
    pub fn from_file(path: &Path) -> Result<Self, SynonymTableError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads a TOML synonym file and merges it with the built-in groups.
    pub fn from_file_with_defaults(path: &Path) -> Result<Self, SynonymTableError> {
        let content = fs::read_to_string(path)?;
        let file: SynonymFile = toml::from_str(&content)?;
        Self::from_defs(default_group_defs().into_iter().chain(file.groups))
    }

    /// Resolves a normalized word to the group that owns it.
    ///
    /// Returns `Ok(None)` for words in no group and `Err` for contested words.
    pub fn lookup(&self, word: &str) -> Result<Option<&SynonymGroup>, ContestedWord> {
        if let Some(&gi) = self.owners.get(word) {
            return Ok(Some(&self.groups[gi]));
        }
        match self.contested.get(word) {
            Some(&(first, second)) => Err(ContestedWord {
                word: word.to_string(),
                first: self.groups[first].name().to_string(),
                second: self.groups[second].name().to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Groups in precedence order.
    pub fn groups(&self) -> &[SynonymGroup] {
        &self.groups
    }

    /// Number of words that belong to some group.
    pub fn word_count(&self) -> usize {
        self.owners.len()
    }

    /// Contested words, sorted.
    pub fn contested_words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.contested.keys().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}

/// Built-in English groups. Every word appears in exactly one group.
const DEFAULT_GROUPS: &[&[&str]] = &[
    &["fast", "quick", "rapid", "speedy", "swift"],
    &["brown", "russet", "umber"],
    &["fox", "renard", "reynard"],
    &["bounds", "hops", "jumps", "leaps", "springs"],
    &["above", "atop", "over"],
    &["idle", "indolent", "lazy", "lethargic", "sleepy"],
    &["canine", "dog", "hound", "mutt"],
    &["big", "enormous", "giant", "huge", "immense", "large", "massive", "vast"],
    &["little", "minor", "petite", "slight", "small", "tiny"],
    &["cheerful", "glad", "happy", "joyful", "merry"],
    &["gloomy", "glum", "sad", "sorrowful", "unhappy"],
    &["begin", "commence", "initiate", "start"],
    &["conclude", "end", "finish", "terminate"],
    &["aid", "assist", "help", "support"],
    &["display", "exhibit", "reveal", "show"],
    &["acquire", "buy", "obtain", "purchase"],
    &["declare", "mention", "remark", "say", "state"],
    &["declared", "mentioned", "remarked", "said", "stated"],
    &["crucial", "essential", "important", "significant", "vital"],
    &["challenging", "demanding", "difficult", "hard", "tough"],
    &["easy", "effortless", "simple", "straightforward"],
    &["excellent", "good", "great", "splendid", "superb"],
    &["awful", "bad", "dreadful", "poor", "terrible"],
    &["bright", "brilliant", "clever", "intelligent", "smart"],
    &["frequently", "often", "regularly", "routinely"],
    &["maybe", "perhaps", "possibly"],
    &["also", "besides", "likewise"],
    &["however", "nevertheless", "nonetheless"],
    &["countless", "many", "myriad", "numerous"],
    &["dwelling", "home", "house", "residence"],
    &["auto", "automobile", "car", "vehicle"],
    &["avenue", "lane", "road", "street"],
    &["city", "metropolis", "town"],
    &["hushed", "peaceful", "quiet", "silent", "tranquil"],
    &["booming", "loud", "noisy", "thunderous"],
    &["aged", "ancient", "antique", "elderly", "old"],
    &["fresh", "modern", "new", "novel", "recent"],
    &["attractive", "beautiful", "gorgeous", "lovely", "stunning"],
    &["hideous", "ugly", "unsightly"],
    &["mighty", "powerful", "robust", "strong", "sturdy"],
    &["feeble", "fragile", "frail", "weak"],
    &["gaze", "glance", "look", "peer", "stare"],
    &["amble", "march", "stroll", "walk", "wander"],
    &["dash", "jog", "race", "run", "sprint"],
    &["consume", "devour", "dine", "eat"],
    &["believe", "consider", "reckon", "suppose", "think"],
    &["answer", "reply", "respond", "retort"],
    &["ask", "inquire", "query"],
    &["angry", "furious", "irate", "livid", "mad"],
    &["afraid", "fearful", "frightened", "scared", "terrified"],
    &["affluent", "prosperous", "rich", "wealthy"],
    &["chilly", "cold", "cool", "frigid", "icy"],
    &["heated", "hot", "scorching", "warm"],
    &["damp", "moist", "soggy", "wet"],
    &["dark", "dim", "murky", "shadowy"],
    &["gleam", "glitter", "glow", "shine", "sparkle"],
    &["blunder", "error", "fault", "mistake", "slip"],
    &["concept", "idea", "notion", "thought"],
    &["difficulty", "issue", "problem", "trouble"],
    &["assignment", "chore", "duty", "job", "task"],
    &["buddy", "comrade", "companion", "friend", "pal"],
    &["child", "kid", "youngster"],
    &["account", "narrative", "story", "tale"],
    &["adjacent", "near", "nearby"],
    &["distant", "far", "remote"],
    &["depart", "exit", "leave"],
    &["approach", "arrive", "come"],
    &["employ", "use", "utilize"],
    &["demand", "need", "require"],
    &["build", "construct", "create", "make", "produce"],
    &["earn", "gain", "get", "receive"],
    &["detect", "discover", "find", "locate", "uncover"],
    &["keep", "maintain", "preserve", "retain"],
    &["adjust", "alter", "amend", "change", "modify"],
    &["attempt", "endeavor", "strive", "try"],
    &["extremely", "highly", "really", "truly", "very"],
    &["hastily", "quickly", "rapidly", "speedily", "swiftly"],
    &["gradually", "leisurely", "slowly", "sluggishly"],
    &["abruptly", "suddenly", "unexpectedly"],
    &["generally", "normally", "ordinarily", "typically", "usually"],
];

/// Built-in groups as defs, for merging with user files.
pub fn default_group_defs() -> Vec<GroupDef> {
    DEFAULT_GROUPS.iter().map(|words| GroupDef::new(*words)).collect()
}

static DEFAULT_TABLE: Lazy<SynonymTable> = Lazy::new(|| {
    SynonymTable::from_defs(default_group_defs()).expect("built-in synonym groups are valid")
});

/// The built-in table, built on first use and shared read-only afterwards.
pub fn default_table() -> &'static SynonymTable {
    &DEFAULT_TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(groups: &[&[&str]]) -> SynonymTable {
        SynonymTable::from_defs(groups.iter().map(|g| GroupDef::new(*g))).unwrap()
    }

    #[test]
    fn test_members_sorted_and_normalized() {
        let table = table(&[&["Rapid", "quick", "FAST", "quick"]]);
        let group = table.lookup("quick").unwrap().unwrap();
        assert_eq!(group.members(), &["fast", "quick", "rapid"]);
        assert_eq!(group.index_of("rapid"), Some(2));
        assert_eq!(group.bits_per_word(), 1);
    }

    #[test]
    fn test_bits_per_word() {
        let sizes = [(1, 0), (2, 1), (3, 1), (4, 2), (5, 2), (8, 3), (9, 3)];
        for (size, bits) in sizes {
            let words: Vec<String> = (0..size).map(|i| "a".repeat(i + 1)).collect();
            let table = SynonymTable::from_defs([GroupDef::new(&words)]).unwrap();
            assert_eq!(table.groups()[0].bits_per_word(), bits, "size {}", size);
        }
    }

    #[test]
    fn test_invalid_words_rejected() {
        let result = SynonymTable::from_defs([GroupDef::new(&["going to", "will"])]);
        assert!(matches!(result, Err(SynonymTableError::InvalidWord { .. })));

        let result = SynonymTable::from_defs([GroupDef::new::<&str>(&[])]);
        assert!(matches!(result, Err(SynonymTableError::EmptyGroup { index: 0 })));
    }

    #[test]
    fn test_case_unstable_words_rejected() {
        let result = SynonymTable::from_defs([GroupDef::new(&["gasse", "straße", "weg", "pfad"])]);
        assert!(matches!(
            result,
            Err(SynonymTableError::CaseUnstable { ref word }) if word == "straße"
        ));

        let result = SynonymTable::from_toml_str("[[group]]\nwords = [\"Straße\", \"gasse\"]\n");
        assert!(matches!(result, Err(SynonymTableError::CaseUnstable { .. })));
    }

    #[test]
    fn test_priority_resolves_shared_word() {
        let defs = vec![
            GroupDef::new(&["quick", "speedy"]),
            GroupDef::new(&["fast", "quick", "rapid"]),
        ];
        let table = SynonymTable::from_defs(defs).unwrap();

        // The larger group owns "quick"; the smaller one loses it.
        let owner = table.lookup("quick").unwrap().unwrap();
        assert_eq!(owner.members(), &["fast", "quick", "rapid"]);

        let loser = table.lookup("speedy").unwrap().unwrap();
        assert_eq!(loser.members(), &["speedy"]);
        assert_eq!(loser.bits_per_word(), 0);
    }

    #[test]
    fn test_explicit_priority_beats_size() {
        let defs = vec![
            GroupDef::new(&["bank", "shore"]).with_priority(5),
            GroupDef::new(&["bank", "lender", "creditor"]),
        ];
        let table = SynonymTable::from_defs(defs).unwrap();
        let owner = table.lookup("bank").unwrap().unwrap();
        assert_eq!(owner.members(), &["bank", "shore"]);
    }

    #[test]
    fn test_tied_groups_contest_word() {
        let defs = vec![
            GroupDef::new(&["bank", "shore"]),
            GroupDef::new(&["bank", "lender"]),
        ];
        let table = SynonymTable::from_defs(defs).unwrap();

        let contested = table.lookup("bank").unwrap_err();
        assert_eq!(contested.word, "bank");
        assert_eq!(contested.first, "bank");
        assert_eq!(table.contested_words(), vec!["bank"]);

        // Neither group keeps the contested word.
        assert_eq!(table.lookup("shore").unwrap().unwrap().members(), &["shore"]);
        assert_eq!(table.lookup("lender").unwrap().unwrap().members(), &["lender"]);
    }

    #[test]
    fn test_load_order_does_not_matter() {
        let a = GroupDef::new(&["quick", "speedy"]);
        let b = GroupDef::new(&["fast", "quick", "rapid"]);
        let forward = SynonymTable::from_defs(vec![a.clone(), b.clone()]).unwrap();
        let backward = SynonymTable::from_defs(vec![b, a]).unwrap();
        assert_eq!(forward.groups(), backward.groups());
    }

    #[test]
    fn test_group_priority_ordering() {
        let table = table(&[&["a", "b"], &["c", "d", "e"]]);
        let small = table.lookup("a").unwrap().unwrap();
        let large = table.lookup("c").unwrap().unwrap();
        assert_eq!(group_priority(large, small), Ordering::Less);
        assert_eq!(group_priority(small, large), Ordering::Greater);
        assert_eq!(group_priority(small, small), Ordering::Equal);
    }

    #[test]
    fn test_toml_loading() {
        let content = r#"
[[group]]
words = ["fast", "quick", "rapid"]

[[group]]
words = ["bank", "shore"]
priority = 2
"#;
        let table = SynonymTable::from_toml_str(content).unwrap();
        assert_eq!(table.groups().len(), 2);
        assert_eq!(table.groups()[0].name(), "bank");
        assert!(table.lookup("rapid").unwrap().is_some());
    }

    #[test]
    fn test_default_table_is_unambiguous() {
        let table = default_table();
        assert!(table.contested_words().is_empty());

        let declared: usize = table.groups().iter().map(|g| g.declared_len()).sum();
        assert_eq!(declared, table.word_count(), "a word appears in two groups");
        assert!(table.groups().iter().all(|g| g.len() >= 3));
    }
}
