//! Suitability analysis.
//!
//! Ranks the techniques for a given carrier and payload size. Each technique
//! gets a score in `[0, 1]` built from three parts:
//!
//! - **margin**: `min(capacity / required, 1)`, where `required` includes the
//!   32-bit length prefix
//! - **detectability**: `1 - penalty`, the penalty estimating how much of the
//!   text changes and how visible those changes are
//! - **corpus bonus**: long, lexically diverse carriers hide changes better
//!
//! Viable techniques (capacity covers the framed payload) always rank above
//! non-viable ones. When nothing is viable the technique with the most
//! capacity is surfaced first, flagged with an insufficient-capacity warning.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::frame::framed_len;
use crate::stego::whitespace::gap_bit;
use crate::stego::{Registry, Technique};
use crate::text::carrier::Carrier;
use crate::text::tokenize::is_content_word;

pub const DEFAULT_MARGIN_WEIGHT: f64 = 0.6;
pub const DEFAULT_DETECTABILITY_WEIGHT: f64 = 0.25;
pub const DEFAULT_CORPUS_WEIGHT: f64 = 0.15;

/// How visible a changed unit is, per technique.
pub const DEFAULT_WHITESPACE_VISIBILITY: f64 = 1.0;
pub const DEFAULT_SYNONYM_VISIBILITY: f64 = 0.6;
pub const DEFAULT_WORD_LENGTH_VISIBILITY: f64 = 0.6;

/// Extra synonym penalty for a text where every slot is a two-word group.
pub const DEFAULT_TELEGRAPH_PENALTY: f64 = 0.5;

/// Share of used whitespace and word-length units expected to change; the
/// other half already carries the right bit.
pub const DEFAULT_CHANGED_SHARE: f64 = 0.5;

/// Whitespace penalty per unit of irregular-gap ratio.
pub const DEFAULT_IRREGULAR_WHITESPACE_WEIGHT: f64 = 1.0;

/// Split of the corpus bonus between carrier length and vocabulary diversity.
pub const DEFAULT_CORPUS_LENGTH_SHARE: f64 = 0.5;
pub const DEFAULT_CORPUS_DIVERSITY_SHARE: f64 = 0.5;

/// Word count at which the length half of the corpus bonus saturates.
pub const DEFAULT_LONG_CARRIER_WORDS: usize = 200;

pub const DEFAULT_SHORT_CARRIER_WORDS: usize = 20;
pub const DEFAULT_LOW_SYNONYM_DENSITY: f64 = 0.05;
pub const DEFAULT_TELEGRAPHING_RATIO: f64 = 0.5;
pub const DEFAULT_IRREGULAR_WHITESPACE: f64 = 0.1;
pub const DEFAULT_HIGH_UTILIZATION: f64 = 0.8;

/// Scoring weights and warning thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerWeights {
    pub margin: f64,
    pub detectability: f64,
    pub corpus: f64,
    pub whitespace_visibility: f64,
    pub synonym_visibility: f64,
    pub word_length_visibility: f64,
    pub telegraph_penalty: f64,
    pub changed_share: f64,
    pub irregular_whitespace_weight: f64,
    pub corpus_length_share: f64,
    pub corpus_diversity_share: f64,
    pub long_carrier_words: usize,
    /// Below this many words a [`Warning::ShortCarrier`] is raised.
    pub short_carrier_words: usize,
    /// Below this share of synonym words a [`Warning::LowSynonymDensity`] is raised.
    pub low_synonym_density: f64,
    /// Above this share of two-member groups a [`Warning::TelegraphingGroups`] is raised.
    pub telegraphing_ratio: f64,
    /// Above this share of gaps with extra spaces a [`Warning::IrregularWhitespace`] is raised.
    pub irregular_whitespace: f64,
    /// Above this share of used capacity a [`Warning::HighUtilization`] is raised.
    pub high_utilization: f64,
}

impl Default for AnalyzerWeights {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN_WEIGHT,
            detectability: DEFAULT_DETECTABILITY_WEIGHT,
            corpus: DEFAULT_CORPUS_WEIGHT,
            whitespace_visibility: DEFAULT_WHITESPACE_VISIBILITY,
            synonym_visibility: DEFAULT_SYNONYM_VISIBILITY,
            word_length_visibility: DEFAULT_WORD_LENGTH_VISIBILITY,
            telegraph_penalty: DEFAULT_TELEGRAPH_PENALTY,
            changed_share: DEFAULT_CHANGED_SHARE,
            irregular_whitespace_weight: DEFAULT_IRREGULAR_WHITESPACE_WEIGHT,
            corpus_length_share: DEFAULT_CORPUS_LENGTH_SHARE,
            corpus_diversity_share: DEFAULT_CORPUS_DIVERSITY_SHARE,
            long_carrier_words: DEFAULT_LONG_CARRIER_WORDS,
            short_carrier_words: DEFAULT_SHORT_CARRIER_WORDS,
            low_synonym_density: DEFAULT_LOW_SYNONYM_DENSITY,
            telegraphing_ratio: DEFAULT_TELEGRAPHING_RATIO,
            irregular_whitespace: DEFAULT_IRREGULAR_WHITESPACE,
            high_utilization: DEFAULT_HIGH_UTILIZATION,
        }
    }
}

/// Surface statistics of a carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextProfile {
    pub word_count: usize,
    pub char_count: usize,
    pub unique_words: usize,
    /// Unique words over words with letters.
    pub vocabulary_diversity: f64,
    /// Mean core length in characters.
    pub average_word_length: f64,
    /// Words owned by a group of two or more members.
    pub synonym_words: usize,
    pub synonym_density: f64,
    /// Share of synonym words whose group has exactly two members.
    pub two_member_ratio: f64,
    /// Share of gaps that already read as a set whitespace bit.
    pub irregular_whitespace_ratio: f64,
    pub content_words: usize,
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

impl TextProfile {
    pub fn from_carrier(carrier: &Carrier, registry: &Registry) -> Self {
        let table = registry.table();
        let mut unique = HashSet::new();
        let mut lettered = 0;
        let mut letters = 0;
        let mut synonym_words = 0;
        let mut two_member = 0;
        let mut content_words = 0;

        for word in carrier.words() {
            if word.core.is_empty() {
                continue;
            }
            lettered += 1;
            letters += word.core_len();
            let key = word.key();
            if is_content_word(&word.core, registry.min_word_len()) {
                content_words += 1;
            }
            // Contested words are reported by the engines, not here.
            if let Ok(Some(group)) = table.lookup(&key) {
                if group.len() >= 2 {
                    synonym_words += 1;
                    if group.len() == 2 {
                        two_member += 1;
                    }
                }
            }
            unique.insert(key);
        }

        // Line breaks and indentation survive embedding; leading extra spaces
        // are what embedding itself writes.
        let irregular = carrier.gaps().iter().filter(|g| gap_bit(g.as_str())).count();

        Self {
            word_count: carrier.word_count(),
            char_count: carrier.render().chars().count(),
            unique_words: unique.len(),
            vocabulary_diversity: ratio(unique.len(), lettered),
            average_word_length: ratio(letters, lettered),
            synonym_words,
            synonym_density: ratio(synonym_words, carrier.word_count()),
            two_member_ratio: ratio(two_member, synonym_words),
            irregular_whitespace_ratio: ratio(irregular, carrier.gaps().len()),
            content_words,
        }
    }
}

/// Something a caller should know before using a technique.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    InsufficientCapacity {
        required: usize,
        available: usize,
        shortfall: usize,
    },
    HighUtilization {
        ratio: f64,
    },
    IrregularWhitespace {
        ratio: f64,
    },
    LowSynonymDensity {
        density: f64,
    },
    TelegraphingGroups {
        ratio: f64,
    },
    ShortCarrier {
        words: usize,
    },
    /// The engine could not evaluate the carrier.
    Unavailable {
        reason: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InsufficientCapacity {
                required,
                available,
                shortfall,
            } => write!(
                f,
                "insufficient capacity: {} bits needed, {} available ({} short)",
                required, available, shortfall
            ),
            Warning::HighUtilization { ratio } => {
                write!(f, "payload uses {:.0}% of the capacity", ratio * 100.0)
            }
            Warning::IrregularWhitespace { ratio } => write!(
                f,
                "{:.0}% of the gaps already carry extra spaces; normalizing them would show",
                ratio * 100.0
            ),
            Warning::LowSynonymDensity { density } => write!(
                f,
                "only {:.1}% of the words have synonyms",
                density * 100.0
            ),
            Warning::TelegraphingGroups { ratio } => write!(
                f,
                "{:.0}% of the synonym words come from two-word groups",
                ratio * 100.0
            ),
            Warning::ShortCarrier { words } => write!(f, "short carrier ({} words)", words),
            Warning::Unavailable { reason } => write!(f, "unavailable: {}", reason),
        }
    }
}

/// Score of one technique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuitabilityScore {
    pub technique: Technique,
    pub score: f64,
    pub capacity: usize,
    pub required_bits: usize,
    pub margin: f64,
    pub viable: bool,
    /// Detectability penalty in `[0, 1]`.
    pub penalty: f64,
    pub warnings: Vec<Warning>,
}

/// Ranked analysis of a carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuitabilityReport {
    pub profile: TextProfile,
    pub payload_bits: usize,
    pub required_bits: usize,
    /// Best first.
    pub rankings: Vec<SuitabilityScore>,
}

impl SuitabilityReport {
    /// Top-ranked entry, viable or not.
    pub fn best(&self) -> Option<&SuitabilityScore> {
        self.rankings.first()
    }

    /// Top-ranked technique if it can hold the payload.
    pub fn recommended(&self) -> Option<Technique> {
        self.best().filter(|s| s.viable).map(|s| s.technique)
    }

    pub fn score(&self, technique: Technique) -> Option<&SuitabilityScore> {
        self.rankings.iter().find(|s| s.technique == technique)
    }

    /// One-line reason for the top of the ranking.
    pub fn explanation(&self) -> String {
        let Some(best) = self.best() else {
            return "no technique is registered".to_string();
        };

        let mut line = if best.viable {
            format!(
                "{} holds the {}-bit frame with {} bits to spare (score {:.2})",
                best.technique,
                self.required_bits,
                best.capacity - self.required_bits,
                best.score
            )
        } else {
            format!(
                "no technique can hold {} bits; {} comes closest with {}",
                self.required_bits, best.technique, best.capacity
            )
        };

        let notes: Vec<String> = best
            .warnings
            .iter()
            .filter(|w| !matches!(w, Warning::InsufficientCapacity { .. }))
            .map(Warning::to_string)
            .collect();
        if !notes.is_empty() {
            line.push_str("; ");
            line.push_str(&notes.join("; "));
        }
        line
    }
}

fn penalty(
    technique: Technique,
    profile: &TextProfile,
    capacity: usize,
    required: usize,
    weights: &AnalyzerWeights,
) -> f64 {
    let used = required.min(capacity);
    let utilization = if capacity == 0 { 1.0 } else { ratio(used, capacity) };

    let penalty = match technique {
        Technique::Whitespace => {
            weights.whitespace_visibility * weights.changed_share * utilization
                + weights.irregular_whitespace_weight * profile.irregular_whitespace_ratio
        }
        // Most used synonym slots end up with a different word.
        Technique::Synonym => {
            weights.synonym_visibility
                * utilization
                * ratio(profile.synonym_words, profile.word_count)
                + profile.two_member_ratio * weights.telegraph_penalty
        }
        Technique::WordLength => {
            weights.word_length_visibility
                * weights.changed_share
                * ratio(used, profile.word_count)
        }
    };
    penalty.clamp(0.0, 1.0)
}

fn corpus_bonus(profile: &TextProfile, weights: &AnalyzerWeights) -> f64 {
    let length = if weights.long_carrier_words == 0 {
        1.0
    } else {
        ratio(profile.word_count, weights.long_carrier_words).min(1.0)
    };
    (weights.corpus_length_share * length
        + weights.corpus_diversity_share * profile.vocabulary_diversity)
        .clamp(0.0, 1.0)
}

fn score_technique(
    technique: Technique,
    capacity: Result<usize, String>,
    profile: &TextProfile,
    required: usize,
    weights: &AnalyzerWeights,
) -> SuitabilityScore {
    let mut warnings = Vec::new();
    let capacity = match capacity {
        Ok(bits) => bits,
        Err(reason) => {
            warnings.push(Warning::Unavailable { reason });
            0
        }
    };

    let margin = ratio(capacity, required).min(1.0);
    let viable = capacity >= required;
    let penalty = penalty(technique, profile, capacity, required, weights);
    let bonus = corpus_bonus(profile, weights);

    let total = weights.margin + weights.detectability + weights.corpus;
    let weighted =
        weights.margin * margin + weights.detectability * (1.0 - penalty) + weights.corpus * bonus;
    let score = if total > 0.0 {
        (weighted / total).clamp(0.0, 1.0)
    } else {
        0.0
    };

    if viable {
        let utilization = ratio(required, capacity);
        if utilization > weights.high_utilization {
            warnings.push(Warning::HighUtilization { ratio: utilization });
        }
    } else {
        warnings.push(Warning::InsufficientCapacity {
            required,
            available: capacity,
            shortfall: required - capacity,
        });
    }

    match technique {
        Technique::Whitespace => {
            if profile.irregular_whitespace_ratio > weights.irregular_whitespace {
                warnings.push(Warning::IrregularWhitespace {
                    ratio: profile.irregular_whitespace_ratio,
                });
            }
        }
        Technique::Synonym => {
            if profile.synonym_density < weights.low_synonym_density {
                warnings.push(Warning::LowSynonymDensity {
                    density: profile.synonym_density,
                });
            }
            if profile.two_member_ratio > weights.telegraphing_ratio {
                warnings.push(Warning::TelegraphingGroups {
                    ratio: profile.two_member_ratio,
                });
            }
        }
        Technique::WordLength => {}
    }

    if profile.word_count < weights.short_carrier_words {
        warnings.push(Warning::ShortCarrier {
            words: profile.word_count,
        });
    }

    SuitabilityScore {
        technique,
        score,
        capacity,
        required_bits: required,
        margin,
        viable,
        penalty,
        warnings,
    }
}

fn by_score(a: &SuitabilityScore, b: &SuitabilityScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.technique.cmp(&b.technique))
}

/// Ranks every technique of the registry for a payload of `payload_bits` bits.
pub fn analyze(
    text: &str,
    payload_bits: usize,
    registry: &Registry,
    weights: &AnalyzerWeights,
) -> SuitabilityReport {
    let carrier = Carrier::from_text(text);
    analyze_carrier(&carrier, payload_bits, registry, weights)
}

/// Same as [`analyze`] for an already tokenized carrier.
pub fn analyze_carrier(
    carrier: &Carrier,
    payload_bits: usize,
    registry: &Registry,
    weights: &AnalyzerWeights,
) -> SuitabilityReport {
    let profile = TextProfile::from_carrier(carrier, registry);
    let required = framed_len(payload_bits);

    let scores: Vec<SuitabilityScore> = registry
        .engines()
        .map(|engine| {
            let capacity = engine.capacity(carrier).map_err(|e| e.to_string());
            score_technique(engine.technique(), capacity, &profile, required, weights)
        })
        .collect();

    let (mut viable, mut rest): (Vec<_>, Vec<_>) = scores.into_iter().partition(|s| s.viable);
    viable.sort_by(by_score);
    rest.sort_by(by_score);

    if viable.is_empty() {
        warn!(
            "no technique can hold {} bits; largest capacity is {}",
            required,
            rest.iter().map(|s| s.capacity).max().unwrap_or(0)
        );
        // Surface the technique that comes closest.
        let top = rest
            .iter()
            .enumerate()
            .max_by(|(i, a), (j, b)| a.capacity.cmp(&b.capacity).then_with(|| j.cmp(i)))
            .map(|(i, _)| i);
        if let Some(top) = top {
            let entry = rest.remove(top);
            rest.insert(0, entry);
        }
    }

    viable.extend(rest);
    SuitabilityReport {
        profile,
        payload_bits,
        required_bits: required,
        rankings: viable,
    }
}
