//! Keyword lexicon for free-text sentiment.

use std::collections::HashMap;

use mediaintel_core::KeywordOverrides;

/// Built-in keyword weights for social-media captions and comments.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The summed score is clamped to `[-1.0, 1.0]`.
pub const DEFAULT_LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("love", 0.5),
    ("loved", 0.5),
    ("loving", 0.4),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("best", 0.5),
    ("happy", 0.4),
    ("excited", 0.4),
    ("beautiful", 0.4),
    ("recommend", 0.4),
    ("thanks", 0.3),
    ("thank", 0.3),
    ("win", 0.4),
    ("fantastic", 0.5),
    ("perfect", 0.5),
    ("positive", 0.4),
    ("favorite", 0.4),
    ("bagus", 0.4),
    ("keren", 0.4),
    ("senang", 0.4),
    ("suka", 0.3),
    ("mantap", 0.5),
    // Negative signals
    ("hate", -0.6),
    ("hated", -0.6),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("bad", -0.4),
    ("poor", -0.4),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("angry", -0.5),
    ("scam", -0.7),
    ("broken", -0.4),
    ("problem", -0.3),
    ("issue", -0.3),
    ("refund", -0.4),
    ("boycott", -0.7),
    ("complaint", -0.4),
    ("negative", -0.4),
    ("buruk", -0.4),
    ("kecewa", -0.5),
    ("jelek", -0.4),
    ("marah", -0.5),
];

/// Word weights used to score free text.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    weights: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            weights: DEFAULT_LEXICON
                .iter()
                .map(|&(word, weight)| (word.to_string(), weight))
                .collect(),
        }
    }
}

impl Lexicon {
    /// Adds or replaces entries from a validated override file.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &KeywordOverrides) -> Self {
        for (word, weight) in overrides.positive.iter().chain(&overrides.negative) {
            self.weights.insert(word.trim().to_lowercase(), *weight);
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Score a text string using the lexicon.
    ///
    /// Splits text into lowercase words, sums matching weights, and clamps
    /// the result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
    #[must_use]
    pub fn score(&self, text: &str) -> f64 {
        let mut score = 0.0_f64;
        for word in text.split_whitespace() {
            let w = word
                .trim_matches(|c: char| !c.is_alphabetic())
                .to_lowercase();
            if let Some(weight) = self.weights.get(&w) {
                score += weight;
            }
        }
        score.clamp(-1.0, 1.0)
    }
}
