//! Rule-based, negation-aware mood classification.
//!
//! Keywords are matched as plain substrings of the lowercased description.
//! A keyword whose 15-character lead-in contains a negation marker counts
//! against its category instead of for it. Stored preferences are keyed on
//! the exact description text, so the window size and matching rules must
//! stay fixed.

use serde::{Deserialize, Serialize};

use crate::InterpretationResult;

/// Markers that flip the meaning of a nearby keyword.
pub const NEGATION_MARKERS: [&str; 9] = [
    "not", "nor", "neither", "don't", "doesn't", "isn't", "aren't", "won't", "can't",
];

/// How far back (in characters) a negation marker still applies to a keyword.
pub const NEGATION_WINDOW_CHARS: usize = 15;

const NEGATED_KEYWORD_SCORE: i32 = -2;
const MATCHED_KEYWORD_SCORE: i32 = 1;

/// Tokens ignored when building a query straight from the description.
const STOP_WORDS: &[&str] = &[
    "i", "im", "i'm", "am", "feeling", "feel", "need", "want", "the", "a", "an", "and", "or",
    "but", "so", "yet", "not", "nor", "neither", "don't", "doesn't", "isn't", "aren't", "won't",
    "can't", "me", "my", "you", "your", "he", "she", "him", "her", "his", "they", "them", "their",
    "we", "our", "it", "its", "this", "that",
];

const FALLBACK_TOKEN_LIMIT: usize = 3;

/// The fixed set of rule-based moods, in tie-breaking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodCategory {
    Happy,
    Sad,
    Energetic,
    Relaxed,
    Focused,
    Romantic,
    Angry,
    Nostalgic,
    Neutral,
}

impl MoodCategory {
    pub const ALL: [MoodCategory; 9] = [
        MoodCategory::Happy,
        MoodCategory::Sad,
        MoodCategory::Energetic,
        MoodCategory::Relaxed,
        MoodCategory::Focused,
        MoodCategory::Romantic,
        MoodCategory::Angry,
        MoodCategory::Nostalgic,
        MoodCategory::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodCategory::Happy => "happy",
            MoodCategory::Sad => "sad",
            MoodCategory::Energetic => "energetic",
            MoodCategory::Relaxed => "relaxed",
            MoodCategory::Focused => "focused",
            MoodCategory::Romantic => "romantic",
            MoodCategory::Angry => "angry",
            MoodCategory::Nostalgic => "nostalgic",
            MoodCategory::Neutral => "neutral",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            MoodCategory::Happy => &[
                "happy", "joyful", "cheerful", "upbeat", "excited", "celebrating", "glad",
                "pleased",
            ],
            MoodCategory::Sad => &[
                "sad", "down", "depressed", "melancholic", "lonely", "heartbroken", "breakup",
                "upset", "unhappy",
            ],
            MoodCategory::Energetic => &[
                "energetic", "pumped", "workout", "exercise", "active", "motivated", "pumped up",
            ],
            MoodCategory::Relaxed => &[
                "relaxed", "chill", "calm", "peaceful", "meditation", "zen", "serene", "tranquil",
            ],
            MoodCategory::Focused => &[
                "focused", "study", "work", "concentration", "productive", "lo-fi", "studying",
                "working",
            ],
            MoodCategory::Romantic => &[
                "romantic", "love", "intimate", "dating", "relationship", "loving",
            ],
            MoodCategory::Angry => &[
                "angry", "frustrated", "aggressive", "intense", "heavy", "mad", "irritated",
            ],
            MoodCategory::Nostalgic => &[
                "nostalgic", "retro", "vintage", "old", "classic", "memories", "remembering",
            ],
            MoodCategory::Neutral => &[
                "neutral", "indifferent", "neither", "ambivalent", "mixed", "confused",
            ],
        }
    }

    /// Hand-authored search query for this mood.
    pub fn canned_query(&self) -> &'static str {
        match self {
            MoodCategory::Happy => "upbeat happy energetic music",
            MoodCategory::Sad => "sad emotional melancholic music",
            MoodCategory::Energetic => "high energy motivational music",
            MoodCategory::Relaxed => "chill ambient peaceful music",
            MoodCategory::Focused => "study focus instrumental music",
            MoodCategory::Romantic => "romantic love songs music",
            MoodCategory::Angry => "intense powerful aggressive music",
            MoodCategory::Nostalgic => "classic retro vintage music",
            MoodCategory::Neutral => "ambient instrumental background music",
        }
    }
}

impl std::fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category scores for one description.
#[derive(Debug, Clone)]
pub struct KeywordAnalysis {
    /// Scores in [`MoodCategory::ALL`] order.
    pub scores: Vec<(MoodCategory, i32)>,
    /// True when at least one keyword of any category occurred.
    pub any_keyword_matched: bool,
    /// True when any negation marker occurs anywhere in the text.
    pub has_negation: bool,
}

impl KeywordAnalysis {
    pub fn score_of(&self, category: MoodCategory) -> i32 {
        self.scores
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, s)| *s)
            .unwrap_or(0)
    }

    /// Highest-scoring category; earlier categories win ties and a
    /// non-positive best collapses to neutral.
    pub fn winner(&self) -> MoodCategory {
        let mut best: Option<(MoodCategory, i32)> = None;
        for &(category, score) in &self.scores {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((category, score)),
            }
        }

        match best {
            Some((category, score)) if score > 0 => category,
            _ => MoodCategory::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordScorer;

impl KeywordScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> KeywordAnalysis {
        let lowered = text.to_lowercase();
        let has_negation = contains_negation(&lowered);
        let mut any_keyword_matched = false;

        let scores = MoodCategory::ALL
            .iter()
            .map(|&category| {
                let mut score = 0;
                for keyword in category.keywords() {
                    let Some(start) = lowered.find(keyword) else {
                        continue;
                    };
                    any_keyword_matched = true;
                    if contains_negation(preceding_window(&lowered, start)) {
                        score += NEGATED_KEYWORD_SCORE;
                    } else {
                        score += MATCHED_KEYWORD_SCORE;
                    }
                }
                (category, score)
            })
            .collect();

        KeywordAnalysis {
            scores,
            any_keyword_matched,
            has_negation,
        }
    }

    /// Classify a description into a mood label, search query, and a short
    /// explanation of how the label was reached.
    pub fn classify(&self, text: &str) -> InterpretationResult {
        let analysis = self.analyze(text);
        let category = analysis.winner();

        let search_query = if analysis.any_keyword_matched {
            category.canned_query().to_string()
        } else {
            query_from_tokens(&text.to_lowercase())
                .unwrap_or_else(|| MoodCategory::Neutral.canned_query().to_string())
        };

        let interpretation = match (analysis.has_negation, category) {
            (true, MoodCategory::Neutral) => {
                "Ambiguous or neutral mood detected - suggesting ambient music".to_string()
            }
            (true, _) => format!(
                "Detected {} mood (noting negations in your description)",
                category
            ),
            (false, _) => format!("Detected {} mood from your description", category),
        };

        InterpretationResult {
            mood_label: category.as_str().to_string(),
            search_query,
            interpretation,
        }
    }
}

fn contains_negation(text: &str) -> bool {
    NEGATION_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Up to [`NEGATION_WINDOW_CHARS`] characters ending right before byte `end`.
fn preceding_window(text: &str, end: usize) -> &str {
    let start = text[..end]
        .char_indices()
        .rev()
        .take(NEGATION_WINDOW_CHARS)
        .last()
        .map(|(index, _)| index)
        .unwrap_or(end);
    &text[start..end]
}

/// First few meaningful words of the description, suffixed with "music".
fn query_from_tokens(lowered: &str) -> Option<String> {
    let tokens: Vec<&str> = lowered
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-'))
        .filter(|token| token.chars().count() > 2 && !STOP_WORDS.contains(token))
        .take(FALLBACK_TOKEN_LIMIT)
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(format!("{} music", tokens.join(" ")))
    }
}
