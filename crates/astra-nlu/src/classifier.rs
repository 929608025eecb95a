//! Lexical intent classifier.
//!
//! Classification is a pure function over the utterance text: greeting
//! words match as substrings (intentionally permissive), the command sets
//! match the whole trimmed text exactly, and everything else falls through
//! to category/comparison/statistics keyword detection. Nothing here ever
//! fails; unmatched input degrades to [`Intent::Unrecognized`].

use astra_core::types::EntityCategory;

/// Intent of a single utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Help,
    Capabilities,
    Suggestions,
    Farewell,
    EntityQuery(EntityCategory),
    Comparison,
    Statistics,
    Unrecognized,
}

/// Greeting words matched as substrings anywhere in the text.
///
/// A longer sentence merely containing one of these still classifies as a
/// greeting; that looseness is part of the contract.
const GREETING_WORDS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "namaste",
    "start",
    "begin",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Exact-match phrase sets; the whole trimmed-lowercased text must equal
/// one of the listed phrases.
const HELP_PHRASES: &[&str] = &["help", "menu", "options", "what can you do"];
const CAPABILITY_PHRASES: &[&str] = &["features", "capabilities", "abilities"];
const SUGGESTION_PHRASES: &[&str] = &["suggest", "suggestions", "topics", "examples"];
const FAREWELL_PHRASES: &[&str] = &["thanks", "thank you", "bye", "goodbye"];

/// Keywords routing to the statistics intent.
const STATISTICS_MARKERS: &[&str] = &["how many", "count", "statistics", "stats", "total"];

/// Keywords routing to the comparison intent.
const COMPARISON_MARKERS: &[&str] = &["compare", " vs ", " vs.", "versus"];

/// Category keywords checked in fixed priority order.
const CATEGORY_KEYWORDS: &[(&str, EntityCategory)] = &[
    ("satellite", EntityCategory::Satellite),
    ("mission", EntityCategory::Mission),
    ("vehicle", EntityCategory::Vehicle),
    ("rocket", EntityCategory::Vehicle),
    ("launcher", EntityCategory::Vehicle),
    ("agenc", EntityCategory::Agency),
    ("technolog", EntityCategory::Technology),
];

/// Classify an utterance into an [`Intent`].
pub fn classify(text: &str) -> Intent {
    let normalized = text.trim().to_lowercase();

    if GREETING_WORDS.iter().any(|g| normalized.contains(g)) {
        return Intent::Greeting;
    }

    if HELP_PHRASES.contains(&normalized.as_str()) {
        return Intent::Help;
    }
    if CAPABILITY_PHRASES.contains(&normalized.as_str()) {
        return Intent::Capabilities;
    }
    if SUGGESTION_PHRASES.contains(&normalized.as_str()) {
        return Intent::Suggestions;
    }
    if FAREWELL_PHRASES.contains(&normalized.as_str()) {
        return Intent::Farewell;
    }

    // Comparison before statistics so "compare launch counts" compares.
    if COMPARISON_MARKERS.iter().any(|m| normalized.contains(m)) {
        return Intent::Comparison;
    }
    if STATISTICS_MARKERS.iter().any(|m| normalized.contains(m)) {
        return Intent::Statistics;
    }

    for (keyword, category) in CATEGORY_KEYWORDS {
        if normalized.contains(keyword) {
            return Intent::EntityQuery(*category);
        }
    }

    Intent::Unrecognized
}
