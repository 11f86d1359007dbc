// ABOUTME: Catalog trigger decision and search term extraction
// ABOUTME: Filters greetings and non-shopping intents, tokenizes shopping queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Trigger decision and term extraction
//!
//! Catalog evidence is only worth building for queries that plausibly shop
//! for something. Greetings and clearly non-shopping intents skip the stage
//! entirely; everything else is tokenized into lowercase search terms with
//! stop words removed. Shoppers write in both English and romanized Hindi,
//! so both vocabularies appear in the stop and intent lists.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum number of extracted terms
pub const MAX_TERMS: usize = 8;

/// Minimum term length in characters
const MIN_TERM_CHARS: usize = 3;

/// Queries shorter than this are not worth a catalog lookup
const MIN_QUERY_CHARS: usize = 4;

/// Function words dropped during term extraction (English + romanized Hindi)
const STOP_WORDS: &[&str] = &[
    // English
    "the", "and", "for", "with", "that", "this", "you", "your", "have", "has", "are", "was",
    "can", "could", "will", "would", "should", "what", "which", "who", "how", "when", "where",
    "there", "here", "from", "not", "but", "out", "about", "any", "all", "some", "its", "also",
    "get", "got", "please", "want", "need", "show", "find", "give", "tell", "looking", "like",
    "under", "below", "above", "over", "between", "within", "around", "than", "them", "then",
    // Romanized Hindi
    "hai", "hain", "kya", "koi", "kuch", "mujhe", "mera", "meri", "mere", "aap", "chahiye",
    "chahie", "wala", "wali", "wale", "liye", "aur", "bhi", "nahi", "nahin", "karo", "kar",
    "hun", "kaise", "batao", "dikhao", "dijiye", "mein",
];

/// Budget/price/purchase vocabulary that marks shopping intent on its own
const PURCHASE_VOCABULARY: &[&str] = &[
    "buy", "purchase", "order", "shop", "shopping", "price", "cost", "cheap", "cheapest",
    "budget", "under", "below", "within", "discount", "offer", "deal", "sale", "mrp", "rupee",
    "rupees", "kharid", "kharidna", "sasta", "saste", "sasti", "daam", "keemat", "kitna",
    "kitne",
];

fn greeting_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"^(hi+|hey+|hello+|yo|namaste|namaskar|hola|howdy|greetings|sup|wassup|good\s+(morning|afternoon|evening|night))(\s+(there|all|everyone|team|guys|ji|bhai|friend|dear))*$",
            )
            .ok()
        })
        .as_ref()
}

fn non_shopping_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"\b(joke|jokes|shayari|poem|story|riddle|song|lyrics|translate|translation|weather|barish|temperature|news|headlines?|cricket|score|horoscope|rashifal|essay|homework)\b|meaning of|capital of",
            )
            .ok()
        })
        .as_ref()
}

/// Decide whether the query should skip catalog evidence entirely
///
/// Empty or very short queries, pure greetings of at most three words, and
/// recognizably non-shopping intents are skipped.
#[must_use]
pub fn should_skip_query(query: &str) -> bool {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_CHARS {
        return true;
    }

    let lowered = trimmed.to_lowercase();
    let normalized = strip_punctuation(&lowered);
    let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

    if normalized.split_whitespace().count() <= 3 {
        if let Some(pattern) = greeting_pattern() {
            if pattern.is_match(&normalized) {
                return true;
            }
        }
    }

    if let Some(pattern) = non_shopping_pattern() {
        if pattern.is_match(&normalized) {
            return true;
        }
    }

    false
}

/// True when the query carries budget/price/purchase vocabulary
#[must_use]
pub fn has_purchase_vocabulary(query: &str) -> bool {
    let lowered = query.to_lowercase();
    if lowered.contains('₹') || lowered.contains('$') {
        return true;
    }
    let normalized = strip_punctuation(&lowered);
    normalized
        .split_whitespace()
        .any(|word| PURCHASE_VOCABULARY.contains(&word) || word == "rs")
}

/// Extract lowercase search terms from a query
///
/// Punctuation except price symbols is stripped, tokens shorter than three
/// characters or in the stop-word list are dropped, duplicates are removed
/// preserving first occurrence, and at most [`MAX_TERMS`] terms are kept.
#[must_use]
pub fn extract_terms(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    let stripped = strip_punctuation(&lowered);

    let mut terms: Vec<String> = Vec::new();
    for token in stripped.split_whitespace() {
        if token.chars().count() < MIN_TERM_CHARS {
            continue;
        }
        if STOP_WORDS.contains(&token) {
            continue;
        }
        if terms.iter().any(|t| t == token) {
            continue;
        }
        terms.push(token.to_owned());
        if terms.len() == MAX_TERMS {
            break;
        }
    }
    terms
}

/// Replace punctuation with spaces, keeping letters, digits, and price symbols
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || c == '₹' || c == '$' {
                c
            } else {
                ' '
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_drops_short_tokens_and_stop_words() {
        let terms = extract_terms("Show me the best red shoes for my son");
        assert_eq!(terms, vec!["best", "red", "shoes", "son"]);
    }

    #[test]
    fn extraction_is_idempotent_and_order_preserving() {
        let terms = extract_terms("red shoes red SHOES running");
        assert_eq!(terms, vec!["red", "shoes", "running"]);

        let joined = terms.join(" ");
        assert_eq!(extract_terms(&joined), terms);
    }

    #[test]
    fn extraction_caps_term_count() {
        let query = "alpha bravo charlie delta echo foxtrot golf hotel india juliet";
        assert_eq!(extract_terms(query).len(), MAX_TERMS);
    }

    #[test]
    fn no_term_shorter_than_three_chars() {
        let terms = extract_terms("tv 4k lg oled remote");
        assert!(terms.iter().all(|t| t.chars().count() >= 3));
    }

    #[test]
    fn price_symbols_survive_stripping() {
        let terms = extract_terms("earphones ₹500 budget!");
        assert!(terms.contains(&"₹500".to_owned()));
        assert!(terms.contains(&"earphones".to_owned()));
    }

    #[test]
    fn hindi_function_words_are_dropped() {
        let terms = extract_terms("mujhe sasta phone chahiye bhai");
        assert_eq!(terms, vec!["sasta", "phone"]);
    }

    #[test]
    fn skips_empty_and_tiny_queries() {
        assert!(should_skip_query(""));
        assert!(should_skip_query("  "));
        assert!(should_skip_query("hey"));
    }

    #[test]
    fn skips_pure_greetings_up_to_three_words() {
        assert!(should_skip_query("Hello!"));
        assert!(should_skip_query("hi there"));
        assert!(should_skip_query("good morning everyone"));
        assert!(should_skip_query("namaste ji"));
        // Greeting plus a real request is not a pure greeting.
        assert!(!should_skip_query("hello I need running shoes"));
    }

    #[test]
    fn skips_non_shopping_intents() {
        assert!(should_skip_query("tell me a joke"));
        assert!(should_skip_query("what is the weather today"));
        assert!(should_skip_query("translate this to hindi"));
        assert!(!should_skip_query("red running shoes"));
    }

    #[test]
    fn detects_purchase_vocabulary() {
        assert!(has_purchase_vocabulary("shoes under 2000"));
        assert!(has_purchase_vocabulary("kya price hai"));
        assert!(has_purchase_vocabulary("anything for ₹500"));
        assert!(has_purchase_vocabulary("sasta phone"));
        assert!(!has_purchase_vocabulary("red running shoes"));
    }
}
