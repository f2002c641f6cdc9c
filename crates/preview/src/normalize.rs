//! Normalization of union-shaped plan entries. Persisted campaigns mix bare
//! strings with structured objects; each entity kind is normalized by
//! exactly one function here so downstream code never re-checks shape.

use adforge_core::types::{
    AdDescription, AdHeadline, DescriptionEntry, GeneratedKeyword, HeadlineEntry, KeywordEntry,
    KeywordOrigin, KeywordSource, MatchType,
};

/// Relevance/confidence assigned to keywords that arrive as bare strings
/// with no provenance of their own.
const SYNTHESIZED_RELEVANCE: f64 = 0.8;
const SYNTHESIZED_CONFIDENCE: f64 = 0.7;

/// A bare string becomes a broad-match keyword with a synthesized
/// low-confidence model-generated source.
pub fn normalize_keyword(entry: &KeywordEntry) -> GeneratedKeyword {
    match entry {
        KeywordEntry::Keyword(keyword) => keyword.clone(),
        KeywordEntry::Text(text) => GeneratedKeyword {
            text: text.clone(),
            match_type: MatchType::Broad,
            source: KeywordSource {
                origin: KeywordOrigin::ModelGenerated,
                keyword: text.clone(),
                relevance: SYNTHESIZED_RELEVANCE,
                confidence: SYNTHESIZED_CONFIDENCE,
                performance: None,
            },
            suggested_bid: None,
            score: None,
        },
    }
}

/// A bare string becomes an unpinned headline at the given position.
pub fn normalize_headline(entry: &HeadlineEntry, position: usize) -> AdHeadline {
    match entry {
        HeadlineEntry::Headline(headline) => headline.clone(),
        HeadlineEntry::Text(text) => AdHeadline {
            text: text.clone(),
            pinned: Some(false),
            position: Some(position),
        },
    }
}

pub fn normalize_description(entry: &DescriptionEntry) -> AdDescription {
    match entry {
        DescriptionEntry::Description(description) => description.clone(),
        DescriptionEntry::Text(text) => AdDescription { text: text.clone() },
    }
}
