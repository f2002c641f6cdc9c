//! Rule-based keyword generation: extracts candidate keywords from product
//! data, pulls in historically high-performing keywords by term overlap,
//! then deduplicates, scores, and ranks the combined pool.

use crate::traits::{KeywordGenerator, KeywordRequest};
use adforge_core::config::GenerationConfig;
use adforge_core::rules::validate_keyword_text;
use adforge_core::types::{
    GeneratedKeyword, KeywordOrigin, KeywordPerformance, KeywordSource, MatchType, PatternSet,
    Product,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Action words that signal purchase intent and lift a keyword's score.
const INTENT_WORDS: [&str; 8] = [
    "buy", "shop", "purchase", "order", "find", "best", "cheap", "discount",
];

fn source(origin: KeywordOrigin, keyword: String, relevance: f64, confidence: f64) -> KeywordSource {
    KeywordSource {
        origin,
        keyword,
        relevance,
        confidence,
        performance: None,
    }
}

/// Extract candidate keywords from the product's own name, category, and
/// description. Name-derived terms carry the highest relevance.
pub fn extract_keywords_from_product(product: &Product) -> Vec<KeywordSource> {
    let mut keywords = Vec::new();

    let name = product.name.to_lowercase();
    if !name.is_empty() {
        for word in name
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|w| w.chars().count() > 2)
        {
            keywords.push(source(
                KeywordOrigin::ProductData,
                word.to_string(),
                0.9,
                0.8,
            ));
        }
        keywords.push(source(KeywordOrigin::ProductData, name.clone(), 0.95, 0.9));
    }

    if let Some(category) = product.category.as_deref().filter(|c| !c.is_empty()) {
        let category = category.to_lowercase();
        keywords.push(source(
            KeywordOrigin::ProductData,
            category.clone(),
            0.7,
            0.7,
        ));
        if !name.is_empty() {
            keywords.push(source(
                KeywordOrigin::ProductData,
                format!("{} {}", category, name),
                0.8,
                0.75,
            ));
        }
    }

    if let Some(description) = product.description.as_deref() {
        // Longer words carry more meaning; keep the first few only.
        for word in description
            .to_lowercase()
            .split_whitespace()
            .filter(|w| w.chars().count() > 4)
            .take(5)
        {
            keywords.push(source(
                KeywordOrigin::ProductData,
                word.to_string(),
                0.6,
                0.6,
            ));
        }
    }

    keywords
}

/// Pull in historically high-performing keywords whose text overlaps the
/// product's terms, carrying their performance numbers along.
pub fn match_keywords_from_patterns(
    product: &Product,
    patterns: Option<&PatternSet>,
) -> Vec<KeywordSource> {
    let Some(patterns) = patterns else {
        return Vec::new();
    };
    if patterns.high_performing_keywords.is_empty() {
        return Vec::new();
    }

    let name = product.name.to_lowercase();
    let mut terms: Vec<String> = name.split_whitespace().map(str::to_string).collect();
    if let Some(category) = product.category.as_deref().filter(|c| !c.is_empty()) {
        terms.push(category.to_lowercase());
    }

    let mut matched = Vec::new();
    for hp in &patterns.high_performing_keywords {
        let text = hp.text.to_lowercase();

        let mut similarity: f64 = 0.0;
        for term in &terms {
            if text.contains(term.as_str()) {
                similarity += 0.3;
            }
            if term.contains(&text) {
                similarity += 0.2;
            }
        }

        if similarity > 0.2 {
            matched.push(KeywordSource {
                origin: KeywordOrigin::ExistingCampaign,
                keyword: hp.text.clone(),
                relevance: similarity.min(0.8),
                confidence: 0.7,
                performance: Some(KeywordPerformance {
                    ctr: Some(hp.ctr),
                    conversions: Some(hp.conversions),
                    roas: hp.roas,
                    average_cpc: hp.average_cpc,
                }),
            });
        }
    }

    matched
}

/// Deduplicate case-insensitively (higher relevance wins, confidence breaks
/// ties), score, and keep the top `max_keywords`.
pub fn aggregate_and_rank(
    all_sources: Vec<KeywordSource>,
    max_keywords: usize,
) -> Vec<GeneratedKeyword> {
    let mut by_text: HashMap<String, KeywordSource> = HashMap::new();
    for candidate in all_sources {
        let key = candidate.keyword.trim().to_lowercase();
        let keep = match by_text.get(&key) {
            Some(existing) => {
                candidate.relevance > existing.relevance
                    || (candidate.relevance == existing.relevance
                        && candidate.confidence > existing.confidence)
            }
            None => true,
        };
        if keep {
            by_text.insert(key, candidate);
        }
    }

    let mut keywords: Vec<GeneratedKeyword> = by_text
        .into_values()
        .map(|src| {
            let performance_score = src
                .performance
                .as_ref()
                .map(|p| {
                    (p.ctr.unwrap_or(0.0) * 0.3
                        + p.conversions.unwrap_or(0.0) * 0.3
                        + p.roas.unwrap_or(0.0) * 0.4)
                        / 100.0
                })
                .unwrap_or(0.0);

            let has_intent = INTENT_WORDS.iter().any(|w| src.keyword.contains(w));
            let intent_score = if has_intent { 0.8 } else { 0.5 };

            let score = src.relevance * 0.4
                + src.confidence * 0.2
                + performance_score * 0.3
                + intent_score * 0.1;

            let match_type = match src.origin {
                KeywordOrigin::ProductData | KeywordOrigin::ExistingCampaign => MatchType::Phrase,
                _ => MatchType::Broad,
            };

            let suggested_bid = src.performance.as_ref().and_then(|p| p.average_cpc);

            GeneratedKeyword {
                text: src.keyword.clone(),
                match_type,
                source: src,
                suggested_bid,
                score: Some(score),
            }
        })
        .collect();

    keywords.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    keywords.truncate(max_keywords);
    keywords
}

pub struct RuleBasedKeywordGenerator {
    config: GenerationConfig,
}

impl RuleBasedKeywordGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }
}

impl Default for RuleBasedKeywordGenerator {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

#[async_trait]
impl KeywordGenerator for RuleBasedKeywordGenerator {
    async fn generate(&self, request: &KeywordRequest) -> anyhow::Result<Vec<GeneratedKeyword>> {
        let max_keywords = request.max_keywords.unwrap_or(self.config.max_keywords);

        let mut sources = extract_keywords_from_product(&request.product);
        sources.extend(match_keywords_from_patterns(
            &request.product,
            request.patterns.as_ref(),
        ));

        let ranked = aggregate_and_rank(sources, max_keywords);

        // Entities must be born valid; drop anything the platform would reject.
        let keywords: Vec<GeneratedKeyword> = ranked
            .into_iter()
            .filter(|kw| validate_keyword_text(&kw.text).valid)
            .collect();

        debug!(
            product = %request.product.name,
            count = keywords.len(),
            "generated keywords"
        );
        Ok(keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::types::{HighPerformingKeyword, ProductSource};

    fn sample_product() -> Product {
        Product {
            id: "p1".to_string(),
            name: "Wireless Mouse".to_string(),
            url: "https://shop.example.com/p/1".to_string(),
            category: Some("Electronics".to_string()),
            price: Some(29.99),
            description: Some("Ergonomic wireless mouse with silent clicks".to_string()),
            source: ProductSource::Csv,
            source_file: None,
        }
    }

    #[test]
    fn test_extraction_covers_name_category_description() {
        let sources = extract_keywords_from_product(&sample_product());
        let texts: Vec<&str> = sources.iter().map(|s| s.keyword.as_str()).collect();
        assert!(texts.contains(&"wireless"));
        assert!(texts.contains(&"mouse"));
        assert!(texts.contains(&"wireless mouse"));
        assert!(texts.contains(&"electronics"));
        assert!(texts.contains(&"electronics wireless mouse"));
        assert!(texts.contains(&"ergonomic"));
    }

    #[test]
    fn test_full_name_has_highest_relevance() {
        let sources = extract_keywords_from_product(&sample_product());
        let full = sources
            .iter()
            .find(|s| s.keyword == "wireless mouse")
            .unwrap();
        assert!(sources.iter().all(|s| s.relevance <= full.relevance));
    }

    #[test]
    fn test_pattern_matching_carries_performance() {
        let patterns = PatternSet {
            high_performing_keywords: vec![HighPerformingKeyword {
                text: "wireless mouse deals".to_string(),
                match_type: MatchType::Phrase,
                ctr: 4.2,
                conversions: 31.0,
                roas: Some(3.5),
                impressions: None,
                clicks: None,
                cost: None,
                average_cpc: Some(0.65),
            }],
            ..Default::default()
        };

        let matched = match_keywords_from_patterns(&sample_product(), Some(&patterns));
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].origin, KeywordOrigin::ExistingCampaign);
        assert!(matched[0].performance.is_some());
    }

    #[test]
    fn test_unrelated_pattern_keywords_ignored() {
        let patterns = PatternSet {
            high_performing_keywords: vec![HighPerformingKeyword {
                text: "running shoes".to_string(),
                match_type: MatchType::Broad,
                ctr: 2.0,
                conversions: 8.0,
                roas: None,
                impressions: None,
                clicks: None,
                cost: None,
                average_cpc: None,
            }],
            ..Default::default()
        };

        let matched = match_keywords_from_patterns(&sample_product(), Some(&patterns));
        assert!(matched.is_empty());
    }

    #[test]
    fn test_dedup_keeps_higher_relevance() {
        let sources = vec![
            source(KeywordOrigin::ProductData, "wireless mouse".to_string(), 0.95, 0.9),
            source(
                KeywordOrigin::ModelGenerated,
                "Wireless Mouse".to_string(),
                0.7,
                0.6,
            ),
        ];
        let ranked = aggregate_and_rank(sources, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].source.origin, KeywordOrigin::ProductData);
    }

    #[test]
    fn test_intent_words_rank_higher() {
        let sources = vec![
            source(KeywordOrigin::ModelGenerated, "buy wireless mouse".to_string(), 0.7, 0.6),
            source(KeywordOrigin::ModelGenerated, "wireless rodent".to_string(), 0.7, 0.6),
        ];
        let ranked = aggregate_and_rank(sources, 10);
        assert_eq!(ranked[0].text, "buy wireless mouse");
    }

    #[test]
    fn test_match_type_by_origin() {
        let sources = vec![
            source(KeywordOrigin::ProductData, "wireless mouse".to_string(), 0.9, 0.8),
            source(KeywordOrigin::ModelGenerated, "pointer device".to_string(), 0.6, 0.5),
        ];
        let ranked = aggregate_and_rank(sources, 10);
        let by_text: HashMap<&str, MatchType> = ranked
            .iter()
            .map(|k| (k.text.as_str(), k.match_type))
            .collect();
        assert_eq!(by_text["wireless mouse"], MatchType::Phrase);
        assert_eq!(by_text["pointer device"], MatchType::Broad);
    }

    #[tokio::test]
    async fn test_generate_caps_and_filters() {
        let generator = RuleBasedKeywordGenerator::default();
        let request = KeywordRequest {
            product: sample_product(),
            patterns: None,
            max_keywords: Some(3),
        };
        let keywords = generator.generate(&request).await.unwrap();
        assert!(keywords.len() <= 3);
        assert!(!keywords.is_empty());
        assert!(keywords
            .iter()
            .all(|k| validate_keyword_text(&k.text).valid));
    }
}
