//! Scopes an aggregated `PatternSet` down to the entities textually relevant
//! to one product. Pure and side-effect free, so callers may fan it out
//! across products freely.

use adforge_core::types::{HighPerformingKeyword, PatternSet, Product};
use tracing::debug;

/// Minimum token length considered meaningful when matching product names.
const MIN_TOKEN_LEN: usize = 3;

/// Tokens extracted from a product used to test pattern-text relevance.
struct ProductTerms {
    tokens: Vec<String>,
    name: String,
    category: Option<String>,
    description: Option<String>,
}

impl ProductTerms {
    fn from_product(product: &Product) -> Self {
        let name = product.name.to_lowercase();
        let tokens = name
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_' || c == ',')
            .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
            .map(|t| t.to_string())
            .collect();

        Self {
            tokens,
            name,
            category: product
                .category
                .as_deref()
                .map(str::to_lowercase)
                .filter(|c| !c.is_empty()),
            description: product
                .description
                .as_deref()
                .map(str::to_lowercase)
                .filter(|d| !d.is_empty()),
        }
    }

    /// A pattern text matches when it contains any product token, the full
    /// product name, the category, or the description.
    fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.tokens.iter().any(|t| text.contains(t.as_str()))
            || text.contains(&self.name)
            || self
                .category
                .as_deref()
                .is_some_and(|c| text.contains(c))
            || self
                .description
                .as_deref()
                .is_some_and(|d| text.contains(d))
    }
}

/// Filter a category of pattern items, keeping the full original list when
/// nothing matches. Callers must never see a category silently emptied by
/// over-aggressive filtering.
fn filter_with_fallback<T: Clone>(
    items: &[T],
    category: &str,
    mut matches: impl FnMut(&T) -> bool,
) -> Vec<T> {
    let filtered: Vec<T> = items.iter().filter(|item| matches(item)).cloned().collect();
    if filtered.is_empty() && !items.is_empty() {
        debug!(category, "no pattern items matched, keeping unsegmented list");
        return items.to_vec();
    }
    filtered
}

fn segment_keywords(
    keywords: &[HighPerformingKeyword],
    terms: &ProductTerms,
) -> Vec<HighPerformingKeyword> {
    filter_with_fallback(keywords, "keywords", |kw| terms.matches(&kw.text))
}

/// Produce a product-specific view of an aggregated pattern set.
///
/// Keywords, themes, headline templates, and description templates are each
/// filtered independently; bidding statistics are account-wide and pass
/// through untouched.
pub fn segment_patterns_by_product(aggregated: &PatternSet, product: &Product) -> PatternSet {
    let terms = ProductTerms::from_product(product);

    let mut segmented = aggregated.clone();

    segmented.high_performing_keywords =
        segment_keywords(&aggregated.high_performing_keywords, &terms);

    segmented.ad_group_structure.themes = filter_with_fallback(
        &aggregated.ad_group_structure.themes,
        "themes",
        |theme| terms.matches(theme),
    );

    segmented.ad_copy.headline_templates = filter_with_fallback(
        &aggregated.ad_copy.headline_templates,
        "headline_templates",
        |template| terms.matches(template),
    );
    segmented.ad_copy.description_templates = filter_with_fallback(
        &aggregated.ad_copy.description_templates,
        "description_templates",
        |template| terms.matches(template),
    );

    segmented.product_id = Some(product.id.clone());
    segmented.product_name = Some(product.name.clone());

    segmented
}

/// Segment a pattern set once per product.
pub fn segment_patterns_for_all_products(
    aggregated: &PatternSet,
    products: &[Product],
) -> Vec<PatternSet> {
    products
        .iter()
        .map(|product| segment_patterns_by_product(aggregated, product))
        .collect()
}
