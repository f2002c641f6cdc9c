//! Template-driven ad copy: variable substitution over learned or default
//! headline/description templates, the rule-based RSA generator built on
//! top of it, and the pre-export ad copy validator.

use crate::traits::{
    AdCopyCheck, AdCopyCheckRequest, AdCopyValidator, RsaGenerator, RsaRequest,
};
use adforge_core::config::GenerationConfig;
use adforge_core::rules::{
    MAX_DESCRIPTION_LEN, MAX_HEADLINE_LEN, MIN_DESCRIPTIONS_PER_AD, MIN_HEADLINES_PER_AD,
};
use adforge_core::types::{
    AdDescription, AdHeadline, GeneratedRsa, PatternSet, Product,
};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;
use url::Url;
use uuid::Uuid;

// ─── Templates ──────────────────────────────────────────────────────────

const DEFAULT_HEADLINE_TEMPLATES: [&str; 5] = [
    "{product_name}",
    "Shop {product_name}",
    "Best {category}",
    "{product_name} - {price}",
    "Buy {product_name} Online",
];

const DEFAULT_DESCRIPTION_TEMPLATES: [&str; 3] = [
    "Discover {product_name}. {description}",
    "Shop {product_name} - {category}. Quality products at great prices.",
    "Find {product_name} online. Quality selection with fast shipping.",
];

const DEFAULT_CTAS: [&str; 5] = ["Shop Now", "Buy Now", "Learn More", "Get Started", "Order Today"];

/// Top-up candidates used when template output misses the structural floors.
const FALLBACK_HEADLINES: [&str; 3] = ["Great Deals Today", "Free Shipping Available", "Shop Online Now"];
const FALLBACK_DESCRIPTIONS: [&str; 2] = [
    "Quality products at great prices with fast, reliable delivery.",
    "Order today and enjoy dependable service from a trusted store.",
];

fn domain_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
}

/// Substitute `{placeholder}` variables in a template with product data.
pub fn substitute_variables(template: &str, product: &Product) -> String {
    let name_parts: Vec<&str> = product
        .name
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|p| !p.is_empty())
        .collect();
    let brand = name_parts.first().copied().unwrap_or("");
    let model = name_parts.get(1..).map(|m| m.join(" ")).unwrap_or_default();

    let price = product
        .price
        .map(|p| format!("${:.2}", p))
        .unwrap_or_default();

    template
        .replace("{product_name}", &product.name)
        .replace("{category}", product.category.as_deref().unwrap_or(""))
        .replace("{price}", &price)
        .replace("{description}", product.description.as_deref().unwrap_or(""))
        .replace("{brand}", brand)
        .replace("{model}", &model)
        .replace("{domain}", &domain_of(&product.url).unwrap_or_default())
        .replace("{benefit}", "quality")
        .trim()
        .to_string()
}

/// Templates to generate from: learned patterns first, defaults when a
/// category carries none.
pub fn templates_from_patterns(
    patterns: Option<&PatternSet>,
) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut headlines: Vec<String> = Vec::new();
    let mut descriptions: Vec<String> = Vec::new();
    let mut ctas: Vec<String> = Vec::new();

    if let Some(patterns) = patterns {
        headlines.extend(patterns.ad_copy.headline_templates.iter().take(5).cloned());
        descriptions.extend(patterns.ad_copy.description_templates.iter().take(3).cloned());
        ctas.extend(patterns.ad_copy.common_ctas.iter().cloned());
    }

    if headlines.is_empty() {
        headlines.extend(DEFAULT_HEADLINE_TEMPLATES.iter().map(|t| t.to_string()));
    }
    if descriptions.is_empty() {
        descriptions.extend(DEFAULT_DESCRIPTION_TEMPLATES.iter().map(|t| t.to_string()));
    }
    if ctas.is_empty() {
        ctas.extend(DEFAULT_CTAS.iter().map(|t| t.to_string()));
    }

    (headlines, descriptions, ctas)
}

fn push_unique(out: &mut Vec<String>, seen: &mut HashSet<String>, text: String, max_len: usize) {
    if text.is_empty() || text.chars().count() > max_len {
        return;
    }
    if seen.insert(text.clone()) {
        out.push(text);
    }
}

/// Generate candidate headlines (each ≤30 chars, deduplicated).
pub fn generate_headlines(
    product: &Product,
    patterns: Option<&PatternSet>,
    max_headlines: usize,
) -> Vec<String> {
    let (templates, _, ctas) = templates_from_patterns(patterns);
    let mut headlines = Vec::new();
    let mut seen = HashSet::new();

    for template in &templates {
        let headline = substitute_variables(template, product);
        push_unique(&mut headlines, &mut seen, headline, MAX_HEADLINE_LEN);
    }

    for cta in ctas.iter().take(3) {
        push_unique(
            &mut headlines,
            &mut seen,
            format!("{} - {}", product.name, cta),
            MAX_HEADLINE_LEN,
        );
    }

    if let Some(category) = product.category.as_deref().filter(|c| !c.is_empty()) {
        push_unique(
            &mut headlines,
            &mut seen,
            format!("{} - {}", category, product.name),
            MAX_HEADLINE_LEN,
        );
        push_unique(
            &mut headlines,
            &mut seen,
            format!("Shop {}", category),
            MAX_HEADLINE_LEN,
        );
    }

    if let Some(price) = product.price {
        push_unique(
            &mut headlines,
            &mut seen,
            format!("{} - ${:.2}", product.name, price),
            MAX_HEADLINE_LEN,
        );
        push_unique(
            &mut headlines,
            &mut seen,
            format!("Buy {} - ${:.2}", product.name, price),
            MAX_HEADLINE_LEN,
        );
    }

    // Meet the platform floor even for products with long names.
    if headlines.len() < MIN_HEADLINES_PER_AD {
        for fallback in FALLBACK_HEADLINES {
            push_unique(&mut headlines, &mut seen, fallback.to_string(), MAX_HEADLINE_LEN);
        }
    }

    headlines.truncate(max_headlines.max(MIN_HEADLINES_PER_AD));
    headlines
}

/// Generate candidate descriptions (each ≤90 chars, deduplicated).
pub fn generate_descriptions(
    product: &Product,
    patterns: Option<&PatternSet>,
    max_descriptions: usize,
) -> Vec<String> {
    let (_, templates, ctas) = templates_from_patterns(patterns);
    let mut descriptions = Vec::new();
    let mut seen = HashSet::new();

    for template in &templates {
        let description = substitute_variables(template, product);
        push_unique(&mut descriptions, &mut seen, description, MAX_DESCRIPTION_LEN);
    }

    if let Some(text) = product.description.as_deref().filter(|d| !d.is_empty()) {
        let short: String = text.chars().take(MAX_DESCRIPTION_LEN).collect();
        push_unique(&mut descriptions, &mut seen, short, MAX_DESCRIPTION_LEN);
    }

    for cta in ctas.iter().take(2) {
        push_unique(
            &mut descriptions,
            &mut seen,
            format!(
                "{}. Quality {}. {} today!",
                product.name,
                product.category.as_deref().unwrap_or("product"),
                cta
            ),
            MAX_DESCRIPTION_LEN,
        );
    }

    if descriptions.len() < MIN_DESCRIPTIONS_PER_AD {
        for fallback in FALLBACK_DESCRIPTIONS {
            push_unique(&mut descriptions, &mut seen, fallback.to_string(), MAX_DESCRIPTION_LEN);
        }
    }

    descriptions.truncate(max_descriptions.max(MIN_DESCRIPTIONS_PER_AD));
    descriptions
}

// ─── RSA generator ──────────────────────────────────────────────────────

pub struct RuleBasedRsaGenerator {
    config: GenerationConfig,
}

impl RuleBasedRsaGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }
}

impl Default for RuleBasedRsaGenerator {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

#[async_trait]
impl RsaGenerator for RuleBasedRsaGenerator {
    async fn generate(&self, request: &RsaRequest) -> anyhow::Result<GeneratedRsa> {
        let max_headlines = request.max_headlines.unwrap_or(self.config.max_headlines);
        let max_descriptions = request
            .max_descriptions
            .unwrap_or(self.config.max_descriptions);

        let product = &request.product;
        let headlines = generate_headlines(product, request.patterns.as_ref(), max_headlines);
        let descriptions =
            generate_descriptions(product, request.patterns.as_ref(), max_descriptions);

        let rsa = GeneratedRsa {
            id: format!("rsa-{}", Uuid::new_v4()),
            ad_group_id: request.ad_group_id.clone(),
            headlines: headlines
                .into_iter()
                .enumerate()
                .map(|(position, text)| AdHeadline {
                    text,
                    pinned: Some(false),
                    position: Some(position),
                })
                .collect(),
            descriptions: descriptions
                .into_iter()
                .map(|text| AdDescription { text })
                .collect(),
            final_url: product.url.clone(),
            display_url: domain_of(&product.url),
            paths: Vec::new(),
        };

        debug!(
            ad_group_id = %rsa.ad_group_id,
            headlines = rsa.headlines.len(),
            descriptions = rsa.descriptions.len(),
            "generated responsive search ad"
        );
        Ok(rsa)
    }
}

// ─── Ad copy validator ──────────────────────────────────────────────────

/// Offline stand-in for the server-side ad copy check run before export.
pub struct RuleBasedAdCopyValidator;

impl RuleBasedAdCopyValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RuleBasedAdCopyValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdCopyValidator for RuleBasedAdCopyValidator {
    async fn validate(&self, request: &AdCopyCheckRequest) -> anyhow::Result<AdCopyCheck> {
        let mut headline_errors = Vec::new();
        let mut description_errors = Vec::new();
        let mut headline_warnings = Vec::new();
        let mut description_warnings = Vec::new();

        if request.headlines.len() < MIN_HEADLINES_PER_AD {
            headline_errors.push(format!(
                "Minimum {} headlines required (found {})",
                MIN_HEADLINES_PER_AD,
                request.headlines.len()
            ));
        }
        for (index, headline) in request.headlines.iter().enumerate() {
            let len = headline.chars().count();
            if len == 0 {
                headline_errors.push(format!("Headline {}: cannot be empty", index + 1));
            } else if len > MAX_HEADLINE_LEN {
                headline_errors.push(format!(
                    "Headline {}: exceeds {} character limit ({} characters)",
                    index + 1,
                    MAX_HEADLINE_LEN,
                    len
                ));
            }
            if len > 0 && len < 5 {
                headline_warnings.push(format!(
                    "Headline {}: Very short ({} characters)",
                    index + 1,
                    len
                ));
            }
        }

        if request.descriptions.len() < MIN_DESCRIPTIONS_PER_AD {
            description_errors.push(format!(
                "Minimum {} descriptions required (found {})",
                MIN_DESCRIPTIONS_PER_AD,
                request.descriptions.len()
            ));
        }
        for (index, description) in request.descriptions.iter().enumerate() {
            let len = description.chars().count();
            if len == 0 {
                description_errors.push(format!("Description {}: cannot be empty", index + 1));
            } else if len > MAX_DESCRIPTION_LEN {
                description_errors.push(format!(
                    "Description {}: exceeds {} character limit ({} characters)",
                    index + 1,
                    MAX_DESCRIPTION_LEN,
                    len
                ));
            }
            if len > 0 && len < 10 {
                description_warnings.push(format!(
                    "Description {}: Very short ({} characters)",
                    index + 1,
                    len
                ));
            }
        }

        let unique_headlines: HashSet<&String> = request.headlines.iter().collect();
        if unique_headlines.len() < request.headlines.len() {
            headline_warnings.push("Some headlines are duplicates".to_string());
        }
        let unique_descriptions: HashSet<&String> = request.descriptions.iter().collect();
        if unique_descriptions.len() < request.descriptions.len() {
            description_warnings.push("Some descriptions are duplicates".to_string());
        }

        Ok(AdCopyCheck {
            valid: headline_errors.is_empty() && description_errors.is_empty(),
            headline_errors,
            description_errors,
            headline_warnings,
            description_warnings,
        })
    }
}
