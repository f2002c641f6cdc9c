//! Full re-validation of an edited preview against the platform rules.
//! Walks everything and collects every violation; callers present the full
//! list rather than the first failure.

use crate::types::CampaignPreviewData;
use adforge_core::rules::{
    validate_ad_group_name, validate_description, validate_final_url, validate_headline,
    validate_keyword_text, MIN_DESCRIPTIONS_PER_AD, MIN_HEADLINES_PER_AD,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub row_id: String,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn error_for(&self, row_id: &str, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.row_id == row_id && e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn warning_for(&self, row_id: &str, field: &str) -> Option<&str> {
        self.warnings
            .iter()
            .find(|w| w.row_id == row_id && w.field == field)
            .map(|w| w.message.as_str())
    }
}

fn issue(row_id: String, field: &str, message: String) -> ValidationIssue {
    ValidationIssue {
        row_id,
        field: field.to_string(),
        message,
    }
}

/// Validate every ad group, keyword, and ad in the preview, including the
/// structural headline/description floors.
pub fn validate_campaign_preview(preview: &CampaignPreviewData) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for ad_group in &preview.ad_groups {
        let name_outcome = validate_ad_group_name(&ad_group.name);
        if let Some(message) = name_outcome.error {
            errors.push(issue(ad_group.id.clone(), "name", message));
        }

        for (index, keyword) in ad_group.keywords.iter().enumerate() {
            let outcome = validate_keyword_text(&keyword.text);
            if let Some(message) = outcome.error {
                errors.push(issue(
                    format!("keyword-{}-{}", ad_group.id, index),
                    "text",
                    message,
                ));
            }
        }

        for (ad_index, ad) in ad_group.ads.iter().enumerate() {
            let ad_row_id = format!("ad-{}-{}", ad_group.id, ad_index);

            for (h_index, headline) in ad.headlines.iter().enumerate() {
                let outcome = validate_headline(&headline.text);
                let row_id = format!("{}-headline-{}", ad_row_id, h_index);
                if let Some(message) = outcome.error {
                    errors.push(issue(row_id, "headline", message));
                } else if let Some(message) = outcome.warning {
                    warnings.push(issue(row_id, "headline", message));
                }
            }
            if ad.headlines.len() < MIN_HEADLINES_PER_AD {
                errors.push(issue(
                    ad_row_id.clone(),
                    "headlines",
                    "At least 3 headlines are required".to_string(),
                ));
            }

            for (d_index, description) in ad.descriptions.iter().enumerate() {
                let outcome = validate_description(&description.text);
                let row_id = format!("{}-description-{}", ad_row_id, d_index);
                if let Some(message) = outcome.error {
                    errors.push(issue(row_id, "description", message));
                } else if let Some(message) = outcome.warning {
                    warnings.push(issue(row_id, "description", message));
                }
            }
            if ad.descriptions.len() < MIN_DESCRIPTIONS_PER_AD {
                errors.push(issue(
                    ad_row_id.clone(),
                    "descriptions",
                    "At least 2 descriptions are required".to_string(),
                ));
            }

            let outcome = validate_final_url(&ad.final_url);
            if let Some(message) = outcome.error {
                errors.push(issue(ad_row_id, "final_url", message));
            }
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AdGroupPreviewRow, AdRow, KeywordRow};
    use adforge_core::types::{
        AdDescription, AdHeadline, KeywordOrigin, KeywordSource, MatchType,
    };

    fn keyword_row(id: &str, text: &str) -> KeywordRow {
        KeywordRow {
            id: id.to_string(),
            text: text.to_string(),
            match_type: MatchType::Broad,
            source: KeywordSource {
                origin: KeywordOrigin::ModelGenerated,
                keyword: text.to_string(),
                relevance: 0.8,
                confidence: 0.7,
                performance: None,
            },
            suggested_bid: None,
            score: None,
        }
    }

    fn headline(text: &str) -> AdHeadline {
        AdHeadline {
            text: text.to_string(),
            pinned: Some(false),
            position: None,
        }
    }

    fn description(text: &str) -> AdDescription {
        AdDescription {
            text: text.to_string(),
        }
    }

    fn sample_preview() -> CampaignPreviewData {
        let mut preview = CampaignPreviewData {
            campaign_id: "campaign-1".to_string(),
            campaign_name: "Wireless Mouse - Campaign".to_string(),
            ad_groups: vec![AdGroupPreviewRow {
                id: "adgroup-0".to_string(),
                name: "Wireless Mouse".to_string(),
                product_id: "p1".to_string(),
                product_name: "Wireless Mouse".to_string(),
                keywords: vec![keyword_row("kw-0-0", "wireless mouse")],
                ads: vec![AdRow {
                    id: "ad-0-0".to_string(),
                    ad_group_id: "adgroup-0".to_string(),
                    headlines: vec![
                        headline("Wireless Mouse Sale"),
                        headline("Free Shipping Today"),
                        headline("Shop Ergonomic Mice"),
                    ],
                    descriptions: vec![
                        description("Comfortable wireless mice with silent clicks."),
                        description("Order today and enjoy fast free delivery."),
                    ],
                    final_url: "https://shop.example.com/mouse".to_string(),
                    display_url: None,
                    paths: vec![],
                }],
            }],
            total_keywords: 0,
            total_ads: 0,
        };
        preview.recompute_totals();
        preview
    }

    #[test]
    fn test_clean_preview_is_valid() {
        let result = validate_campaign_preview(&sample_preview());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_both_structural_floors_reported_together() {
        let mut preview = sample_preview();
        let ad = &mut preview.ad_groups[0].ads[0];
        ad.headlines.truncate(2);
        ad.descriptions.truncate(1);

        let result = validate_campaign_preview(&preview);
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "headlines" && e.message.contains("At least 3")));
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "descriptions" && e.message.contains("At least 2")));
    }

    #[test]
    fn test_all_violations_collected() {
        let mut preview = sample_preview();
        preview.ad_groups[0].name = "bad {name}".to_string();
        preview.ad_groups[0].keywords[0].text = "k".repeat(81);
        preview.ad_groups[0].ads[0].final_url = "not a url".to_string();

        let result = validate_campaign_preview(&preview);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_short_headline_is_warning_not_error() {
        let mut preview = sample_preview();
        preview.ad_groups[0].ads[0].headlines[0].text = "Buy".to_string();

        let result = validate_campaign_preview(&preview);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result
            .warning_for("ad-adgroup-0-0-headline-0", "headline")
            .is_some());
    }

    #[test]
    fn test_row_id_scheme() {
        let mut preview = sample_preview();
        preview.ad_groups[0].keywords[0].text = String::new();

        let result = validate_campaign_preview(&preview);
        assert!(result.error_for("keyword-adgroup-0-0", "text").is_some());
    }
}
