//! Google Ads Editor CSV export. One row per (ad group × ad × keyword)
//! combination; ad groups without ads still emit keyword-only rows so no
//! keyword silently disappears from the artifact.

use adforge_core::error::{ForgeError, ForgeResult};
use adforge_core::rules::{MAX_DESCRIPTION_LEN, MAX_HEADLINE_LEN, MAX_KEYWORD_LEN};
use adforge_core::types::MatchType;
use adforge_preview::types::{AdRow, CampaignPreviewData};
use tracing::info;
use url::Url;

/// Columns the Google Ads Editor import expects, in order.
const HEADLINE_COLUMNS: usize = 15;
const DESCRIPTION_COLUMNS: usize = 4;

fn header() -> Vec<String> {
    let mut columns = vec![
        "Campaign".to_string(),
        "Campaign state".to_string(),
        "Ad group".to_string(),
        "Ad group state".to_string(),
        "Keyword".to_string(),
        "Match type".to_string(),
        "Keyword state".to_string(),
    ];
    for i in 1..=HEADLINE_COLUMNS {
        columns.push(format!("Headline {}", i));
    }
    for i in 1..=DESCRIPTION_COLUMNS {
        columns.push(format!("Description {}", i));
    }
    columns.extend([
        "Final URL".to_string(),
        "Display URL".to_string(),
        "Path 1".to_string(),
        "Path 2".to_string(),
    ]);
    columns
}

/// Google Ads Editor expects bracketed match types.
fn format_match_type(match_type: MatchType) -> &'static str {
    match match_type {
        MatchType::Broad => "[Broad]",
        MatchType::Phrase => "[Phrase]",
        MatchType::Exact => "[Exact]",
    }
}

fn display_url_of(ad: &AdRow) -> String {
    if let Some(display) = &ad.display_url {
        return display.clone();
    }
    Url::parse(&ad.final_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_default()
}

fn ad_columns(ad: Option<&AdRow>) -> Vec<String> {
    let mut columns = Vec::with_capacity(HEADLINE_COLUMNS + DESCRIPTION_COLUMNS + 4);
    for i in 0..HEADLINE_COLUMNS {
        columns.push(
            ad.and_then(|a| a.headlines.get(i))
                .map(|h| h.text.clone())
                .unwrap_or_default(),
        );
    }
    for i in 0..DESCRIPTION_COLUMNS {
        columns.push(
            ad.and_then(|a| a.descriptions.get(i))
                .map(|d| d.text.clone())
                .unwrap_or_default(),
        );
    }
    match ad {
        Some(ad) => {
            columns.push(ad.final_url.clone());
            columns.push(display_url_of(ad));
            columns.push(ad.paths.first().cloned().unwrap_or_default());
            columns.push(ad.paths.get(1).cloned().unwrap_or_default());
        }
        None => columns.extend([String::new(), String::new(), String::new(), String::new()]),
    }
    columns
}

/// Render the preview as a Google Ads Editor CSV string. Any failure
/// surfaces as a single `ForgeError::Export` message.
pub fn export_google_ads_editor_csv(preview: &CampaignPreviewData) -> ForgeResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(header())
        .map_err(|e| ForgeError::Export(e.to_string()))?;

    let mut rows = 0usize;
    for ad_group in &preview.ad_groups {
        // Keyword-only rows keep the ad group in the artifact when it has
        // no ads yet.
        let ads: Vec<Option<&AdRow>> = if ad_group.ads.is_empty() {
            vec![None]
        } else {
            ad_group.ads.iter().map(Some).collect()
        };

        for ad in ads {
            for keyword in &ad_group.keywords {
                let mut record = vec![
                    preview.campaign_name.clone(),
                    "Active".to_string(),
                    ad_group.name.clone(),
                    "Active".to_string(),
                    keyword.text.clone(),
                    format_match_type(keyword.match_type).to_string(),
                    "Active".to_string(),
                ];
                record.extend(ad_columns(ad));
                writer
                    .write_record(&record)
                    .map_err(|e| ForgeError::Export(e.to_string()))?;
                rows += 1;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ForgeError::Export(e.to_string()))?;
    let csv = String::from_utf8(bytes).map_err(|e| ForgeError::Export(e.to_string()))?;

    info!(campaign = %preview.campaign_name, rows, "exported campaign CSV");
    Ok(csv)
}

/// Structural pre-export check. Returns every problem found as a flat list
/// of messages; an empty list means the preview can be exported.
pub fn validate_for_export(preview: &CampaignPreviewData) -> Vec<String> {
    let mut errors = Vec::new();

    if preview.campaign_name.is_empty() {
        errors.push("Campaign name is required".to_string());
    }
    if preview.ad_groups.is_empty() {
        errors.push("At least one ad group is required".to_string());
    }

    for (ag_index, ad_group) in preview.ad_groups.iter().enumerate() {
        if ad_group.name.is_empty() {
            errors.push(format!("Ad group {} is missing a name", ag_index + 1));
        }
        if ad_group.keywords.is_empty() {
            errors.push(format!("Ad group \"{}\" has no keywords", ad_group.name));
        }

        for (kw_index, keyword) in ad_group.keywords.iter().enumerate() {
            if keyword.text.trim().is_empty() {
                errors.push(format!(
                    "Ad group \"{}\", keyword {} is empty",
                    ad_group.name,
                    kw_index + 1
                ));
            } else if keyword.text.chars().count() > MAX_KEYWORD_LEN {
                errors.push(format!(
                    "Ad group \"{}\", keyword \"{}\" exceeds {} characters",
                    ad_group.name, keyword.text, MAX_KEYWORD_LEN
                ));
            }
        }

        for (ad_index, ad) in ad_group.ads.iter().enumerate() {
            if ad.headlines.is_empty() {
                errors.push(format!(
                    "Ad group \"{}\", ad {} has no headlines",
                    ad_group.name,
                    ad_index + 1
                ));
            }
            for (h_index, headline) in ad.headlines.iter().enumerate() {
                if headline.text.chars().count() > MAX_HEADLINE_LEN {
                    errors.push(format!(
                        "Ad group \"{}\", ad {}, headline {} exceeds {} characters",
                        ad_group.name,
                        ad_index + 1,
                        h_index + 1,
                        MAX_HEADLINE_LEN
                    ));
                }
            }
            for (d_index, description) in ad.descriptions.iter().enumerate() {
                if description.text.chars().count() > MAX_DESCRIPTION_LEN {
                    errors.push(format!(
                        "Ad group \"{}\", ad {}, description {} exceeds {} characters",
                        ad_group.name,
                        ad_index + 1,
                        d_index + 1,
                        MAX_DESCRIPTION_LEN
                    ));
                }
            }
            if !ad.final_url.is_empty() {
                let valid_scheme = Url::parse(&ad.final_url)
                    .map(|u| u.scheme() == "http" || u.scheme() == "https")
                    .unwrap_or(false);
                if !valid_scheme {
                    errors.push(format!(
                        "Ad group \"{}\", ad {} has invalid final URL",
                        ad_group.name,
                        ad_index + 1
                    ));
                }
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::types::{AdDescription, AdHeadline, KeywordOrigin, KeywordSource};
    use adforge_preview::types::{AdGroupPreviewRow, KeywordRow};

    fn keyword_row(id: &str, text: &str, match_type: MatchType) -> KeywordRow {
        KeywordRow {
            id: id.to_string(),
            text: text.to_string(),
            match_type,
            source: KeywordSource {
                origin: KeywordOrigin::ProductData,
                keyword: text.to_string(),
                relevance: 0.9,
                confidence: 0.8,
                performance: None,
            },
            suggested_bid: None,
            score: None,
        }
    }

    fn ad(ad_group_id: &str, id: &str) -> AdRow {
        AdRow {
            id: id.to_string(),
            ad_group_id: ad_group_id.to_string(),
            headlines: vec![
                AdHeadline {
                    text: "Wireless Mouse Sale".to_string(),
                    pinned: Some(false),
                    position: Some(0),
                },
                AdHeadline {
                    text: "Free Shipping Today".to_string(),
                    pinned: Some(false),
                    position: Some(1),
                },
                AdHeadline {
                    text: "Shop Ergonomic Mice".to_string(),
                    pinned: Some(false),
                    position: Some(2),
                },
            ],
            descriptions: vec![
                AdDescription {
                    text: "Comfortable wireless mice with silent clicks.".to_string(),
                },
                AdDescription {
                    text: "Order today and enjoy fast free delivery.".to_string(),
                },
            ],
            final_url: "https://www.shop.example.com/mouse".to_string(),
            display_url: None,
            paths: vec!["mice".to_string()],
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
                keywords: vec![
                    keyword_row("kw-0-0", "wireless mouse", MatchType::Broad),
                    keyword_row("kw-0-1", "buy mouse online", MatchType::Phrase),
                ],
                ads: vec![ad("adgroup-0", "ad-0-0")],
            }],
            total_keywords: 0,
            total_ads: 0,
        };
        preview.recompute_totals();
        preview
    }

    #[test]
    fn test_row_per_ad_keyword_combination() {
        let csv = export_google_ads_editor_csv(&sample_preview()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        // Header plus 1 ad x 2 keywords.
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("\"Campaign\""));
        assert!(lines[1].contains("\"[Broad]\""));
        assert!(lines[2].contains("\"[Phrase]\""));
    }

    #[test]
    fn test_keyword_only_rows_without_ads() {
        let mut preview = sample_preview();
        preview.ad_groups[0].ads.clear();
        preview.recompute_totals();

        let csv = export_google_ads_editor_csv(&preview).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        // Ad columns are present but empty.
        assert!(lines[1].contains("\"wireless mouse\""));
        assert!(!lines[1].contains("Wireless Mouse Sale"));
    }

    #[test]
    fn test_display_url_derived_from_final_url() {
        let csv = export_google_ads_editor_csv(&sample_preview()).unwrap();
        assert!(csv.contains("\"shop.example.com\""));
    }

    #[test]
    fn test_header_column_count_matches_rows() {
        let csv = export_google_ads_editor_csv(&sample_preview()).unwrap();
        let mut reader = csv::ReaderBuilder::new().from_reader(csv.as_bytes());
        let width = reader.headers().unwrap().len();
        for record in reader.records() {
            assert_eq!(record.unwrap().len(), width);
        }
    }

    #[test]
    fn test_export_validation_passes_for_clean_preview() {
        assert!(validate_for_export(&sample_preview()).is_empty());
    }

    #[test]
    fn test_export_validation_flags_problems() {
        let mut preview = sample_preview();
        preview.ad_groups[0].keywords.clear();
        preview.ad_groups[0].ads[0].final_url = "nope".to_string();

        let errors = validate_for_export(&preview);
        assert!(errors.iter().any(|e| e.contains("has no keywords")));
        assert!(errors.iter().any(|e| e.contains("invalid final URL")));
    }
}
