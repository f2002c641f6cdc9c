//! Projects a draft (or persisted) campaign into the editable preview model.

use crate::normalize::{normalize_description, normalize_headline, normalize_keyword};
use crate::types::{AdGroupPreviewRow, AdRow, CampaignPreviewData, KeywordRow};
use adforge_core::types::DraftCampaign;

/// Build the editable preview for one campaign.
///
/// Idempotent: the synthesized row ids depend only on entity positions, so
/// projecting the same campaign twice yields an identical structure. Ads
/// missing a final URL fall back to the campaign's target URL.
pub fn transform_to_preview(campaign: &DraftCampaign) -> CampaignPreviewData {
    let target_url = campaign.plan.target_url.as_deref().unwrap_or("");

    let ad_groups: Vec<AdGroupPreviewRow> = campaign
        .plan
        .ad_groups
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let row_id = format!("adgroup-{}", i);

            let keywords: Vec<KeywordRow> = plan
                .keywords
                .iter()
                .enumerate()
                .map(|(k, entry)| {
                    let keyword = normalize_keyword(entry);
                    KeywordRow {
                        id: format!("kw-{}-{}", i, k),
                        text: keyword.text,
                        match_type: keyword.match_type,
                        source: keyword.source,
                        suggested_bid: keyword.suggested_bid,
                        score: keyword.score,
                    }
                })
                .collect();

            let ads: Vec<AdRow> = plan
                .ads
                .iter()
                .enumerate()
                .map(|(j, ad)| AdRow {
                    id: format!("ad-{}-{}", i, j),
                    ad_group_id: row_id.clone(),
                    headlines: ad
                        .headlines
                        .iter()
                        .enumerate()
                        .map(|(h, entry)| normalize_headline(entry, h))
                        .collect(),
                    descriptions: ad.descriptions.iter().map(normalize_description).collect(),
                    final_url: ad
                        .final_url
                        .clone()
                        .filter(|u| !u.is_empty())
                        .unwrap_or_else(|| target_url.to_string()),
                    display_url: ad.display_url.clone(),
                    paths: ad.paths.clone(),
                })
                .collect();

            let name = if plan.name.is_empty() {
                "Untitled Ad Group".to_string()
            } else {
                plan.name.clone()
            };
            let product_id = if plan.product_id.is_empty() {
                format!("product-{}", i)
            } else {
                plan.product_id.clone()
            };

            AdGroupPreviewRow {
                id: row_id,
                name,
                product_id,
                product_name: plan
                    .product_name
                    .clone()
                    .unwrap_or_else(|| campaign.name.clone()),
                keywords,
                ads,
            }
        })
        .collect();

    let mut preview = CampaignPreviewData {
        campaign_id: campaign.id.clone(),
        campaign_name: campaign.name.clone(),
        ad_groups,
        total_keywords: 0,
        total_ads: 0,
    };
    preview.recompute_totals();
    preview
}
