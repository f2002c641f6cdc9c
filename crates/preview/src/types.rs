//! The editable projection shown before export.

use adforge_core::types::{AdDescription, AdHeadline, KeywordSource, MatchType};
use serde::{Deserialize, Serialize};

/// Complete preview of one campaign, with denormalized totals kept in sync
/// by the edit store after every structural change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignPreviewData {
    pub campaign_id: String,
    pub campaign_name: String,
    pub ad_groups: Vec<AdGroupPreviewRow>,
    pub total_keywords: usize,
    pub total_ads: usize,
}

impl CampaignPreviewData {
    /// Recompute `total_keywords`/`total_ads` from the live ad group lists.
    pub fn recompute_totals(&mut self) {
        self.total_keywords = self.ad_groups.iter().map(|ag| ag.keywords.len()).sum();
        self.total_ads = self.ad_groups.iter().map(|ag| ag.ads.len()).sum();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdGroupPreviewRow {
    /// Stable row id, synthesized from the ad group's position.
    pub id: String,
    pub name: String,
    pub product_id: String,
    pub product_name: String,
    pub keywords: Vec<KeywordRow>,
    pub ads: Vec<AdRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRow {
    pub id: String,
    pub text: String,
    pub match_type: MatchType,
    pub source: KeywordSource,
    #[serde(default)]
    pub suggested_bid: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdRow {
    pub id: String,
    pub ad_group_id: String,
    pub headlines: Vec<AdHeadline>,
    pub descriptions: Vec<AdDescription>,
    pub final_url: String,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub paths: Vec<String>,
}
