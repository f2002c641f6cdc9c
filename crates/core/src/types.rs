use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Products ───────────────────────────────────────────────────────────

/// A product accepted into a generation run. Immutable once accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: ProductSource,
    /// Upload batch the product came from (multi-file uploads).
    #[serde(default)]
    pub source_file: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductSource {
    Csv,
    UrlList,
}

impl Default for ProductSource {
    fn default() -> Self {
        ProductSource::Csv
    }
}

// ─── Campaign patterns ──────────────────────────────────────────────────

/// Statistics mined from a marketer's historical campaigns, used to bias
/// generation toward what worked before. May be segmented per product via
/// `adforge-patterns`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PatternSet {
    pub ad_group_structure: AdGroupStructure,
    pub high_performing_keywords: Vec<HighPerformingKeyword>,
    pub ad_copy: AdCopyPatterns,
    pub bidding: BiddingPatterns,
    /// Set when the pattern set has been segmented for a single product.
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdGroupStructure {
    pub naming_convention: String,
    pub themes: Vec<String>,
    pub average_keywords_per_group: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighPerformingKeyword {
    pub text: String,
    #[serde(default)]
    pub match_type: MatchType,
    pub ctr: f64,
    pub conversions: f64,
    #[serde(default)]
    pub roas: Option<f64>,
    #[serde(default)]
    pub impressions: Option<u64>,
    #[serde(default)]
    pub clicks: Option<u64>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub average_cpc: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdCopyPatterns {
    pub headline_templates: Vec<String>,
    pub description_templates: Vec<String>,
    pub common_ctas: Vec<String>,
    pub average_headlines_per_ad: f64,
    pub average_descriptions_per_ad: f64,
}

/// Account-wide bidding statistics. Never segmented per product.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BiddingPatterns {
    pub average_cpc: f64,
    pub bid_strategy: String,
    #[serde(default)]
    pub average_cpm: Option<f64>,
    #[serde(default)]
    pub average_cpa: Option<f64>,
}

// ─── Generated entities ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Broad,
    Phrase,
    Exact,
}

impl Default for MatchType {
    fn default() -> Self {
        MatchType::Broad
    }
}

/// Where a generated keyword came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeywordOrigin {
    ProductData,
    ExistingCampaign,
    ModelGenerated,
    Competitor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSource {
    pub origin: KeywordOrigin,
    pub keyword: String,
    /// Relevance to the product, in [0, 1].
    pub relevance: f64,
    /// Confidence in the source, in [0, 1].
    pub confidence: f64,
    #[serde(default)]
    pub performance: Option<KeywordPerformance>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeywordPerformance {
    #[serde(default)]
    pub ctr: Option<f64>,
    #[serde(default)]
    pub conversions: Option<f64>,
    #[serde(default)]
    pub roas: Option<f64>,
    #[serde(default)]
    pub average_cpc: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedKeyword {
    pub text: String,
    pub match_type: MatchType,
    pub source: KeywordSource,
    #[serde(default)]
    pub suggested_bid: Option<f64>,
    /// Aggregated ranking score.
    #[serde(default)]
    pub score: Option<f64>,
}

/// An ad group produced by stage 1 of a generation run. Keywords and ads are
/// attached later, during campaign assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAdGroup {
    pub id: String,
    pub name: String,
    pub product_id: String,
    pub campaign_id: String,
    #[serde(default)]
    pub keywords: Vec<GeneratedKeyword>,
    #[serde(default)]
    pub ads: Vec<GeneratedRsa>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdHeadline {
    pub text: String,
    #[serde(default)]
    pub pinned: Option<bool>,
    /// Fixed serving position when pinned.
    #[serde(default)]
    pub position: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdDescription {
    pub text: String,
}

/// A responsive search ad produced by stage 3, one per ad group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedRsa {
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

// ─── Draft campaigns ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CampaignObjective {
    DriveTraffic,
    Awareness,
    Conversions,
}

/// A campaign assembled from one product's generation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftCampaign {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: CampaignStatus,
    pub plan: CampaignPlan,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignPlan {
    pub objective: CampaignObjective,
    pub budget: CampaignBudget,
    pub timeline: CampaignTimeline,
    pub platforms: Vec<String>,
    pub kpis: CampaignKpis,
    /// Fallback landing URL for ads that carry none of their own.
    #[serde(default)]
    pub target_url: Option<String>,
    pub ad_groups: Vec<AdGroupPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignBudget {
    pub total: f64,
    pub daily: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignTimeline {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignKpis {
    pub primary: String,
    pub secondary: Vec<String>,
}

/// One ad group inside a campaign plan. Keyword and ad-copy entries accept
/// both bare strings (persisted legacy campaigns) and full structures; the
/// preview projector normalizes them exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdGroupPlan {
    pub id: String,
    pub name: String,
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub keywords: Vec<KeywordEntry>,
    #[serde(default)]
    pub ads: Vec<RsaPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsaPlan {
    #[serde(default)]
    pub id: Option<String>,
    pub headlines: Vec<HeadlineEntry>,
    pub descriptions: Vec<DescriptionEntry>,
    #[serde(default)]
    pub final_url: Option<String>,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub paths: Vec<String>,
}

// ─── Union-shaped plan entries ──────────────────────────────────────────
// Persisted campaigns mix bare strings with structured objects. These enums
// make the union explicit at the serde boundary so downstream code never
// re-checks shape.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordEntry {
    Keyword(GeneratedKeyword),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeadlineEntry {
    Headline(AdHeadline),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptionEntry {
    Description(AdDescription),
    Text(String),
}
