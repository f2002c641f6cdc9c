//! Contracts for the external generation collaborators. Implementations may
//! call out to a model service or ad platform; the orchestrator only relies
//! on these signatures and isolates every failure per unit of work.

use adforge_core::types::{
    GeneratedAdGroup, GeneratedKeyword, GeneratedRsa, PatternSet, Product,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default)]
pub struct AdGroupRequest {
    pub products: Vec<Product>,
    pub target_campaign_id: Option<String>,
    pub naming_convention: Option<String>,
    pub max_ad_groups: Option<usize>,
    pub patterns: Option<PatternSet>,
}

#[derive(Debug, Clone)]
pub struct KeywordRequest {
    pub product: Product,
    pub patterns: Option<PatternSet>,
    pub max_keywords: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RsaRequest {
    pub ad_group_id: String,
    pub product: Product,
    pub patterns: Option<PatternSet>,
    pub max_headlines: Option<usize>,
    pub max_descriptions: Option<usize>,
}

/// Produces ad groups for a product batch.
#[async_trait]
pub trait AdGroupGenerator: Send + Sync {
    async fn generate(&self, request: &AdGroupRequest) -> anyhow::Result<Vec<GeneratedAdGroup>>;
}

/// Produces one ranked keyword batch per product.
#[async_trait]
pub trait KeywordGenerator: Send + Sync {
    async fn generate(&self, request: &KeywordRequest) -> anyhow::Result<Vec<GeneratedKeyword>>;
}

/// Produces one responsive search ad per ad group.
#[async_trait]
pub trait RsaGenerator: Send + Sync {
    async fn generate(&self, request: &RsaRequest) -> anyhow::Result<GeneratedRsa>;
}

// ─── Ad copy double-check ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdCopyCheckRequest {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
}

/// Result of the pre-export ad copy check, independent of the local
/// field-level rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdCopyCheck {
    pub valid: bool,
    pub headline_errors: Vec<String>,
    pub description_errors: Vec<String>,
    pub headline_warnings: Vec<String>,
    pub description_warnings: Vec<String>,
}

#[async_trait]
pub trait AdCopyValidator: Send + Sync {
    async fn validate(&self, request: &AdCopyCheckRequest) -> anyhow::Result<AdCopyCheck>;
}
