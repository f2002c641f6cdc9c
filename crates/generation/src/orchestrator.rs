//! Staged generation orchestrator. Drives three sequential stages (ad
//! groups, keywords, ads) across a product batch, isolating failures per
//! unit of work, then assembles one draft campaign per product.

use crate::queue::{WorkQueue, WorkUnit};
use crate::status::StatusSink;
use crate::traits::{
    AdGroupGenerator, AdGroupRequest, KeywordGenerator, KeywordRequest, RsaGenerator, RsaRequest,
};
use adforge_core::config::GenerationConfig;
use adforge_core::error::{ForgeError, ForgeResult};
use adforge_core::types::{
    AdGroupPlan, CampaignBudget, CampaignKpis, CampaignObjective, CampaignPlan, CampaignStatus,
    CampaignTimeline, DescriptionEntry, DraftCampaign, GeneratedAdGroup, GeneratedKeyword,
    GeneratedRsa, HeadlineEntry, KeywordEntry, PatternSet, Product, RsaPlan,
};
use adforge_patterns::segment_patterns_for_all_products;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Default campaign placeholders applied at assembly. Not learned from
/// patterns.
const DEFAULT_TOTAL_BUDGET: f64 = 1000.0;
const DEFAULT_DAILY_BUDGET: f64 = 100.0;
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_DURATION_DAYS: i64 = 30;

// ─── Stages ─────────────────────────────────────────────────────────────

/// The four stages of a generation run. Transitions are strictly linear and
/// a stage only completes after every one of its units has been attempted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    AdGroups,
    Keywords,
    Ads,
    Complete,
}

impl GenerationStage {
    /// Coarse overall progress checkpoint reached when this stage completes.
    pub fn progress_percent(&self) -> u8 {
        match self {
            GenerationStage::AdGroups => 33,
            GenerationStage::Keywords => 66,
            GenerationStage::Ads => 90,
            GenerationStage::Complete => 100,
        }
    }

    pub fn next(&self) -> Option<GenerationStage> {
        match self {
            GenerationStage::AdGroups => Some(GenerationStage::Keywords),
            GenerationStage::Keywords => Some(GenerationStage::Ads),
            GenerationStage::Ads => Some(GenerationStage::Complete),
            GenerationStage::Complete => None,
        }
    }
}

// ─── Run state ──────────────────────────────────────────────────────────

/// Per-product completion ticks, keyed by product index. A `false` entry
/// means the unit was attempted and failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunProgress {
    pub ad_groups_done: BTreeMap<usize, bool>,
    pub keywords_done: BTreeMap<usize, bool>,
    pub ads_done: BTreeMap<usize, bool>,
}

/// Summary counts shown after a run, one entry per input product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub product_id: String,
    pub product_name: String,
    pub ad_groups: usize,
    pub keywords: usize,
    pub ads: usize,
}

/// Result of a generation run. Failed units surface as absent map entries
/// and zero counts in the matching summary.
#[derive(Debug, Serialize)]
pub struct GenerationRun {
    pub stage: GenerationStage,
    pub progress: RunProgress,
    pub ad_groups: BTreeMap<usize, Vec<GeneratedAdGroup>>,
    pub keywords: BTreeMap<usize, Vec<GeneratedKeyword>>,
    pub ads: BTreeMap<usize, Vec<GeneratedRsa>>,
    pub campaigns: Vec<DraftCampaign>,
    pub summaries: Vec<ProductSummary>,
    /// Aggregated error string when an entire stage produced nothing.
    /// Completed stages' results are still kept.
    pub error: Option<String>,
}

// ─── Orchestrator ───────────────────────────────────────────────────────

pub struct GenerationOrchestrator {
    ad_groups: Arc<dyn AdGroupGenerator>,
    keywords: Arc<dyn KeywordGenerator>,
    ads: Arc<dyn RsaGenerator>,
    status: Arc<dyn StatusSink>,
    config: GenerationConfig,
}

impl GenerationOrchestrator {
    pub fn new(
        ad_groups: Arc<dyn AdGroupGenerator>,
        keywords: Arc<dyn KeywordGenerator>,
        ads: Arc<dyn RsaGenerator>,
        status: Arc<dyn StatusSink>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            ad_groups,
            keywords,
            ads,
            status,
            config,
        }
    }

    /// Run the full pipeline for a product batch. The only blocking failure
    /// is an empty batch; everything else degrades per unit.
    pub async fn run(
        &self,
        products: &[Product],
        patterns: Option<&PatternSet>,
    ) -> ForgeResult<GenerationRun> {
        if products.is_empty() {
            let message = "no products accepted for generation";
            self.status.run_failed(message);
            metrics::counter!("generation.runs_failed").increment(1);
            return Err(ForgeError::Generation(message.to_string()));
        }

        metrics::counter!("generation.runs").increment(1);
        let started = std::time::Instant::now();
        info!(products = products.len(), "generation run starting");

        // Scope learned patterns to each product once, up front.
        let segmented: Vec<Option<PatternSet>> = match patterns {
            Some(patterns) => segment_patterns_for_all_products(patterns, products)
                .into_iter()
                .map(Some)
                .collect(),
            None => vec![None; products.len()],
        };

        let queue = WorkQueue::new(self.config.max_in_flight);
        let mut progress = RunProgress::default();
        let mut error: Option<String> = None;

        // ─── Stage 1: ad groups, one unit per product ──────────────────
        let ad_group_results = self
            .run_ad_group_stage(&queue, products, &segmented, &mut progress)
            .await;
        self.note_empty_stage(&mut error, GenerationStage::AdGroups, products.len(), ad_group_results.len());
        self.status
            .stage_changed(GenerationStage::AdGroups, GenerationStage::AdGroups.progress_percent());

        // ─── Stage 2: keywords, one unit per product ───────────────────
        let keyword_results = self
            .run_keyword_stage(&queue, products, &segmented, &mut progress)
            .await;
        self.note_empty_stage(&mut error, GenerationStage::Keywords, products.len(), keyword_results.len());
        self.status
            .stage_changed(GenerationStage::Keywords, GenerationStage::Keywords.progress_percent());

        // ─── Stage 3: ads, one unit per (product, ad group) ────────────
        let ad_results = self
            .run_ad_stage(&queue, products, &segmented, &ad_group_results, &mut progress)
            .await;
        self.status
            .stage_changed(GenerationStage::Ads, GenerationStage::Ads.progress_percent());

        // ─── Stage 4: assemble one draft campaign per product ──────────
        let campaigns =
            self.assemble_campaigns(products, &ad_group_results, &keyword_results, &ad_results);

        let summaries = products
            .iter()
            .enumerate()
            .map(|(i, product)| ProductSummary {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                ad_groups: ad_group_results.get(&i).map_or(0, Vec::len),
                keywords: keyword_results.get(&i).map_or(0, Vec::len),
                ads: ad_results.get(&i).map_or(0, Vec::len),
            })
            .collect();

        self.status
            .stage_changed(GenerationStage::Complete, GenerationStage::Complete.progress_percent());

        metrics::histogram!("generation.run_duration_ms")
            .record(started.elapsed().as_millis() as f64);
        info!(
            campaigns = campaigns.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generation run complete"
        );

        Ok(GenerationRun {
            stage: GenerationStage::Complete,
            progress,
            ad_groups: ad_group_results,
            keywords: keyword_results,
            ads: ad_results,
            campaigns,
            summaries,
            error,
        })
    }

    async fn run_ad_group_stage(
        &self,
        queue: &WorkQueue,
        products: &[Product],
        segmented: &[Option<PatternSet>],
        progress: &mut RunProgress,
    ) -> BTreeMap<usize, Vec<GeneratedAdGroup>> {
        let units = products
            .iter()
            .enumerate()
            .map(|(i, p)| WorkUnit::for_product(format!("adgroups[{}] {}", i, p.name), i))
            .collect();

        let generator = Arc::clone(&self.ad_groups);
        let max_ad_groups = self.config.max_ad_groups;
        let status = Arc::clone(&self.status);

        let outcomes = queue
            .run(
                units,
                |unit| {
                    let generator = Arc::clone(&generator);
                    let request = AdGroupRequest {
                        products: vec![products[unit.product_index].clone()],
                        target_campaign_id: None,
                        naming_convention: None,
                        max_ad_groups: Some(max_ad_groups),
                        patterns: segmented[unit.product_index].clone(),
                    };
                    Box::pin(async move { generator.generate(&request).await })
                },
                |unit, ok| {
                    progress.ad_groups_done.insert(unit.product_index, ok);
                    status.unit_finished(GenerationStage::AdGroups, unit.product_index, ok);
                },
            )
            .await;

        outcomes
            .into_iter()
            .filter_map(|(unit, result)| result.map(|groups| (unit.product_index, groups)))
            .collect()
    }

    async fn run_keyword_stage(
        &self,
        queue: &WorkQueue,
        products: &[Product],
        segmented: &[Option<PatternSet>],
        progress: &mut RunProgress,
    ) -> BTreeMap<usize, Vec<GeneratedKeyword>> {
        let units = products
            .iter()
            .enumerate()
            .map(|(i, p)| WorkUnit::for_product(format!("keywords[{}] {}", i, p.name), i))
            .collect();

        let generator = Arc::clone(&self.keywords);
        let max_keywords = self.config.max_keywords;
        let status = Arc::clone(&self.status);

        let outcomes = queue
            .run(
                units,
                |unit| {
                    let generator = Arc::clone(&generator);
                    let request = KeywordRequest {
                        product: products[unit.product_index].clone(),
                        patterns: segmented[unit.product_index].clone(),
                        max_keywords: Some(max_keywords),
                    };
                    Box::pin(async move { generator.generate(&request).await })
                },
                |unit, ok| {
                    progress.keywords_done.insert(unit.product_index, ok);
                    status.unit_finished(GenerationStage::Keywords, unit.product_index, ok);
                },
            )
            .await;

        outcomes
            .into_iter()
            .filter_map(|(unit, result)| result.map(|keywords| (unit.product_index, keywords)))
            .collect()
    }

    async fn run_ad_stage(
        &self,
        queue: &WorkQueue,
        products: &[Product],
        segmented: &[Option<PatternSet>],
        ad_groups: &BTreeMap<usize, Vec<GeneratedAdGroup>>,
        progress: &mut RunProgress,
    ) -> BTreeMap<usize, Vec<GeneratedRsa>> {
        let mut units = Vec::new();
        let mut group_ids: BTreeMap<(usize, usize), String> = BTreeMap::new();
        for (i, product) in products.iter().enumerate() {
            let Some(groups) = ad_groups.get(&i) else {
                // No ad groups were generated for this product; nothing to do,
                // but the product still gets a completion tick.
                progress.ads_done.insert(i, true);
                continue;
            };
            for (j, group) in groups.iter().enumerate() {
                group_ids.insert((i, j), group.id.clone());
                units.push(WorkUnit::for_ad_group(
                    format!("ads[{}.{}] {}", i, j, product.name),
                    i,
                    j,
                ));
            }
        }

        let generator = Arc::clone(&self.ads);
        let max_headlines = self.config.max_headlines;
        let max_descriptions = self.config.max_descriptions;
        let status = Arc::clone(&self.status);

        let outcomes = queue
            .run(
                units,
                |unit| {
                    let generator = Arc::clone(&generator);
                    let ad_group_id = group_ids
                        .get(&(unit.product_index, unit.ad_group_index.unwrap_or(0)))
                        .cloned()
                        .unwrap_or_default();
                    let request = RsaRequest {
                        ad_group_id,
                        product: products[unit.product_index].clone(),
                        patterns: segmented[unit.product_index].clone(),
                        max_headlines: Some(max_headlines),
                        max_descriptions: Some(max_descriptions),
                    };
                    Box::pin(async move { generator.generate(&request).await })
                },
                |unit, ok| {
                    // A product's tick is true only if every one of its ad
                    // groups got an ad.
                    let entry = progress.ads_done.entry(unit.product_index).or_insert(true);
                    *entry = *entry && ok;
                    status.unit_finished(GenerationStage::Ads, unit.product_index, ok);
                },
            )
            .await;

        let mut results: BTreeMap<usize, Vec<GeneratedRsa>> = BTreeMap::new();
        for (unit, result) in outcomes {
            if let Some(rsa) = result {
                results.entry(unit.product_index).or_default().push(rsa);
            }
        }
        results
    }

    /// One campaign per product, ad groups zipped with that product's ads by
    /// ad-group id. The product's full keyword batch is attached to every one
    /// of its ad groups; keywords are not partitioned per ad group.
    fn assemble_campaigns(
        &self,
        products: &[Product],
        ad_groups: &BTreeMap<usize, Vec<GeneratedAdGroup>>,
        keywords: &BTreeMap<usize, Vec<GeneratedKeyword>>,
        ads: &BTreeMap<usize, Vec<GeneratedRsa>>,
    ) -> Vec<DraftCampaign> {
        let mut campaigns: Vec<DraftCampaign> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();

        for (i, product) in products.iter().enumerate() {
            let empty_groups = Vec::new();
            let empty_keywords = Vec::new();
            let empty_ads = Vec::new();
            let groups = ad_groups.get(&i).unwrap_or(&empty_groups);
            let product_keywords = keywords.get(&i).unwrap_or(&empty_keywords);
            let product_ads = ads.get(&i).unwrap_or(&empty_ads);

            let now = Utc::now();
            let plan_ad_groups: Vec<AdGroupPlan> = groups
                .iter()
                .map(|group| AdGroupPlan {
                    id: group.id.clone(),
                    name: group.name.clone(),
                    product_id: product.id.clone(),
                    product_name: Some(product.name.clone()),
                    keywords: product_keywords
                        .iter()
                        .cloned()
                        .map(KeywordEntry::Keyword)
                        .collect(),
                    ads: product_ads
                        .iter()
                        .filter(|rsa| rsa.ad_group_id == group.id)
                        .cloned()
                        .map(|rsa| RsaPlan {
                            id: Some(rsa.id),
                            headlines: rsa
                                .headlines
                                .into_iter()
                                .map(HeadlineEntry::Headline)
                                .collect(),
                            descriptions: rsa
                                .descriptions
                                .into_iter()
                                .map(DescriptionEntry::Description)
                                .collect(),
                            final_url: Some(rsa.final_url),
                            display_url: rsa.display_url,
                            paths: rsa.paths,
                        })
                        .collect(),
                })
                .collect();

            let campaign = DraftCampaign {
                id: format!("campaign-{}", Uuid::new_v4()),
                name: format!("{} - Campaign", product.name),
                description: format!("Generated campaign for {}", product.name),
                status: CampaignStatus::Draft,
                plan: CampaignPlan {
                    objective: CampaignObjective::DriveTraffic,
                    budget: CampaignBudget {
                        total: DEFAULT_TOTAL_BUDGET,
                        daily: DEFAULT_DAILY_BUDGET,
                        currency: DEFAULT_CURRENCY.to_string(),
                    },
                    timeline: CampaignTimeline {
                        start: now,
                        end: now + Duration::days(DEFAULT_DURATION_DAYS),
                        duration_days: DEFAULT_DURATION_DAYS,
                    },
                    platforms: vec!["google_ads".to_string()],
                    kpis: CampaignKpis {
                        primary: "clicks".to_string(),
                        secondary: vec!["impressions".to_string(), "ctr".to_string()],
                    },
                    target_url: Some(product.url.clone()),
                    ad_groups: plan_ad_groups,
                },
                created_at: now,
                updated_at: now,
            };

            if seen_ids.insert(campaign.id.clone()) {
                campaigns.push(campaign);
            }
        }

        campaigns
    }

    fn note_empty_stage(
        &self,
        error: &mut Option<String>,
        stage: GenerationStage,
        attempted: usize,
        succeeded: usize,
    ) {
        if attempted > 0 && succeeded == 0 {
            let message = format!("every unit failed in the {:?} stage", stage);
            warn!(stage = ?stage, attempted, "{}", message);
            if error.is_none() {
                *error = Some(message);
            }
        }
    }
}
