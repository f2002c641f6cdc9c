//! End-to-end orchestrator tests with stub collaborators.

use adforge_core::config::GenerationConfig;
use adforge_core::types::{
    AdDescription, AdHeadline, GeneratedAdGroup, GeneratedKeyword, GeneratedRsa, KeywordEntry,
    KeywordOrigin, KeywordSource, MatchType, Product, ProductSource,
};
use adforge_generation::orchestrator::{GenerationOrchestrator, GenerationStage};
use adforge_generation::status::{capture_sink, StatusEvent};
use adforge_generation::traits::{
    AdGroupGenerator, AdGroupRequest, KeywordGenerator, KeywordRequest, RsaGenerator, RsaRequest,
};
use async_trait::async_trait;
use std::sync::Arc;

fn sample_product(index: usize, name: &str) -> Product {
    Product {
        id: format!("p{}", index),
        name: name.to_string(),
        url: format!("https://shop.example.com/p/{}", index),
        category: None,
        price: None,
        description: None,
        source: ProductSource::Csv,
        source_file: None,
    }
}

fn sample_keyword(text: &str) -> GeneratedKeyword {
    GeneratedKeyword {
        text: text.to_string(),
        match_type: MatchType::Broad,
        source: KeywordSource {
            origin: KeywordOrigin::ProductData,
            keyword: text.to_string(),
            relevance: 0.9,
            confidence: 0.8,
            performance: None,
        },
        suggested_bid: None,
        score: Some(0.5),
    }
}

/// Stub ad group generator: one group per product, failing for the product
/// ids listed in `fail_for`.
struct StubAdGroups {
    fail_for: Vec<String>,
}

#[async_trait]
impl AdGroupGenerator for StubAdGroups {
    async fn generate(&self, request: &AdGroupRequest) -> anyhow::Result<Vec<GeneratedAdGroup>> {
        let product = &request.products[0];
        if self.fail_for.contains(&product.id) {
            anyhow::bail!("stubbed ad group failure for {}", product.id);
        }
        Ok(vec![GeneratedAdGroup {
            id: format!("adgroup-{}", product.id),
            name: product.name.clone(),
            product_id: product.id.clone(),
            campaign_id: "campaign-default".to_string(),
            keywords: Vec::new(),
            ads: Vec::new(),
        }])
    }
}

struct StubKeywords;

#[async_trait]
impl KeywordGenerator for StubKeywords {
    async fn generate(&self, request: &KeywordRequest) -> anyhow::Result<Vec<GeneratedKeyword>> {
        let name = request.product.name.to_lowercase();
        Ok((0..5)
            .map(|i| sample_keyword(&format!("{} {}", name, i)))
            .collect())
    }
}

struct StubAds;

#[async_trait]
impl RsaGenerator for StubAds {
    async fn generate(&self, request: &RsaRequest) -> anyhow::Result<GeneratedRsa> {
        Ok(GeneratedRsa {
            id: format!("rsa-{}", request.ad_group_id),
            ad_group_id: request.ad_group_id.clone(),
            headlines: vec![
                AdHeadline {
                    text: "Premium Quality".to_string(),
                    pinned: Some(false),
                    position: Some(0),
                },
                AdHeadline {
                    text: "Fast Free Shipping".to_string(),
                    pinned: Some(false),
                    position: Some(1),
                },
                AdHeadline {
                    text: "Order Online Today".to_string(),
                    pinned: Some(false),
                    position: Some(2),
                },
            ],
            descriptions: vec![
                AdDescription {
                    text: "Quality products at great prices with fast delivery.".to_string(),
                },
                AdDescription {
                    text: "Shop our full selection online and save today.".to_string(),
                },
            ],
            final_url: request.product.url.clone(),
            display_url: None,
            paths: Vec::new(),
        })
    }
}

fn orchestrator(fail_for: Vec<String>) -> (GenerationOrchestrator, Arc<adforge_generation::status::CaptureStatusSink>) {
    let sink = capture_sink();
    let orchestrator = GenerationOrchestrator::new(
        Arc::new(StubAdGroups { fail_for }),
        Arc::new(StubKeywords),
        Arc::new(StubAds),
        sink.clone(),
        GenerationConfig::default(),
    );
    (orchestrator, sink)
}

#[tokio::test]
async fn test_single_product_end_to_end() {
    let (orchestrator, _) = orchestrator(Vec::new());
    let products = vec![sample_product(0, "Wireless Mouse")];

    let run = orchestrator.run(&products, None).await.unwrap();

    assert_eq!(run.stage, GenerationStage::Complete);
    assert_eq!(run.campaigns.len(), 1);

    let campaign = &run.campaigns[0];
    assert_eq!(campaign.name, "Wireless Mouse - Campaign");
    assert_eq!(campaign.plan.ad_groups.len(), 1);

    let ad_group = &campaign.plan.ad_groups[0];
    assert_eq!(ad_group.keywords.len(), 5);
    assert_eq!(ad_group.ads.len(), 1);

    assert_eq!(run.summaries.len(), 1);
    assert_eq!(run.summaries[0].ad_groups, 1);
    assert_eq!(run.summaries[0].keywords, 5);
    assert_eq!(run.summaries[0].ads, 1);
    assert!(run.error.is_none());

    // The projected preview carries the same counts.
    let preview = adforge_preview::transform_to_preview(campaign);
    assert_eq!(preview.total_keywords, 5);
    assert_eq!(preview.total_ads, 1);
}

#[tokio::test]
async fn test_failure_isolated_to_one_product() {
    let (orchestrator, _) = orchestrator(vec!["p1".to_string()]);
    let products = vec![
        sample_product(0, "Wireless Mouse"),
        sample_product(1, "Mechanical Keyboard"),
        sample_product(2, "USB Hub"),
    ];

    let run = orchestrator.run(&products, None).await.unwrap();

    // The run still completes; only product 1 is missing ad groups.
    assert_eq!(run.stage, GenerationStage::Complete);
    assert!(!run.ad_groups.get(&0).unwrap().is_empty());
    assert!(run.ad_groups.get(&1).is_none());
    assert!(!run.ad_groups.get(&2).unwrap().is_empty());

    // Keywords are generated independently of ad group failures.
    assert_eq!(run.keywords.get(&1).unwrap().len(), 5);

    // The failed product still yields a campaign, just an empty one.
    assert_eq!(run.campaigns.len(), 3);
    assert!(run.campaigns[1].plan.ad_groups.is_empty());

    assert_eq!(run.summaries[1].ad_groups, 0);
    assert_eq!(run.summaries[1].ads, 0);
    assert_eq!(run.progress.ad_groups_done.get(&1), Some(&false));
    assert_eq!(run.progress.ad_groups_done.get(&0), Some(&true));
    assert!(run.error.is_none());
}

#[tokio::test]
async fn test_progress_checkpoints_in_order() {
    let (orchestrator, sink) = orchestrator(Vec::new());
    let products = vec![sample_product(0, "Wireless Mouse")];

    orchestrator.run(&products, None).await.unwrap();

    assert_eq!(sink.stage_percents(), vec![33, 66, 90, 100]);
}

#[tokio::test]
async fn test_empty_batch_is_blocking() {
    let (orchestrator, sink) = orchestrator(Vec::new());

    let result = orchestrator.run(&[], None).await;
    assert!(result.is_err());
    assert!(sink
        .events()
        .iter()
        .any(|e| matches!(e, StatusEvent::RunFailed { .. })));
}

#[tokio::test]
async fn test_all_units_failing_sets_aggregate_error() {
    let (orchestrator, _) = orchestrator(vec!["p0".to_string(), "p1".to_string()]);
    let products = vec![
        sample_product(0, "Wireless Mouse"),
        sample_product(1, "Mechanical Keyboard"),
    ];

    let run = orchestrator.run(&products, None).await.unwrap();

    // Completed stages keep their results even though one stage was a wash.
    assert_eq!(run.stage, GenerationStage::Complete);
    assert!(run.ad_groups.is_empty());
    assert_eq!(run.keywords.len(), 2);
    assert!(run.error.is_some());
}

#[tokio::test]
async fn test_keywords_duplicated_across_ad_groups() {
    // Two ad groups for one product: both receive the identical keyword batch.
    struct TwoGroups;

    #[async_trait]
    impl AdGroupGenerator for TwoGroups {
        async fn generate(
            &self,
            request: &AdGroupRequest,
        ) -> anyhow::Result<Vec<GeneratedAdGroup>> {
            let product = &request.products[0];
            Ok((0..2)
                .map(|i| GeneratedAdGroup {
                    id: format!("adgroup-{}-{}", product.id, i),
                    name: format!("{} {}", product.name, i),
                    product_id: product.id.clone(),
                    campaign_id: "campaign-default".to_string(),
                    keywords: Vec::new(),
                    ads: Vec::new(),
                })
                .collect())
        }
    }

    let orchestrator = GenerationOrchestrator::new(
        Arc::new(TwoGroups),
        Arc::new(StubKeywords),
        Arc::new(StubAds),
        capture_sink(),
        GenerationConfig::default(),
    );

    let products = vec![sample_product(0, "Wireless Mouse")];
    let run = orchestrator.run(&products, None).await.unwrap();

    let campaign = &run.campaigns[0];
    assert_eq!(campaign.plan.ad_groups.len(), 2);
    for ad_group in &campaign.plan.ad_groups {
        assert_eq!(ad_group.keywords.len(), 5);
        // Each ad group got exactly its own ad.
        assert_eq!(ad_group.ads.len(), 1);
    }

    let texts = |entries: &[KeywordEntry]| -> Vec<String> {
        entries
            .iter()
            .map(|e| match e {
                KeywordEntry::Keyword(k) => k.text.clone(),
                KeywordEntry::Text(t) => t.clone(),
            })
            .collect()
    };
    assert_eq!(
        texts(&campaign.plan.ad_groups[0].keywords),
        texts(&campaign.plan.ad_groups[1].keywords)
    );
}
