//! Rule-based ad group generation: one named ad group per product, capped
//! and validated, with the naming convention resolved from the request or
//! learned patterns.

use crate::naming::generate_ad_group_name;
use crate::traits::{AdGroupGenerator, AdGroupRequest};
use adforge_core::config::GenerationConfig;
use adforge_core::types::GeneratedAdGroup;
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

pub struct RuleBasedAdGroupGenerator {
    config: GenerationConfig,
}

impl RuleBasedAdGroupGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }
}

impl Default for RuleBasedAdGroupGenerator {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

#[async_trait]
impl AdGroupGenerator for RuleBasedAdGroupGenerator {
    async fn generate(&self, request: &AdGroupRequest) -> anyhow::Result<Vec<GeneratedAdGroup>> {
        if request.products.is_empty() {
            anyhow::bail!("at least one product is required");
        }

        let max_groups = request.max_ad_groups.unwrap_or(self.config.max_ad_groups);

        let naming = request
            .naming_convention
            .clone()
            .or_else(|| {
                request
                    .patterns
                    .as_ref()
                    .map(|p| p.ad_group_structure.naming_convention.clone())
                    .filter(|c| !c.is_empty())
            });

        let campaign_id = request
            .target_campaign_id
            .clone()
            .unwrap_or_else(|| "campaign-default".to_string());

        let ad_groups: Vec<GeneratedAdGroup> = request
            .products
            .iter()
            .take(max_groups)
            .map(|product| {
                let name = generate_ad_group_name(product, naming.as_deref());
                GeneratedAdGroup {
                    id: format!("adgroup-{}", Uuid::new_v4()),
                    name,
                    product_id: product.id.clone(),
                    campaign_id: campaign_id.clone(),
                    // Populated during campaign assembly.
                    keywords: Vec::new(),
                    ads: Vec::new(),
                }
            })
            .collect();

        debug!(count = ad_groups.len(), "generated ad groups");
        Ok(ad_groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::types::{Product, ProductSource};

    fn sample_product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            url: format!("https://shop.example.com/p/{}", id),
            category: None,
            price: None,
            description: None,
            source: ProductSource::Csv,
            source_file: None,
        }
    }

    #[tokio::test]
    async fn test_one_group_per_product() {
        let generator = RuleBasedAdGroupGenerator::default();
        let request = AdGroupRequest {
            products: vec![
                sample_product("p1", "Wireless Mouse"),
                sample_product("p2", "Mechanical Keyboard"),
            ],
            ..Default::default()
        };

        let groups = generator.generate(&request).await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Wireless Mouse");
        assert_eq!(groups[0].product_id, "p1");
        assert_eq!(groups[1].product_id, "p2");
        assert!(groups.iter().all(|g| g.keywords.is_empty() && g.ads.is_empty()));
    }

    #[tokio::test]
    async fn test_product_cap_applied() {
        let generator = RuleBasedAdGroupGenerator::default();
        let request = AdGroupRequest {
            products: (0..15)
                .map(|i| sample_product(&format!("p{}", i), &format!("Product {}", i)))
                .collect(),
            ..Default::default()
        };

        let groups = generator.generate(&request).await.unwrap();
        assert_eq!(groups.len(), 10);
    }

    #[tokio::test]
    async fn test_empty_request_rejected() {
        let generator = RuleBasedAdGroupGenerator::default();
        let result = generator.generate(&AdGroupRequest::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_target_campaign_id_propagated() {
        let generator = RuleBasedAdGroupGenerator::default();
        let request = AdGroupRequest {
            products: vec![sample_product("p1", "Wireless Mouse")],
            target_campaign_id: Some("campaign-42".to_string()),
            ..Default::default()
        };

        let groups = generator.generate(&request).await.unwrap();
        assert_eq!(groups[0].campaign_id, "campaign-42");
    }
}
