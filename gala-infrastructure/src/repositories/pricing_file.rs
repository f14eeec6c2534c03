//! Feature price overrides stored as a YAML list next to the config file.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;

use gala_domain::ports::PricingRepository;
use gala_domain::{AiFeature, FeaturePrice};

#[derive(Debug, Default, Clone, Copy)]
pub struct PricingFileRepository;

impl PricingFileRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PricingRepository for PricingFileRepository {
    async fn load_pricing(&self, path: &str) -> Result<HashMap<AiFeature, u64>> {
        if !Path::new(path).exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        let prices: Vec<FeaturePrice> = serde_yaml::from_str(&content)?;
        Ok(prices.into_iter().map(|price| (price.feature, price.cost)).collect())
    }

    async fn save_pricing(&self, path: &str, prices: &HashMap<AiFeature, u64>) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let mut rows: Vec<FeaturePrice> = prices
            .iter()
            .map(|(feature, cost)| FeaturePrice {
                feature: *feature,
                cost: *cost,
            })
            .collect();
        rows.sort_by_key(|row| row.feature);
        let content = serde_yaml::to_string(&rows)?;
        fs::write(path, content).await?;
        Ok(())
    }
}
