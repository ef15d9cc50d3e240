use crate::core::filter::EligibilityThresholds;
use crate::core::scorer::ScoreWeights;
use crate::domain::model::{LoadSummary, RankingInput, RankingResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Moves `from` over `to`, replacing any existing file at `to`.
    fn rename(&self, from: &str, to: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source CSV header for each field the ranker reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub name: String,
    pub units_in_stock: String,
    pub volume_sold: String,
    pub views: String,
    pub brand_tier: String,
    pub price: String,
    pub cost: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "Product Name".to_string(),
            units_in_stock: "Units in Stock".to_string(),
            volume_sold: "Volume Sold Last Month".to_string(),
            views: "Views Last Month".to_string(),
            brand_tier: "Brand Tier".to_string(),
            price: "Price (USD)".to_string(),
            cost: "COGS (USD)".to_string(),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn data_file(&self) -> &str;
    fn override_file(&self) -> &str;
    fn json_output(&self) -> &str;
    fn csv_output(&self) -> Option<&str>;
    fn top_n(&self) -> usize;
    fn thresholds(&self) -> EligibilityThresholds;
    fn weights(&self) -> ScoreWeights;
    fn columns(&self) -> &ColumnNames;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RankingInput>;
    async fn transform(&self, input: RankingInput) -> Result<RankingResult>;
    async fn load(&self, result: RankingResult) -> Result<LoadSummary>;
}
