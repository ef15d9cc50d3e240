use crate::core::catalog::parse_catalog;
use crate::core::filter::filter_eligible;
use crate::core::output::{render_csv, render_json};
use crate::core::overrides::{apply_overrides, parse_overrides, unmatched_overrides};
use crate::core::ranker::rank;
use crate::core::scorer::score_product;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{
    LoadSummary, OverrideSet, RankingInput, RankingResult, ScoredProduct,
};
use crate::utils::error::{RankError, Result};
use std::io::ErrorKind;

/// Reads the catalog and overrides through `Storage`, ranks them, and writes
/// the JSON (and optionally CSV) result back through `Storage`.
pub struct RankingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> RankingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn load_overrides(&self) -> Result<OverrideSet> {
        let path = self.config.override_file();

        match self.storage.read_file(path).await {
            Ok(bytes) => parse_overrides(path, &bytes),
            Err(RankError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No override file at {}, ranking without overrides", path);
                Ok(OverrideSet::new())
            }
            Err(RankError::IoError(e)) => Err(RankError::OverrideSourceError {
                path: path.to_string(),
                message: e.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn load_catalog(&self) -> Result<RankingInput> {
        let path = self.config.data_file();

        let bytes = self.storage.read_file(path).await.map_err(|e| match e {
            RankError::IoError(e) => RankError::DataSourceError {
                path: path.to_string(),
                message: e.to_string(),
            },
            other => other,
        })?;

        let catalog = parse_catalog(path, &bytes, self.config.columns())?;
        Ok(RankingInput {
            headers: catalog.headers,
            products: catalog.products,
            overrides: OverrideSet::new(),
        })
    }

    /// Stages every output next to its target, then swaps them into place.
    /// No target is touched until all outputs are staged.
    async fn commit_outputs(&self, outputs: &[(&str, &str)]) -> Result<()> {
        let mut staged = Vec::with_capacity(outputs.len());
        for (path, contents) in outputs {
            let temp = staging_path(path);
            tracing::debug!("Writing {} bytes to {}", contents.len(), temp);
            if let Err(e) = self.storage.write_file(&temp, contents.as_bytes()).await {
                self.discard(&staged).await;
                return Err(e);
            }
            staged.push((temp, *path));
        }

        // JSON is swapped last, so a failed CSV swap leaves the previous JSON in place.
        for (i, (temp, path)) in staged.iter().enumerate().rev() {
            if let Err(e) = self.storage.rename(temp, path).await {
                self.discard(&staged[..=i]).await;
                return Err(e);
            }
        }
        Ok(())
    }

    async fn discard(&self, staged: &[(String, &str)]) {
        for (temp, _) in staged {
            if let Err(e) = self.storage.remove_file(temp).await {
                tracing::warn!("Could not remove staged output {}: {}", temp, e);
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RankingPipeline<S, C> {
    async fn extract(&self) -> Result<RankingInput> {
        let overrides = self.load_overrides().await?;
        tracing::debug!("Loaded {} override(s)", overrides.len());

        let mut input = self.load_catalog().await?;
        input.overrides = overrides;
        Ok(input)
    }

    async fn transform(&self, input: RankingInput) -> Result<RankingResult> {
        let RankingInput {
            headers,
            products,
            overrides,
        } = input;

        let eligible = filter_eligible(products, &self.config.thresholds());
        let eligible_count = eligible.len();

        let weights = self.config.weights();
        let scored: Vec<ScoredProduct> = eligible
            .into_iter()
            .map(|product| {
                let score = score_product(&product, &weights);
                ScoredProduct::new(product, score)
            })
            .collect();

        for name in unmatched_overrides(&overrides, &scored) {
            tracing::warn!("Override '{}' matches no eligible product", name);
        }

        let adjusted = apply_overrides(scored, &overrides);
        let ranked = rank(adjusted, self.config.top_n());

        let json_output = render_json(&ranked)?;
        let csv_output = match self.config.csv_output() {
            Some(_) => Some(render_csv(&ranked, &headers)?),
            None => None,
        };

        Ok(RankingResult {
            ranked,
            eligible_count,
            json_output,
            csv_output,
        })
    }

    async fn load(&self, result: RankingResult) -> Result<LoadSummary> {
        let json_path = self.config.json_output();
        let csv = match (self.config.csv_output(), result.csv_output.as_deref()) {
            (Some(path), Some(csv)) => Some((path, csv)),
            _ => None,
        };

        let mut outputs = vec![(json_path, result.json_output.as_str())];
        outputs.extend(csv);
        self.commit_outputs(&outputs).await?;

        Ok(LoadSummary {
            json_path: json_path.to_string(),
            csv_path: csv.map(|(path, _)| path.to_string()),
            ranked_count: result.ranked.len(),
        })
    }
}

fn staging_path(path: &str) -> String {
    format!("{}.tmp", path)
}
