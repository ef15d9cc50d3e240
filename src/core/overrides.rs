use crate::domain::model::{OverrideSet, ScoredProduct};
use crate::utils::error::{RankError, Result};
use serde::Deserialize;

/// Added on top of the best organic score for every overridden product.
pub const OVERRIDE_BOOST: f64 = 100.0;
/// Stands in for the best organic score when there are no scored products.
pub const EMPTY_MAX_SCORE: f64 = 1000.0;

#[derive(Debug, Deserialize)]
struct OverrideFile {
    #[serde(default)]
    manual_priority: Vec<String>,
}

/// Parses an override document such as `{"manual_priority": ["Serum"]}`.
///
/// A document without `manual_priority` configures no overrides. Anything that
/// is not a JSON object with a list of strings is rejected.
pub fn parse_overrides(path: &str, bytes: &[u8]) -> Result<OverrideSet> {
    let file: OverrideFile =
        serde_json::from_slice(bytes).map_err(|e| RankError::OverrideSourceError {
            path: path.to_string(),
            message: e.to_string(),
        })?;

    let overrides: OverrideSet = file.manual_priority.into_iter().collect();
    tracing::debug!("Parsed {} override(s) from {}", overrides.len(), path);
    Ok(overrides)
}

/// Lifts every overridden product to the same score, `OVERRIDE_BOOST` above the
/// best organic score in `scored`.
///
/// The maximum is always taken over organic scores, so running this twice
/// gives the same result as running it once.
pub fn apply_overrides(scored: Vec<ScoredProduct>, overrides: &OverrideSet) -> Vec<ScoredProduct> {
    let max_score = scored
        .iter()
        .map(|s| s.organic_score)
        .reduce(f64::max)
        .unwrap_or(EMPTY_MAX_SCORE);
    let boosted = max_score + OVERRIDE_BOOST;

    scored
        .into_iter()
        .map(|mut s| {
            s.overridden = overrides.contains(s.name());
            s.score = if s.overridden { boosted } else { s.organic_score };
            s
        })
        .collect()
}

/// Override names that do not match any of `scored`. Usually a typo or a
/// product that failed the eligibility filter.
pub fn unmatched_overrides<'a>(overrides: &'a OverrideSet, scored: &[ScoredProduct]) -> Vec<&'a str> {
    let mut unmatched: Vec<&str> = overrides
        .iter()
        .filter(|name| !scored.iter().any(|s| s.name() == *name))
        .collect();
    unmatched.sort_unstable();
    unmatched
}
