use crate::domain::model::{BrandTier, ProductRecord};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VOLUME_WEIGHT: f64 = 2.0;
pub const DEFAULT_VIEWS_WEIGHT: f64 = 0.2;
pub const DEFAULT_TIER_A_BONUS: f64 = 40.0;
pub const DEFAULT_TIER_B_BONUS: f64 = 15.0;
pub const DEFAULT_TIER_C_BONUS: f64 = -10.0;

/// Weights of the composite score.
///
/// Sales dominate, views count for a fifth as much per unit, brand tier adds a
/// flat bonus (or penalty for tier C), and positive unit margin is added as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreWeights {
    pub volume: f64,
    pub views: f64,
    pub tier_a: f64,
    pub tier_b: f64,
    pub tier_c: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME_WEIGHT,
            views: DEFAULT_VIEWS_WEIGHT,
            tier_a: DEFAULT_TIER_A_BONUS,
            tier_b: DEFAULT_TIER_B_BONUS,
            tier_c: DEFAULT_TIER_C_BONUS,
        }
    }
}

impl ScoreWeights {
    fn tier_bonus(&self, tier: &BrandTier) -> f64 {
        match tier {
            BrandTier::A => self.tier_a,
            BrandTier::B => self.tier_b,
            BrandTier::C => self.tier_c,
            BrandTier::Other(_) => 0.0,
        }
    }
}

/// Organic score of a single product. Depends on nothing but the record.
pub fn score_product(product: &ProductRecord, weights: &ScoreWeights) -> f64 {
    weights.volume * product.volume_sold as f64
        + weights.views * product.views as f64
        + weights.tier_bonus(&product.brand_tier)
        + product.margin().max(0.0)
}
