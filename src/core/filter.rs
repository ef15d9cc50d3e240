use crate::domain::model::ProductRecord;

pub const DEFAULT_MIN_UNITS_IN_STOCK: u64 = 10;
/// A product must have sold at least once in the trailing period.
pub const DEFAULT_MIN_VOLUME_SOLD: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityThresholds {
    pub min_units_in_stock: u64,
    pub min_volume_sold: u64,
}

impl Default for EligibilityThresholds {
    fn default() -> Self {
        Self {
            min_units_in_stock: DEFAULT_MIN_UNITS_IN_STOCK,
            min_volume_sold: DEFAULT_MIN_VOLUME_SOLD,
        }
    }
}

impl EligibilityThresholds {
    pub fn is_eligible(&self, product: &ProductRecord) -> bool {
        product.units_in_stock >= self.min_units_in_stock
            && product.volume_sold >= self.min_volume_sold
    }
}

/// Keeps in-stock, selling products. Surviving records keep their input order.
pub fn filter_eligible(
    products: Vec<ProductRecord>,
    thresholds: &EligibilityThresholds,
) -> Vec<ProductRecord> {
    let total = products.len();
    let eligible: Vec<ProductRecord> = products
        .into_iter()
        .filter(|p| thresholds.is_eligible(p))
        .collect();

    tracing::debug!(
        "Eligibility filter kept {} of {} products (stock >= {}, sold >= {})",
        eligible.len(),
        total,
        thresholds.min_units_in_stock,
        thresholds.min_volume_sold
    );

    eligible
}
