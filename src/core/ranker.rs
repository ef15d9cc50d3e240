use crate::domain::model::ScoredProduct;
use std::cmp::Ordering;

pub const DEFAULT_TOP_N: usize = 10;

fn ranking_order(a: &ScoredProduct, b: &ScoredProduct) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.volume_sold().cmp(&a.volume_sold()))
}

/// Orders by score, then units sold, both descending, and keeps the first
/// `top_n`. The sort is stable: full ties keep their input order.
pub fn rank(mut products: Vec<ScoredProduct>, top_n: usize) -> Vec<ScoredProduct> {
    products.sort_by(ranking_order);
    products.truncate(top_n);
    products
}
