use std::collections::HashSet;
use std::fmt;

/// Brand quality classification. Anything other than A, B or C is kept
/// verbatim and scores as neutral.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BrandTier {
    A,
    B,
    C,
    Other(String),
}

impl BrandTier {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "A" => BrandTier::A,
            "B" => BrandTier::B,
            "C" => BrandTier::C,
            other => BrandTier::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BrandTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrandTier::A => write!(f, "A"),
            BrandTier::B => write!(f, "B"),
            BrandTier::C => write!(f, "C"),
            BrandTier::Other(s) => write!(f, "{}", s),
        }
    }
}

/// One catalog row. The typed fields feed filtering and scoring; `columns`
/// keeps every source column, in source order, for the output files.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub units_in_stock: u64,
    pub volume_sold: u64,
    pub views: u64,
    pub brand_tier: BrandTier,
    pub price: f64,
    pub cost: f64,
    pub columns: serde_json::Map<String, serde_json::Value>,
}

impl ProductRecord {
    pub fn margin(&self) -> f64 {
        self.price - self.cost
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProduct {
    pub product: ProductRecord,
    /// Score from the weighted signals alone.
    pub organic_score: f64,
    /// Score used for ranking; differs from `organic_score` only when overridden.
    pub score: f64,
    pub overridden: bool,
}

impl ScoredProduct {
    pub fn new(product: ProductRecord, organic_score: f64) -> Self {
        Self {
            product,
            organic_score,
            score: organic_score,
            overridden: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.product.name
    }

    pub fn volume_sold(&self) -> u64 {
        self.product.volume_sold
    }
}

/// Product names forced to the top of the ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    names: HashSet<String>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for OverrideSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything `extract` reads before any ranking happens.
#[derive(Debug, Clone)]
pub struct RankingInput {
    pub headers: Vec<String>,
    pub products: Vec<ProductRecord>,
    pub overrides: OverrideSet,
}

#[derive(Debug, Clone)]
pub struct RankingResult {
    pub ranked: Vec<ScoredProduct>,
    pub eligible_count: usize,
    pub json_output: String,
    pub csv_output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub json_path: String,
    pub csv_path: Option<String>,
    pub ranked_count: usize,
}
