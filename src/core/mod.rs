pub mod catalog;
pub mod engine;
pub mod filter;
pub mod output;
pub mod overrides;
pub mod pipeline;
pub mod ranker;
pub mod scorer;

pub use crate::domain::model::{
    LoadSummary, OverrideSet, ProductRecord, RankingInput, RankingResult, ScoredProduct,
};
pub use crate::domain::ports::{ColumnNames, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
