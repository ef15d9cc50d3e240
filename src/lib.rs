pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::{LocalStorage, RankerConfig};

pub use core::{engine::RankingEngine, pipeline::RankingPipeline};
pub use utils::error::{RankError, Result};
