#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use storage::LocalStorage;
pub use toml_config::RankerConfig;
