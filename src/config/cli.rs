use crate::config::toml_config::RankerConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "carousel-ranker")]
#[command(about = "Rank a product catalog for the homepage carousel")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory that input and output paths are resolved against
    #[arg(long)]
    pub base_dir: Option<String>,

    /// Product catalog (CSV)
    #[arg(long)]
    pub data_file: Option<String>,

    /// Manual priority list (JSON); a missing file means no overrides
    #[arg(long)]
    pub override_file: Option<String>,

    /// Where to write the ranked products as JSON
    #[arg(long)]
    pub json_output: Option<String>,

    /// Where to write the ranked products as CSV
    #[arg(long, conflicts_with = "no_csv")]
    pub csv_output: Option<String>,

    /// Skip the CSV output
    #[arg(long)]
    pub no_csv: bool,

    /// Number of products to keep
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Minimum units in stock for a product to be eligible
    #[arg(long)]
    pub min_stock: Option<u64>,

    /// Minimum units sold in the trailing period for a product to be eligible
    #[arg(long)]
    pub min_volume_sold: Option<u64>,

    /// Rank and print the result without writing any files
    #[arg(long)]
    pub dry_run: bool,

    /// Log CPU and memory usage per phase
    #[arg(long)]
    pub monitor: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliArgs {
    /// Loads the TOML file, if any, and applies the command line on top of it.
    pub fn resolve(&self) -> Result<RankerConfig> {
        let mut config = match &self.config {
            Some(path) => RankerConfig::from_file(path)?,
            None => RankerConfig::default(),
        };
        self.apply_to(&mut config);
        Ok(config)
    }

    pub fn apply_to(&self, config: &mut RankerConfig) {
        if let Some(base_dir) = &self.base_dir {
            config.storage.base_dir = base_dir.clone();
        }
        if let Some(data_file) = &self.data_file {
            config.input.data_file = data_file.clone();
        }
        if let Some(override_file) = &self.override_file {
            config.input.override_file = override_file.clone();
        }
        if let Some(json_output) = &self.json_output {
            config.output.json_file = json_output.clone();
        }
        if let Some(csv_output) = &self.csv_output {
            config.output.csv_file = csv_output.clone();
            config.output.write_csv = true;
        }
        if self.no_csv {
            config.output.write_csv = false;
        }
        if let Some(top_n) = self.top_n {
            config.ranking.top_n = top_n;
        }
        if let Some(min_stock) = self.min_stock {
            config.ranking.min_units_in_stock = min_stock;
        }
        if let Some(min_volume_sold) = self.min_volume_sold {
            config.ranking.min_volume_sold = min_volume_sold;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_no_flags_keeps_defaults() {
        let args = CliArgs::parse_from(["carousel-ranker"]);
        assert_eq!(args.resolve().unwrap(), RankerConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::parse_from([
            "carousel-ranker",
            "--data-file",
            "catalog.csv",
            "-n",
            "3",
            "--min-stock",
            "1",
            "--no-csv",
            "--monitor",
        ]);

        let config = args.resolve().unwrap();
        assert_eq!(config.data_file(), "catalog.csv");
        assert_eq!(config.top_n(), 3);
        assert_eq!(config.thresholds().min_units_in_stock, 1);
        assert_eq!(config.csv_output(), None);
        assert!(config.monitoring_enabled());
    }

    #[test]
    fn test_csv_output_conflicts_with_no_csv() {
        let result = CliArgs::try_parse_from([
            "carousel-ranker",
            "--csv-output",
            "top.csv",
            "--no-csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_csv_output_reenables_csv() {
        let mut config = RankerConfig::default();
        config.output.write_csv = false;

        let args = CliArgs::parse_from(["carousel-ranker", "--csv-output", "top.csv"]);
        args.apply_to(&mut config);
        assert_eq!(config.csv_output(), Some("top.csv"));
    }
}
