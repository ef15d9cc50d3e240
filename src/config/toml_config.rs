use crate::core::filter::{EligibilityThresholds, DEFAULT_MIN_UNITS_IN_STOCK, DEFAULT_MIN_VOLUME_SOLD};
use crate::core::ranker::DEFAULT_TOP_N;
use crate::core::scorer::ScoreWeights;
use crate::core::{ColumnNames, ConfigProvider};
use crate::utils::error::{RankError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_finite, validate_non_empty_string, validate_path,
    validate_positive_number, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATA_FILE: &str = "Mock_Skincare_Dataset.csv";
pub const DEFAULT_OVERRIDE_FILE: &str = "overrides.json";
pub const DEFAULT_JSON_OUTPUT: &str = "output.json";
pub const DEFAULT_CSV_OUTPUT: &str = "output.csv";

/// Complete run configuration. Every section and field is optional in the
/// TOML file; omitted values take the defaults below.
///
/// ```toml
/// [storage]
/// base_dir = "./data"
///
/// [input]
/// data_file = "catalog.csv"
/// override_file = "${RANKER_OVERRIDES}"
///
/// [output]
/// json_file = "carousel.json"
/// write_csv = false
///
/// [ranking]
/// top_n = 12
/// min_units_in_stock = 5
///
/// [scoring]
/// views = 0.5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankerConfig {
    pub storage: StorageConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub ranking: RankingConfig,
    pub scoring: ScoreWeights,
    pub columns: ColumnNames,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory every input and output path is resolved against.
    pub base_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub data_file: String,
    pub override_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
            override_file: DEFAULT_OVERRIDE_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub json_file: String,
    pub csv_file: String,
    pub write_csv: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_file: DEFAULT_JSON_OUTPUT.to_string(),
            csv_file: DEFAULT_CSV_OUTPUT.to_string(),
            write_csv: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    pub top_n: usize,
    pub min_units_in_stock: u64,
    pub min_volume_sold: u64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_units_in_stock: DEFAULT_MIN_UNITS_IN_STOCK,
            min_volume_sold: DEFAULT_MIN_VOLUME_SOLD,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl RankerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RankError::ConfigError {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RankError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RANKER_DATA_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RankError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_path("storage.base_dir", &self.storage.base_dir)?;

        validate_path("input.data_file", &self.input.data_file)?;
        validate_file_extension("input.data_file", &self.input.data_file, &["csv"])?;
        validate_path("input.override_file", &self.input.override_file)?;
        validate_file_extension("input.override_file", &self.input.override_file, &["json"])?;

        validate_path("output.json_file", &self.output.json_file)?;
        validate_file_extension("output.json_file", &self.output.json_file, &["json"])?;
        if self.output.write_csv {
            validate_path("output.csv_file", &self.output.csv_file)?;
            validate_file_extension("output.csv_file", &self.output.csv_file, &["csv"])?;
        }

        validate_positive_number("ranking.top_n", self.ranking.top_n, 1)?;

        let weights = [
            ("scoring.volume", self.scoring.volume),
            ("scoring.views", self.scoring.views),
            ("scoring.tier_a", self.scoring.tier_a),
            ("scoring.tier_b", self.scoring.tier_b),
            ("scoring.tier_c", self.scoring.tier_c),
        ];
        for (field, value) in weights {
            validate_finite(field, value)?;
        }

        let columns = [
            ("columns.name", &self.columns.name),
            ("columns.units_in_stock", &self.columns.units_in_stock),
            ("columns.volume_sold", &self.columns.volume_sold),
            ("columns.views", &self.columns.views),
            ("columns.brand_tier", &self.columns.brand_tier),
            ("columns.price", &self.columns.price),
            ("columns.cost", &self.columns.cost),
        ];
        for (field, value) in columns {
            validate_non_empty_string(field, value)?;
        }

        Ok(())
    }

    pub fn base_dir(&self) -> &str {
        &self.storage.base_dir
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl ConfigProvider for RankerConfig {
    fn data_file(&self) -> &str {
        &self.input.data_file
    }

    fn override_file(&self) -> &str {
        &self.input.override_file
    }

    fn json_output(&self) -> &str {
        &self.output.json_file
    }

    fn csv_output(&self) -> Option<&str> {
        self.output
            .write_csv
            .then_some(self.output.csv_file.as_str())
    }

    fn top_n(&self) -> usize {
        self.ranking.top_n
    }

    fn thresholds(&self) -> EligibilityThresholds {
        EligibilityThresholds {
            min_units_in_stock: self.ranking.min_units_in_stock,
            min_volume_sold: self.ranking.min_volume_sold,
        }
    }

    fn weights(&self) -> ScoreWeights {
        self.scoring
    }

    fn columns(&self) -> &ColumnNames {
        &self.columns
    }
}

impl Validate for RankerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
