use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a YAML analysis config.
pub const CONFIG_ENV_VAR: &str = "POWERMAP_CONFIG";

/// A curated historical-name correction: any normalized owner containing
/// `pattern` collapses to `replacement`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NameCorrection {
    pub pattern: String,
    pub replacement: String,
}

impl NameCorrection {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// A named preset dataset. `location` is either an http(s) URL or a path
/// relative to the configured data directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetPreset {
    pub id: String,
    pub name: String,
    pub location: String,
}

impl DatasetPreset {
    pub fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }
}

/// Numeric cut-offs used by the aggregation passes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Owners counted in the concentration ratio.
    pub top_owner_count: usize,
    /// Minimum portfolio for a major power holder.
    pub major_holder_min: usize,
    /// Cap on displayed corporate / individual owner lists.
    pub owner_list_cap: usize,
    pub top_investor_count: usize,
    pub geographic_min_properties: usize,
    pub geographic_cap: usize,
    pub primary_target_count: usize,
    pub corporate_target_count: usize,
    /// Concentration ratio (percent) above which a policy target is emitted.
    pub policy_concentration_threshold: f64,
    /// Fraction of the median sale price under which a sale is below market.
    pub below_market_ratio: f64,
    pub bulk_purchase_min: usize,
    /// Purchases by one owner in one calendar month that count as a bulk buy.
    pub monthly_bulk_purchase_min: usize,
    /// Largest owners whose first and last acquisitions are reported.
    pub acquisition_timing_owner_count: usize,
    pub shell_company_cap: usize,
    /// First sale year of the temporal window.
    pub recent_sales_from: i32,
    /// Last sale year of the temporal window; the current year when unset.
    pub recent_sales_to: Option<i32>,
    pub risk_portfolio_min: usize,
    pub risk_very_large_portfolio: usize,
    pub risk_score_min: u8,
    pub risk_list_cap: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            top_owner_count: 10,
            major_holder_min: 5,
            owner_list_cap: 15,
            top_investor_count: 10,
            geographic_min_properties: 3,
            geographic_cap: 15,
            primary_target_count: 5,
            corporate_target_count: 3,
            policy_concentration_threshold: 25.0,
            below_market_ratio: 0.7,
            bulk_purchase_min: 2,
            monthly_bulk_purchase_min: 3,
            acquisition_timing_owner_count: 10,
            shell_company_cap: 10,
            recent_sales_from: 2015,
            recent_sales_to: None,
            risk_portfolio_min: 20,
            risk_very_large_portfolio: 50,
            risk_score_min: 3,
            risk_list_cap: 15,
        }
    }
}

/// Everything the analyzer and dataset sources can be tuned with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub corporate_suffixes: Vec<String>,
    pub name_corrections: Vec<NameCorrection>,
    /// Corrections may also apply to a truncated name that is a prefix of the
    /// pattern, but only when it is at least this long.
    pub min_truncated_match_len: usize,
    pub generic_name_terms: Vec<String>,
    pub risk_corporate_terms: Vec<String>,
    /// Case-insensitive regex counting LLC entities anywhere in the name.
    pub llc_entity_pattern: String,
    /// Case-insensitive regex counting incorporated entities anywhere in the name.
    pub corporate_entity_pattern: String,
    /// Name terms that mark a possible shell company.
    pub shell_name_terms: Vec<String>,
    pub thresholds: Thresholds,
    /// Overrides the wall-clock year used by the construction-year flag.
    pub current_year: Option<i32>,
    pub datasets: Vec<DatasetPreset>,
    pub data_dir: PathBuf,
    pub fetch_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            corporate_suffixes: [
                "LLC",
                "INC",
                "CORP",
                "LTD",
                "LIMITED",
                "COMPANY",
                "PROPERTIES",
                "INVESTMENTS",
                "HOLDINGS",
                "GROUP",
                "TRUST",
                "PARTNERSHIP",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            name_corrections: vec![
                NameCorrection::new(
                    "PORTLAND COMMUNITY REINVEST INITIAT",
                    "PORTLAND COMMUNITY REINVESTMENT INITIATIVES",
                ),
                NameCorrection::new(
                    "PORTLAND COMMUNITY REINVESTMENT INI",
                    "PORTLAND COMMUNITY REINVESTMENT INITIATIVES",
                ),
            ],
            min_truncated_match_len: 16,
            generic_name_terms: ["PROPERTIES", "HOLDINGS", "INVESTMENTS", "REAL ESTATE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            risk_corporate_terms: vec!["LLC".to_string(), "CORP".to_string()],
            llc_entity_pattern: r"LLC|L\.L\.C".to_string(),
            corporate_entity_pattern: "CORP|INC|CORPORATION".to_string(),
            shell_name_terms: ["PROPERTIES", "HOLDINGS", "INVESTMENTS", "REAL ESTATE", "VENTURES"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            thresholds: Thresholds::default(),
            current_year: None,
            datasets: vec![
                DatasetPreset {
                    id: "sample".to_string(),
                    name: "Sample neighborhood".to_string(),
                    location: "Assessor-Search-Results.csv".to_string(),
                },
                DatasetPreset {
                    id: "concordia".to_string(),
                    name: "Concordia".to_string(),
                    location: "Assessor-Search-Results_Concordia.csv".to_string(),
                },
            ],
            data_dir: PathBuf::from("data"),
            fetch_timeout_secs: 30,
        }
    }
}

impl AnalysisConfig {
    /// Load from `POWERMAP_CONFIG` when set, otherwise defaults.
    pub fn load() -> Result<Self> {
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_yaml(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load from a YAML file. Keys left out of the file keep their defaults.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| {
            AnalysisError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: AnalysisConfig = serde_yaml::from_str(&yaml).map_err(|e| {
            AnalysisError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), datasets = config.datasets.len(), "Loaded analysis config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.corporate_suffixes.iter().any(|s| s.trim().is_empty()) {
            return Err(AnalysisError::Config("corporate suffixes must not be blank".to_string()));
        }
        if self.name_corrections.iter().any(|c| c.pattern.trim().is_empty()) {
            return Err(AnalysisError::Config("name correction patterns must not be blank".to_string()));
        }
        if self.shell_name_terms.iter().any(|t| t.trim().is_empty()) {
            return Err(AnalysisError::Config("shell name terms must not be blank".to_string()));
        }
        let ratio = self.thresholds.below_market_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(AnalysisError::Config(format!(
                "below_market_ratio must be in (0, 1], got {}",
                ratio
            )));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn find_dataset(&self, id: &str) -> Option<&DatasetPreset> {
        self.datasets.iter().find(|d| d.id.eq_ignore_ascii_case(id))
    }

    pub fn current_year(&self) -> i32 {
        self.current_year.unwrap_or_else(crate::utils::current_year)
    }
}
