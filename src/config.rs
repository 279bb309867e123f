use anyhow::Context;
use powermap::config::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

fn default_node_name() -> String {
    "powermap-server".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_rate_limit_per_second() -> u64 {
    10
}

fn default_rate_limit_burst() -> u32 {
    20
}

// YAML-serializable configuration structure
#[derive(Serialize, Deserialize, Debug)]
pub struct ConfigYaml {
    #[serde(default = "default_node_name")]
    pub node_name: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub analysis_config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_rate_limit_per_second")]
    pub rate_limit_per_second: u64,
    #[serde(default = "default_rate_limit_burst")]
    pub rate_limit_burst: u32,
}

// Holds application-wide settings
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub node_name: String,
    pub environment: String,
    pub port: u16,
    /// YAML file for the analyzer; `POWERMAP_CONFIG` or defaults when unset.
    pub analysis_config: Option<PathBuf>,
    /// Overrides the data directory of the analysis config.
    pub data_dir: Option<PathBuf>,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl From<ConfigYaml> for AppConfig {
    fn from(yaml: ConfigYaml) -> Self {
        Self {
            node_name: yaml.node_name,
            environment: yaml.environment,
            port: yaml.port,
            analysis_config: yaml.analysis_config,
            data_dir: yaml.data_dir,
            rate_limit_per_second: yaml.rate_limit_per_second,
            rate_limit_burst: yaml.rate_limit_burst,
        }
    }
}

impl AppConfig {
    // Load configuration from YAML file or environment variables
    pub fn load() -> anyhow::Result<Self> {
        // Check for CONFIG_FILE environment variable first
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            Self::from_yaml(&config_file)
        } else {
            Ok(Self::from_env())
        }
    }

    pub fn from_yaml(file_path: &str) -> anyhow::Result<Self> {
        let yaml_content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read config file {}", file_path))?;

        let yaml_config: ConfigYaml = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse YAML config {}", file_path))?;

        Ok(yaml_config.into())
    }

    // Load all configuration from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        let node_name = env::var("NODE_NAME").unwrap_or_else(|_| default_node_name());

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| default_environment());

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_port);

        let rate_limit_per_second = env::var("RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_rate_limit_per_second);

        let rate_limit_burst = env::var("RATE_LIMIT_BURST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_rate_limit_burst);

        Self {
            node_name,
            environment,
            port,
            analysis_config: env::var("ANALYSIS_CONFIG").ok().map(PathBuf::from),
            data_dir: env::var("DATA_DIR").ok().map(PathBuf::from),
            rate_limit_per_second,
            rate_limit_burst,
        }
    }

    /// Resolve the analyzer configuration this node should run with.
    pub fn analysis(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.analysis_config {
            Some(path) => AnalysisConfig::from_yaml(path)?,
            None => AnalysisConfig::load()?,
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }
}
