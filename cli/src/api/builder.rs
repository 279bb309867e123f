//! Builder pattern for configuring a property analyzer

use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::AnalysisEngine;
use crate::api::analyzer::PropertyAnalyzer;
use crate::config::{AnalysisConfig, DatasetPreset, NameCorrection};
use crate::error::Result;
use crate::services::{DatasetService, DatasetSource};

/// Fluent setup for a [`PropertyAnalyzer`].
///
/// # Example
/// ```rust
/// use powermap::api::AnalysisBuilder;
///
/// let analyzer = AnalysisBuilder::new()
///     .with_current_year(2024)
///     .with_data_dir("data")
///     .build()
///     .unwrap();
/// assert_eq!(analyzer.config().current_year(), 2024);
/// ```
pub struct AnalysisBuilder {
    config: AnalysisConfig,
    config_file: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    current_year: Option<i32>,
    fetch_timeout_secs: Option<u64>,
    extra_datasets: Vec<DatasetPreset>,
    extra_corrections: Vec<NameCorrection>,
    source: Option<Arc<dyn DatasetSource>>,
}

impl AnalysisBuilder {
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
            config_file: None,
            data_dir: None,
            current_year: None,
            fetch_timeout_secs: None,
            extra_datasets: Vec::new(),
            extra_corrections: Vec::new(),
            source: None,
        }
    }

    /// Start from an explicit configuration.
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the base configuration from YAML at build time.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Pin the year used by date-relative passes.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    pub fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = Some(secs);
        self
    }

    pub fn add_dataset(mut self, preset: DatasetPreset) -> Self {
        self.extra_datasets.push(preset);
        self
    }

    pub fn add_name_correction(mut self, pattern: &str, replacement: &str) -> Self {
        self.extra_corrections.push(NameCorrection::new(pattern, replacement));
        self
    }

    /// Replace the preset-backed source, e.g. with an in-memory one.
    pub fn with_source(mut self, source: Arc<dyn DatasetSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Resolve the final configuration without building an analyzer.
    pub fn build_config(self) -> Result<AnalysisConfig> {
        self.resolve().map(|(config, _)| config)
    }

    pub fn build(self) -> Result<PropertyAnalyzer> {
        let (config, source) = self.resolve()?;
        let source = match source {
            Some(source) => source,
            None => Arc::new(DatasetService::new(&config)?),
        };
        let engine = AnalysisEngine::new(config)?;
        Ok(PropertyAnalyzer::with_source(engine, source))
    }

    fn resolve(self) -> Result<(AnalysisConfig, Option<Arc<dyn DatasetSource>>)> {
        let mut config = match &self.config_file {
            Some(path) => AnalysisConfig::from_yaml(path)?,
            None => self.config,
        };

        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(year) = self.current_year {
            config.current_year = Some(year);
        }
        if let Some(secs) = self.fetch_timeout_secs {
            config.fetch_timeout_secs = secs;
        }
        for preset in self.extra_datasets {
            config.datasets.retain(|d| !d.id.eq_ignore_ascii_case(&preset.id));
            config.datasets.push(preset);
        }
        config.name_corrections.extend(self.extra_corrections);
        config.validate()?;

        Ok((config, self.source))
    }
}

impl Default for AnalysisBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = AnalysisBuilder::new()
            .with_current_year(2020)
            .with_fetch_timeout_secs(5)
            .add_dataset(DatasetPreset {
                id: "SAMPLE".to_string(),
                name: "Replaced".to_string(),
                location: "other.csv".to_string(),
            })
            .add_name_correction("ACME PROP", "ACME PROPERTIES LLC")
            .build_config()
            .unwrap();

        assert_eq!(config.current_year(), 2020);
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.datasets.len(), 2);
        assert_eq!(config.find_dataset("sample").unwrap().name, "Replaced");
        assert_eq!(config.name_corrections.len(), 3);
    }

    #[test]
    fn blank_correction_fails_validation() {
        let result = AnalysisBuilder::new().add_name_correction("  ", "X").build();
        assert!(result.is_err());
    }
}
