use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    config::{AnalysisConfig, DatasetPreset},
    error::{AnalysisError, Result},
    utils::{Logger, Timer},
};

/// Raw text of a fetched dataset plus the label reports should carry.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedDataset {
    pub label: String,
    pub content: String,
}

/// Where named datasets come from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<FetchedDataset>;

    fn list(&self) -> Vec<DatasetPreset>;
}

/// Resolves presets to files under the data directory or to HTTP URLs.
pub struct DatasetService {
    client: reqwest::Client,
    data_dir: PathBuf,
    presets: Vec<DatasetPreset>,
    timeout: Duration,
    logger: Logger,
}

impl DatasetService {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| AnalysisError::Config(format!("failed to build HTTP client: {}", e)))?;

        let logger = Logger::new("DATASET_SERVICE");
        logger.debug(&format!(
            "{} presets, data dir {}",
            config.datasets.len(),
            config.data_dir.display()
        ));

        Ok(Self {
            client,
            data_dir: config.data_dir.clone(),
            presets: config.datasets.clone(),
            timeout: config.fetch_timeout(),
            logger,
        })
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    fn find(&self, id: &str) -> Result<&DatasetPreset> {
        self.presets
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| AnalysisError::UnknownDataset(id.to_string()))
    }

    async fn fetch_remote(&self, preset: &DatasetPreset) -> Result<String> {
        let request = self.client.get(&preset.location).send();
        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| self.timed_out(preset))?
            .map_err(|e| AnalysisError::unavailable(&preset.name, e.to_string(), None))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::unavailable(
                &preset.name,
                format!("HTTP {}", status),
                Some(status.as_u16()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| AnalysisError::unavailable(&preset.name, e.to_string(), None))
    }

    async fn fetch_local(&self, preset: &DatasetPreset) -> Result<String> {
        let path = self.data_dir.join(&preset.location);
        let bytes = tokio::time::timeout(self.timeout, tokio::fs::read(&path))
            .await
            .map_err(|_| self.timed_out(preset))?
            .map_err(|e| AnalysisError::unavailable(&preset.name, format!("{}: {}", path.display(), e), None))?;

        String::from_utf8(bytes).map_err(|e| AnalysisError::parse(&preset.name, format!("invalid UTF-8: {}", e)))
    }

    fn timed_out(&self, preset: &DatasetPreset) -> AnalysisError {
        AnalysisError::unavailable(
            &preset.name,
            format!("timed out after {}s", self.timeout.as_secs()),
            None,
        )
    }
}

#[async_trait]
impl DatasetSource for DatasetService {
    async fn fetch(&self, id: &str) -> Result<FetchedDataset> {
        let preset = self.find(id)?;
        let timer = Timer::start(&format!("{} fetch", preset.id));

        self.logger.info(&format!("Loading {} from {}", preset.name, preset.location));
        let result = if preset.is_remote() {
            self.fetch_remote(preset).await
        } else {
            self.fetch_local(preset).await
        };

        match result {
            Ok(content) => {
                self.logger.info(&format!(
                    "Loaded {} ({} bytes, {:.1}ms)",
                    preset.name,
                    content.len(),
                    timer.elapsed_ms()
                ));
                Ok(FetchedDataset {
                    label: preset.name.clone(),
                    content,
                })
            }
            Err(e) => {
                self.logger.warn_with_error(&format!("Failed to load {}", preset.name), &e);
                Err(e)
            }
        }
    }

    fn list(&self) -> Vec<DatasetPreset> {
        self.presets.clone()
    }
}
