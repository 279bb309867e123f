//! High-level property analyzer for easy library usage

use std::path::Path;
use std::sync::Arc;

use crate::analysis::AnalysisEngine;
use crate::config::{AnalysisConfig, DatasetPreset};
use crate::error::{AnalysisError, Result};
use crate::models::{AnalysisReport, PropertyRecord};
use crate::services::{parse_property_csv, DatasetService, DatasetSource};

/// Ingestion plus analysis behind one handle.
///
/// Cheap to clone; the dataset source is shared.
#[derive(Clone)]
pub struct PropertyAnalyzer {
    engine: AnalysisEngine,
    source: Arc<dyn DatasetSource>,
}

impl PropertyAnalyzer {
    /// Analyzer backed by the configured presets.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let source = DatasetService::new(&config)?;
        let engine = AnalysisEngine::new(config)?;
        Ok(Self::with_source(engine, Arc::new(source)))
    }

    pub fn with_source(engine: AnalysisEngine, source: Arc<dyn DatasetSource>) -> Self {
        Self { engine, source }
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.engine.config()
    }

    pub fn analyze_records(&self, records: &[PropertyRecord], source_label: &str) -> AnalysisReport {
        self.engine.analyze(records, source_label)
    }

    /// Parse CSV text and analyze it.
    pub fn analyze_csv(&self, content: &str, source_label: &str) -> Result<AnalysisReport> {
        let records = parse_property_csv(content, source_label)?;
        Ok(self.engine.analyze(&records, source_label))
    }

    /// Analyze a CSV file on disk. The report is labeled with the file name.
    pub async fn analyze_file(&self, path: impl AsRef<Path>) -> Result<AnalysisReport> {
        let path = path.as_ref();
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = tokio::fs::read(path).await?;
        let content = String::from_utf8(bytes)
            .map_err(|e| AnalysisError::parse(&label, format!("invalid UTF-8: {}", e)))?;
        self.analyze_csv(&content, &label)
    }

    /// Fetch a named preset and analyze it.
    pub async fn analyze_dataset(&self, id: &str) -> Result<AnalysisReport> {
        let fetched = self.source.fetch(id).await?;
        self.analyze_csv(&fetched.content, &fetched.label)
    }

    pub fn datasets(&self) -> Vec<DatasetPreset> {
        self.source.list()
    }
}

impl std::fmt::Debug for PropertyAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyAnalyzer")
            .field("engine", &self.engine)
            .field("datasets", &self.source.list().len())
            .finish()
    }
}
