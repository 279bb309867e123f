use std::io;

use thiserror::Error;

/// Failures surfaced at the ingestion and dataset boundaries.
///
/// Every variant is recoverable: callers report it and keep whatever report
/// they already hold.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed tabular input (bad row shape, invalid UTF-8, missing column).
    #[error("could not parse {source_label}: {details}")]
    Parse {
        source_label: String,
        details: String,
    },
    /// Syntactically valid input where no row carried both an address and an owner.
    #[error("no valid property data found in {0}")]
    EmptyResult(String),
    /// A named dataset could not be fetched.
    #[error("could not load {dataset} data: {reason}")]
    SourceUnavailable {
        dataset: String,
        reason: String,
        status: Option<u16>,
    },
    #[error("unknown dataset '{0}'")]
    UnknownDataset(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AnalysisError {
    /// Short machine-readable tag, used by the HTTP layer.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Parse { .. } => "parse_error",
            AnalysisError::EmptyResult(_) => "empty_result",
            AnalysisError::SourceUnavailable { .. } => "source_unavailable",
            AnalysisError::UnknownDataset(_) => "unknown_dataset",
            AnalysisError::Config(_) => "config_error",
            AnalysisError::Io(_) => "io_error",
        }
    }

    pub fn parse(source_label: &str, details: impl Into<String>) -> Self {
        AnalysisError::Parse {
            source_label: source_label.to_string(),
            details: details.into(),
        }
    }

    pub(crate) fn unavailable(dataset: &str, reason: impl Into<String>, status: Option<u16>) -> Self {
        AnalysisError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: reason.into(),
            status,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
