//! High-level API for easy library usage
//!
//! Wraps ingestion, analysis and dataset loading behind a few handles.

pub mod analyzer;
pub mod builder;
pub mod session;
pub mod summary;

pub use analyzer::PropertyAnalyzer;
pub use builder::AnalysisBuilder;
pub use session::AnalysisSession;
pub use summary::render_summary;
