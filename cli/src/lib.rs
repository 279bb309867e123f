//! # powermap - property ownership power mapping
//!
//! Turns assessor CSV exports into an ownership report for tenant organizing:
//! - Owner-name normalization and corporate classification
//! - Ownership concentration, economic and geographic control
//! - Below-market and bulk-purchase detection, risk scoring
//! - Data-quality flags and organizing target recommendations
//!
//! ## Quick Start
//!
//! ```rust
//! use powermap::prelude::*;
//!
//! let csv = "ADDRESS,OWNER,SALE_PRICE,SALE_DATE,YEAR_BUILT\n\
//!            1 Main St,Acme LLC,250000,2020-05-01,1990\n";
//! let analyzer = PropertyAnalyzer::new(AnalysisConfig::default()).unwrap();
//! let report = analyzer.analyze_csv(csv, "upload.csv").unwrap();
//! assert_eq!(report.total_properties, 1);
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub mod prelude {
    //! Most commonly used types:
    //! ```rust
    //! use powermap::prelude::*;
    //! ```

    pub use crate::analysis::{AnalysisEngine, OwnerNormalizer};
    pub use crate::api::{render_summary, AnalysisBuilder, AnalysisSession, PropertyAnalyzer};
    pub use crate::config::{AnalysisConfig, DatasetPreset};
    pub use crate::error::{AnalysisError, Result};
    pub use crate::models::{AnalysisReport, PropertyRecord, TargetType};
    pub use crate::services::{parse_property_csv, DatasetSource, FetchedDataset};
}

pub use utils::{init_logger, Logger, Timer};
