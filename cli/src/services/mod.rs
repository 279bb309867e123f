pub mod csv_service;
pub mod dataset_service;

pub use csv_service::*;
pub use dataset_service::*;
