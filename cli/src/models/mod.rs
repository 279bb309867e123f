pub mod property;
pub mod report;

pub use property::*;
pub use report::*;
