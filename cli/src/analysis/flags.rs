use crate::models::{FlagsAnalysis, PropertyRecord, PLACEHOLDER_SALE_YEAR};

/// Construction year the assessor uses when none is known.
pub const PLACEHOLDER_YEAR_BUILT: i32 = 9999;

/// Data-quality flags. Informational only; nothing else reads them.
pub fn analyze_flags(records: &[PropertyRecord], current_year: i32) -> FlagsAnalysis {
    let year_9999 = records
        .iter()
        .filter(|r| r.year_built == Some(PLACEHOLDER_YEAR_BUILT))
        .cloned()
        .collect();

    let old_sales = records
        .iter()
        .filter(|r| r.sale_year() == Some(PLACEHOLDER_SALE_YEAR))
        .cloned()
        .collect();

    let suspicious_years = records
        .iter()
        .filter(|r| matches!(r.year_built, Some(y) if y > current_year || y == 0))
        .cloned()
        .collect();

    FlagsAnalysis {
        year_9999,
        old_sales,
        suspicious_years,
    }
}
