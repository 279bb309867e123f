use crate::config::Thresholds;
use crate::models::{PricingAnalysis, PropertyRecord};

/// Median of the valid sale prices and the sales priced well below it.
pub fn analyze_pricing(records: &[PropertyRecord], thresholds: &Thresholds) -> PricingAnalysis {
    let mut valid: Vec<(f64, &PropertyRecord)> = records
        .iter()
        .filter_map(|r| r.valid_sale_price().map(|p| (p, r)))
        .collect();

    if valid.is_empty() {
        return PricingAnalysis {
            valid_sale_count: 0,
            average_price: None,
            median_price: None,
            below_market_threshold: None,
            below_market_sales: Vec::new(),
        };
    }

    valid.sort_by(|a, b| a.0.total_cmp(&b.0));

    let count = valid.len();
    let average = valid.iter().map(|(p, _)| p).sum::<f64>() / count as f64;
    // upper median for even counts
    let median = valid[count / 2].0;
    let threshold = median * thresholds.below_market_ratio;

    let below_market_sales = valid
        .iter()
        .take_while(|(p, _)| *p < threshold)
        .map(|(_, r)| (*r).clone())
        .collect();

    PricingAnalysis {
        valid_sale_count: count,
        average_price: Some(average),
        median_price: Some(median),
        below_market_threshold: Some(threshold),
        below_market_sales,
    }
}
