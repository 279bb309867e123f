use crate::config::Thresholds;
use crate::models::{EconomicPower, InvestorSummary};

use super::{KeyedRecord, OrderedGroups};

#[derive(Default)]
struct Investment {
    total: f64,
    properties: usize,
}

/// Rank owners by money spent on valid sales.
pub fn analyze_economic_power(records: &[KeyedRecord<'_>], thresholds: &Thresholds) -> EconomicPower {
    let mut groups: OrderedGroups<String, Investment> = OrderedGroups::new();
    let mut total_market_value = 0.0;
    let mut valid_sale_count = 0usize;

    for keyed in records {
        let Some(price) = keyed.record.valid_sale_price() else {
            continue;
        };
        let entry = groups.entry(keyed.key.clone());
        entry.total += price;
        entry.properties += 1;
        total_market_value += price;
        valid_sale_count += 1;
    }

    let mut investors: Vec<InvestorSummary> = groups
        .into_vec()
        .into_iter()
        .map(|(owner, inv)| InvestorSummary {
            owner,
            total_investment: inv.total,
            properties: inv.properties,
            avg_price: inv.total / inv.properties as f64,
        })
        .collect();
    investors.sort_by(|a, b| b.total_investment.total_cmp(&a.total_investment));
    investors.truncate(thresholds.top_investor_count);

    let average_investment = if valid_sale_count == 0 {
        None
    } else {
        Some(total_market_value / valid_sale_count as f64)
    };

    EconomicPower {
        top_investors: investors,
        total_market_value,
        valid_sale_count,
        average_investment,
    }
}
