use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::Thresholds;
use crate::models::{
    AcquisitionTiming, BulkPurchase, MonthlyBulkPurchase, OwnerAggregate, TemporalAnalysis, PLACEHOLDER_SALE_YEAR,
};

use super::{KeyedRecord, OrderedGroups};

/// Sales per year inside the window, owners buying several properties in
/// the same calendar year or month, and when the largest owners bought.
pub fn analyze_temporal(
    records: &[KeyedRecord<'_>],
    ranked_owners: &[OwnerAggregate],
    thresholds: &Thresholds,
    current_year: i32,
) -> TemporalAnalysis {
    let window_start = thresholds.recent_sales_from;
    let window_end = thresholds.recent_sales_to.unwrap_or(current_year);

    let mut sales_by_year: BTreeMap<i32, usize> = BTreeMap::new();
    let mut purchases: OrderedGroups<(String, i32), usize> = OrderedGroups::new();
    let mut recent_sale_count = 0;

    for keyed in records {
        let Some(year) = keyed.record.sale_year() else {
            continue;
        };
        if year < window_start || year > window_end {
            continue;
        }
        recent_sale_count += 1;
        *sales_by_year.entry(year).or_insert(0) += 1;
        *purchases.entry((keyed.key.clone(), year)) += 1;
    }

    let mut bulk_purchases: Vec<BulkPurchase> = purchases
        .into_vec()
        .into_iter()
        .filter(|(_, count)| *count >= thresholds.bulk_purchase_min)
        .map(|((owner, year), count)| BulkPurchase { owner, year, count })
        .collect();
    bulk_purchases.sort_by(|a, b| b.count.cmp(&a.count));

    TemporalAnalysis {
        window_start,
        window_end,
        recent_sale_count,
        sales_by_year,
        bulk_purchases,
        monthly_bulk_purchases: monthly_bulk_purchases(records, thresholds),
        acquisition_timing: acquisition_timing(records, ranked_owners, thresholds),
    }
}

/// Real sale dates only; the 1900 placeholder would cluster every unsold
/// parcel into one month.
fn dated_sale(keyed: &KeyedRecord<'_>) -> Option<NaiveDate> {
    keyed.record.sale_date.filter(|_| {
        keyed
            .record
            .sale_year()
            .map_or(false, |year| year > PLACEHOLDER_SALE_YEAR)
    })
}

fn monthly_bulk_purchases(records: &[KeyedRecord<'_>], thresholds: &Thresholds) -> Vec<MonthlyBulkPurchase> {
    let mut purchases: OrderedGroups<(String, String), usize> = OrderedGroups::new();
    for keyed in records {
        if let Some(date) = dated_sale(keyed) {
            *purchases.entry((keyed.key.clone(), date.format("%Y-%m").to_string())) += 1;
        }
    }

    let mut bulk: Vec<MonthlyBulkPurchase> = purchases
        .into_vec()
        .into_iter()
        .filter(|(_, count)| *count >= thresholds.monthly_bulk_purchase_min)
        .map(|((owner, month), count)| MonthlyBulkPurchase { owner, month, count })
        .collect();
    bulk.sort_by(|a, b| b.count.cmp(&a.count));
    bulk
}

fn acquisition_timing(
    records: &[KeyedRecord<'_>],
    ranked_owners: &[OwnerAggregate],
    thresholds: &Thresholds,
) -> Vec<AcquisitionTiming> {
    ranked_owners
        .iter()
        .take(thresholds.acquisition_timing_owner_count)
        .filter_map(|owner| {
            let dates: Vec<NaiveDate> = records
                .iter()
                .filter(|keyed| keyed.key == owner.key)
                .filter_map(dated_sale)
                .collect();
            if dates.len() < 2 {
                return None;
            }
            let first = dates.iter().min()?;
            let last = dates.iter().max()?;
            Some(AcquisitionTiming {
                owner: owner.key.clone(),
                dated_sales: dates.len(),
                first_sale: first.format("%Y-%m").to_string(),
                last_sale: last.format("%Y-%m").to_string(),
            })
        })
        .collect()
}
