use std::collections::BTreeSet;

use crate::config::Thresholds;
use crate::models::{OwnerAggregate, OwnershipConcentration};

use super::{percent_of, CorporateClassifier, KeyedRecord, OrderedGroups};

#[derive(Default)]
struct OwnerAccumulator {
    property_count: usize,
    total_investment: f64,
    sale_count: usize,
    addresses: Vec<String>,
    names: BTreeSet<String>,
}

/// Group records by owner key and rank by property count, descending.
/// Ties keep the order in which owners were first encountered.
pub fn rank_owners(records: &[KeyedRecord<'_>], classifier: &CorporateClassifier) -> Vec<OwnerAggregate> {
    let mut groups: OrderedGroups<String, OwnerAccumulator> = OrderedGroups::new();

    for keyed in records {
        let acc = groups.entry(keyed.key.clone());
        acc.property_count += 1;
        if let Some(price) = keyed.record.valid_sale_price() {
            acc.total_investment += price;
            acc.sale_count += 1;
        }
        if !acc.addresses.contains(&keyed.record.address) {
            acc.addresses.push(keyed.record.address.clone());
        }
        acc.names.insert(keyed.record.owner.clone());
    }

    let mut owners: Vec<OwnerAggregate> = groups
        .into_vec()
        .into_iter()
        .map(|(key, acc)| OwnerAggregate {
            is_corporate: classifier.is_corporate(&key),
            key,
            property_count: acc.property_count,
            total_investment: acc.total_investment,
            sale_count: acc.sale_count,
            distinct_addresses: acc.addresses,
            original_names: acc.names,
        })
        .collect();

    // sort_by is stable
    owners.sort_by(|a, b| b.property_count.cmp(&a.property_count));
    owners
}

pub fn analyze_ownership(
    ranked_owners: &[OwnerAggregate],
    total_properties: usize,
    thresholds: &Thresholds,
) -> OwnershipConcentration {
    let top_owners: Vec<OwnerAggregate> = ranked_owners
        .iter()
        .take(thresholds.top_owner_count)
        .cloned()
        .collect();
    let top_control: usize = top_owners.iter().map(|o| o.property_count).sum();

    let major_power_holders: Vec<OwnerAggregate> = ranked_owners
        .iter()
        .filter(|o| o.property_count >= thresholds.major_holder_min)
        .cloned()
        .collect();

    let multi: Vec<&OwnerAggregate> = ranked_owners.iter().filter(|o| o.property_count > 1).collect();

    OwnershipConcentration {
        sorted_owners: ranked_owners.to_vec(),
        concentration_ratio: percent_of(top_control, total_properties),
        top_owners,
        major_power_holders,
        total_unique_owners: ranked_owners.len(),
        multi_property_owners: multi.len(),
        multi_property_holdings: multi.iter().map(|o| o.property_count).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{key_records, OwnerNormalizer};
    use crate::models::PropertyRecord;

    fn record(address: &str, owner: &str) -> PropertyRecord {
        PropertyRecord::from_fields(address, owner, None, None, None).unwrap()
    }

    fn ranked(records: &[PropertyRecord]) -> Vec<OwnerAggregate> {
        let normalizer = OwnerNormalizer::default();
        let classifier = CorporateClassifier::new(&["LLC".to_string(), "INC".to_string()]).unwrap();
        rank_owners(&key_records(records, &normalizer), &classifier)
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let records = vec![
            record("1 A St", "Zed"),
            record("2 A St", "Amy"),
            record("3 A St", "Bob"),
            record("4 A St", "Bob"),
        ];
        let owners = ranked(&records);
        let keys: Vec<&str> = owners.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["BOB", "ZED", "AMY"]);
    }

    #[test]
    fn spelling_variants_collapse() {
        let records = vec![record("1 A St", "Foo Inc"), record("2 A St", "FOO INC")];
        let owners = ranked(&records);
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].property_count, 2);
        assert!(owners[0].is_corporate);
        let names: Vec<&str> = owners[0].original_names.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["FOO INC", "Foo Inc"]);
    }

    #[test]
    fn repeated_address_counted_once_in_addresses() {
        let records = vec![record("1 A St", "Bob"), record("1 A St", "Bob")];
        let owners = ranked(&records);
        assert_eq!(owners[0].property_count, 2);
        assert_eq!(owners[0].distinct_addresses, vec!["1 A St".to_string()]);
    }

    #[test]
    fn concentration_of_empty_set_is_zero() {
        let result = analyze_ownership(&[], 0, &Thresholds::default());
        assert_eq!(result.concentration_ratio, 0.0);
        assert!(result.sorted_owners.is_empty());
        assert!(result.major_power_holders.is_empty());
    }

    #[test]
    fn major_holders_and_top_share() {
        let mut records = Vec::new();
        for i in 0..6 {
            records.push(record(&format!("{} Big St", i), "BIG LLC"));
        }
        for i in 0..14 {
            records.push(record(&format!("{} Small St", i), &format!("Owner {}", i)));
        }
        let owners = ranked(&records);
        let result = analyze_ownership(&owners, records.len(), &Thresholds::default());

        assert_eq!(result.total_unique_owners, 15);
        assert_eq!(result.major_power_holders.len(), 1);
        assert_eq!(result.top_owners.len(), 10);
        // 6 + 9 singles out of 20
        assert!((result.concentration_ratio - 75.0).abs() < 1e-9);
        assert_eq!(result.multi_property_owners, 1);
        assert_eq!(result.multi_property_holdings, 6);
    }
}
