use crate::config::Thresholds;
use crate::models::{GeographicControl, GeographicHolding, OwnerAggregate};

/// Owners holding several properties, with the addresses they hold.
pub fn analyze_geographic_control(ranked_owners: &[OwnerAggregate], thresholds: &Thresholds) -> GeographicControl {
    let mut holdings: Vec<GeographicHolding> = ranked_owners
        .iter()
        .filter(|o| o.property_count >= thresholds.geographic_min_properties)
        .map(|o| GeographicHolding {
            owner: o.key.clone(),
            addresses: o.distinct_addresses.clone(),
            address_count: o.distinct_addresses.len(),
            properties: o.property_count,
        })
        .collect();

    holdings.sort_by(|a, b| b.properties.cmp(&a.properties));
    holdings.truncate(thresholds.geographic_cap);

    GeographicControl {
        geographic_power: holdings,
    }
}
