use regex::Regex;

use crate::config::Thresholds;
use crate::error::{AnalysisError, Result};
use crate::models::{CorporateControl, OwnerAggregate};

use super::percent_of;

/// End-anchored, case-insensitive entity-suffix test.
#[derive(Debug, Clone)]
pub struct CorporateClassifier {
    pattern: Option<Regex>,
}

impl CorporateClassifier {
    pub fn new(suffixes: &[String]) -> Result<Self> {
        let alternatives: Vec<String> = suffixes
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = Regex::new(&format!("(?i)(?:{})$", alternatives.join("|")))
            .map_err(|e| AnalysisError::Config(format!("invalid corporate suffix pattern: {}", e)))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn is_corporate(&self, owner: &str) -> bool {
        self.pattern
            .as_ref()
            .map_or(false, |p| p.is_match(owner.trim_end()))
    }
}

/// Partition ranked owners into corporate and individual holders.
pub fn analyze_corporate_control(
    ranked_owners: &[OwnerAggregate],
    total_properties: usize,
    thresholds: &Thresholds,
) -> CorporateControl {
    let (corporate, individual): (Vec<&OwnerAggregate>, Vec<&OwnerAggregate>) =
        ranked_owners.iter().partition(|o| o.is_corporate);

    let total_corporate_properties: usize = corporate.iter().map(|o| o.property_count).sum();
    let total_individual_properties: usize = individual.iter().map(|o| o.property_count).sum();

    let corporate_control_percentage = percent_of(total_corporate_properties, total_properties);
    let individual_control_percentage = if total_properties == 0 {
        0.0
    } else {
        100.0 - corporate_control_percentage
    };

    let cap = thresholds.owner_list_cap;
    CorporateControl {
        corporate_owners: corporate.iter().take(cap).map(|o| (*o).clone()).collect(),
        individual_owners: individual.iter().take(cap).map(|o| (*o).clone()).collect(),
        corporate_control_percentage,
        individual_control_percentage,
        total_corporate_properties,
        total_individual_properties,
        total_corporate_owners: corporate.len(),
        total_individual_owners: individual.len(),
    }
}
