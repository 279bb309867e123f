use regex::Regex;

use crate::config::{AnalysisConfig, Thresholds};
use crate::error::{AnalysisError, Result};
use crate::models::{EntityBreakdown, EntityCount, OwnerAggregate, ShellCompanyCandidate};

/// Entity-type patterns matched anywhere in a normalized owner key.
#[derive(Debug, Clone)]
pub struct EntityMatcher {
    llc: Regex,
    corporate: Regex,
    shell: Option<Regex>,
}

impl EntityMatcher {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let shell_terms: Vec<String> = config
            .shell_name_terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(regex::escape)
            .collect();

        let shell = if shell_terms.is_empty() {
            None
        } else {
            Some(compile("shell name", &shell_terms.join("|"))?)
        };

        Ok(Self {
            llc: compile("LLC entity", &config.llc_entity_pattern)?,
            corporate: compile("corporate entity", &config.corporate_entity_pattern)?,
            shell,
        })
    }

    pub fn is_llc(&self, owner: &str) -> bool {
        self.llc.is_match(owner)
    }

    pub fn is_incorporated(&self, owner: &str) -> bool {
        self.corporate.is_match(owner)
    }

    pub fn is_generic(&self, owner: &str) -> bool {
        self.shell.as_ref().map_or(false, |p| p.is_match(owner))
    }
}

fn compile(what: &str, pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .map_err(|e| AnalysisError::Config(format!("invalid {} pattern: {}", what, e)))
}

/// LLC and incorporated-entity counts plus generic-named owners that may be
/// shell companies. An owner can count as both an LLC and a corporation.
pub fn analyze_entities(
    ranked_owners: &[OwnerAggregate],
    matcher: &EntityMatcher,
    thresholds: &Thresholds,
) -> EntityBreakdown {
    let mut llc_entities = EntityCount::default();
    let mut corporate_entities = EntityCount::default();
    let mut shells = Vec::new();

    for owner in ranked_owners {
        if matcher.is_llc(&owner.key) {
            llc_entities.entities += 1;
            llc_entities.properties += owner.property_count;
        }
        if matcher.is_incorporated(&owner.key) {
            corporate_entities.entities += 1;
            corporate_entities.properties += owner.property_count;
        }
        if matcher.is_generic(&owner.key) {
            shells.push(ShellCompanyCandidate {
                owner: owner.key.clone(),
                properties: owner.property_count,
            });
        }
    }

    let total_shell_companies = shells.len();
    shells.truncate(thresholds.shell_company_cap);

    EntityBreakdown {
        llc_entities,
        corporate_entities,
        potential_shell_companies: shells,
        total_shell_companies,
    }
}
