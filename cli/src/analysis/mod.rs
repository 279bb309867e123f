//! Aggregation passes over a parsed property set.
//!
//! Every pass is a plain function over records or ranked owners. The
//! [`AnalysisEngine`] wires them together into one [`AnalysisReport`].

pub mod corporate;
pub mod economic;
pub mod entities;
pub mod flags;
pub mod geographic;
pub mod normalize;
pub mod ownership;
pub mod pricing;
pub mod recommendations;
pub mod risk;
pub mod temporal;

use std::collections::HashMap;
use std::hash::Hash;

use chrono::Utc;
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::{AnalysisReport, PropertyRecord};
use crate::utils::{Logger, Timer};

pub use corporate::{analyze_corporate_control, CorporateClassifier};
pub use economic::analyze_economic_power;
pub use entities::{analyze_entities, EntityMatcher};
pub use flags::analyze_flags;
pub use geographic::analyze_geographic_control;
pub use normalize::{canonical_form, OwnerNormalizer};
pub use ownership::{analyze_ownership, rank_owners};
pub use pricing::analyze_pricing;
pub use recommendations::generate_recommendations;
pub use risk::assess_risk;
pub use temporal::analyze_temporal;

/// Insertion-ordered grouping. Iteration follows first-encounter order so
/// that later stable sorts break ties the same way every run.
pub(crate) struct OrderedGroups<K, V> {
    index: HashMap<K, usize>,
    groups: Vec<(K, V)>,
}

impl<K: Hash + Eq + Clone, V: Default> OrderedGroups<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    pub(crate) fn entry(&mut self, key: K) -> &mut V {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.groups.push((key.clone(), V::default()));
                let slot = self.groups.len() - 1;
                self.index.insert(key, slot);
                slot
            }
        };
        &mut self.groups[slot].1
    }

    pub(crate) fn into_vec(self) -> Vec<(K, V)> {
        self.groups
    }
}

/// A record paired with its normalized owner key.
#[derive(Debug, Clone)]
pub struct KeyedRecord<'a> {
    pub key: String,
    pub record: &'a PropertyRecord,
}

/// Normalize every owner once so the passes can share the keys.
pub fn key_records<'a>(records: &'a [PropertyRecord], normalizer: &OwnerNormalizer) -> Vec<KeyedRecord<'a>> {
    records
        .iter()
        .map(|record| KeyedRecord {
            key: normalizer.normalize(&record.owner),
            record,
        })
        .collect()
}

pub(crate) fn percent_of(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Runs every pass with one configuration.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    config: AnalysisConfig,
    normalizer: OwnerNormalizer,
    classifier: CorporateClassifier,
    entities: EntityMatcher,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = OwnerNormalizer::from_config(&config);
        let classifier = CorporateClassifier::new(&config.corporate_suffixes)?;
        let entities = EntityMatcher::from_config(&config)?;
        Ok(Self {
            config,
            normalizer,
            classifier,
            entities,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &OwnerNormalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &CorporateClassifier {
        &self.classifier
    }

    /// Build a full report. An empty record set yields a zeroed report;
    /// rejecting empty input is the ingestion layer's job.
    pub fn analyze(&self, records: &[PropertyRecord], source: &str) -> AnalysisReport {
        let logger = Logger::new("ANALYSIS");
        let timer = Timer::start("analysis");
        let thresholds = &self.config.thresholds;
        let current_year = self.config.current_year();
        let total_properties = records.len();

        let keyed = key_records(records, &self.normalizer);
        let ranked = rank_owners(&keyed, &self.classifier);

        let ownership_concentration = analyze_ownership(&ranked, total_properties, thresholds);
        let corporate_control = analyze_corporate_control(&ranked, total_properties, thresholds);
        let entity_breakdown = analyze_entities(&ranked, &self.entities, thresholds);
        let economic_power = analyze_economic_power(&keyed, thresholds);
        let geographic_control = analyze_geographic_control(&ranked, thresholds);
        let pricing_analysis = analyze_pricing(records, thresholds);
        let temporal_analysis = analyze_temporal(&keyed, &ranked, thresholds, current_year);
        let risk_assessment = assess_risk(&ranked, &self.config);
        let flags_analysis = analyze_flags(records, current_year);
        let target_recommendations =
            generate_recommendations(&ownership_concentration, &corporate_control, thresholds);

        let mut suspicious_owners: Vec<String> = ranked
            .iter()
            .filter(|o| o.property_count >= thresholds.major_holder_min)
            .map(|o| o.key.clone())
            .collect();
        for bulk in &temporal_analysis.bulk_purchases {
            if !suspicious_owners.contains(&bulk.owner) {
                suspicious_owners.push(bulk.owner.clone());
            }
        }

        logger.info(&format!(
            "Analyzed {} properties from {}: {} owners, {:.1}% top-{} share",
            total_properties,
            source,
            ranked.len(),
            ownership_concentration.concentration_ratio,
            thresholds.top_owner_count
        ));
        timer.log_elapsed("ANALYSIS");

        AnalysisReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            source: source.to_string(),
            total_properties,
            ownership_concentration,
            corporate_control,
            entity_breakdown,
            economic_power,
            geographic_control,
            pricing_analysis,
            temporal_analysis,
            risk_assessment,
            flags_analysis,
            suspicious_owners,
            target_recommendations,
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(AnalysisConfig::default()).expect("default analysis config is valid")
    }
}

/// One-shot analysis with the default configuration.
pub fn analyze(records: &[PropertyRecord], source: &str) -> AnalysisReport {
    AnalysisEngine::default().analyze(records, source)
}
