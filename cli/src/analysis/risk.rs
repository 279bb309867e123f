use crate::config::AnalysisConfig;
use crate::models::{OwnerAggregate, RiskProfile};

/// Score large portfolios for predatory-landlord risk.
///
/// Scoring: +3 for a very large portfolio or +2 for a large one, +2 for a
/// generic business name, +1 for an LLC/CORP entity. Owners at or above the
/// minimum score are kept, highest first.
pub fn assess_risk(ranked_owners: &[OwnerAggregate], config: &AnalysisConfig) -> Vec<RiskProfile> {
    let thresholds = &config.thresholds;

    let mut profiles: Vec<RiskProfile> = ranked_owners
        .iter()
        .filter(|o| o.property_count >= thresholds.risk_portfolio_min)
        .map(|o| {
            let mut score = 0u8;
            let mut factors = Vec::new();

            if o.property_count >= thresholds.risk_very_large_portfolio {
                score += 3;
                factors.push(format!("Very large portfolio ({} properties)", o.property_count));
            } else {
                score += 2;
                factors.push(format!("Large portfolio ({} properties)", o.property_count));
            }

            if config.generic_name_terms.iter().any(|t| o.key.contains(t.as_str())) {
                score += 2;
                factors.push("Generic business name".to_string());
            }

            if config.risk_corporate_terms.iter().any(|t| o.key.contains(t.as_str())) {
                score += 1;
                factors.push("Corporate entity".to_string());
            }

            RiskProfile {
                owner: o.key.clone(),
                properties: o.property_count,
                risk_score: score,
                risk_factors: factors,
            }
        })
        .filter(|p| p.risk_score >= thresholds.risk_score_min)
        .collect();

    profiles.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    profiles.truncate(thresholds.risk_list_cap);
    profiles
}
