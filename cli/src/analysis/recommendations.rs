use crate::config::Thresholds;
use crate::models::{CorporateControl, OwnershipConcentration, TargetRecommendation, TargetType};

/// Fixed organizing content for one kind of target. `{count}` and
/// `{percent}` are substituted at render time.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationTemplate {
    pub target_type: TargetType,
    pub rationale: &'static str,
    pub tactics: &'static [&'static str],
}

pub const PRIMARY_TARGET: RecommendationTemplate = RecommendationTemplate {
    target_type: TargetType::PrimaryTarget,
    rationale: "Controls {count} properties - organize tenant association across portfolio",
    tactics: &[
        "Door-knock all properties to build tenant list",
        "Document code violations and habitability issues",
        "Research corporate structure and identify decision makers",
        "Launch coordinated tenant demands across all properties",
    ],
};

pub const CORPORATE_TARGET: RecommendationTemplate = RecommendationTemplate {
    target_type: TargetType::CorporateTarget,
    rationale: "Corporate entity with {count} properties - research ownership structure",
    tactics: &[
        "Research Secretary of State filings for ownership details",
        "Investigate management company and agent of service",
        "Track political donations and lobbying activity",
        "Coordinate with other neighborhoods targeting same entity",
    ],
};

pub const POLICY_TARGET: RecommendationTemplate = RecommendationTemplate {
    target_type: TargetType::PolicyTarget,
    rationale: "High ownership concentration ({percent}%) suggests need for policy intervention",
    tactics: &[
        "Present data analysis to city council showing concentration",
        "Demand corporate ownership limits and speculation controls",
        "Push for tenant opportunity to purchase policies",
        "Advocate for vacancy taxes and anti-warehousing measures",
    ],
};

pub const POLICY_ENTITY: &str = "City Council";

impl RecommendationTemplate {
    fn render(&self, entity: &str, properties: Option<usize>, percent: Option<f64>) -> TargetRecommendation {
        let mut rationale = self.rationale.to_string();
        if let Some(count) = properties {
            rationale = rationale.replace("{count}", &count.to_string());
        }
        if let Some(percent) = percent {
            rationale = rationale.replace("{percent}", &(percent.round() as i64).to_string());
        }

        TargetRecommendation {
            target_type: self.target_type,
            entity: entity.to_string(),
            properties,
            rationale,
            tactics: self.tactics.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Primary targets first, then corporate targets not already listed, then
/// the policy target when concentration is high.
pub fn generate_recommendations(
    ownership: &OwnershipConcentration,
    corporate: &CorporateControl,
    thresholds: &Thresholds,
) -> Vec<TargetRecommendation> {
    let primary: Vec<_> = ownership
        .major_power_holders
        .iter()
        .take(thresholds.primary_target_count)
        .collect();

    let mut recommendations: Vec<TargetRecommendation> = primary
        .iter()
        .map(|o| PRIMARY_TARGET.render(&o.key, Some(o.property_count), None))
        .collect();

    for corp in corporate.corporate_owners.iter().take(thresholds.corporate_target_count) {
        if primary.iter().any(|p| p.key == corp.key) {
            continue;
        }
        recommendations.push(CORPORATE_TARGET.render(&corp.key, Some(corp.property_count), None));
    }

    if ownership.concentration_ratio > thresholds.policy_concentration_threshold {
        recommendations.push(POLICY_TARGET.render(POLICY_ENTITY, None, Some(ownership.concentration_ratio)));
    }

    recommendations
}
