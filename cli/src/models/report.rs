use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use super::PropertyRecord;

/// One economic actor: every record whose owner normalized to `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerAggregate {
    pub key: String,
    pub property_count: usize,
    pub is_corporate: bool,
    /// Sum of valid sale prices.
    pub total_investment: f64,
    /// Number of valid sales behind `total_investment`.
    pub sale_count: usize,
    /// Addresses held, in first-seen order, without duplicates.
    pub distinct_addresses: Vec<String>,
    /// Raw owner spellings that collapsed into `key`.
    pub original_names: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipConcentration {
    pub sorted_owners: Vec<OwnerAggregate>,
    pub top_owners: Vec<OwnerAggregate>,
    /// Percent of all properties held by the top owners, in [0, 100].
    pub concentration_ratio: f64,
    pub major_power_holders: Vec<OwnerAggregate>,
    pub total_unique_owners: usize,
    pub multi_property_owners: usize,
    pub multi_property_holdings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporateControl {
    pub corporate_owners: Vec<OwnerAggregate>,
    pub individual_owners: Vec<OwnerAggregate>,
    pub corporate_control_percentage: f64,
    pub individual_control_percentage: f64,
    pub total_corporate_properties: usize,
    pub total_individual_properties: usize,
    pub total_corporate_owners: usize,
    pub total_individual_owners: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorSummary {
    pub owner: String,
    pub total_investment: f64,
    pub properties: usize,
    pub avg_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicPower {
    pub top_investors: Vec<InvestorSummary>,
    pub total_market_value: f64,
    pub valid_sale_count: usize,
    /// `None` when there are no valid sales.
    pub average_investment: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicHolding {
    pub owner: String,
    pub addresses: Vec<String>,
    pub address_count: usize,
    pub properties: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicControl {
    pub geographic_power: Vec<GeographicHolding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingAnalysis {
    pub valid_sale_count: usize,
    pub average_price: Option<f64>,
    pub median_price: Option<f64>,
    pub below_market_threshold: Option<f64>,
    /// Ascending by price.
    pub below_market_sales: Vec<PropertyRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPurchase {
    pub owner: String,
    pub year: i32,
    pub count: usize,
}

/// Several purchases by one owner inside one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBulkPurchase {
    pub owner: String,
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionTiming {
    pub owner: String,
    pub dated_sales: usize,
    pub first_sale: String,
    pub last_sale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalAnalysis {
    pub window_start: i32,
    pub window_end: i32,
    pub recent_sale_count: usize,
    pub sales_by_year: BTreeMap<i32, usize>,
    pub bulk_purchases: Vec<BulkPurchase>,
    /// Ignores the window; every real sale date counts.
    pub monthly_bulk_purchases: Vec<MonthlyBulkPurchase>,
    pub acquisition_timing: Vec<AcquisitionTiming>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCount {
    pub entities: usize,
    pub properties: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellCompanyCandidate {
    pub owner: String,
    pub properties: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityBreakdown {
    pub llc_entities: EntityCount,
    pub corporate_entities: EntityCount,
    /// Generic-named owners, largest first, capped.
    pub potential_shell_companies: Vec<ShellCompanyCandidate>,
    pub total_shell_companies: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub owner: String,
    pub properties: usize,
    pub risk_score: u8,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagsAnalysis {
    /// Construction year recorded as the 9999 placeholder.
    #[serde(rename = "year9999")]
    pub year_9999: Vec<PropertyRecord>,
    /// Sale year recorded as the 1900 placeholder.
    pub old_sales: Vec<PropertyRecord>,
    /// Construction year in the future or zero.
    pub suspicious_years: Vec<PropertyRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    PrimaryTarget,
    CorporateTarget,
    PolicyTarget,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::PrimaryTarget => "primary_target",
            TargetType::CorporateTarget => "corporate_target",
            TargetType::PolicyTarget => "policy_target",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecommendation {
    #[serde(rename = "type")]
    pub target_type: TargetType,
    pub entity: String,
    /// Absent for policy targets.
    pub properties: Option<usize>,
    pub rationale: String,
    pub tactics: Vec<String>,
}

/// Output of one analysis run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub total_properties: usize,
    pub ownership_concentration: OwnershipConcentration,
    pub corporate_control: CorporateControl,
    pub entity_breakdown: EntityBreakdown,
    pub economic_power: EconomicPower,
    pub geographic_control: GeographicControl,
    pub pricing_analysis: PricingAnalysis,
    pub temporal_analysis: TemporalAnalysis,
    pub risk_assessment: Vec<RiskProfile>,
    pub flags_analysis: FlagsAnalysis,
    pub suspicious_owners: Vec<String>,
    pub target_recommendations: Vec<TargetRecommendation>,
}

impl AnalysisReport {
    pub fn recommendations_of(&self, target_type: TargetType) -> impl Iterator<Item = &TargetRecommendation> {
        self.target_recommendations
            .iter()
            .filter(move |r| r.target_type == target_type)
    }
}
