//! Plain-text rendering of a report for terminals.

use std::fmt::Write;

use crate::models::AnalysisReport;
use crate::utils::{format_millions, format_optional_currency, format_rounded_percent, truncate_label, NO_DATA};

const OWNER_COLUMN_WIDTH: usize = 40;

/// Headline statistics, top owners, flags and recommendations.
pub fn render_summary(report: &AnalysisReport) -> String {
    let ownership = &report.ownership_concentration;
    let corporate = &report.corporate_control;
    let economic = &report.economic_power;
    let pricing = &report.pricing_analysis;

    let mut out = String::new();
    let _ = writeln!(out, "# Power map: {}", report.source);
    let _ = writeln!(out, "Generated {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out);

    let _ = writeln!(out, "Total properties:     {}", report.total_properties);
    let _ = writeln!(out, "Unique owners:        {}", ownership.total_unique_owners);
    let _ = writeln!(out, "Major power holders:  {}", ownership.major_power_holders.len());
    let _ = writeln!(out, "Top-10 control:       {:.1}%", ownership.concentration_ratio);
    let _ = writeln!(out, "Corporate control:    {:.1}%", corporate.corporate_control_percentage);
    let _ = writeln!(out, "Total market value:   {}", format_millions(economic.total_market_value));
    let _ = writeln!(out, "Average investment:   {}", format_optional_currency(economic.average_investment));
    let _ = writeln!(out, "Median sale price:    {}", format_optional_currency(pricing.median_price));
    let _ = writeln!(out, "Below-market sales:   {}", pricing.below_market_sales.len());
    let _ = writeln!(out, "Bulk purchases:       {}", report.temporal_analysis.bulk_purchases.len());
    let _ = writeln!(out, "Same-month bulk buys: {}", report.temporal_analysis.monthly_bulk_purchases.len());
    let entities = &report.entity_breakdown;
    let _ = writeln!(
        out,
        "LLC entities:         {} ({} properties)",
        entities.llc_entities.entities, entities.llc_entities.properties
    );
    let _ = writeln!(
        out,
        "Corporate entities:   {} ({} properties)",
        entities.corporate_entities.entities, entities.corporate_entities.properties
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "## Top owners");
    if ownership.top_owners.is_empty() {
        let _ = writeln!(out, "  {}", NO_DATA);
    }
    for (rank, owner) in ownership.top_owners.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<width$} {:>4} {}",
            rank + 1,
            truncate_label(&owner.key, OWNER_COLUMN_WIDTH),
            owner.property_count,
            if owner.is_corporate { "corporate" } else { "individual" },
            width = OWNER_COLUMN_WIDTH + 3
        );
    }

    if !report.risk_assessment.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## High-risk owners");
        for profile in &report.risk_assessment {
            let _ = writeln!(
                out,
                "  {} (score {}): {}",
                profile.owner,
                profile.risk_score,
                profile.risk_factors.join("; ")
            );
        }
    }

    if !entities.potential_shell_companies.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Potential shell companies ({})", entities.total_shell_companies);
        for shell in &entities.potential_shell_companies {
            let _ = writeln!(out, "  {:>4} {}", shell.properties, shell.owner);
        }
    }

    let flags = &report.flags_analysis;
    let _ = writeln!(out);
    let _ = writeln!(out, "## Data quality");
    let _ = writeln!(out, "  Year built 9999:      {}", flags.year_9999.len());
    let _ = writeln!(out, "  Sale year 1900:       {}", flags.old_sales.len());
    let _ = writeln!(out, "  Suspicious year built: {}", flags.suspicious_years.len());

    let _ = writeln!(out);
    let _ = writeln!(out, "## Recommendations");
    if report.target_recommendations.is_empty() {
        let _ = writeln!(out, "  {}", NO_DATA);
    }
    for rec in &report.target_recommendations {
        let _ = writeln!(out, "[{}] {}", rec.target_type.as_str(), rec.entity);
        let _ = writeln!(out, "  {}", rec.rationale);
        for tactic in &rec.tactics {
            let _ = writeln!(out, "  - {}", tactic);
        }
    }

    if corporate.total_corporate_owners > 0 {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} corporate owners hold {} of all properties.",
            corporate.total_corporate_owners,
            format_rounded_percent(corporate.corporate_control_percentage)
        );
    }

    out
}
