use std::collections::HashSet;

use crate::config::{AnalysisConfig, NameCorrection};

/// Uppercase, trim and collapse internal whitespace.
pub fn canonical_form(raw: &str) -> String {
    raw.to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Maps raw owner strings to normalized owner keys.
///
/// Corrections are held in canonical form, longest pattern first, so the
/// most specific pattern wins. A string that already equals a correction
/// target is returned unchanged, which keeps normalization idempotent.
#[derive(Debug, Clone)]
pub struct OwnerNormalizer {
    corrections: Vec<NameCorrection>,
    targets: HashSet<String>,
    min_truncated_match_len: usize,
}

impl OwnerNormalizer {
    pub fn new(corrections: &[NameCorrection], min_truncated_match_len: usize) -> Self {
        let mut corrections: Vec<NameCorrection> = corrections
            .iter()
            .map(|c| NameCorrection {
                pattern: canonical_form(&c.pattern),
                replacement: canonical_form(&c.replacement),
            })
            .filter(|c| !c.pattern.is_empty())
            .collect();
        corrections.sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));

        let targets = corrections.iter().map(|c| c.replacement.clone()).collect();

        Self {
            corrections,
            targets,
            min_truncated_match_len,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(&config.name_corrections, config.min_truncated_match_len)
    }

    pub fn normalize(&self, raw: &str) -> String {
        let canonical = canonical_form(raw);
        if canonical.is_empty() || self.targets.contains(&canonical) {
            return canonical;
        }

        let truncated_ok = canonical.len() >= self.min_truncated_match_len;
        self.corrections
            .iter()
            .find(|c| {
                canonical.contains(c.pattern.as_str())
                    || (truncated_ok && c.pattern.starts_with(canonical.as_str()))
            })
            .map(|c| c.replacement.clone())
            .unwrap_or(canonical)
    }
}

impl Default for OwnerNormalizer {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_case_and_whitespace() {
        let normalizer = OwnerNormalizer::default();
        assert_eq!(normalizer.normalize("  Foo   Inc "), "FOO INC");
        assert_eq!(normalizer.normalize("FOO INC"), "FOO INC");
        assert_eq!(normalizer.normalize("jane\tdoe"), "JANE DOE");
    }

    #[test]
    fn applies_historical_corrections() {
        let normalizer = OwnerNormalizer::default();
        let full = "PORTLAND COMMUNITY REINVESTMENT INITIATIVES";
        assert_eq!(normalizer.normalize("Portland Community Reinvest Initiat"), full);
        assert_eq!(normalizer.normalize("PORTLAND COMMUNITY REINVESTMENT INI"), full);
        assert_eq!(normalizer.normalize("PORTLAND COMMUNITY REINVESTMENT INI INC"), full);
        assert_eq!(normalizer.normalize(full), full);
    }

    #[test]
    fn truncated_names_need_minimum_length() {
        let normalizer = OwnerNormalizer::default();
        assert_eq!(
            normalizer.normalize("PORTLAND COMMUNITY REINV"),
            "PORTLAND COMMUNITY REINVESTMENT INITIATIVES"
        );
        assert_eq!(normalizer.normalize("PORTLAND"), "PORTLAND");
    }

    #[test]
    fn longest_pattern_wins() {
        let normalizer = OwnerNormalizer::new(
            &[
                NameCorrection::new("ACME", "ACME HOLDINGS"),
                NameCorrection::new("ACME WEST", "ACME WEST PROPERTIES LLC"),
            ],
            100,
        );
        assert_eq!(normalizer.normalize("acme west 2"), "ACME WEST PROPERTIES LLC");
        assert_eq!(normalizer.normalize("acme east"), "ACME HOLDINGS");
        assert_eq!(normalizer.normalize("ACME WEST PROPERTIES LLC"), "ACME WEST PROPERTIES LLC");
    }

    #[test]
    fn blank_stays_blank() {
        assert_eq!(OwnerNormalizer::default().normalize("   "), "");
    }
}
