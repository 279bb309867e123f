use crate::api::analyzer::PropertyAnalyzer;
use crate::error::Result;
use crate::models::AnalysisReport;
use crate::utils::Logger;

/// Holds the most recent successful report.
///
/// A failed load never clears or alters what is already held.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    current: Option<AnalysisReport>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&AnalysisReport> {
        self.current.as_ref()
    }

    /// Store a successful outcome; hand a failure back untouched.
    pub fn apply(&mut self, outcome: Result<AnalysisReport>) -> Result<&AnalysisReport> {
        match outcome {
            Ok(report) => {
                Logger::new("SESSION").info(&format!(
                    "Report {} from {} is now current",
                    report.id, report.source
                ));
                Ok(&*self.current.insert(report))
            }
            Err(e) => {
                Logger::new("SESSION").warn_with_error("Load failed, keeping previous report", &e);
                Err(e)
            }
        }
    }

    pub fn load_csv(&mut self, analyzer: &PropertyAnalyzer, content: &str, source_label: &str) -> Result<&AnalysisReport> {
        let outcome = analyzer.analyze_csv(content, source_label);
        self.apply(outcome)
    }

    pub async fn load_dataset(&mut self, analyzer: &PropertyAnalyzer, id: &str) -> Result<&AnalysisReport> {
        let outcome = analyzer.analyze_dataset(id).await;
        self.apply(outcome)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::error::AnalysisError;

    const CSV: &str = "ADDRESS,OWNER,SALE_PRICE,SALE_DATE,YEAR_BUILT\n1 Main St,Acme LLC,1,2020-01-01,1990\n";

    #[test]
    fn failure_keeps_previous_report() {
        let analyzer = PropertyAnalyzer::new(AnalysisConfig::default()).unwrap();
        let mut session = AnalysisSession::new();
        assert!(session.current().is_none());

        let id = session.load_csv(&analyzer, CSV, "first.csv").unwrap().id;

        let err = session
            .load_csv(&analyzer, "ADDRESS,OWNER,SALE_PRICE,SALE_DATE,YEAR_BUILT\n", "second.csv")
            .unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResult(_)));
        assert_eq!(session.current().unwrap().id, id);
        assert_eq!(session.current().unwrap().source, "first.csv");
    }

    #[test]
    fn success_replaces_report() {
        let analyzer = PropertyAnalyzer::new(AnalysisConfig::default()).unwrap();
        let mut session = AnalysisSession::new();
        session.load_csv(&analyzer, CSV, "first.csv").unwrap();
        session.load_csv(&analyzer, CSV, "second.csv").unwrap();
        assert_eq!(session.current().unwrap().source, "second.csv");

        session.clear();
        assert!(session.current().is_none());
    }
}
