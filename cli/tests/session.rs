use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use powermap::prelude::*;
use tempfile::TempDir;

const CSV: &str = "ADDRESS,OWNER,SALE_PRICE,SALE_DATE,YEAR_BUILT\n\
                   1 Main St,Acme LLC,250000,2020-05-01,1990\n\
                   2 Oak Ave,Jane Doe,300000,2021-06-15,1985\n";

/// Serves fixed text per id; ids mapped to `None` fail as unavailable.
struct MemorySource {
    datasets: HashMap<String, Option<String>>,
}

#[async_trait]
impl DatasetSource for MemorySource {
    async fn fetch(&self, id: &str) -> Result<FetchedDataset> {
        match self.datasets.get(id) {
            Some(Some(content)) => Ok(FetchedDataset {
                label: id.to_string(),
                content: content.clone(),
            }),
            Some(None) => Err(AnalysisError::SourceUnavailable {
                dataset: id.to_string(),
                reason: "HTTP 503 Service Unavailable".to_string(),
                status: Some(503),
            }),
            None => Err(AnalysisError::UnknownDataset(id.to_string())),
        }
    }

    fn list(&self) -> Vec<DatasetPreset> {
        self.datasets
            .keys()
            .map(|id| DatasetPreset {
                id: id.clone(),
                name: id.clone(),
                location: format!("memory://{}", id),
            })
            .collect()
    }
}

fn memory_analyzer() -> PropertyAnalyzer {
    let mut datasets = HashMap::new();
    datasets.insert("good".to_string(), Some(CSV.to_string()));
    datasets.insert("down".to_string(), None);
    datasets.insert("blank".to_string(), Some("ADDRESS,OWNER,SALE_PRICE,SALE_DATE,YEAR_BUILT\n".to_string()));

    AnalysisBuilder::new()
        .with_source(Arc::new(MemorySource { datasets }))
        .build()
        .unwrap()
}

#[tokio::test]
async fn failed_loads_leave_report_untouched() {
    let analyzer = memory_analyzer();
    let mut session = AnalysisSession::new();

    let id = session.load_dataset(&analyzer, "good").await.unwrap().id;

    for (dataset, kind) in [("down", "source_unavailable"), ("blank", "empty_result"), ("nope", "unknown_dataset")] {
        let err = session.load_dataset(&analyzer, dataset).await.unwrap_err();
        assert_eq!(err.kind(), kind);
        let current = session.current().unwrap();
        assert_eq!(current.id, id);
        assert_eq!(current.source, "good");
    }
}

#[tokio::test]
async fn apply_takes_any_outcome() {
    let analyzer = memory_analyzer();
    let mut session = AnalysisSession::new();

    let err = session.apply(analyzer.analyze_dataset("down").await).unwrap_err();
    assert!(matches!(err, AnalysisError::SourceUnavailable { status: Some(503), .. }));
    assert!(session.current().is_none());

    let report = session.apply(analyzer.analyze_dataset("good").await).unwrap();
    assert_eq!(report.total_properties, 2);
}

#[tokio::test]
async fn file_presets_load_through_data_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Assessor-Search-Results_Concordia.csv"), CSV).unwrap();

    let analyzer = AnalysisBuilder::new().with_data_dir(dir.path()).build().unwrap();
    let mut session = AnalysisSession::new();
    let report = session.load_dataset(&analyzer, "concordia").await.unwrap();
    assert_eq!(report.source, "Concordia");
    assert_eq!(report.total_properties, 2);

    let err = session.load_dataset(&analyzer, "sample").await.unwrap_err();
    assert!(matches!(err, AnalysisError::SourceUnavailable { ref dataset, .. } if dataset == "Sample neighborhood"));
    assert_eq!(session.current().unwrap().source, "Concordia");
}

#[tokio::test]
async fn unreachable_remote_preset_is_unavailable() {
    let analyzer = AnalysisBuilder::new()
        .with_fetch_timeout_secs(2)
        .add_dataset(DatasetPreset {
            id: "remote".to_string(),
            name: "Remote".to_string(),
            // reserved TEST-NET address, never routable
            location: "http://192.0.2.1:9/data.csv".to_string(),
        })
        .build()
        .unwrap();

    let started = std::time::Instant::now();
    let err = analyzer.analyze_dataset("remote").await.unwrap_err();
    assert_eq!(err.kind(), "source_unavailable");
    assert!(started.elapsed() < Duration::from_secs(10));
}
