use crate::data_structures::{SharedAnalyzer, SharedSession};
use axum::{
    body::Bytes,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use powermap::{config::DatasetPreset, error::AnalysisError, models::AnalysisReport};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

const DEFAULT_UPLOAD_LABEL: &str = "upload.csv";

#[derive(Clone)]
pub struct AppState {
    pub analyzer: SharedAnalyzer,
    pub session: SharedSession,
}

impl FromRef<AppState> for SharedAnalyzer {
    fn from_ref(app_state: &AppState) -> SharedAnalyzer {
        app_state.analyzer.clone()
    }
}

impl FromRef<AppState> for SharedSession {
    fn from_ref(app_state: &AppState) -> SharedSession {
        app_state.session.clone()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/datasets", get(list_datasets_handler))
        .route("/datasets/{id}/analyze", post(analyze_dataset_handler))
        .route("/analyze", post(analyze_upload_handler))
        .route("/report", get(current_report_handler))
        .with_state(state)
}

/// Analysis failures as JSON `{ error, message }`.
#[derive(Debug)]
pub struct ApiError(AnalysisError);

impl From<AnalysisError> for ApiError {
    fn from(error: AnalysisError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AnalysisError::Parse { .. } => StatusCode::BAD_REQUEST,
            AnalysisError::EmptyResult(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisError::UnknownDataset(_) => StatusCode::NOT_FOUND,
            AnalysisError::SourceUnavailable { .. } => StatusCode::BAD_GATEWAY,
            AnalysisError::Config(_) | AnalysisError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({ "error": self.0.kind(), "message": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub label: Option<String>,
}

pub async fn health_handler() -> &'static str {
    "OK"
}

#[instrument(skip(analyzer))]
pub async fn list_datasets_handler(State(analyzer): State<SharedAnalyzer>) -> Json<Vec<DatasetPreset>> {
    let datasets = analyzer.datasets();
    debug!(count = datasets.len(), "Listing datasets");
    Json(datasets)
}

#[instrument(skip(analyzer, session))]
pub async fn analyze_dataset_handler(
    State(analyzer): State<SharedAnalyzer>,
    State(session): State<SharedSession>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisReport>, ApiError> {
    // fetch without the lock so /report stays readable meanwhile
    let outcome = analyzer.analyze_dataset(&id).await;
    let mut guard = session.lock().await;
    let report = guard.apply(outcome)?;
    info!(report_id = %report.id, total_properties = report.total_properties, "Dataset analyzed");
    Ok(Json(report.clone()))
}

#[instrument(skip(analyzer, session, body), fields(bytes = body.len()))]
pub async fn analyze_upload_handler(
    State(analyzer): State<SharedAnalyzer>,
    State(session): State<SharedSession>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<AnalysisReport>, ApiError> {
    let label = params
        .label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_LABEL.to_string());

    let outcome = std::str::from_utf8(&body)
        .map_err(|e| AnalysisError::parse(&label, format!("invalid UTF-8: {}", e)))
        .and_then(|content| analyzer.analyze_csv(content, &label));

    let mut guard = session.lock().await;
    let report = guard.apply(outcome)?;
    info!(report_id = %report.id, total_properties = report.total_properties, "Upload analyzed");
    Ok(Json(report.clone()))
}

#[instrument(skip(session))]
pub async fn current_report_handler(State(session): State<SharedSession>) -> Response {
    let guard = session.lock().await;
    match guard.current() {
        Some(report) => (StatusCode::OK, Json(report.clone())).into_response(),
        None => {
            warn!("Report requested before any analysis");
            let body = json!({ "error": "no_report", "message": "no analysis has been run yet" });
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::new_shared_session;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use powermap::api::AnalysisBuilder;
    use async_trait::async_trait;
    use powermap::services::{DatasetSource, FetchedDataset};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const CSV: &str = "ADDRESS,OWNER,SALE_PRICE,SALE_DATE,YEAR_BUILT\n\
                       1 Main St,Acme LLC,250000,2020-05-01,1990\n\
                       2 Oak Ave,ACME LLC,300000,2020-06-15,9999\n\
                       3 Pine Rd,Jane Doe,0,1900-01-01,1950\n";

    fn test_app(data_dir: &TempDir) -> Router {
        let analyzer = AnalysisBuilder::new()
            .with_data_dir(data_dir.path())
            .with_current_year(2024)
            .build()
            .unwrap();
        build_router(AppState {
            analyzer: Arc::new(analyzer),
            session: new_shared_session(),
        })
    }

    /// Takes its time answering, like a slow remote host.
    struct SlowSource {
        delay: Duration,
    }

    #[async_trait]
    impl DatasetSource for SlowSource {
        async fn fetch(&self, id: &str) -> powermap::error::Result<FetchedDataset> {
            tokio::time::sleep(self.delay).await;
            Ok(FetchedDataset {
                label: id.to_string(),
                content: CSV.to_string(),
            })
        }

        fn list(&self) -> Vec<DatasetPreset> {
            Vec::new()
        }
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "text/csv")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn report_is_404_before_any_analysis() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir).oneshot(get("/report")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "no_report");
    }

    #[tokio::test]
    async fn upload_produces_camel_case_report() {
        let dir = TempDir::new().unwrap();
        let response = test_app(&dir)
            .oneshot(post("/analyze?label=mine.csv", CSV))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report = json_body(response).await;
        assert_eq!(report["source"], "mine.csv");
        assert_eq!(report["totalProperties"], 3);
        assert_eq!(report["ownershipConcentration"]["sortedOwners"][0]["key"], "ACME LLC");
        assert_eq!(report["flagsAnalysis"]["year9999"][0]["address"], "2 Oak Ave");
        assert_eq!(report["targetRecommendations"][0]["type"], "corporate_target");
        assert_eq!(report["targetRecommendations"][1]["entity"], "City Council");
    }

    #[tokio::test]
    async fn failed_upload_keeps_previous_report() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let first = app.clone().oneshot(post("/analyze", CSV)).await.unwrap();
        let first_id = json_body(first).await["id"].clone();

        let empty = app
            .clone()
            .oneshot(post("/analyze", "ADDRESS,OWNER,SALE_PRICE,SALE_DATE,YEAR_BUILT\n"))
            .await
            .unwrap();
        assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(empty).await["error"], "empty_result");

        let malformed = app.clone().oneshot(post("/analyze", "ADDRESS,OWNER\nx,y\n")).await.unwrap();
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

        let current = app.oneshot(get("/report")).await.unwrap();
        assert_eq!(current.status(), StatusCode::OK);
        let current = json_body(current).await;
        assert_eq!(current["id"], first_id);
        assert_eq!(current["source"], "upload.csv");
    }

    #[tokio::test]
    async fn dataset_errors_map_to_status_codes() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let unknown = app.clone().oneshot(post("/datasets/atlantis/analyze", "")).await.unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(unknown).await["error"], "unknown_dataset");

        // preset file not present in the data dir
        let missing = app.oneshot(post("/datasets/concordia/analyze", "")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(missing).await;
        assert_eq!(body["error"], "source_unavailable");
        assert!(body["message"].as_str().unwrap().starts_with("could not load Concordia data"));
    }

    #[tokio::test]
    async fn dataset_from_data_dir_becomes_current() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Assessor-Search-Results.csv"), CSV).unwrap();
        let app = test_app(&dir);

        let response = app.clone().oneshot(post("/datasets/sample/analyze", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let listed = json_body(app.clone().oneshot(get("/datasets")).await.unwrap()).await;
        assert_eq!(listed.as_array().unwrap().len(), 2);

        let current = json_body(app.oneshot(get("/report")).await.unwrap()).await;
        assert_eq!(current["source"], "Sample neighborhood");
    }

    #[tokio::test]
    async fn report_stays_readable_while_dataset_loads() {
        let analyzer = AnalysisBuilder::new()
            .with_source(Arc::new(SlowSource {
                delay: Duration::from_secs(3),
            }))
            .build()
            .unwrap();
        let app = build_router(AppState {
            analyzer: Arc::new(analyzer),
            session: new_shared_session(),
        });

        let first = app.clone().oneshot(post("/analyze?label=first.csv", CSV)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let loading = tokio::spawn(app.clone().oneshot(post("/datasets/slow/analyze", "")));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let current = tokio::time::timeout(Duration::from_secs(1), app.clone().oneshot(get("/report")))
            .await
            .expect("report blocked behind dataset fetch")
            .unwrap();
        assert_eq!(json_body(current).await["source"], "first.csv");

        let loaded = loading.await.unwrap().unwrap();
        assert_eq!(loaded.status(), StatusCode::OK);
        let current = json_body(app.oneshot(get("/report")).await.unwrap()).await;
        assert_eq!(current["source"], "slow");
    }

    #[tokio::test]
    async fn non_utf8_upload_is_json_parse_error() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);
        app.clone().oneshot(post("/analyze", CSV)).await.unwrap();

        let request = Request::builder()
            .method("POST")
            .uri("/analyze?label=latin1.csv")
            .header("content-type", "text/csv")
            .body(Body::from(vec![b'A', 0xff, 0xfe, b'\n']))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"], "parse_error");
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("could not parse latin1.csv: invalid UTF-8"), "{}", message);

        let current = json_body(app.oneshot(get("/report")).await.unwrap()).await;
        assert_eq!(current["source"], "upload.csv");
    }
}
