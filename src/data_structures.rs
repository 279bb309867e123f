use powermap::api::{AnalysisSession, PropertyAnalyzer};
use std::sync::Arc;
use tokio::sync::Mutex;

// --- Type Aliases for Shared State ---

// The one session this node serves; every analysis goes through this lock.
pub type SharedSession = Arc<Mutex<AnalysisSession>>;

// Analyzer is immutable after startup
pub type SharedAnalyzer = Arc<PropertyAnalyzer>;

pub fn new_shared_session() -> SharedSession {
    Arc::new(Mutex::new(AnalysisSession::new()))
}
