use crate::analysis::AnalysisResult;
use crate::gemini::GenerationService;
use crate::request::Gates;
use crate::storage::PersistedStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: PersistedStore,
    pub generator: Arc<dyn GenerationService>,
    pub gates: Arc<Gates>,
    pub latest_analysis: Arc<Mutex<Option<AnalysisResult>>>,
}

impl AppState {
    pub fn new(store: PersistedStore, generator: Arc<dyn GenerationService>) -> Self {
        Self {
            store,
            generator,
            gates: Arc::new(Gates::default()),
            latest_analysis: Arc::new(Mutex::new(None)),
        }
    }
}
