use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GenerationService;
use crate::render::RenderTracker;
use crate::store::ProductStore;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: ProductStore,
    /// Pluggable generation backend. Production: `OpenAiClient`; tests stub it.
    pub llm: Arc<dyn GenerationService>,
    /// Status of detached render tasks, keyed by document filename.
    pub render_tracker: RenderTracker,
}
