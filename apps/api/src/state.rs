use std::sync::Arc;

use crate::config::Config;
use crate::export::engine::RenderEngine;
use crate::store::{ResumeStore, TemplateStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resumes: Arc<dyn ResumeStore>,
    pub templates: Arc<dyn TemplateStore>,
    /// Pluggable PDF backend. Production: Chromium; tests: counting mock.
    pub engine: Arc<dyn RenderEngine>,
    pub config: Config,
}
