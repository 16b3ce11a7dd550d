//! Render-engine seam — trait-based so the export pipeline can swap the
//! real headless-browser backend for a counting mock in tests.
//!
//! Carried in `AppState` as `Arc<dyn RenderEngine>`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Canonical page dimensions for rasterization, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    pub fn dimensions_in(self) -> (f64, f64) {
        match self {
            PageSize::A4 => (8.27, 11.69),
            PageSize::Letter => (8.5, 11.0),
        }
    }
}

/// Rasterization options: A4 with 0.5in margins by default, quiescence wait
/// bounded at 30s.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub page_size: PageSize,
    pub margin_in: f64,
    pub load_timeout: Duration,
}

impl Default for PdfOptions {
    fn default() -> Self {
        PdfOptions {
            page_size: PageSize::A4,
            margin_in: 0.5,
            load_timeout: Duration::from_secs(30),
        }
    }
}

/// Distinct failure causes, all surfaced to callers as one generic
/// export-failure; the distinction exists for operator logs.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine launch failed: {0}")]
    Launch(String),

    #[error("content load failed: {0}")]
    Load(String),

    #[error("content load timed out")]
    LoadTimeout,

    #[error("rasterization failed: {0}")]
    Print(String),
}

/// Acquires one scoped page context per export call. No instance reuse
/// across calls — simplicity over throughput.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn EnginePage>, EngineError>;
}

/// One page context. `close` must be called on every exit path; the export
/// orchestration owns that discipline.
#[async_trait]
pub trait EnginePage: Send {
    /// Loads markup and waits for rendering to reach quiescence, bounded by
    /// the engine's configured timeout.
    async fn load(&mut self, html: &str) -> Result<(), EngineError>;

    /// Rasterizes the loaded page to paginated PDF bytes.
    async fn print_pdf(&mut self) -> Result<Vec<u8>, EngineError>;

    /// Tears the page and its engine instance down. Idempotent.
    async fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_a4_half_inch_30s() {
        let opts = PdfOptions::default();
        assert_eq!(opts.page_size, PageSize::A4);
        assert_eq!(opts.margin_in, 0.5);
        assert_eq!(opts.load_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_page_dimensions() {
        assert_eq!(PageSize::A4.dimensions_in(), (8.27, 11.69));
        assert_eq!(PageSize::Letter.dimensions_in(), (8.5, 11.0));
    }
}
