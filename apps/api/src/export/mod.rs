//! Document Exporter — format dispatch and the acquire/use/release
//! orchestration around the render engine.
//!
//! `docx` and `png` are recognized formats that report "not implemented"
//! without ever touching the engine; unknown strings are a client error.

pub mod chromium;
pub mod engine;

use std::str::FromStr;

use tracing::info;

use crate::errors::AppError;
use crate::export::engine::RenderEngine;
use crate::models::resume::PersonalInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Png,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "png" => Ok(ExportFormat::Png),
            other => Err(format!(
                "Unsupported format '{other}'. Use pdf, docx, or png"
            )),
        }
    }
}

/// Runs the full engine lifecycle for one export: acquire a page, load the
/// rendered markup, rasterize. The page is closed on every exit path —
/// success, load failure, or rasterization failure.
pub async fn export_pdf(engine: &dyn RenderEngine, html: &str) -> Result<Vec<u8>, AppError> {
    let mut page = engine.acquire().await?;

    let result = async {
        page.load(html).await?;
        page.print_pdf().await
    }
    .await;

    page.close().await;

    let bytes = result?;
    info!("Export rasterized: {} bytes of PDF", bytes.len());
    Ok(bytes)
}

/// Suggested download filename: `{First}_{Last}_Resume.pdf`.
/// Sanitized because the value travels in a Content-Disposition header.
pub fn export_filename(personal: &PersonalInfo) -> String {
    format!(
        "{}_{}_Resume.pdf",
        sanitize(&personal.first_name),
        sanitize(&personal.last_name)
    )
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::engine::{EngineError, EnginePage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum FailAt {
        Never,
        Acquire,
        Load,
        Print,
    }

    /// Counting mock engine: records acquire/close calls and fails at a
    /// configurable stage.
    struct MockEngine {
        fail_at: FailAt,
        acquires: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
    }

    impl MockEngine {
        fn new(fail_at: FailAt) -> Self {
            MockEngine {
                fail_at,
                acquires: Arc::new(AtomicUsize::new(0)),
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    struct MockPage {
        fail_at: FailAt,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RenderEngine for MockEngine {
        async fn acquire(&self) -> Result<Box<dyn EnginePage>, EngineError> {
            self.acquires.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == FailAt::Acquire {
                return Err(EngineError::Launch("boom".to_string()));
            }
            Ok(Box::new(MockPage {
                fail_at: self.fail_at,
                closes: self.closes.clone(),
            }))
        }
    }

    #[async_trait]
    impl EnginePage for MockPage {
        async fn load(&mut self, _html: &str) -> Result<(), EngineError> {
            if self.fail_at == FailAt::Load {
                return Err(EngineError::LoadTimeout);
            }
            Ok(())
        }

        async fn print_pdf(&mut self) -> Result<Vec<u8>, EngineError> {
            if self.fail_at == FailAt::Print {
                return Err(EngineError::Print("boom".to_string()));
            }
            Ok(b"%PDF-1.7 mock".to_vec())
        }

        async fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_format_parsing_is_case_insensitive() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("docx".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert_eq!("png".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert!("svg".parse::<ExportFormat>().is_err());
    }

    #[tokio::test]
    async fn test_successful_export_closes_page_once() {
        let engine = MockEngine::new(FailAt::Never);
        let bytes = export_pdf(&engine, "<html></html>").await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(engine.acquires.load(Ordering::SeqCst), 1);
        assert_eq!(engine.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_failure_still_closes_page() {
        let engine = MockEngine::new(FailAt::Load);
        let err = export_pdf(&engine, "<html></html>").await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::LoadTimeout)));
        assert_eq!(engine.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_print_failure_still_closes_page() {
        let engine = MockEngine::new(FailAt::Print);
        let err = export_pdf(&engine, "<html></html>").await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::Print(_))));
        assert_eq!(engine.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_launch_failure_surfaces_without_close() {
        let engine = MockEngine::new(FailAt::Acquire);
        let err = export_pdf(&engine, "<html></html>").await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::Launch(_))));
        // No page was ever handed out, so nothing to close.
        assert_eq!(engine.closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_filename_from_personal_info() {
        let personal = PersonalInfo {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..Default::default()
        };
        assert_eq!(export_filename(&personal), "Ada_Lovelace_Resume.pdf");
    }

    #[test]
    fn test_filename_sanitizes_header_unsafe_characters() {
        let personal = PersonalInfo {
            first_name: "Ada \"the Countess\"".to_string(),
            last_name: "of Lovelace".to_string(),
            ..Default::default()
        };
        let name = export_filename(&personal);
        assert!(!name.contains('"'));
        assert!(!name.contains(' '));
    }
}
