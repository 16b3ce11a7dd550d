//! Headless-Chromium render engine.
//!
//! One browser process per export call, torn down unconditionally by
//! `close`. All browser interaction is blocking, so every call runs inside
//! `tokio::task::spawn_blocking` to stay off the async runtime.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::export::engine::{EngineError, EnginePage, PdfOptions, RenderEngine};

pub struct ChromiumEngine {
    options: PdfOptions,
    chrome_path: Option<PathBuf>,
}

impl ChromiumEngine {
    pub fn new(options: PdfOptions, chrome_path: Option<PathBuf>) -> Self {
        ChromiumEngine {
            options,
            chrome_path,
        }
    }
}

#[async_trait]
impl RenderEngine for ChromiumEngine {
    async fn acquire(&self) -> Result<Box<dyn EnginePage>, EngineError> {
        let chrome_path = self.chrome_path.clone();
        let load_timeout = self.options.load_timeout;

        let (browser, tab) = tokio::task::spawn_blocking(move || {
            let mut builder = LaunchOptions::default_builder();
            builder.headless(true).path(chrome_path);
            let launch = builder
                .build()
                .map_err(|e| EngineError::Launch(e.to_string()))?;
            let browser = Browser::new(launch).map_err(|e| EngineError::Launch(e.to_string()))?;
            let tab = browser
                .new_tab()
                .map_err(|e| EngineError::Launch(e.to_string()))?;
            tab.set_default_timeout(load_timeout);
            Ok::<_, EngineError>((browser, tab))
        })
        .await
        .map_err(|e| EngineError::Launch(e.to_string()))??;

        debug!("Chromium instance launched for export");
        Ok(Box::new(ChromiumPage {
            browser: Some(browser),
            tab: Some(tab),
            html_file: None,
            options: self.options.clone(),
        }))
    }
}

struct ChromiumPage {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
    /// Keeps the rendered markup alive on disk for the lifetime of the page.
    html_file: Option<NamedTempFile>,
    options: PdfOptions,
}

impl ChromiumPage {
    fn tab(&self) -> Result<Arc<Tab>, EngineError> {
        self.tab
            .clone()
            .ok_or_else(|| EngineError::Load("page already closed".to_string()))
    }
}

#[async_trait]
impl EnginePage for ChromiumPage {
    async fn load(&mut self, html: &str) -> Result<(), EngineError> {
        let tab = self.tab()?;
        let html = html.to_owned();

        let loading = tokio::task::spawn_blocking(move || {
            let mut file = tempfile::Builder::new()
                .prefix("resume-export-")
                .suffix(".html")
                .tempfile()
                .map_err(|e| EngineError::Load(e.to_string()))?;
            file.write_all(html.as_bytes())
                .and_then(|_| file.flush())
                .map_err(|e| EngineError::Load(e.to_string()))?;

            let url = format!("file://{}", file.path().display());
            tab.navigate_to(&url)
                .and_then(|tab| tab.wait_until_navigated())
                .map_err(|e| EngineError::Load(e.to_string()))?;
            Ok::<_, EngineError>(file)
        });

        // Hard bound on the quiescence wait, over and above the tab's own
        // default timeout.
        let file = tokio::time::timeout(self.options.load_timeout + Duration::from_secs(1), loading)
            .await
            .map_err(|_| EngineError::LoadTimeout)?
            .map_err(|e| EngineError::Load(e.to_string()))??;

        self.html_file = Some(file);
        Ok(())
    }

    async fn print_pdf(&mut self) -> Result<Vec<u8>, EngineError> {
        let tab = self.tab()?;
        let (paper_width, paper_height) = self.options.page_size.dimensions_in();
        let margin = self.options.margin_in;

        tokio::task::spawn_blocking(move || {
            let options = PrintToPdfOptions {
                print_background: Some(true),
                paper_width: Some(paper_width),
                paper_height: Some(paper_height),
                margin_top: Some(margin),
                margin_bottom: Some(margin),
                margin_left: Some(margin),
                margin_right: Some(margin),
                ..Default::default()
            };
            tab.print_to_pdf(Some(options))
                .map_err(|e| EngineError::Print(e.to_string()))
        })
        .await
        .map_err(|e| EngineError::Print(e.to_string()))?
    }

    async fn close(&mut self) {
        self.tab = None;
        self.html_file = None;
        if let Some(browser) = self.browser.take() {
            // Dropping the browser kills the child Chromium process.
            let _ = tokio::task::spawn_blocking(move || drop(browser)).await;
            debug!("Chromium instance released");
        }
    }
}
