//! Template Renderer — merges one resume's content with one template's
//! (markup, stylesheet) pair into a single self-contained HTML document.
//!
//! Deterministic: same (document, template) input yields byte-identical
//! output. The renderer fetches nothing itself and never mutates either
//! input; the export flow supplies both.

pub mod document;
pub mod eval;
pub mod parser;

use thiserror::Error;

use crate::models::resume::{ResumeData, ResumeSettings};
use crate::models::template::TemplateRecord;
use crate::render::parser::ParseError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("malformed template: {0}")]
    Parse(#[from] ParseError),

    #[error("template iterates missing or non-array section '{0}'")]
    MissingSection(String),

    #[error("content serialization failed: {0}")]
    Content(#[from] serde_json::Error),
}

/// Renders a resume against a template. The output contains no remaining
/// directive syntax; a structurally invalid template fails fast instead.
pub fn render_resume(
    data: &ResumeData,
    settings: &ResumeSettings,
    template: &TemplateRecord,
) -> Result<String, RenderError> {
    let nodes = parser::parse(&template.markup)?;
    let scope = eval::build_scope(data, settings)?;
    let mut body = String::new();
    eval::evaluate(&nodes, &mut vec![&scope], &mut body)?;
    Ok(document::wrap_document(&body, &template.css, settings))
}
