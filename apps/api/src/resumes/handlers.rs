use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{export_filename, export_pdf, ExportFormat};
use crate::models::resume::{ResumeData, ResumeRecord, ResumeSettings};
use crate::models::user::AuthContext;
use crate::render::render_resume;
use crate::resumes::versioning::{apply_update, ResumeUpdate};
use crate::state::AppState;

/// Listing shape: the content payload and version history stay out of the
/// collection endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: Uuid,
    pub title: String,
    pub template_id: Uuid,
    pub is_public: bool,
    pub last_edited: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ResumeRecord> for ResumeSummary {
    fn from(r: &ResumeRecord) -> Self {
        ResumeSummary {
            id: r.id,
            title: r.title.clone(),
            template_id: r.template_id,
            is_public: r.is_public,
            last_edited: r.last_edited,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResumeRequest {
    pub title: Option<String>,
    pub template_id: Option<Uuid>,
    pub data: Option<ResumeData>,
    pub settings: Option<ResumeSettings>,
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let resumes = state.resumes.find_by_owner(auth.user_id).await?;
    Ok(Json(resumes.iter().map(ResumeSummary::from).collect()))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeSummary>), AppError> {
    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Title, templateId, and data are required".into()))?;
    let template_id = req
        .template_id
        .ok_or_else(|| AppError::Validation("Title, templateId, and data are required".into()))?;
    let data = req
        .data
        .ok_or_else(|| AppError::Validation("Title, templateId, and data are required".into()))?;

    let resume = ResumeRecord::new(
        auth.user_id,
        title,
        template_id,
        data,
        req.settings.unwrap_or_default(),
        Utc::now(),
    );
    let created = state.resumes.create(resume).await?;
    info!("Created resume {} for user {}", created.id, auth.user_id);
    Ok((StatusCode::CREATED, Json(ResumeSummary::from(&created))))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRecord>, AppError> {
    let resume = state
        .resumes
        .find_by_id(id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".into()))?;
    Ok(Json(resume))
}

/// PUT /api/v1/resumes/:id — content updates pass through the Version
/// Recorder: the pre-update content is snapshotted before being replaced.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(update): Json<ResumeUpdate>,
) -> Result<Json<ResumeSummary>, AppError> {
    let mut resume = state
        .resumes
        .find_by_id(id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".into()))?;

    apply_update(&mut resume, update, Utc::now());
    let updated = state.resumes.update(&resume).await?;
    info!(
        "Updated resume {} (version count {})",
        updated.id,
        updated.versions.len()
    );
    Ok(Json(ResumeSummary::from(&updated)))
}

/// DELETE /api/v1/resumes/:id — hard delete, version history included.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.resumes.delete(id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Resume not found".into()));
    }
    info!("Deleted resume {id}");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub format: Option<String>,
}

/// POST /api/v1/resumes/:id/export
///
/// Flow: fetch owned resume → fetch its template → dispatch on format →
/// (pdf) premium gate, render, rasterize → binary response.
pub async fn handle_export_resume(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let format: ExportFormat = req
        .format
        .as_deref()
        .unwrap_or("pdf")
        .parse()
        .map_err(AppError::Validation)?;

    let resume = state
        .resumes
        .find_by_id(id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".into()))?;
    let template = state
        .templates
        .find_by_id(resume.template_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Template not found".into()))?;

    match format {
        ExportFormat::Docx => {
            return Err(AppError::NotImplemented(
                "DOCX export not yet implemented".into(),
            ))
        }
        ExportFormat::Png => {
            return Err(AppError::NotImplemented(
                "PNG export not yet implemented".into(),
            ))
        }
        ExportFormat::Pdf => {}
    }

    // Premium templates are gated here at the export boundary; the renderer
    // itself performs no plan checks.
    if template.is_premium && !auth.plan.premium_access() {
        return Err(AppError::Forbidden);
    }

    let html = render_resume(&resume.data, &resume.settings, &template)?;
    let pdf = export_pdf(state.engine.as_ref(), &html).await?;
    let filename = export_filename(&resume.data.personal_info);
    info!("Exported resume {} as {}", resume.id, filename);

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, Bytes::from(pdf)).into_response())
}
