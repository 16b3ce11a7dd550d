use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::template::{TemplateCategory, TemplateRecord};
use crate::models::user::{AuthContext, Role};
use crate::state::AppState;
use crate::store::TemplateFilter;

/// Catalog listing shape — the rendering payload (markup/css) stays out of
/// list responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub price: i64,
    pub is_premium: bool,
    pub preview_url: String,
    pub thumbnail_url: String,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    pub download_count: i64,
    pub rating: f64,
    pub review_count: i64,
}

impl From<&TemplateRecord> for TemplateSummary {
    fn from(t: &TemplateRecord) -> Self {
        TemplateSummary {
            id: t.id,
            name: t.name.clone(),
            description: t.description.clone(),
            category: t.category,
            price: t.price,
            is_premium: t.is_premium,
            preview_url: t.preview_url.clone(),
            thumbnail_url: t.thumbnail_url.clone(),
            features: t.features.clone(),
            tags: t.tags.clone(),
            download_count: t.download_count,
            rating: t.rating,
            review_count: t.review_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTemplatesQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub is_premium: Option<bool>,
}

/// GET /api/v1/templates — active templates only, sorted by popularity.
pub async fn handle_list_templates(
    State(state): State<AppState>,
    Query(query): Query<ListTemplatesQuery>,
) -> Result<Json<Vec<TemplateSummary>>, AppError> {
    let category = match query.category.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<TemplateCategory>()
                .map_err(AppError::Validation)?,
        ),
    };
    let filter = TemplateFilter {
        category,
        search: query.search,
        is_premium: query.is_premium,
    };
    let templates = state.templates.list(&filter).await?;
    Ok(Json(templates.iter().map(TemplateSummary::from).collect()))
}

/// GET /api/v1/templates/:id — full record, rendering payload included.
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplateRecord>, AppError> {
    let template = state
        .templates
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Template not found".into()))?;
    Ok(Json(template))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub is_premium: bool,
    pub preview_url: String,
    pub thumbnail_url: String,
    pub markup: String,
    pub css: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// POST /api/v1/templates — admin only.
pub async fn handle_create_template(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateRecord>), AppError> {
    require_admin(&auth)?;
    if req.name.trim().is_empty() || req.markup.trim().is_empty() || req.css.trim().is_empty() {
        return Err(AppError::Validation(
            "Name, markup, and css are required".into(),
        ));
    }
    if req.price < 0 {
        return Err(AppError::Validation("Price cannot be negative".into()));
    }

    let now = Utc::now();
    let template = TemplateRecord {
        id: Uuid::new_v4(),
        name: req.name,
        description: req.description,
        category: req.category,
        price: req.price,
        is_premium: req.is_premium,
        preview_url: req.preview_url,
        thumbnail_url: req.thumbnail_url,
        markup: req.markup,
        css: req.css,
        features: req.features,
        tags: req.tags,
        is_active: true,
        download_count: 0,
        rating: 0.0,
        review_count: 0,
        created_at: now,
        updated_at: now,
    };
    let created = state.templates.create(template).await?;
    info!("Created template {} ({})", created.name, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partial admin edit. `isActive: false` hides a template from the catalog
/// without deleting it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<TemplateCategory>,
    pub price: Option<i64>,
    pub is_premium: Option<bool>,
    pub preview_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub markup: Option<String>,
    pub css: Option<String>,
    pub features: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// PUT /api/v1/templates/:id — admin only.
pub async fn handle_update_template(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateRecord>, AppError> {
    require_admin(&auth)?;
    let mut template = state
        .templates
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Template not found".into()))?;

    if let Some(price) = req.price {
        if price < 0 {
            return Err(AppError::Validation("Price cannot be negative".into()));
        }
        template.price = price;
    }
    if let Some(name) = req.name {
        template.name = name;
    }
    if let Some(description) = req.description {
        template.description = description;
    }
    if let Some(category) = req.category {
        template.category = category;
    }
    if let Some(is_premium) = req.is_premium {
        template.is_premium = is_premium;
    }
    if let Some(preview_url) = req.preview_url {
        template.preview_url = preview_url;
    }
    if let Some(thumbnail_url) = req.thumbnail_url {
        template.thumbnail_url = thumbnail_url;
    }
    if let Some(markup) = req.markup {
        template.markup = markup;
    }
    if let Some(css) = req.css {
        template.css = css;
    }
    if let Some(features) = req.features {
        template.features = features;
    }
    if let Some(tags) = req.tags {
        template.tags = tags;
    }
    if let Some(is_active) = req.is_active {
        template.is_active = is_active;
    }
    template.updated_at = Utc::now();

    let updated = state.templates.update(&template).await?;
    info!("Updated template {}", updated.id);
    Ok(Json(updated))
}

/// DELETE /api/v1/templates/:id — admin only, hard delete.
pub async fn handle_delete_template(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_admin(&auth)?;
    let deleted = state.templates.delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Template not found".into()));
    }
    info!("Deleted template {id}");
    Ok(StatusCode::NO_CONTENT)
}

fn require_admin(auth: &AuthContext) -> Result<(), AppError> {
    if auth.role != Role::Admin {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
