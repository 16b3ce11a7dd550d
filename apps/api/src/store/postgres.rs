//! PostgreSQL store. Nested payloads (content, settings, version history)
//! live in JSONB columns; single-row `UPDATE … RETURNING` keeps per-document
//! updates atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::resume::{ResumeData, ResumeRecord, ResumeSettings, VersionSnapshot};
use crate::models::template::{TemplateCategory, TemplateRecord};
use crate::store::{ResumeStore, StoreError, TemplateFilter, TemplateStore};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[derive(FromRow)]
struct ResumeRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    template_id: Uuid,
    data: Json<ResumeData>,
    settings: Json<ResumeSettings>,
    is_public: bool,
    last_edited: DateTime<Utc>,
    versions: Json<Vec<VersionSnapshot>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for ResumeRecord {
    fn from(row: ResumeRow) -> Self {
        ResumeRecord {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            template_id: row.template_id,
            data: row.data.0,
            settings: row.settings.0,
            is_public: row.is_public,
            last_edited: row.last_edited,
            versions: row.versions.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct TemplateRow {
    id: Uuid,
    name: String,
    description: String,
    category: String,
    price: i64,
    is_premium: bool,
    preview_url: String,
    thumbnail_url: String,
    markup: String,
    css: String,
    features: Vec<String>,
    tags: Vec<String>,
    is_active: bool,
    download_count: i64,
    rating: f64,
    review_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TemplateRow> for TemplateRecord {
    type Error = StoreError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        let category: TemplateCategory = row
            .category
            .parse()
            .map_err(|e: String| StoreError::Corrupt(e))?;
        Ok(TemplateRecord {
            id: row.id,
            name: row.name,
            description: row.description,
            category,
            price: row.price,
            is_premium: row.is_premium,
            preview_url: row.preview_url,
            thumbnail_url: row.thumbnail_url,
            markup: row.markup,
            css: row.css,
            features: row.features,
            tags: row.tags,
            is_active: row.is_active,
            download_count: row.download_count,
            rating: row.rating,
            review_count: row.review_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn create(&self, resume: ResumeRecord) -> Result<ResumeRecord, StoreError> {
        let row: ResumeRow = sqlx::query_as(
            r#"
            INSERT INTO resumes
                (id, user_id, title, template_id, data, settings, is_public,
                 last_edited, versions, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(resume.id)
        .bind(resume.user_id)
        .bind(&resume.title)
        .bind(resume.template_id)
        .bind(Json(&resume.data))
        .bind(Json(&resume.settings))
        .bind(resume.is_public)
        .bind(resume.last_edited)
        .bind(Json(&resume.versions))
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid, owner: Uuid) -> Result<Option<ResumeRecord>, StoreError> {
        let row: Option<ResumeRow> =
            sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_owner(&self, owner: Uuid) -> Result<Vec<ResumeRecord>, StoreError> {
        let rows: Vec<ResumeRow> =
            sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 ORDER BY last_edited DESC")
                .bind(owner)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, resume: &ResumeRecord) -> Result<ResumeRecord, StoreError> {
        let row: ResumeRow = sqlx::query_as(
            r#"
            UPDATE resumes
            SET title = $3, data = $4, settings = $5, is_public = $6,
                last_edited = $7, versions = $8, updated_at = $9
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(resume.id)
        .bind(resume.user_id)
        .bind(&resume.title)
        .bind(Json(&resume.data))
        .bind(Json(&resume.settings))
        .bind(resume.is_public)
        .bind(resume.last_edited)
        .bind(Json(&resume.versions))
        .bind(resume.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TemplateStore for PgStore {
    async fn create(&self, template: TemplateRecord) -> Result<TemplateRecord, StoreError> {
        let row: TemplateRow = sqlx::query_as(
            r#"
            INSERT INTO templates
                (id, name, description, category, price, is_premium, preview_url,
                 thumbnail_url, markup, css, features, tags, is_active,
                 download_count, rating, review_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(template.id)
        .bind(&template.name)
        .bind(&template.description)
        .bind(template.category.as_str())
        .bind(template.price)
        .bind(template.is_premium)
        .bind(&template.preview_url)
        .bind(&template.thumbnail_url)
        .bind(&template.markup)
        .bind(&template.css)
        .bind(&template.features)
        .bind(&template.tags)
        .bind(template.is_active)
        .bind(template.download_count)
        .bind(template.rating)
        .bind(template.review_count)
        .bind(template.created_at)
        .bind(template.updated_at)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TemplateRecord>, StoreError> {
        let row: Option<TemplateRow> = sqlx::query_as("SELECT * FROM templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: &TemplateFilter) -> Result<Vec<TemplateRecord>, StoreError> {
        let search_pattern = filter.search.as_ref().map(|s| format!("%{s}%"));
        let rows: Vec<TemplateRow> = sqlx::query_as(
            r#"
            SELECT * FROM templates
            WHERE is_active = TRUE
              AND ($1::text IS NULL OR category = $1)
              AND ($2::bool IS NULL OR is_premium = $2)
              AND ($3::text IS NULL
                   OR name ILIKE $3
                   OR description ILIKE $3
                   OR EXISTS (SELECT 1 FROM unnest(tags) tag WHERE tag ILIKE $3))
            ORDER BY download_count DESC, rating DESC
            "#,
        )
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.is_premium)
        .bind(search_pattern)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(&self, template: &TemplateRecord) -> Result<TemplateRecord, StoreError> {
        let row: TemplateRow = sqlx::query_as(
            r#"
            UPDATE templates
            SET name = $2, description = $3, category = $4, price = $5,
                is_premium = $6, preview_url = $7, thumbnail_url = $8,
                markup = $9, css = $10, features = $11, tags = $12,
                is_active = $13, download_count = $14, rating = $15,
                review_count = $16, updated_at = $17
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(template.id)
        .bind(&template.name)
        .bind(&template.description)
        .bind(template.category.as_str())
        .bind(template.price)
        .bind(template.is_premium)
        .bind(&template.preview_url)
        .bind(&template.thumbnail_url)
        .bind(&template.markup)
        .bind(&template.css)
        .bind(&template.features)
        .bind(&template.tags)
        .bind(template.is_active)
        .bind(template.download_count)
        .bind(template.rating)
        .bind(template.review_count)
        .bind(template.updated_at)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
