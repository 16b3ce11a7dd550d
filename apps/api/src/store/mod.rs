//! Repository layer — the persistence contract the core depends on.
//!
//! Two implementations ship in-tree: `MemoryStore` (explicitly-locked maps,
//! used for development and tests) and `PgStore` (PostgreSQL via sqlx).
//! Both must provide at least atomic single-document update.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::ResumeRecord;
use crate::models::template::{TemplateCategory, TemplateRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Catalog listing filter. `None` fields are not applied.
#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
    pub category: Option<TemplateCategory>,
    pub search: Option<String>,
    pub is_premium: Option<bool>,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create(&self, resume: ResumeRecord) -> Result<ResumeRecord, StoreError>;

    /// Ownership is part of the lookup key: a resume that exists but belongs
    /// to another user is reported as absent.
    async fn find_by_id(&self, id: Uuid, owner: Uuid) -> Result<Option<ResumeRecord>, StoreError>;

    async fn find_by_owner(&self, owner: Uuid) -> Result<Vec<ResumeRecord>, StoreError>;

    /// Replaces the stored record wholesale and returns the updated row.
    async fn update(&self, resume: &ResumeRecord) -> Result<ResumeRecord, StoreError>;

    /// Hard delete. Returns false when no owned record matched.
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn create(&self, template: TemplateRecord) -> Result<TemplateRecord, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TemplateRecord>, StoreError>;

    /// Active templates matching the filter, sorted by download count then
    /// rating, both descending.
    async fn list(&self, filter: &TemplateFilter) -> Result<Vec<TemplateRecord>, StoreError>;

    async fn update(&self, template: &TemplateRecord) -> Result<TemplateRecord, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
