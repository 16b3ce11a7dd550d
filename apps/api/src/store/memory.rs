//! In-memory store backed by explicitly-locked maps.
//!
//! Holding the write lock across each read-modify-write gives the
//! per-document update atomicity the Version Recorder relies on.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::resume::ResumeRecord;
use crate::models::template::TemplateRecord;
use crate::store::{ResumeStore, StoreError, TemplateFilter, TemplateStore};

#[derive(Default)]
pub struct MemoryStore {
    resumes: RwLock<HashMap<Uuid, ResumeRecord>>,
    templates: RwLock<HashMap<Uuid, TemplateRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn create(&self, resume: ResumeRecord) -> Result<ResumeRecord, StoreError> {
        let mut resumes = self.resumes.write().await;
        resumes.insert(resume.id, resume.clone());
        Ok(resume)
    }

    async fn find_by_id(&self, id: Uuid, owner: Uuid) -> Result<Option<ResumeRecord>, StoreError> {
        let resumes = self.resumes.read().await;
        Ok(resumes
            .get(&id)
            .filter(|r| r.user_id == owner)
            .cloned())
    }

    async fn find_by_owner(&self, owner: Uuid) -> Result<Vec<ResumeRecord>, StoreError> {
        let resumes = self.resumes.read().await;
        let mut owned: Vec<ResumeRecord> = resumes
            .values()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.last_edited.cmp(&a.last_edited));
        Ok(owned)
    }

    async fn update(&self, resume: &ResumeRecord) -> Result<ResumeRecord, StoreError> {
        let mut resumes = self.resumes.write().await;
        resumes.insert(resume.id, resume.clone());
        Ok(resume.clone())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let mut resumes = self.resumes.write().await;
        match resumes.get(&id) {
            Some(r) if r.user_id == owner => {
                resumes.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn create(&self, template: TemplateRecord) -> Result<TemplateRecord, StoreError> {
        let mut templates = self.templates.write().await;
        templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TemplateRecord>, StoreError> {
        let templates = self.templates.read().await;
        Ok(templates.get(&id).cloned())
    }

    async fn list(&self, filter: &TemplateFilter) -> Result<Vec<TemplateRecord>, StoreError> {
        let templates = self.templates.read().await;
        let mut matched: Vec<TemplateRecord> = templates
            .values()
            .filter(|t| t.is_active)
            .filter(|t| filter.category.map_or(true, |c| t.category == c))
            .filter(|t| filter.is_premium.map_or(true, |p| t.is_premium == p))
            .filter(|t| matches_search(t, filter.search.as_deref()))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.download_count.cmp(&a.download_count).then(
                b.rating
                    .partial_cmp(&a.rating)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });
        Ok(matched)
    }

    async fn update(&self, template: &TemplateRecord) -> Result<TemplateRecord, StoreError> {
        let mut templates = self.templates.write().await;
        templates.insert(template.id, template.clone());
        Ok(template.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut templates = self.templates.write().await;
        Ok(templates.remove(&id).is_some())
    }
}

fn matches_search(template: &TemplateRecord, search: Option<&str>) -> bool {
    let Some(needle) = search else {
        return true;
    };
    let needle = needle.to_lowercase();
    template.name.to_lowercase().contains(&needle)
        || template.description.to_lowercase().contains(&needle)
        || template
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{PersonalInfo, ResumeData, ResumeSettings};
    use crate::models::template::TemplateCategory;
    use chrono::Utc;

    fn make_resume(owner: Uuid) -> ResumeRecord {
        ResumeRecord::new(
            owner,
            "My Resume".to_string(),
            Uuid::new_v4(),
            ResumeData {
                personal_info: PersonalInfo {
                    first_name: "Ada".to_string(),
                    last_name: "Lovelace".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            ResumeSettings::default(),
            Utc::now(),
        )
    }

    fn make_template(name: &str, downloads: i64, rating: f64) -> TemplateRecord {
        let now = Utc::now();
        TemplateRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: "A test template".to_string(),
            category: TemplateCategory::Executive,
            price: 0,
            is_premium: false,
            preview_url: "/preview.jpg".to_string(),
            thumbnail_url: "/thumb.jpg".to_string(),
            markup: "<div>{{firstName}}</div>".to_string(),
            css: "div { color: #333; }".to_string(),
            features: vec![],
            tags: vec!["clean".to_string()],
            is_active: true,
            download_count: downloads,
            rating,
            review_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_resume_owner_isolation() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let resume = ResumeStore::create(&store, make_resume(owner)).await.unwrap();

        assert!(ResumeStore::find_by_id(&store, resume.id, owner)
            .await
            .unwrap()
            .is_some());
        assert!(ResumeStore::find_by_id(&store, resume.id, stranger)
            .await
            .unwrap()
            .is_none());
        assert!(!ResumeStore::delete(&store, resume.id, stranger)
            .await
            .unwrap());
        assert!(ResumeStore::delete(&store, resume.id, owner).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_owner_sorted_by_last_edited_desc() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let older = make_resume(owner);
        let mut newer = make_resume(owner);
        newer.last_edited = older.last_edited + chrono::Duration::seconds(60);
        ResumeStore::create(&store, older.clone()).await.unwrap();
        ResumeStore::create(&store, newer.clone()).await.unwrap();

        let listed = store.find_by_owner(owner).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_template_list_hides_inactive_and_sorts_by_popularity() {
        let store = MemoryStore::new();
        let popular = make_template("Popular", 500, 4.0);
        let niche = make_template("Niche", 10, 5.0);
        let mut hidden = make_template("Hidden", 9999, 5.0);
        hidden.is_active = false;
        for t in [popular.clone(), niche.clone(), hidden] {
            TemplateStore::create(&store, t).await.unwrap();
        }

        let listed = store.list(&TemplateFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, popular.id);
        assert_eq!(listed[1].id, niche.id);
    }

    #[tokio::test]
    async fn test_template_search_matches_name_description_tags() {
        let store = MemoryStore::new();
        TemplateStore::create(&store, make_template("Modern Minimal", 1, 1.0))
            .await
            .unwrap();

        let by_name = TemplateFilter {
            search: Some("minimal".to_string()),
            ..Default::default()
        };
        assert_eq!(store.list(&by_name).await.unwrap().len(), 1);

        let by_tag = TemplateFilter {
            search: Some("CLEAN".to_string()),
            ..Default::default()
        };
        assert_eq!(store.list(&by_tag).await.unwrap().len(), 1);

        let miss = TemplateFilter {
            search: Some("nonexistent".to_string()),
            ..Default::default()
        };
        assert!(store.list(&miss).await.unwrap().is_empty());
    }
}
