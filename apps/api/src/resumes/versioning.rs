//! Version Recorder — preserves prior content whenever a resume's content is
//! overwritten.
//!
//! Snapshots are append-only for the life of the document: never rewritten,
//! never pruned, destroyed only when the document itself is deleted.
//! Policy: an update that omits `data` applies its other fields but does NOT
//! append a version entry — only actual content overwrites are recorded.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::resume::{ResumeData, ResumeRecord, ResumeSettings, VersionSnapshot};

/// Partial update request for a resume. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpdate {
    pub title: Option<String>,
    pub data: Option<ResumeData>,
    pub settings: Option<ResumeSettings>,
    pub is_public: Option<bool>,
}

impl ResumeUpdate {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.data.is_none()
            && self.settings.is_none()
            && self.is_public.is_none()
    }
}

/// Applies an update in place. When content is replaced, the pre-update
/// content is first captured as version `previous_count + 1`, keeping the
/// version sequence gapless and 1-based.
pub fn apply_update(resume: &mut ResumeRecord, update: ResumeUpdate, now: DateTime<Utc>) {
    if update.is_empty() {
        return;
    }

    if let Some(data) = update.data {
        let snapshot = VersionSnapshot {
            version: resume.versions.len() as i32 + 1,
            data: std::mem::replace(&mut resume.data, data),
            created_at: now,
        };
        resume.versions.push(snapshot);
    }
    if let Some(title) = update.title {
        resume.title = title;
    }
    if let Some(settings) = update.settings {
        resume.settings = settings;
    }
    if let Some(is_public) = update.is_public {
        resume.is_public = is_public;
    }

    resume.last_edited = now;
    resume.updated_at = now;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::PersonalInfo;
    use chrono::Duration;
    use uuid::Uuid;

    fn make_resume(summary: &str) -> ResumeRecord {
        ResumeRecord::new(
            Uuid::new_v4(),
            "My Resume".to_string(),
            Uuid::new_v4(),
            ResumeData {
                personal_info: PersonalInfo {
                    first_name: "Ada".to_string(),
                    ..Default::default()
                },
                summary: summary.to_string(),
                ..Default::default()
            },
            ResumeSettings::default(),
            Utc::now(),
        )
    }

    fn content_update(summary: &str) -> ResumeUpdate {
        ResumeUpdate {
            data: Some(ResumeData {
                summary: summary.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_each_content_update_appends_exactly_one_version() {
        let mut resume = make_resume("v0");
        let base = resume.last_edited;

        for k in 1..=5 {
            apply_update(
                &mut resume,
                content_update(&format!("v{k}")),
                base + Duration::seconds(k as i64),
            );
        }

        assert_eq!(resume.versions.len(), 5);
        let versions: Vec<i32> = resume.versions.iter().map(|v| v.version).collect();
        assert_eq!(versions, vec![1, 2, 3, 4, 5]);
        assert_eq!(resume.data.summary, "v5");
    }

    #[test]
    fn test_snapshot_captures_pre_update_content() {
        let mut resume = make_resume("original");
        apply_update(&mut resume, content_update("replacement"), Utc::now());

        assert_eq!(resume.versions[0].data.summary, "original");
        assert_eq!(resume.data.summary, "replacement");
    }

    #[test]
    fn test_update_without_content_does_not_snapshot() {
        let mut resume = make_resume("kept");
        let update = ResumeUpdate {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        apply_update(&mut resume, update, Utc::now());

        assert!(resume.versions.is_empty());
        assert_eq!(resume.title, "Renamed");
        assert_eq!(resume.data.summary, "kept");
    }

    #[test]
    fn test_any_applied_change_bumps_last_edited() {
        let mut resume = make_resume("x");
        let before = resume.last_edited;
        let later = before + Duration::seconds(10);

        apply_update(
            &mut resume,
            ResumeUpdate {
                is_public: Some(true),
                ..Default::default()
            },
            later,
        );

        assert!(resume.is_public);
        assert_eq!(resume.last_edited, later);
    }

    #[test]
    fn test_empty_update_is_a_no_op() {
        let mut resume = make_resume("x");
        let before = resume.last_edited;

        apply_update(&mut resume, ResumeUpdate::default(), before + Duration::seconds(30));

        assert_eq!(resume.last_edited, before);
        assert!(resume.versions.is_empty());
    }

    #[test]
    fn test_last_edited_is_monotonically_non_decreasing() {
        let mut resume = make_resume("v0");
        let base = resume.last_edited;
        let mut previous = base;

        for k in 1..=3 {
            apply_update(
                &mut resume,
                content_update(&format!("v{k}")),
                base + Duration::seconds(k * 10),
            );
            assert!(resume.last_edited >= previous);
            previous = resume.last_edited;
        }
    }
}
