//! Template record — a named (markup, stylesheet) pair with directive syntax
//! referencing Resume Document fields, plus catalog/monetization metadata.
//!
//! The rendering pipeline never mutates a template; popularity counters are
//! adjusted by catalog events only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    /// 0 = free.
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub is_premium: bool,
    pub preview_url: String,
    pub thumbnail_url: String,
    /// Markup string containing placeholder tokens and block directives.
    pub markup: String,
    /// Companion stylesheet, inlined into the rendered document.
    pub css: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Inactive templates are hidden from catalog listings but not deleted.
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub download_count: i64,
    /// 0–5.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Fresher,
    Experienced,
    Executive,
    Creative,
    Technical,
    Healthcare,
    Sales,
    Education,
}

impl TemplateCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateCategory::Fresher => "fresher",
            TemplateCategory::Experienced => "experienced",
            TemplateCategory::Executive => "executive",
            TemplateCategory::Creative => "creative",
            TemplateCategory::Technical => "technical",
            TemplateCategory::Healthcare => "healthcare",
            TemplateCategory::Sales => "sales",
            TemplateCategory::Education => "education",
        }
    }
}

impl std::str::FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fresher" => Ok(TemplateCategory::Fresher),
            "experienced" => Ok(TemplateCategory::Experienced),
            "executive" => Ok(TemplateCategory::Executive),
            "creative" => Ok(TemplateCategory::Creative),
            "technical" => Ok(TemplateCategory::Technical),
            "healthcare" => Ok(TemplateCategory::Healthcare),
            "sales" => Ok(TemplateCategory::Sales),
            "education" => Ok(TemplateCategory::Education),
            other => Err(format!("unknown template category '{other}'")),
        }
    }
}
