//! Resolved caller identity, supplied by the upstream auth middleware.
//!
//! The core trusts these headers completely and performs no credential
//! verification itself: `x-user-id` (required), `x-user-role` and
//! `x-user-plan` (optional, defaulting to `user`/`free`).

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Premium,
    Enterprise,
}

impl Plan {
    /// Whether this plan may export premium templates.
    pub fn premium_access(self) -> bool {
        matches!(self, Plan::Premium | Plan::Enterprise)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
    pub plan: Plan,
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or(AppError::Unauthorized)?;

        let role = match header_str(parts, "x-user-role") {
            Some("admin") => Role::Admin,
            _ => Role::User,
        };

        let plan = match header_str(parts, "x-user-plan") {
            Some("premium") => Plan::Premium,
            Some("enterprise") => Plan::Enterprise,
            _ => Plan::Free,
        };

        Ok(AuthContext {
            user_id,
            role,
            plan,
        })
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}
