use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::rates::RateKind;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    /// Public projects can be reported by anyone; private ones only by
    /// their members.
    pub is_public: bool,
    /// Chargable projects bill the client rate, the rest the internal one.
    pub is_chargable: bool,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(input: &ProjectInput, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            slug,
            is_active: true,
            is_public: input.is_public.unwrap_or(true),
            is_chargable: input.is_chargable.unwrap_or(true),
            client_id: input.client_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rate_kind(&self) -> RateKind {
        if self.is_chargable {
            RateKind::Chargable
        } else {
            RateKind::Internal
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    pub is_public: Option<bool>,
    pub is_chargable: Option<bool>,
    pub client_id: Option<Uuid>,
    pub managers: Option<Vec<Uuid>>,
    pub members: Option<Vec<Uuid>>,
}

/// Project with its people, as served by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub managers: Vec<Uuid>,
    pub members: Vec<Uuid>,
}
