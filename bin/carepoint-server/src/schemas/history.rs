use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::Interaction;
use crate::schemas::generate::not_blank;

/// Body of `POST /api/history`.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct HistoryRequest {
    #[validate(custom(function = "not_blank", message = "Username is required"))]
    pub username: String,
    /// Newest entries to return; all when absent.
    #[serde(default)]
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u32>,
}

/// Body of both `DELETE /api/history` routes.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct DeleteHistoryRequest {
    #[validate(custom(function = "not_blank", message = "Username is required"))]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub collection: String,
    pub prompt: String,
    pub response: String,
    pub category: String,
    pub urgency_score: String,
    pub condition: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteHistoryResponse {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteOneResponse {
    pub success: bool,
}

impl Interaction {
    pub fn to_response(&self) -> HistoryEntry {
        HistoryEntry {
            id: self.id.to_string(),
            username: self.username.clone(),
            collection: self.collection.clone(),
            prompt: self.prompt.clone(),
            response: self.response.clone(),
            category: self.category.clone(),
            urgency_score: self.urgency_score.clone(),
            condition: self.condition.clone(),
            timestamp: self.created_at.to_rfc3339(),
        }
    }
}
