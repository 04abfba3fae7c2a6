use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A row in the `interactions` table: one prompt/reply exchange.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub id: Uuid,
    pub username: String,
    /// `health-data`, or the specialty name when partitioning by category.
    pub collection: String,
    pub prompt: String,
    /// The model's raw reply.
    pub response: String,
    pub category: String,
    pub urgency_score: String,
    pub condition: String,
    pub created_at: DateTime<Utc>,
}
