use crate::entities::{decode_time, encode_time, Interaction, Store};
use std::future::Future;
use uuid::Uuid;

/// Collection used when interactions are not partitioned by category.
pub const DEFAULT_COLLECTION: &str = "health-data";

pub trait InteractionStore: Send + Sync + 'static {
    fn insert_interaction(&self, record: Interaction) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// A user's interactions, newest first, at most `limit` when given.
    fn list_interactions(
        &self,
        username: &str,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<Vec<Interaction>, sqlx::Error>> + Send;

    /// Delete one interaction if it belongs to `username`. Returns whether a
    /// row was removed.
    fn delete_interaction(
        &self,
        id: Uuid,
        username: &str,
    ) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;

    /// Delete every interaction of `username`, returning the count removed.
    fn delete_user_interactions(&self, username: &str) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;
}

type InteractionRow = (String, String, String, String, String, String, String, String, String);

fn from_row(row: InteractionRow) -> Interaction {
    let (id, username, collection, prompt, response, category, urgency_score, condition, created_at) = row;
    Interaction {
        id: id.parse().unwrap_or_else(|e| {
            tracing::warn!(raw = %id, error = %e, "malformed interaction id");
            Uuid::nil()
        }),
        username,
        collection,
        prompt,
        response,
        category,
        urgency_score,
        condition,
        created_at: decode_time(&created_at, "interactions.created_at"),
    }
}

impl InteractionStore for Store {
    async fn insert_interaction(&self, record: Interaction) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO interactions \
             (id, username, collection, prompt, response, category, urgency_score, condition, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(record.id.to_string())
        .bind(&record.username)
        .bind(&record.collection)
        .bind(&record.prompt)
        .bind(&record.response)
        .bind(&record.category)
        .bind(&record.urgency_score)
        .bind(&record.condition)
        .bind(encode_time(record.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_interactions(
        &self,
        username: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Interaction>, sqlx::Error> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map(i64::from).unwrap_or(-1);
        let rows: Vec<InteractionRow> = sqlx::query_as(
            "SELECT id, username, collection, prompt, response, category, urgency_score, condition, created_at \
             FROM interactions WHERE username = ?1 \
             ORDER BY created_at DESC, rowid DESC LIMIT ?2",
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn delete_interaction(&self, id: Uuid, username: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM interactions WHERE id = ?1 AND username = ?2")
            .bind(id.to_string())
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_user_interactions(&self, username: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM interactions WHERE username = ?1")
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
