use crate::entities::{encode_time, Store, UserRecord};
use chrono::Utc;
use std::future::Future;

pub trait UserStore: Send + Sync + 'static {
    /// Insert `user`, stamped with the current time, unless the email is
    /// taken. Returns `false` when it was.
    fn create_user(&self, user: UserRecord) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
    fn find_user(&self, email: &str) -> impl Future<Output = Result<Option<UserRecord>, sqlx::Error>> + Send;
}

impl UserStore for Store {
    async fn create_user(&self, user: UserRecord) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, created_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(email) DO NOTHING",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(encode_time(Utc::now()))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn find_user(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT email, password_hash FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(email, password_hash)| UserRecord {
            email,
            password_hash,
        }))
    }
}
