use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub joined_at: String,
    pub subscribed: bool,
    pub notifications_enabled: bool,
    pub last_active_at: String,
}

impl User {
    /// Creates the user on first contact and refreshes names and the
    /// last-active timestamp afterwards. `subscribed` is only written when
    /// known; the notification flag is never reset here.
    pub async fn record_activity(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        username: Option<&str>,
        first_name: &str,
        subscribed: Option<bool>,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, first_name, joined_at, subscribed,
                               notifications_enabled, last_active_at)
            VALUES (?, ?, ?, ?, COALESCE(?, 0), 1, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                subscribed = COALESCE(?, users.subscribed),
                last_active_at = excluded.last_active_at
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(first_name)
        .bind(&now)
        .bind(subscribed)
        .bind(&now)
        .bind(subscribed)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &sqlx::SqlitePool, user_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, first_name, joined_at, subscribed, notifications_enabled, last_active_at \
             FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Returns `false` when the user has never talked to the bot.
    pub async fn set_notifications(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        enabled: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET notifications_enabled = ? WHERE user_id = ?")
            .bind(enabled)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Chat ids that receive broadcasts: channel subscribers with notifications on.
    pub async fn broadcast_recipients(pool: &sqlx::SqlitePool) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM users WHERE subscribed = 1 AND notifications_enabled = 1 ORDER BY user_id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    pub async fn count_subscribed(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE subscribed = 1")
            .fetch_one(pool)
            .await
    }
}
