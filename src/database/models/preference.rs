use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserPreference {
    pub user_id: i64,
    pub category: String,
    pub min_discount: i64,
    pub max_price: Option<i64>,
    pub flash_sale_alerts: bool,
}

impl UserPreference {
    /// Stores a category choice. Choosing the same category again keeps the
    /// existing thresholds.
    pub async fn save(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        category: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_preferences (user_id, category) VALUES (?, ?) \
             ON CONFLICT(user_id, category) DO NOTHING",
        )
        .bind(user_id)
        .bind(category)
        .execute(pool)
        .await?;

        sqlx::query_as::<_, UserPreference>(
            "SELECT user_id, category, min_discount, max_price, flash_sale_alerts \
             FROM user_preferences WHERE user_id = ? AND category = ?",
        )
        .bind(user_id)
        .bind(category)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserPreference>(
            "SELECT user_id, category, min_discount, max_price, flash_sale_alerts \
             FROM user_preferences WHERE user_id = ? ORDER BY category",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
