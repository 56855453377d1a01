use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

const PRODUCT_COLUMNS: &str = "id, name, category, original_price, promo_price, discount_percent, \
     affiliate_url, image_url, description, limited_stock, flash_sale, active, created_at";

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub original_price: i64,
    pub promo_price: i64,
    pub discount_percent: i64,
    pub affiliate_url: String,
    pub image_url: Option<String>,
    pub description: String,
    pub limited_stock: bool,
    pub flash_sale: bool,
    pub active: bool,
    pub created_at: String,
}

/// A validated product that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub original_price: i64,
    pub promo_price: i64,
    pub discount_percent: i64,
    pub affiliate_url: String,
    pub image_url: Option<String>,
    pub description: String,
    pub limited_stock: bool,
    pub flash_sale: bool,
}

impl Product {
    pub async fn create(pool: &sqlx::SqlitePool, new: &NewProduct) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, category, original_price, promo_price, discount_percent,
                                  affiliate_url, image_url, description, limited_stock, flash_sale,
                                  active, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.original_price)
        .bind(new.promo_price)
        .bind(new.discount_percent)
        .bind(&new.affiliate_url)
        .bind(&new.image_url)
        .bind(&new.description)
        .bind(new.limited_stock)
        .bind(new.flash_sale)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &sqlx::SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Like [`Product::find_by_id`] but ignores deactivated products.
    pub async fn find_active_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ? AND active = 1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Best active deals, biggest discount first.
    pub async fn top_active(pool: &sqlx::SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        Self::select_where(pool, "active = 1 ORDER BY discount_percent DESC, id DESC", limit).await
    }

    pub async fn flash_sales(pool: &sqlx::SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        Self::select_where(
            pool,
            "active = 1 AND flash_sale = 1 ORDER BY discount_percent DESC, id DESC",
            limit,
        )
        .await
    }

    /// Regular (non flash sale) deals for the morning digest.
    pub async fn morning_picks(pool: &sqlx::SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        Self::select_where(
            pool,
            "active = 1 AND flash_sale = 0 ORDER BY discount_percent DESC, id DESC",
            limit,
        )
        .await
    }

    /// Flash sales first, then the rest by discount.
    pub async fn evening_picks(pool: &sqlx::SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        Self::select_where(
            pool,
            "active = 1 ORDER BY flash_sale DESC, discount_percent DESC, id DESC",
            limit,
        )
        .await
    }

    /// Case-insensitive substring match on the category.
    pub async fn by_category(
        pool: &sqlx::SqlitePool,
        category: &str,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE active = 1 AND LOWER(category) LIKE LOWER(?) \
             ORDER BY discount_percent DESC, id DESC LIMIT ?"
        ))
        .bind(format!("%{}%", category.trim()))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Newest products regardless of state, for the admin listing.
    pub async fn recent(pool: &sqlx::SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Flips the active flag. Returns the new state, or `None` if the id is unknown.
    pub async fn toggle_active(pool: &sqlx::SqlitePool, id: i64) -> Result<Option<bool>, sqlx::Error> {
        let updated = sqlx::query("UPDATE products SET active = NOT active WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Self::find_by_id(pool, id).await?.map(|p| p.active))
    }

    pub async fn delete(pool: &sqlx::SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let deleted = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await
    }

    pub async fn count_active(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE active = 1")
            .fetch_one(pool)
            .await
    }

    pub fn savings(&self) -> i64 {
        crate::utils::pricing::savings(self.original_price, self.promo_price)
    }

    async fn select_where(
        pool: &sqlx::SqlitePool,
        clause: &str,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        // `clause` is always a literal from this module, never user input
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {clause} LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
