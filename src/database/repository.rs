use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Product, StoredBundle, User};
use crate::gifts::Bundle;

const USER_COLUMNS: &str = "id, email, name, hashed_password, created_at";
const PRODUCT_COLUMNS: &str = "id, name, price, image_url, description, category, created_at";

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Emails are stored and compared lower-cased.
    pub async fn select_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn select_404(&self, id: Uuid) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    pub async fn insert(
        &self,
        email: &str,
        name: Option<&str>,
        hashed_password: &str,
    ) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, email, name, hashed_password) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(email.to_lowercase())
            .bind(name)
            .bind(hashed_password)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::on_conflict(e, "Email already registered"))
    }
}

pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn select_any(
        &self,
        category: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Product>, DatabaseError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE ($1::text IS NULL OR lower(category) = lower($1)) \
             ORDER BY name LIMIT $2"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn search(&self, term: &str, limit: i64) -> Result<Vec<Product>, DatabaseError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name ILIKE $1 ESCAPE '\\' OR description ILIKE $1 ESCAPE '\\' \
             ORDER BY name LIMIT $2"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(like_pattern(term))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn select_404(&self, id: Uuid) -> Result<Product, DatabaseError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Product not found".to_string()))
    }
}

pub struct GiftRepository {
    pool: PgPool,
}

impl GiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a prompt and the bundles returned for it in one transaction.
    pub async fn record(
        &self,
        user_id: Uuid,
        prompt: &str,
        bundles: &[Bundle],
    ) -> Result<Uuid, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let prompt_id = Uuid::new_v4();

        sqlx::query("INSERT INTO gift_prompts (id, user_id, prompt) VALUES ($1, $2, $3)")
            .bind(prompt_id)
            .bind(user_id)
            .bind(prompt)
            .execute(&mut *tx)
            .await?;

        for row in bundle_rows(bundles)? {
            sqlx::query(
                "INSERT INTO gift_bundles \
                 (id, user_id, prompt_id, position, title, items, total_price) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(prompt_id)
            .bind(row.position)
            .bind(row.title)
            .bind(row.items)
            .bind(row.total_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(prompt_id)
    }

    /// Newest prompt first; bundles within a prompt keep the order they were suggested in.
    pub async fn history(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StoredBundle>, DatabaseError> {
        let bundles = sqlx::query_as::<_, StoredBundle>(HISTORY_SQL)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(bundles)
    }
}

const HISTORY_SQL: &str = "\
    SELECT b.id, p.prompt, b.position, b.title, b.items, b.total_price, b.created_at \
     FROM gift_bundles b JOIN gift_prompts p ON p.id = b.prompt_id \
     WHERE b.user_id = $1 \
     ORDER BY p.created_at DESC, p.id, b.position \
     LIMIT $2";

struct BundleRow<'a> {
    position: i32,
    title: &'a str,
    items: serde_json::Value,
    total_price: rust_decimal::Decimal,
}

/// Bundles as stored rows, numbered in the order they were returned.
fn bundle_rows(bundles: &[Bundle]) -> Result<Vec<BundleRow<'_>>, serde_json::Error> {
    bundles
        .iter()
        .zip(0..)
        .map(|(bundle, position)| {
            Ok(BundleRow {
                position,
                title: bundle.title(),
                items: serde_json::to_value(bundle.items())?,
                total_price: bundle.total_price(),
            })
        })
        .collect()
}

/// Wraps `term` for ILIKE, escaping the pattern metacharacters.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("mug"), "%mug%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn bundle_rows_keep_suggestion_order() {
        let generator = crate::gifts::BundleGenerator::with_thread_rng();
        let bundles = generator.generate("sister birthday", None);
        let rows = bundle_rows(&bundles).unwrap();

        let order: Vec<(i32, &str)> = rows.iter().map(|r| (r.position, r.title)).collect();
        assert_eq!(order, vec![(0, "Stylish Birthday Picks"), (1, "Fragrance & Fashion")]);
        assert_eq!(rows[0].items.as_array().unwrap().len(), 3);
        assert_eq!(rows[0].total_price, bundles[0].total_price());
    }

    #[test]
    fn history_orders_by_position_within_prompt() {
        let order_by = HISTORY_SQL.split("ORDER BY").nth(1).unwrap();
        assert!(order_by.trim_start().starts_with("p.created_at DESC, p.id, b.position"));
        assert!(!order_by.contains("title"));
    }
}
