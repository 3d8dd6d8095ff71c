use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A bundle previously returned to a signed-in user, joined with its prompt.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredBundle {
    pub id: Uuid,
    pub prompt: String,
    /// Order within the prompt's response, starting at 0.
    pub position: i32,
    pub title: String,
    pub items: serde_json::Value,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}
