use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::StoredBundle;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// GET /api/gift-bundles/history - Bundles previously suggested to the caller, newest first
pub async fn history_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<StoredBundle>>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let limit = state.config.page_limit(query.limit);

    let bundles = state.gifts().history(auth.user_id, limit).await?;
    Ok(Json(bundles))
}
