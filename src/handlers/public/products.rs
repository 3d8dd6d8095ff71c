// handlers/public/products.rs - product catalog reads

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Product;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/products?category=&limit=
pub async fn products_get(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let limit = state.config.page_limit(query.limit);
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let products = state.products().select_any(category, limit).await?;
    Ok(Json(products))
}

/// GET /api/products/search?q=
pub async fn products_search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let term = query.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(ApiError::bad_request("Query parameter 'q' is required"));
    }

    let limit = state.config.page_limit(query.limit);
    let products = state.products().search(term, limit).await?;
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn product_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::invalid_field("id", format!("Invalid UUID format: {}", id)))?;

    let product = state.products().select_404(id).await?;
    Ok(Json(product))
}
