// handlers/public/gifts.rs - POST /api/gift-bundles

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::gifts::{BudgetConstraint, Bundle};
use crate::middleware::optional_user;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GiftBundleRequest {
    pub prompt: Option<String>,
    /// A number, numeric string, or `{ "min": .., "max": .. }`.
    #[serde(default)]
    pub budget: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct GiftBundleResponse {
    pub bundles: Vec<Bundle>,
}

/// POST /api/gift-bundles - Suggest gift bundles for a prompt
///
/// Expected Input:
/// ```json
/// { "prompt": "birthday gift for my sister", "budget": 100 }
/// ```
///
/// A malformed budget is ignored rather than rejected. Signed-in callers get
/// the prompt and bundles saved to their history in the background.
pub async fn gift_bundles_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<GiftBundleRequest>, JsonRejection>,
) -> ApiResult<Json<GiftBundleResponse>> {
    let Json(payload) = payload?;

    let prompt = payload
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Prompt is required"))?
        .to_string();

    let budget = payload.budget.as_ref().and_then(BudgetConstraint::from_json);
    if budget.is_none() && payload.budget.as_ref().is_some_and(|b| !b.is_null()) {
        tracing::debug!("Ignoring malformed budget {:?}", payload.budget);
    }

    let bundles = state.generator.generate(&prompt, budget.as_ref());
    tracing::info!(bundles = bundles.len(), budget = ?budget, "Generated gift bundles");

    if let Some(user) = optional_user(&headers, &state.config.security) {
        let repo = state.gifts();
        let stored = bundles.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.record(user.user_id, &prompt, &stored).await {
                tracing::error!("Failed to store gift history for {}: {}", user.user_id, e);
            }
        });
    }

    Ok(Json(GiftBundleResponse { bundles }))
}
