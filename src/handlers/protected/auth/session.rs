use axum::{extract::State, Extension, Json};

use crate::database::models::PublicUser;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /api/auth/whoami - Current user's profile
///
/// Reads the user fresh from the database so deleted accounts answer 404
/// even while their token is still valid.
pub async fn whoami(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<PublicUser>> {
    let user = state.users().select_404(auth.user_id).await?;
    Ok(Json(PublicUser::from(user)))
}
