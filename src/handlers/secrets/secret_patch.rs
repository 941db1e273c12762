use axum::extract::{Extension, Path, State};

use crate::app::AppState;
use crate::database::models::Secret;
use crate::middleware::{ApiResponse, ApiResult, AppJson, AuthUser};
use crate::validation::UpdateSecretRequest;

use super::parse_secret_id;

/// PATCH /secrets/:id - partial update, scoped to the caller
pub async fn secret_patch(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateSecretRequest>,
) -> ApiResult<Secret> {
    let id = parse_secret_id(&id)?;
    let patch = body.validate()?;
    let secret = state.repository.update(auth_user.user_id, id, patch).await?;
    Ok(ApiResponse::success(secret))
}
