use axum::extract::{Extension, State};

use crate::app::AppState;
use crate::database::models::Secret;
use crate::middleware::{ApiResponse, ApiResult, AppJson, AuthUser};
use crate::validation::CreateSecretRequest;

/// POST /secrets - create a secret owned by the caller
pub async fn secrets_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateSecretRequest>,
) -> ApiResult<Secret> {
    let new = body.validate()?;
    let secret = state.repository.insert(auth_user.user_id, new).await?;
    Ok(ApiResponse::created(secret))
}
