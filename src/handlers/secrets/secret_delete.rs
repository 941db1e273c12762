use axum::extract::{Extension, Path, State};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::parse_secret_id;

/// DELETE /secrets/:id - remove a secret, scoped to the caller
pub async fn secret_delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_secret_id(&id)?;
    state.repository.delete(auth_user.user_id, id).await?;
    Ok(ApiResponse::success(()))
}
