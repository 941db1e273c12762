use axum::extract::{Extension, Query, State};

use crate::app::AppState;
use crate::config;
use crate::database::models::Secret;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::query::{ListParams, ListQuery, PaginationMeta};

/// GET /secrets - list the caller's secrets, filtered, sorted and paged
pub async fn secrets_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Secret>> {
    let pagination = &config::config().pagination;
    let query = ListQuery::parse(
        auth_user.user_id,
        &params,
        pagination.default_per_page,
        pagination.max_per_page,
    )?;

    let page = state.repository.list(&query).await?;
    let meta = PaginationMeta::new(page.total, query.page(), query.per_page());

    Ok(ApiResponse::paginated(page.rows, meta))
}
