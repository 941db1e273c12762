use std::sync::Arc;

use axum::routing::{get, patch};
use axum::{middleware as axum_middleware, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::database::SecretRepository;
use crate::handlers;
use crate::middleware::jwt_auth_middleware;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn SecretRepository>,
}

/// Assemble the full router: public probes plus the protected secrets API.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::public::root_info))
        .route("/health", get(handlers::public::health))
        .merge(secrets_routes(state))
        .layer(CorsLayer::permissive());

    if config::config().server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn secrets_routes(state: AppState) -> Router {
    use handlers::secrets;

    Router::new()
        .route(
            "/secrets",
            get(secrets::secrets_get).post(secrets::secrets_post),
        )
        .route(
            "/secrets/:id",
            patch(secrets::secret_patch).delete(secrets::secret_delete),
        )
        .layer(axum_middleware::from_fn(jwt_auth_middleware))
        .with_state(state)
}
