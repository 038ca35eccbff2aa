use axum::Router;
use axum::routing::{get, post};
use devshare_core::RepositoryFactory;
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, health, users, workspaces};
use crate::state::AppState;
use crate::{error, middleware};

/// Full application router for one backend.
///
/// Layers, outermost first: tracing, request id, error reporting, CORS
/// when origins are configured.
pub fn build_router<F: RepositoryFactory>(state: AppState<F>) -> Router {
    let api = Router::new()
        .route("/users", post(users::create_user::<F>))
        .route("/users/{id}", get(users::get_user::<F>))
        .route(
            "/workspaces",
            post(workspaces::create_workspace::<F>).get(workspaces::list_workspaces::<F>),
        )
        .route(
            "/workspaces/admin/{admin_id}",
            get(workspaces::get_workspaces_by_admin::<F>),
        )
        .route(
            "/workspaces/{id}",
            get(workspaces::get_workspace::<F>)
                .put(workspaces::update_workspace::<F>)
                .delete(workspaces::delete_workspace::<F>),
        )
        .route(
            "/workspaces/{id}/users",
            get(workspaces::list_workspace_users::<F>),
        )
        .method_not_allowed_fallback(health::method_not_allowed);

    let origins = state.config.server.cors_origins.clone();
    let router = Router::new()
        .route("/health", get(health::health::<F>))
        .route("/admin/init", post(admin::initialize_system::<F>))
        .route("/api/v1", get(health::api_root))
        .route("/api/v1/", get(health::api_root))
        .nest("/api/v1", api)
        .fallback(health::fallback)
        .method_not_allowed_fallback(health::method_not_allowed)
        .with_state(state);

    let router = if origins.is_empty() {
        router
    } else {
        router.layer(middleware::cors(&origins))
    };

    router
        .layer(axum::middleware::from_fn(error::report))
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(TraceLayer::new_for_http())
}
