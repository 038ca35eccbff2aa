use axum::Json;
use axum::extract::{OriginalUri, State};
use devshare_core::RepositoryFactory;
use devshare_error::{Error, ErrorCode};
use http::Method;
use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn health<F: RepositoryFactory>(State(state): State<AppState<F>>) -> ApiResult<Json<Value>> {
    state.services.ping().await?;
    Ok(Json(json!({
        "status": "healthy",
        "service": "dev-share-backend",
        "database": "connected",
    })))
}

pub async fn api_root() -> Json<Value> {
    Json(json!({ "message": "Dev-Share API v1" }))
}

pub async fn fallback(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError(
        Error::coded(ErrorCode::NotFound, "route not found").with_metadata("path", uri.path()),
    )
}

pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError(
        Error::coded(ErrorCode::InvalidInput, "method not allowed")
            .with_http_status(405)
            .with_metadata("method", method.as_str())
            .with_metadata("path", uri.path()),
    )
}
