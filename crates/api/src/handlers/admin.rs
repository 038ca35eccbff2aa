use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use devshare_core::RepositoryFactory;
use devshare_core::contracts::{AdminInit, AdminInitResponse};
use devshare_error::domain;
use http::{HeaderMap, StatusCode};
use subtle::ConstantTimeEq;

use crate::error::ApiResult;
use crate::state::AppState;

pub const INIT_TOKEN_HEADER: &str = "x-admin-init-token";

/// First-run bootstrap. Guarded by `admin.init_token` when one is
/// configured.
pub async fn initialize_system<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    headers: HeaderMap,
    body: Result<Json<AdminInit>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AdminInitResponse>)> {
    if let Some(expected) = state.config.admin.init_token.as_deref() {
        let provided = headers
            .get(INIT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if !token_matches(provided, expected) {
            return Err(domain::unauthorized("invalid or missing initialization token").into());
        }
    }

    let Json(request) = body?;
    let mut uow = state.services.unit_of_work();
    let response = state
        .services
        .admin_service()
        .initialize_system(&mut uow, request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

fn token_matches(provided: Option<&str>, expected: &str) -> bool {
    provided.is_some_and(|token| token.as_bytes().ct_eq(expected.as_bytes()).into())
}
