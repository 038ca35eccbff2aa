use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use devshare_core::contracts::CreateLocalUser;
use devshare_core::{RepositoryFactory, UserAggregate};
use http::StatusCode;
use serde_json::{Value, json};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_user<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    body: Result<Json<CreateLocalUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(request) = body?;
    let mut uow = state.services.unit_of_work();
    let user = state
        .services
        .user_service()
        .create_local_user(&mut uow, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user_id": user.id(),
        })),
    ))
}

pub async fn get_user<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<UserAggregate>> {
    let Path(id) = id?;
    let mut uow = state.services.unit_of_work();
    let user = state.services.user_service().get_user(&mut uow, &id).await?;
    Ok(Json(user))
}
