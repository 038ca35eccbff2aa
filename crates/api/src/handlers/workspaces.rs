use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use devshare_core::contracts::{CreateWorkspace, ListWorkspaces, UpdateWorkspace};
use devshare_core::{RepositoryFactory, UserAggregate, Workspace};
use http::StatusCode;

use crate::error::ApiResult;
use crate::state::AppState;

type PathId = Result<Path<String>, PathRejection>;

pub async fn create_workspace<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    body: Result<Json<CreateWorkspace>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Workspace>)> {
    let Json(request) = body?;
    let mut uow = state.services.unit_of_work();
    let workspace = state
        .services
        .workspace_service()
        .create_workspace(&mut uow, request)
        .await?;
    Ok((StatusCode::CREATED, Json(workspace)))
}

pub async fn list_workspaces<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    query: Result<Query<ListWorkspaces>, QueryRejection>,
) -> ApiResult<Json<Vec<Workspace>>> {
    let Query(request) = query?;
    let mut uow = state.services.unit_of_work();
    let workspaces = state
        .services
        .workspace_service()
        .list_workspaces(&mut uow, request)
        .await?;
    Ok(Json(workspaces))
}

pub async fn get_workspace<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    id: PathId,
) -> ApiResult<Json<Workspace>> {
    let Path(id) = id?;
    let mut uow = state.services.unit_of_work();
    let workspace = state
        .services
        .workspace_service()
        .get_workspace(&mut uow, &id)
        .await?;
    Ok(Json(workspace))
}

pub async fn get_workspaces_by_admin<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    admin_id: PathId,
) -> ApiResult<Json<Vec<Workspace>>> {
    let Path(admin_id) = admin_id?;
    let mut uow = state.services.unit_of_work();
    let workspaces = state
        .services
        .workspace_service()
        .get_workspaces_by_admin(&mut uow, &admin_id)
        .await?;
    Ok(Json(workspaces))
}

pub async fn update_workspace<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    id: PathId,
    body: Result<Json<UpdateWorkspace>, JsonRejection>,
) -> ApiResult<Json<Workspace>> {
    let Path(id) = id?;
    let Json(mut request) = body?;
    request.id = id;

    let mut uow = state.services.unit_of_work();
    let workspace = state
        .services
        .workspace_service()
        .update_workspace(&mut uow, request)
        .await?;
    Ok(Json(workspace))
}

pub async fn delete_workspace<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    id: PathId,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let mut uow = state.services.unit_of_work();
    state
        .services
        .workspace_service()
        .delete_workspace(&mut uow, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_workspace_users<F: RepositoryFactory>(
    State(state): State<AppState<F>>,
    id: PathId,
) -> ApiResult<Json<Vec<UserAggregate>>> {
    let Path(id) = id?;
    let mut uow = state.services.unit_of_work();
    let users = state
        .services
        .user_service()
        .list_workspace_users(&mut uow, &id)
        .await?;
    Ok(Json(users))
}
