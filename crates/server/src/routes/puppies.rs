use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use models::{Puppy, PuppyData, PuppyInput};
use tracing::warn;

use crate::errors::ApiError;
use crate::routes::ServerState;

fn puppy_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(e) => {
            warn!(error = %e.body_text(), "invalid puppy id");
            Err(ApiError(StatusCode::BAD_REQUEST))
        }
    }
}

/// List every puppy, in stored order.
#[utoipa::path(
    get,
    path = "/api/v1/puppies",
    tag = "puppies",
    responses(
        (status = 200, description = "All puppies", body = crate::openapi::PuppyDataDoc),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_puppies(State(state): State<ServerState>) -> Result<Json<PuppyData>, ApiError> {
    let data = state.puppy_store.load_collection().await?;
    Ok(Json(data))
}

/// Fetch one puppy.
#[utoipa::path(
    get,
    path = "/api/v1/puppies/{id}",
    tag = "puppies",
    params(("id" = i64, Path, description = "Puppy id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::PuppyDoc),
        (status = 400, description = "Id is not an integer"),
        (status = 404, description = "No puppy with this id"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn get_puppy(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Puppy>, ApiError> {
    let id = puppy_id(id)?;
    match state.puppy_store.get_by_id(id).await? {
        Some(puppy) => Ok(Json(puppy)),
        None => Err(ApiError(StatusCode::NOT_FOUND)),
    }
}

/// Replace a puppy's fields. The path id is authoritative.
#[utoipa::path(
    patch,
    path = "/api/v1/puppies/{id}",
    tag = "puppies",
    params(("id" = i64, Path, description = "Puppy id")),
    request_body = crate::openapi::PuppyInputDoc,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Bad id or body, or body id differs from path id"),
        (status = 404, description = "No puppy with this id"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn update_puppy(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<PuppyInput>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = puppy_id(id)?;
    let Json(input) = body.map_err(|e| {
        warn!(puppy_id = id, error = %e.body_text(), "rejected update body");
        ApiError(e.status())
    })?;
    state.puppy_store.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}
