//! Friend List Handlers
//!
//! Friendship is one-directional: adding B to A's list leaves B's list alone.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;
use uuid::Uuid;

use super::types::UserResponse;
use crate::api::{ApiError, AppState, ErrorBody};
use crate::store::StoreError;

/// POST /api/users/{user_id}/friends/{friend_id}
/// Add a friend (no duplicates)
#[utoipa::path(
    post,
    path = "/api/users/{user_id}/friends/{friend_id}",
    tag = "friends",
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("friend_id" = Uuid, Path, description = "Friend's user ID"),
    ),
    responses(
        (status = 200, body = UserResponse),
        (status = 400, description = "Cannot friend yourself", body = ErrorBody),
        (status = 404, description = "User or friend not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn add_friend(
    State(state): State<AppState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Path((user_id, friend_id)) = ids?;
    if user_id == friend_id {
        return Err(ApiError::SelfFriend);
    }

    let user = match state.store.add_friend(user_id, friend_id).await {
        Ok(user) => user.ok_or(ApiError::UserNotFound)?,
        Err(StoreError::MissingReference) => return Err(ApiError::FriendNotFound),
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user_id, friend_id = %friend_id, "Friend added");
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/users/{user_id}/friends/{friend_id}
/// Remove a friend; removing an absent friend is a no-op
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/friends/{friend_id}",
    tag = "friends",
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("friend_id" = Uuid, Path, description = "Friend's user ID"),
    ),
    responses(
        (status = 200, body = UserResponse),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn remove_friend(
    State(state): State<AppState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Path((user_id, friend_id)) = ids?;
    let user = state
        .store
        .remove_friend(user_id, friend_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    info!(user_id = %user_id, friend_id = %friend_id, "Friend removed");
    Ok(Json(UserResponse::from(user)))
}
