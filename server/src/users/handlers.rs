//! User HTTP Handlers
//!
//! CRUD over users. Reads return users with their thoughts populated.

use std::collections::HashMap;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::types::{
    CreateUserRequest, PopulatedUser, UpdateUserRequest, UserDeleted, UserResponse, UserUpdated,
};
use crate::api::{ApiError, AppState, ErrorBody};
use crate::store::{NewUser, Store, User, UserChanges};
use crate::thoughts::types::ThoughtResponse;

/// Replace each user's thought ids with the thoughts themselves.
///
/// One lookup covers every user in `users`.
pub async fn populate(store: &dyn Store, users: Vec<User>) -> Result<Vec<PopulatedUser>, ApiError> {
    let ids: Vec<Uuid> = users.iter().flat_map(|u| u.thoughts.iter().copied()).collect();
    let mut thoughts: HashMap<Uuid, ThoughtResponse> = store
        .find_thoughts(&ids)
        .await?
        .into_iter()
        .map(|t| (t.id, ThoughtResponse::from(t)))
        .collect();

    Ok(users
        .into_iter()
        .map(|user| PopulatedUser {
            thoughts: user
                .thoughts
                .iter()
                .filter_map(|id| thoughts.remove(id))
                .collect(),
            friend_count: user.friends.len(),
            id: user.id,
            username: user.username,
            email: user.email,
            friends: user.friends,
            created_at: user.created_at,
        })
        .collect())
}

async fn populate_one(store: &dyn Store, user: User) -> Result<PopulatedUser, ApiError> {
    populate(store, vec![user])
        .await?
        .pop()
        .ok_or(ApiError::UserNotFound)
}

/// List all users.
///
/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, body = Vec<PopulatedUser>),
        (status = 400, description = "Database error", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PopulatedUser>>, ApiError> {
    let users = state.store.list_users().await?;
    Ok(Json(populate(state.store.as_ref(), users).await?))
}

/// Get one user.
///
/// GET /api/users/{user_id}
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = "users",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, body = PopulatedUser),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<PopulatedUser>, ApiError> {
    let Path(user_id) = user_id?;
    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(populate_one(state.store.as_ref(), user).await?))
}

/// Create a user.
///
/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, body = UserResponse),
        (status = 400, description = "Invalid or duplicate username/email", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(body) = body?;
    let body = body.normalized();
    body.validate()?;

    let user = state
        .store
        .insert_user(NewUser {
            username: body.username,
            email: body.email,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "User created");
    Ok(Json(UserResponse::from(user)))
}

/// Update a user. A new username shows up on all of the user's thoughts.
///
/// PUT /api/users/{user_id}
#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    tag = "users",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, body = UserUpdated),
        (status = 400, description = "Invalid or duplicate username/email", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn update_user(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserUpdated>, ApiError> {
    let Path(user_id) = user_id?;
    let Json(body) = body?;
    let body = body.normalized();
    body.validate()?;

    let user = state
        .store
        .update_user(
            user_id,
            UserChanges {
                username: body.username,
                email: body.email,
            },
        )
        .await?
        .ok_or(ApiError::UserNotFound)?;

    info!(user_id = %user.id, username = %user.username, "User updated");
    Ok(Json(UserUpdated {
        message: "update successfully".into(),
        data: populate_one(state.store.as_ref(), user).await?,
    }))
}

/// Delete a user and every thought it owns.
///
/// DELETE /api/users/{user_id}
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    tag = "users",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, body = UserDeleted),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<UserDeleted>, ApiError> {
    let Path(user_id) = user_id?;
    let user = state
        .store
        .delete_user(user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    info!(
        user_id = %user.id,
        thoughts = user.thoughts.len(),
        "User deleted with owned thoughts"
    );
    Ok(Json(UserDeleted {
        message: "delete successfully".into(),
        data: UserResponse::from(user),
    }))
}
