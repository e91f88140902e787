//! Thought HTTP Handlers

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::types::{
    CreateThoughtRequest, OwnerSummary, ThoughtCreated, ThoughtDeleted, ThoughtResponse,
    UpdateThoughtRequest,
};
use crate::api::{ApiError, AppState, ErrorBody};
use crate::store::{NewThought, StoreError, ThoughtChanges};

/// A missing author during a write means the user vanished mid-request.
fn author_error(err: StoreError) -> ApiError {
    match err {
        StoreError::MissingReference => ApiError::UserNotFound,
        other => other.into(),
    }
}

/// GET /api/thoughts
#[utoipa::path(
    get,
    path = "/api/thoughts",
    tag = "thoughts",
    responses(
        (status = 200, body = Vec<ThoughtResponse>),
        (status = 400, description = "Database error", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn list_thoughts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ThoughtResponse>>, ApiError> {
    let thoughts = state.store.list_thoughts().await?;
    Ok(Json(thoughts.into_iter().map(ThoughtResponse::from).collect()))
}

/// GET /api/thoughts/{thought_id}
#[utoipa::path(
    get,
    path = "/api/thoughts/{thought_id}",
    tag = "thoughts",
    params(("thought_id" = Uuid, Path, description = "Thought ID")),
    responses(
        (status = 200, body = ThoughtResponse),
        (status = 404, description = "Thought not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn get_thought(
    State(state): State<AppState>,
    thought_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ThoughtResponse>, ApiError> {
    let Path(thought_id) = thought_id?;
    let thought = state
        .store
        .find_thought(thought_id)
        .await?
        .ok_or(ApiError::ThoughtNotFound)?;

    Ok(Json(ThoughtResponse::from(thought)))
}

/// Create a thought for the user named in the body.
///
/// POST /api/thoughts
///
/// The author is resolved before anything is written, so an unknown
/// username leaves no orphan thought behind.
#[utoipa::path(
    post,
    path = "/api/thoughts",
    tag = "thoughts",
    request_body = CreateThoughtRequest,
    responses(
        (status = 200, body = ThoughtCreated),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn create_thought(
    State(state): State<AppState>,
    body: Result<Json<CreateThoughtRequest>, JsonRejection>,
) -> Result<Json<ThoughtCreated>, ApiError> {
    let Json(body) = body?;
    body.validate()?;

    let author = state
        .store
        .find_user_by_username(&body.username)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    let reactions = body
        .reactions
        .into_iter()
        .map(|r| r.into_reaction())
        .collect();

    let thought = state
        .store
        .insert_thought(NewThought {
            author_id: author.id,
            thought_text: body.thought_text,
            reactions,
        })
        .await
        .map_err(author_error)?;

    info!(thought_id = %thought.id, user_id = %author.id, "Thought created");
    Ok(Json(ThoughtCreated {
        message: "add successfully".into(),
        added: ThoughtResponse::from(thought),
    }))
}

/// Update a thought's text and/or owner.
///
/// PUT /api/thoughts/{thought_id}
#[utoipa::path(
    put,
    path = "/api/thoughts/{thought_id}",
    tag = "thoughts",
    params(("thought_id" = Uuid, Path, description = "Thought ID")),
    request_body = UpdateThoughtRequest,
    responses(
        (status = 200, body = ThoughtResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "Thought or user not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn update_thought(
    State(state): State<AppState>,
    thought_id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateThoughtRequest>, JsonRejection>,
) -> Result<Json<ThoughtResponse>, ApiError> {
    let Path(thought_id) = thought_id?;
    let Json(body) = body?;
    body.validate()?;

    let author_id = match body.username.as_deref() {
        Some(username) => Some(
            state
                .store
                .find_user_by_username(username)
                .await?
                .ok_or(ApiError::UserNotFound)?
                .id,
        ),
        None => None,
    };

    let thought = state
        .store
        .update_thought(
            thought_id,
            ThoughtChanges {
                thought_text: body.thought_text,
                author_id,
            },
        )
        .await
        .map_err(author_error)?
        .ok_or(ApiError::ThoughtNotFound)?;

    info!(thought_id = %thought.id, user_id = %thought.author_id, "Thought updated");
    Ok(Json(ThoughtResponse::from(thought)))
}

/// Delete a thought and unlink it from its owner.
///
/// DELETE /api/thoughts/{thought_id}
#[utoipa::path(
    delete,
    path = "/api/thoughts/{thought_id}",
    tag = "thoughts",
    params(("thought_id" = Uuid, Path, description = "Thought ID")),
    responses(
        (status = 200, body = ThoughtDeleted),
        (status = 404, description = "Thought not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn delete_thought(
    State(state): State<AppState>,
    thought_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ThoughtDeleted>, ApiError> {
    let Path(thought_id) = thought_id?;
    let deleted = state
        .store
        .delete_thought(thought_id)
        .await?
        .ok_or(ApiError::ThoughtNotFound)?;

    info!(
        thought_id = %deleted.thought.id,
        user_id = %deleted.owner.id,
        "Thought deleted"
    );
    Ok(Json(ThoughtDeleted {
        message: "delete successfully".into(),
        updated: OwnerSummary::from(deleted.owner),
    }))
}
