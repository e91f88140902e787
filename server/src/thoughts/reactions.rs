//! Reaction Handlers
//!
//! Reactions live inside their thought and have no routes of their own.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::types::{CreateReactionRequest, ReactionAdded, ReactionRemoved};
use crate::api::{ApiError, AppState, ErrorBody};
use crate::store::ReactionPull;

/// POST /api/thoughts/{thought_id}/reactions
/// Append a reaction to a thought
#[utoipa::path(
    post,
    path = "/api/thoughts/{thought_id}/reactions",
    tag = "reactions",
    params(("thought_id" = Uuid, Path, description = "Thought ID")),
    request_body = CreateReactionRequest,
    responses(
        (status = 200, body = ReactionAdded),
        (status = 400, description = "Validation failed or duplicate reactionId", body = ErrorBody),
        (status = 404, description = "Thought not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn add_reaction(
    State(state): State<AppState>,
    thought_id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CreateReactionRequest>, JsonRejection>,
) -> Result<Json<ReactionAdded>, ApiError> {
    let Path(thought_id) = thought_id?;
    let Json(body) = body?;
    body.validate()?;

    let reaction = state
        .store
        .push_reaction(thought_id, body.into_reaction())
        .await?
        .ok_or(ApiError::ThoughtNotFound)?;

    info!(
        thought_id = %thought_id,
        reaction_id = %reaction.reaction_id,
        "Reaction added"
    );
    Ok(Json(ReactionAdded {
        message: "add successfully".into(),
        added: reaction,
    }))
}

/// DELETE /api/thoughts/{thought_id}/reactions/{reaction_id}
/// Remove a reaction by id
#[utoipa::path(
    delete,
    path = "/api/thoughts/{thought_id}/reactions/{reaction_id}",
    tag = "reactions",
    params(
        ("thought_id" = Uuid, Path, description = "Thought ID"),
        ("reaction_id" = Uuid, Path, description = "Reaction ID"),
    ),
    responses(
        (status = 200, body = ReactionRemoved),
        (status = 404, description = "Thought or reaction not found", body = ErrorBody),
    ),
)]
#[tracing::instrument(skip(state))]
pub async fn remove_reaction(
    State(state): State<AppState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<ReactionRemoved>, ApiError> {
    let Path((thought_id, reaction_id)) = ids?;

    let reaction = match state.store.pull_reaction(thought_id, reaction_id).await? {
        ReactionPull::Removed(reaction) => reaction,
        ReactionPull::NoReaction => return Err(ApiError::ReactionNotFound),
        ReactionPull::NoThought => return Err(ApiError::ThoughtNotFound),
    };

    info!(thought_id = %thought_id, reaction_id = %reaction_id, "Reaction removed");
    Ok(Json(ReactionRemoved {
        message: "deleted successfully".into(),
        data: reaction,
    }))
}
