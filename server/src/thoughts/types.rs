use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::store::{Reaction, Thought, User};

// ============================================================================
// Requests
// ============================================================================

/// Request to create a thought for an existing user.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateThoughtRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, max = 280, message = "Thought must be 1-280 characters"))]
    pub thought_text: String,
    #[serde(default)]
    #[validate(nested)]
    pub reactions: Vec<CreateReactionRequest>,
}

/// Request to update a thought. A different `username` moves the thought
/// to that user.
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThoughtRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 280, message = "Thought must be 1-280 characters"))]
    pub thought_text: Option<String>,
}

/// Reaction payload. `reactionId` is generated when omitted.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReactionRequest {
    pub reaction_id: Option<Uuid>,
    #[validate(length(min = 1, max = 280, message = "Reaction must be 1-280 characters"))]
    pub reaction_body: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
}

impl CreateReactionRequest {
    /// Stamp the reaction with an id and creation time.
    #[must_use]
    pub fn into_reaction(self) -> Reaction {
        Reaction {
            reaction_id: self.reaction_id.unwrap_or_else(Uuid::now_v7),
            reaction_body: self.reaction_body,
            username: self.username,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub thought_text: String,
    pub created_at: DateTime<Utc>,
    pub reactions: Vec<Reaction>,
}

impl From<Thought> for ThoughtResponse {
    fn from(thought: Thought) -> Self {
        Self {
            id: thought.id,
            user_id: thought.author_id,
            username: thought.username,
            thought_text: thought.thought_text,
            created_at: thought.created_at,
            reactions: thought.reactions,
        }
    }
}

/// Owner of a deleted thought after unlinking.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub thoughts: Vec<Uuid>,
}

impl From<User> for OwnerSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            thoughts: user.thoughts,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ThoughtCreated {
    pub message: String,
    pub added: ThoughtResponse,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ThoughtDeleted {
    pub message: String,
    pub updated: OwnerSummary,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReactionAdded {
    pub message: String,
    pub added: Reaction,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReactionRemoved {
    pub message: String,
    pub data: Reaction,
}
