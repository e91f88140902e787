//! Database Models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::Reaction;

/// User row without its thought and friend references.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Thought row joined with its author's username.
#[derive(Debug, Clone, FromRow)]
pub struct ThoughtRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub username: String,
    pub thought_text: String,
    pub created_at: DateTime<Utc>,
}

/// Reaction row keyed by its thought.
#[derive(Debug, Clone, FromRow)]
pub struct ReactionRow {
    pub thought_id: Uuid,
    pub reaction_id: Uuid,
    pub reaction_body: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReactionRow> for Reaction {
    fn from(row: ReactionRow) -> Self {
        Self {
            reaction_id: row.reaction_id,
            reaction_body: row.reaction_body,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

/// One owner → target reference (user → thought, user → friend).
#[derive(Debug, Clone, Copy, FromRow)]
pub struct LinkRow {
    pub owner_id: Uuid,
    pub target_id: Uuid,
}
