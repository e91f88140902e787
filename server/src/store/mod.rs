//! Persistence Gateway
//!
//! Document-store abstraction shared by the user and thought handlers.
//! Every method is one atomic unit: cascades between the user and thought
//! collections either complete together or not at all.

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use memory::MemoryStore;

// ============================================================================
// Documents
// ============================================================================

/// User document with thought and friend references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Owned thought ids in insertion order.
    pub thoughts: Vec<Uuid>,
    /// Directed friend edges in insertion order.
    pub friends: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Thought document with its author resolved to a username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thought {
    pub id: Uuid,
    pub author_id: Uuid,
    pub username: String,
    pub thought_text: String,
    pub created_at: DateTime<Utc>,
    pub reactions: Vec<Reaction>,
}

/// Reaction embedded in a thought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub reaction_id: Uuid,
    pub reaction_body: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Inputs
// ============================================================================

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

/// Partial user update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Fields required to insert a thought owned by `author_id`.
#[derive(Debug, Clone)]
pub struct NewThought {
    pub author_id: Uuid,
    pub thought_text: String,
    pub reactions: Vec<Reaction>,
}

/// Partial thought update.
///
/// A new `author_id` moves the thought to the end of that user's thought
/// list; the same author leaves ordering alone.
#[derive(Debug, Clone, Default)]
pub struct ThoughtChanges {
    pub thought_text: Option<String>,
    pub author_id: Option<Uuid>,
}

// ============================================================================
// Outcomes
// ============================================================================

/// A deleted thought together with its owner after unlinking.
#[derive(Debug, Clone)]
pub struct DeletedThought {
    pub thought: Thought,
    pub owner: User,
}

/// Result of removing a reaction from a thought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionPull {
    Removed(Reaction),
    /// The thought exists but holds no reaction with that id.
    NoReaction,
    NoThought,
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised by store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field already holds this value.
    #[error("{0} already exists")]
    Duplicate(&'static str),

    /// A referenced document does not exist.
    #[error("Referenced document does not exist")]
    MissingReference,

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Self::Duplicate(duplicate_field(db_err.constraint()));
            }
            if db_err.is_foreign_key_violation() {
                return Self::MissingReference;
            }
        }
        Self::Database(err)
    }
}

/// Map a unique constraint name to the field it guards.
fn duplicate_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_username_key") => "username",
        Some("users_email_key") => "email",
        Some("reactions_pkey") => "reactionId",
        _ => "value",
    }
}

// ============================================================================
// Gateway
// ============================================================================

#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name reported by the health check.
    fn backend(&self) -> &'static str;

    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Returns `None` when the user does not exist.
    async fn update_user(&self, id: Uuid, changes: UserChanges)
        -> Result<Option<User>, StoreError>;

    /// Delete a user together with every thought it owns and every friend
    /// edge pointing at it. Returns the user as it was before deletion.
    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Add `friend_id` to the user's friends if absent.
    ///
    /// Fails with [`StoreError::MissingReference`] when the friend does not exist.
    async fn add_friend(&self, user_id: Uuid, friend_id: Uuid)
        -> Result<Option<User>, StoreError>;

    /// Remove `friend_id` from the user's friends. Absent edges are a no-op.
    async fn remove_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<Option<User>, StoreError>;

    async fn list_thoughts(&self) -> Result<Vec<Thought>, StoreError>;

    async fn find_thought(&self, id: Uuid) -> Result<Option<Thought>, StoreError>;

    /// Fetch thoughts in the order of `ids`, skipping ids that do not exist.
    async fn find_thoughts(&self, ids: &[Uuid]) -> Result<Vec<Thought>, StoreError>;

    /// Insert a thought and link it to its author.
    ///
    /// Fails with [`StoreError::MissingReference`] when the author does not
    /// exist and with [`StoreError::Duplicate`] when two initial reactions
    /// share a `reaction_id`.
    async fn insert_thought(&self, thought: NewThought) -> Result<Thought, StoreError>;

    async fn update_thought(
        &self,
        id: Uuid,
        changes: ThoughtChanges,
    ) -> Result<Option<Thought>, StoreError>;

    /// Delete a thought and unlink it from its author. Returns the owner as
    /// it is after the unlink.
    async fn delete_thought(&self, id: Uuid) -> Result<Option<DeletedThought>, StoreError>;

    /// Append a reaction. Returns `None` when the thought does not exist.
    async fn push_reaction(
        &self,
        thought_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<Reaction>, StoreError>;

    /// Remove a reaction by id.
    async fn pull_reaction(
        &self,
        thought_id: Uuid,
        reaction_id: Uuid,
    ) -> Result<ReactionPull, StoreError>;
}
