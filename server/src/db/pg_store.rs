//! `PostgreSQL` Store
//!
//! Each cascade runs inside one transaction; dropping the transaction on an
//! early return rolls it back.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::queries;
use crate::store::{
    DeletedThought, NewThought, NewUser, Reaction, ReactionPull, Store, StoreError, Thought,
    ThoughtChanges, User, UserChanges,
};

/// [`Store`] backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_thought(
        conn: &mut sqlx::PgConnection,
        id: Uuid,
    ) -> Result<Option<Thought>, StoreError> {
        let rows = queries::find_thought_rows(conn, &[id]).await?;
        Ok(queries::hydrate_thoughts(conn, rows).await?.pop())
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = queries::list_user_rows(&mut conn).await?;
        Ok(queries::hydrate_users(&mut conn, rows).await?)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let row = queries::find_user_row(&mut conn, id).await?;
        Ok(queries::hydrate_user(&mut conn, row).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let row = queries::find_user_row_by_username(&mut conn, username).await?;
        Ok(queries::hydrate_user(&mut conn, row).await?)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let row = queries::insert_user_row(&mut conn, &user.username, &user.email).await?;
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            thoughts: Vec::new(),
            friends: Vec::new(),
            created_at: row.created_at,
        })
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = queries::update_user_row(
            &mut tx,
            id,
            changes.username.as_deref(),
            changes.email.as_deref(),
        )
        .await?;
        let user = queries::hydrate_user(&mut tx, row).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = queries::lock_user_row(&mut tx, id).await?;
        let Some(user) = queries::hydrate_user(&mut tx, row).await? else {
            return Ok(None);
        };

        let thoughts = queries::delete_thoughts_by_author(&mut tx, id).await?;
        queries::delete_user_row(&mut tx, id).await?;
        tx.commit().await?;

        info!(user_id = %id, thoughts, "Deleted user and owned thoughts");
        Ok(Some(user))
    }

    async fn add_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<Option<User>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(row) = queries::lock_user_row(&mut tx, user_id).await? else {
            return Ok(None);
        };

        queries::insert_friendship(&mut tx, user_id, friend_id).await?;
        let user = queries::hydrate_user(&mut tx, Some(row)).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn remove_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<Option<User>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(row) = queries::lock_user_row(&mut tx, user_id).await? else {
            return Ok(None);
        };

        queries::delete_friendship(&mut tx, user_id, friend_id).await?;
        let user = queries::hydrate_user(&mut tx, Some(row)).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn list_thoughts(&self) -> Result<Vec<Thought>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = queries::list_thought_rows(&mut conn).await?;
        Ok(queries::hydrate_thoughts(&mut conn, rows).await?)
    }

    async fn find_thought(&self, id: Uuid) -> Result<Option<Thought>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_thought(&mut conn, id).await
    }

    async fn find_thoughts(&self, ids: &[Uuid]) -> Result<Vec<Thought>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.pool.acquire().await?;
        let rows = queries::find_thought_rows(&mut conn, ids).await?;
        let mut found = queries::hydrate_thoughts(&mut conn, rows).await?;

        // Populate in reference order, not table order.
        let mut ordered = Vec::with_capacity(found.len());
        for id in ids {
            if let Some(pos) = found.iter().position(|t| t.id == *id) {
                ordered.push(found.swap_remove(pos));
            }
        }
        Ok(ordered)
    }

    async fn insert_thought(&self, thought: NewThought) -> Result<Thought, StoreError> {
        let mut tx = self.pool.begin().await?;
        let id =
            queries::insert_thought_row(&mut tx, thought.author_id, &thought.thought_text).await?;
        for reaction in &thought.reactions {
            queries::insert_reaction(&mut tx, id, reaction).await?;
        }

        let created = Self::fetch_thought(&mut tx, id)
            .await?
            .ok_or(StoreError::MissingReference)?;
        tx.commit().await?;

        info!(thought_id = %id, author_id = %thought.author_id, "Linked new thought to author");
        Ok(created)
    }

    async fn update_thought(
        &self,
        id: Uuid,
        changes: ThoughtChanges,
    ) -> Result<Option<Thought>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(current_author) = queries::lock_thought_author(&mut tx, id).await? else {
            return Ok(None);
        };

        if let Some(author_id) = changes.author_id.filter(|a| *a != current_author) {
            queries::relink_thought(&mut tx, id, author_id).await?;
            info!(
                thought_id = %id,
                from = %current_author,
                to = %author_id,
                "Moved thought to new author"
            );
        }
        if let Some(text) = changes.thought_text.as_deref() {
            queries::update_thought_text(&mut tx, id, text).await?;
        }

        let thought = Self::fetch_thought(&mut tx, id).await?;
        tx.commit().await?;
        Ok(thought)
    }

    async fn delete_thought(&self, id: Uuid) -> Result<Option<DeletedThought>, StoreError> {
        let mut tx = self.pool.begin().await?;
        if queries::lock_thought_author(&mut tx, id).await?.is_none() {
            return Ok(None);
        }
        let Some(thought) = Self::fetch_thought(&mut tx, id).await? else {
            return Ok(None);
        };

        queries::delete_thought_row(&mut tx, id).await?;
        let row = queries::find_user_row(&mut tx, thought.author_id).await?;
        let owner = queries::hydrate_user(&mut tx, row)
            .await?
            .ok_or(StoreError::MissingReference)?;
        tx.commit().await?;

        Ok(Some(DeletedThought { thought, owner }))
    }

    async fn push_reaction(
        &self,
        thought_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<Reaction>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        if !queries::thought_exists(&mut conn, thought_id).await? {
            return Ok(None);
        }

        match queries::insert_reaction(&mut conn, thought_id, &reaction).await {
            Ok(()) => Ok(Some(reaction)),
            // Thought deleted between the existence check and the insert.
            Err(e) => match StoreError::from(e) {
                StoreError::MissingReference => Ok(None),
                other => Err(other),
            },
        }
    }

    async fn pull_reaction(
        &self,
        thought_id: Uuid,
        reaction_id: Uuid,
    ) -> Result<ReactionPull, StoreError> {
        let mut tx = self.pool.begin().await?;
        if queries::lock_thought_author(&mut tx, thought_id).await?.is_none() {
            return Ok(ReactionPull::NoThought);
        }

        let row = queries::delete_reaction(&mut tx, thought_id, reaction_id).await?;
        tx.commit().await?;
        Ok(row.map_or(ReactionPull::NoReaction, |row| {
            ReactionPull::Removed(Reaction::from(row))
        }))
    }
}
