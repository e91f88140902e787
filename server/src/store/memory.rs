//! In-process document store.
//!
//! Keeps both collections behind one lock so each cascade is applied as a
//! single step. Used by the test suite and by `DATABASE_URL=memory://`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    DeletedThought, NewThought, NewUser, Reaction, ReactionPull, Store, StoreError, Thought,
    ThoughtChanges, User, UserChanges,
};

#[derive(Debug, Clone)]
struct ThoughtDoc {
    id: Uuid,
    author_id: Uuid,
    thought_text: String,
    created_at: chrono::DateTime<Utc>,
    reactions: Vec<Reaction>,
}

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    thoughts: Vec<ThoughtDoc>,
}

impl Collections {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    fn thought_mut(&mut self, id: Uuid) -> Option<&mut ThoughtDoc> {
        self.thoughts.iter_mut().find(|t| t.id == id)
    }

    /// Reject values already held by a user other than `except`.
    fn check_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<Uuid>,
    ) -> Result<(), StoreError> {
        let others = self.users.iter().filter(|u| Some(u.id) != except);
        for user in others {
            if username.is_some_and(|name| user.username == name) {
                return Err(StoreError::Duplicate("username"));
            }
            if email.is_some_and(|email| user.email == email) {
                return Err(StoreError::Duplicate("email"));
            }
        }
        Ok(())
    }

    fn resolve(&self, doc: &ThoughtDoc) -> Thought {
        let username = self
            .user(doc.author_id)
            .map(|u| u.username.clone())
            .unwrap_or_default();

        Thought {
            id: doc.id,
            author_id: doc.author_id,
            username,
            thought_text: doc.thought_text.clone(),
            created_at: doc.created_at,
            reactions: doc.reactions.clone(),
        }
    }
}

/// Document store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.user(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_unique(Some(&user.username), Some(&user.email), None)?;

        let doc = User {
            id: Uuid::now_v7(),
            username: user.username,
            email: user.email,
            thoughts: Vec::new(),
            friends: Vec::new(),
            created_at: Utc::now(),
        };
        inner.users.push(doc.clone());
        Ok(doc)
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.user(id).is_none() {
            return Ok(None);
        }
        inner.check_unique(changes.username.as_deref(), changes.email.as_deref(), Some(id))?;

        let Some(user) = inner.user_mut(id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(pos) = inner.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        let removed = inner.users.remove(pos);

        inner
            .thoughts
            .retain(|t| !removed.thoughts.contains(&t.id) && t.author_id != id);
        for user in &mut inner.users {
            user.friends.retain(|f| *f != id);
        }
        Ok(Some(removed))
    }

    async fn add_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.user(user_id).is_none() {
            return Ok(None);
        }
        if inner.user(friend_id).is_none() {
            return Err(StoreError::MissingReference);
        }

        let Some(user) = inner.user_mut(user_id) else {
            return Ok(None);
        };
        if !user.friends.contains(&friend_id) {
            user.friends.push(friend_id);
        }
        Ok(Some(user.clone()))
    }

    async fn remove_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.user_mut(user_id).map(|user| {
            user.friends.retain(|f| *f != friend_id);
            user.clone()
        }))
    }

    async fn list_thoughts(&self) -> Result<Vec<Thought>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.thoughts.iter().map(|t| inner.resolve(t)).collect())
    }

    async fn find_thought(&self, id: Uuid) -> Result<Option<Thought>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .thoughts
            .iter()
            .find(|t| t.id == id)
            .map(|t| inner.resolve(t)))
    }

    async fn find_thoughts(&self, ids: &[Uuid]) -> Result<Vec<Thought>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.thoughts.iter().find(|t| t.id == *id))
            .map(|t| inner.resolve(t))
            .collect())
    }

    async fn insert_thought(&self, thought: NewThought) -> Result<Thought, StoreError> {
        let mut seen = HashSet::with_capacity(thought.reactions.len());
        if !thought.reactions.iter().all(|r| seen.insert(r.reaction_id)) {
            return Err(StoreError::Duplicate("reactionId"));
        }

        let mut inner = self.inner.write().await;
        let Some(author) = inner.user_mut(thought.author_id) else {
            return Err(StoreError::MissingReference);
        };

        let doc = ThoughtDoc {
            id: Uuid::now_v7(),
            author_id: thought.author_id,
            thought_text: thought.thought_text,
            created_at: Utc::now(),
            reactions: thought.reactions,
        };
        author.thoughts.push(doc.id);
        inner.thoughts.push(doc.clone());
        Ok(inner.resolve(&doc))
    }

    async fn update_thought(
        &self,
        id: Uuid,
        changes: ThoughtChanges,
    ) -> Result<Option<Thought>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(current_author) = inner.thoughts.iter().find(|t| t.id == id).map(|t| t.author_id)
        else {
            return Ok(None);
        };

        let new_author = changes.author_id.filter(|a| *a != current_author);
        if let Some(new_author) = new_author {
            if inner.user(new_author).is_none() {
                return Err(StoreError::MissingReference);
            }
            if let Some(old) = inner.user_mut(current_author) {
                old.thoughts.retain(|t| *t != id);
            }
            if let Some(new) = inner.user_mut(new_author) {
                if !new.thoughts.contains(&id) {
                    new.thoughts.push(id);
                }
            }
        }

        let Some(doc) = inner.thought_mut(id) else {
            return Ok(None);
        };
        if let Some(author) = new_author {
            doc.author_id = author;
        }
        if let Some(text) = changes.thought_text {
            doc.thought_text = text;
        }
        let doc = doc.clone();
        Ok(Some(inner.resolve(&doc)))
    }

    async fn delete_thought(&self, id: Uuid) -> Result<Option<DeletedThought>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(pos) = inner.thoughts.iter().position(|t| t.id == id) else {
            return Ok(None);
        };

        // Resolve before unlinking so the username is still available.
        let thought = inner.resolve(&inner.thoughts[pos]);
        let Some(owner) = inner.user_mut(thought.author_id) else {
            return Err(StoreError::MissingReference);
        };
        owner.thoughts.retain(|t| *t != id);
        let owner = owner.clone();
        inner.thoughts.remove(pos);

        Ok(Some(DeletedThought { thought, owner }))
    }

    async fn push_reaction(
        &self,
        thought_id: Uuid,
        reaction: Reaction,
    ) -> Result<Option<Reaction>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(doc) = inner.thought_mut(thought_id) else {
            return Ok(None);
        };
        if doc
            .reactions
            .iter()
            .any(|r| r.reaction_id == reaction.reaction_id)
        {
            return Err(StoreError::Duplicate("reactionId"));
        }
        doc.reactions.push(reaction.clone());
        Ok(Some(reaction))
    }

    async fn pull_reaction(
        &self,
        thought_id: Uuid,
        reaction_id: Uuid,
    ) -> Result<ReactionPull, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(doc) = inner.thought_mut(thought_id) else {
            return Ok(ReactionPull::NoThought);
        };
        let pos = doc.reactions.iter().position(|r| r.reaction_id == reaction_id);
        Ok(pos.map_or(ReactionPull::NoReaction, |pos| {
            ReactionPull::Removed(doc.reactions.remove(pos))
        }))
    }
}
