//! Database Integration Tests
//!
//! Exercise [`PgStore`] cascades against a real `PostgreSQL`.
//! Run with: `DATABASE_URL=postgres://... cargo test -- --ignored`

#[cfg(test)]
mod postgres_tests {
    use super::super::*;
    use crate::store::{NewThought, NewUser, Store, StoreError, ThoughtChanges, UserChanges};
    use sqlx::PgPool;
    use uuid::Uuid;

    async fn seed_user(store: &PgStore, name: &str) -> crate::store::User {
        store
            .insert_user(NewUser {
                username: name.into(),
                email: format!("{name}@example.com"),
            })
            .await
            .expect("Failed to create user")
    }

    async fn seed_thought(store: &PgStore, author: Uuid, text: &str) -> crate::store::Thought {
        store
            .insert_thought(NewThought {
                author_id: author,
                thought_text: text.into(),
                reactions: Vec::new(),
            })
            .await
            .expect("Failed to create thought")
    }

    #[sqlx::test]
    #[ignore = "Requires PostgreSQL via DATABASE_URL"]
    async fn test_username_uniqueness(pool: PgPool) {
        let store = PgStore::new(pool);
        seed_user(&store, "ada").await;

        let result = store
            .insert_user(NewUser {
                username: "ada".into(),
                email: "second@example.com".into(),
            })
            .await;
        assert!(matches!(result, Err(StoreError::Duplicate("username"))));
    }

    #[sqlx::test]
    #[ignore = "Requires PostgreSQL via DATABASE_URL"]
    async fn test_thought_links_follow_owner(pool: PgPool) {
        let store = PgStore::new(pool);
        let ada = seed_user(&store, "ada").await;
        let grace = seed_user(&store, "grace").await;
        let older = seed_thought(&store, grace.id, "older").await;
        let thought = seed_thought(&store, ada.id, "hello").await;

        let ada_before = store.find_user(ada.id).await.unwrap().unwrap();
        assert_eq!(ada_before.thoughts, vec![thought.id]);

        store
            .update_thought(
                thought.id,
                ThoughtChanges {
                    thought_text: None,
                    author_id: Some(grace.id),
                },
            )
            .await
            .unwrap()
            .expect("Thought exists");

        let ada_after = store.find_user(ada.id).await.unwrap().unwrap();
        let grace_after = store.find_user(grace.id).await.unwrap().unwrap();
        assert!(ada_after.thoughts.is_empty());
        assert_eq!(grace_after.thoughts, vec![older.id, thought.id]);
    }

    #[sqlx::test]
    #[ignore = "Requires PostgreSQL via DATABASE_URL"]
    async fn test_rename_visible_on_thoughts(pool: PgPool) {
        let store = PgStore::new(pool);
        let ada = seed_user(&store, "ada").await;
        let thought = seed_thought(&store, ada.id, "hello").await;

        store
            .update_user(
                ada.id,
                UserChanges {
                    username: Some("lovelace".into()),
                    email: None,
                },
            )
            .await
            .unwrap();

        let thought = store.find_thought(thought.id).await.unwrap().unwrap();
        assert_eq!(thought.username, "lovelace");
    }

    #[sqlx::test]
    #[ignore = "Requires PostgreSQL via DATABASE_URL"]
    async fn test_delete_user_cascades(pool: PgPool) {
        let store = PgStore::new(pool);
        let ada = seed_user(&store, "ada").await;
        let grace = seed_user(&store, "grace").await;
        let thought = seed_thought(&store, ada.id, "bye").await;
        store.add_friend(grace.id, ada.id).await.unwrap();

        let deleted = store.delete_user(ada.id).await.unwrap().unwrap();
        assert_eq!(deleted.thoughts, vec![thought.id]);

        assert!(store.find_thought(thought.id).await.unwrap().is_none());
        let grace = store.find_user(grace.id).await.unwrap().unwrap();
        assert!(grace.friends.is_empty());
    }

    #[sqlx::test]
    #[ignore = "Requires PostgreSQL via DATABASE_URL"]
    async fn test_add_missing_friend(pool: PgPool) {
        let store = PgStore::new(pool);
        let ada = seed_user(&store, "ada").await;

        let result = store.add_friend(ada.id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::MissingReference)));
    }
}
