//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).
//!
//! Every function takes a bare connection so it can run on a pooled
//! connection or inside a transaction. Failures are logged with query
//! context before being propagated.

use std::collections::HashMap;

use sqlx::PgConnection;
use tracing::error;
use uuid::Uuid;

use super::models::{LinkRow, ReactionRow, ThoughtRow, UserRow};
use crate::store::{Reaction, Thought, User};

/// Log and return a database error with context.
macro_rules! db_error {
    ($query:expr) => {
        |e| {
            error!(query = $query, error = %e, "Database query failed");
            e
        }
    };
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

const THOUGHT_COLUMNS: &str = r"
    SELECT t.id, t.author_id, u.username, t.thought_text, t.created_at
    FROM thoughts t
    JOIN users u ON u.id = t.author_id
";

// ============================================================================
// User Queries
// ============================================================================

/// Fetch all user rows in creation order.
pub async fn list_user_rows(conn: &mut PgConnection) -> sqlx::Result<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at, id")
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error!("list_user_rows"))
}

/// Find user row by ID.
pub async fn find_user_row(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error!("find_user_row", user_id = %id))
}

/// Find and row-lock a user for the rest of the transaction.
pub async fn lock_user_row(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error!("lock_user_row", user_id = %id))
}

/// Find user row by username.
pub async fn find_user_row_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error!("find_user_row_by_username", username = %username))
}

/// Insert a user row.
pub async fn insert_user_row(
    conn: &mut PgConnection,
    username: &str,
    email: &str,
) -> sqlx::Result<UserRow> {
    sqlx::query_as::<_, UserRow>(
        r"
        INSERT INTO users (id, username, email)
        VALUES ($1, $2, $3)
        RETURNING *
        ",
    )
    .bind(Uuid::now_v7())
    .bind(username)
    .bind(email)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_error!("insert_user_row", username = %username))
}

/// Update username and/or email. `None` keeps the current value.
pub async fn update_user_row(
    conn: &mut PgConnection,
    id: Uuid,
    username: Option<&str>,
    email: Option<&str>,
) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r"
        UPDATE users
        SET username = COALESCE($2, username),
            email = COALESCE($3, email)
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error!("update_user_row", user_id = %id))
}

/// Delete a user row. Friend edges in both directions go with it.
pub async fn delete_user_row(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(db_error!("delete_user_row", user_id = %id))?;

    Ok(result.rows_affected())
}

/// Thought ids per author, each list in link order.
pub async fn thought_links(
    conn: &mut PgConnection,
    user_ids: &[Uuid],
) -> sqlx::Result<Vec<LinkRow>> {
    sqlx::query_as::<_, LinkRow>(
        r"
        SELECT author_id AS owner_id, id AS target_id
        FROM thoughts
        WHERE author_id = ANY($1)
        ORDER BY link_seq
        ",
    )
    .bind(user_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error!("thought_links", users = user_ids.len()))
}

/// Friend ids per user, each list in insertion order.
pub async fn friend_links(
    conn: &mut PgConnection,
    user_ids: &[Uuid],
) -> sqlx::Result<Vec<LinkRow>> {
    sqlx::query_as::<_, LinkRow>(
        r"
        SELECT user_id AS owner_id, friend_id AS target_id
        FROM friendships
        WHERE user_id = ANY($1)
        ORDER BY position
        ",
    )
    .bind(user_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error!("friend_links", users = user_ids.len()))
}

/// Attach thought and friend references to user rows.
pub async fn hydrate_users(
    conn: &mut PgConnection,
    rows: Vec<UserRow>,
) -> sqlx::Result<Vec<User>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut thoughts = group_links(thought_links(conn, &ids).await?);
    let mut friends = group_links(friend_links(conn, &ids).await?);

    Ok(rows
        .into_iter()
        .map(|row| User {
            thoughts: thoughts.remove(&row.id).unwrap_or_default(),
            friends: friends.remove(&row.id).unwrap_or_default(),
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
        })
        .collect())
}

/// Hydrate a single optional user row.
pub async fn hydrate_user(
    conn: &mut PgConnection,
    row: Option<UserRow>,
) -> sqlx::Result<Option<User>> {
    match row {
        Some(row) => Ok(hydrate_users(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

fn group_links(links: Vec<LinkRow>) -> HashMap<Uuid, Vec<Uuid>> {
    let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for link in links {
        grouped.entry(link.owner_id).or_default().push(link.target_id);
    }
    grouped
}

// ============================================================================
// Friend Queries
// ============================================================================

/// Add a directed friend edge. Existing edges are left as they are.
pub async fn insert_friendship(
    conn: &mut PgConnection,
    user_id: Uuid,
    friend_id: Uuid,
) -> sqlx::Result<()> {
    sqlx::query(
        r"
        INSERT INTO friendships (user_id, friend_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, friend_id) DO NOTHING
        ",
    )
    .bind(user_id)
    .bind(friend_id)
    .execute(&mut *conn)
    .await
    .map_err(db_error!("insert_friendship", user_id = %user_id, friend_id = %friend_id))?;

    Ok(())
}

/// Remove a directed friend edge if present.
pub async fn delete_friendship(
    conn: &mut PgConnection,
    user_id: Uuid,
    friend_id: Uuid,
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM friendships WHERE user_id = $1 AND friend_id = $2")
        .bind(user_id)
        .bind(friend_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error!("delete_friendship", user_id = %user_id, friend_id = %friend_id))?;

    Ok(())
}

// ============================================================================
// Thought Queries
// ============================================================================

/// Fetch all thought rows in creation order.
pub async fn list_thought_rows(conn: &mut PgConnection) -> sqlx::Result<Vec<ThoughtRow>> {
    sqlx::query_as::<_, ThoughtRow>(&format!("{THOUGHT_COLUMNS} ORDER BY t.created_at, t.id"))
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error!("list_thought_rows"))
}

/// Fetch the thought rows matching `ids`, in no particular order.
pub async fn find_thought_rows(
    conn: &mut PgConnection,
    ids: &[Uuid],
) -> sqlx::Result<Vec<ThoughtRow>> {
    sqlx::query_as::<_, ThoughtRow>(&format!("{THOUGHT_COLUMNS} WHERE t.id = ANY($1)"))
        .bind(ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error!("find_thought_rows", thoughts = ids.len()))
}

/// Lock a thought row and return its current author.
pub async fn lock_thought_author(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>("SELECT author_id FROM thoughts WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error!("lock_thought_author", thought_id = %id))
}

/// Insert a thought row linked at the end of its author's list.
pub async fn insert_thought_row(
    conn: &mut PgConnection,
    author_id: Uuid,
    thought_text: &str,
) -> sqlx::Result<Uuid> {
    sqlx::query_scalar::<_, Uuid>(
        r"
        INSERT INTO thoughts (id, author_id, thought_text)
        VALUES ($1, $2, $3)
        RETURNING id
        ",
    )
    .bind(Uuid::now_v7())
    .bind(author_id)
    .bind(thought_text)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_error!("insert_thought_row", author_id = %author_id))
}

/// Move a thought to the end of another author's list.
pub async fn relink_thought(
    conn: &mut PgConnection,
    id: Uuid,
    author_id: Uuid,
) -> sqlx::Result<()> {
    sqlx::query(
        r"
        UPDATE thoughts
        SET author_id = $2, link_seq = nextval('thought_link_seq')
        WHERE id = $1
        ",
    )
    .bind(id)
    .bind(author_id)
    .execute(&mut *conn)
    .await
    .map_err(db_error!("relink_thought", thought_id = %id, author_id = %author_id))?;

    Ok(())
}

/// Replace a thought's text.
pub async fn update_thought_text(
    conn: &mut PgConnection,
    id: Uuid,
    thought_text: &str,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE thoughts SET thought_text = $2 WHERE id = $1")
        .bind(id)
        .bind(thought_text)
        .execute(&mut *conn)
        .await
        .map_err(db_error!("update_thought_text", thought_id = %id))?;

    Ok(())
}

/// Delete a thought row; its reactions cascade.
pub async fn delete_thought_row(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM thoughts WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(db_error!("delete_thought_row", thought_id = %id))?;

    Ok(result.rows_affected())
}

/// Delete every thought owned by `author_id`.
pub async fn delete_thoughts_by_author(
    conn: &mut PgConnection,
    author_id: Uuid,
) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM thoughts WHERE author_id = $1")
        .bind(author_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error!("delete_thoughts_by_author", author_id = %author_id))?;

    Ok(result.rows_affected())
}

/// Check whether a thought exists.
pub async fn thought_exists(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM thoughts WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_error!("thought_exists", thought_id = %id))
}

/// Attach reactions to thought rows, keeping the row order.
pub async fn hydrate_thoughts(
    conn: &mut PgConnection,
    rows: Vec<ThoughtRow>,
) -> sqlx::Result<Vec<Thought>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut reactions: HashMap<Uuid, Vec<Reaction>> = HashMap::new();
    for row in list_reaction_rows(conn, &ids).await? {
        reactions
            .entry(row.thought_id)
            .or_default()
            .push(Reaction::from(row));
    }

    Ok(rows
        .into_iter()
        .map(|row| Thought {
            reactions: reactions.remove(&row.id).unwrap_or_default(),
            id: row.id,
            author_id: row.author_id,
            username: row.username,
            thought_text: row.thought_text,
            created_at: row.created_at,
        })
        .collect())
}

// ============================================================================
// Reaction Queries
// ============================================================================

/// Reactions of the given thoughts in insertion order.
pub async fn list_reaction_rows(
    conn: &mut PgConnection,
    thought_ids: &[Uuid],
) -> sqlx::Result<Vec<ReactionRow>> {
    sqlx::query_as::<_, ReactionRow>(
        r"
        SELECT thought_id, reaction_id, reaction_body, username, created_at
        FROM reactions
        WHERE thought_id = ANY($1)
        ORDER BY position
        ",
    )
    .bind(thought_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error!("list_reaction_rows", thoughts = thought_ids.len()))
}

/// Append a reaction to a thought.
pub async fn insert_reaction(
    conn: &mut PgConnection,
    thought_id: Uuid,
    reaction: &Reaction,
) -> sqlx::Result<()> {
    sqlx::query(
        r"
        INSERT INTO reactions (thought_id, reaction_id, reaction_body, username, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(thought_id)
    .bind(reaction.reaction_id)
    .bind(&reaction.reaction_body)
    .bind(&reaction.username)
    .bind(reaction.created_at)
    .execute(&mut *conn)
    .await
    .map_err(db_error!("insert_reaction", thought_id = %thought_id, reaction_id = %reaction.reaction_id))?;

    Ok(())
}

/// Remove a reaction and return it.
pub async fn delete_reaction(
    conn: &mut PgConnection,
    thought_id: Uuid,
    reaction_id: Uuid,
) -> sqlx::Result<Option<ReactionRow>> {
    sqlx::query_as::<_, ReactionRow>(
        r"
        DELETE FROM reactions
        WHERE thought_id = $1 AND reaction_id = $2
        RETURNING thought_id, reaction_id, reaction_body, username, created_at
        ",
    )
    .bind(thought_id)
    .bind(reaction_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error!("delete_reaction", thought_id = %thought_id, reaction_id = %reaction_id))
}
