//! Thoughts
//!
//! Short posts owned by a user, each carrying an embedded list of reactions.

pub mod handlers;
pub mod reactions;
pub mod types;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::api::AppState;

/// Create thought routes.
///
/// Mounted at `/api/thoughts` in the main router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_thoughts).post(handlers::create_thought))
        .route(
            "/{thought_id}",
            get(handlers::get_thought)
                .put(handlers::update_thought)
                .delete(handlers::delete_thought),
        )
        .route("/{thought_id}/reactions", post(reactions::add_reaction))
        .route(
            "/{thought_id}/reactions/{reaction_id}",
            delete(reactions::remove_reaction),
        )
}
