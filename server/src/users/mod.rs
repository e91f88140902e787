//! Users
//!
//! User CRUD and the one-directional friend list.

pub mod friends;
pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;

use crate::api::AppState;

/// Create user routes.
///
/// Mounted at `/api/users` in the main router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/{user_id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route(
            "/{user_id}/friends/{friend_id}",
            post(friends::add_friend).delete(friends::remove_friend),
        )
}
