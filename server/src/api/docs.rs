//! OpenAPI Document
//!
//! Served as JSON at `GET /api/openapi.json`.

use utoipa::OpenApi;

use crate::api::ErrorBody;
use crate::store::Reaction;
use crate::thoughts::types::{
    CreateReactionRequest, CreateThoughtRequest, OwnerSummary, ReactionAdded, ReactionRemoved,
    ThoughtCreated, ThoughtDeleted, ThoughtResponse, UpdateThoughtRequest,
};
use crate::users::types::{
    CreateUserRequest, PopulatedUser, UpdateUserRequest, UserDeleted, UserResponse, UserUpdated,
};
use crate::{thoughts, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Echo Chamber Network API",
        description = "Users, their thoughts, reactions to thoughts, and friend lists."
    ),
    paths(
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::create_user,
        users::handlers::update_user,
        users::handlers::delete_user,
        users::friends::add_friend,
        users::friends::remove_friend,
        thoughts::handlers::list_thoughts,
        thoughts::handlers::get_thought,
        thoughts::handlers::create_thought,
        thoughts::handlers::update_thought,
        thoughts::handlers::delete_thought,
        thoughts::reactions::add_reaction,
        thoughts::reactions::remove_reaction,
    ),
    components(schemas(
        ErrorBody,
        CreateUserRequest,
        UpdateUserRequest,
        UserResponse,
        PopulatedUser,
        UserUpdated,
        UserDeleted,
        CreateThoughtRequest,
        UpdateThoughtRequest,
        CreateReactionRequest,
        ThoughtResponse,
        OwnerSummary,
        ThoughtCreated,
        ThoughtDeleted,
        Reaction,
        ReactionAdded,
        ReactionRemoved,
    )),
    tags(
        (name = "users", description = "User accounts"),
        (name = "friends", description = "One-directional friend lists"),
        (name = "thoughts", description = "Thoughts owned by users"),
        (name = "reactions", description = "Reactions embedded in thoughts"),
    )
)]
pub struct ApiDoc;
