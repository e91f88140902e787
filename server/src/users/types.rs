use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::store::User;
use crate::thoughts::types::ThoughtResponse;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // ASCII word characters only; non-ASCII local parts and domains are rejected.
    Regex::new(r"^(?-u:\w)+([\.-]?(?-u:\w)+)*@(?-u:\w)+([\.-]?(?-u:\w)+)*(\.(?-u:\w){2,})$")
        .expect("valid regex")
});

fn validate_email_pattern(email: &str) -> Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Invalid email".into()))
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Request to create a user.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,
    #[validate(custom(function = "validate_email_pattern"))]
    pub email: String,
}

impl CreateUserRequest {
    /// Trim the username before validation.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self
    }
}

/// Request to update a user. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: Option<String>,
    #[validate(custom(function = "validate_email_pattern"))]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Trim the username before validation.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.username = self.username.map(|name| name.trim().to_string());
        self
    }
}

// ============================================================================
// Responses
// ============================================================================

/// User with thought and friend ids.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub thoughts: Vec<Uuid>,
    pub friends: Vec<Uuid>,
    pub friend_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            friend_count: user.friends.len(),
            id: user.id,
            username: user.username,
            email: user.email,
            thoughts: user.thoughts,
            friends: user.friends,
            created_at: user.created_at,
        }
    }
}

/// User with its thoughts populated.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub thoughts: Vec<ThoughtResponse>,
    pub friends: Vec<Uuid>,
    pub friend_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserUpdated {
    pub message: String,
    pub data: PopulatedUser,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserDeleted {
    pub message: String,
    pub data: UserResponse,
}
