// src/models/user.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::LazyLock;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Display name, shown on the leaderboard and in teacher views.
    pub name: String,

    /// Unique email, the login identifier.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'student' or 'teacher'. Fixed at creation.
    pub role: String,

    /// Optional profile image URL (hosting is an external concern).
    pub image: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(custom(function = validate_password_strength))]
    pub password: String,
    #[validate(custom(function = validate_role))]
    pub role: String,
    pub image: Option<String>,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 120))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

static PASSWORD_CLASSES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [r"[A-Z]", r"[a-z]", r"[0-9]", r"[^A-Za-z0-9]"].map(|p| Regex::new(p).unwrap())
});

/// At least 8 characters with an uppercase letter, a lowercase letter,
/// a digit and a special character.
fn validate_password_strength(password: &str) -> Result<(), validator::ValidationError> {
    if password.len() < 8 || !PASSWORD_CLASSES.iter().all(|re| re.is_match(password)) {
        return Err(validator::ValidationError::new("weak_password"));
    }
    Ok(())
}

fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    match role {
        "student" | "teacher" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_role")),
    }
}
