use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                      // unique user ID
    pub email: String,                 // normalized (trimmed, lowercase)
    #[serde(skip_serializing)]
    pub password_hash: String,         // Argon2 PHC string, never exposed
    pub name: String,
    // The reset flow matches these columns in SQL; Rust reads them only in tests.
    #[allow(dead_code)]
    #[serde(skip_serializing)]
    pub reset_token_hash: Option<String>, // SHA-256 hex of the emailed token
    #[allow(dead_code)]
    #[serde(skip_serializing)]
    pub reset_token_expires_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
