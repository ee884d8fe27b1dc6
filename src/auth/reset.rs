//! One-time password reset tokens.
//!
//! The raw token only ever leaves the process inside the reset email; the
//! user record keeps its SHA-256 digest.

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};

pub const RESET_TOKEN_BYTES: usize = 32;
pub const RESET_TOKEN_TTL: Duration = Duration::hours(1);

#[derive(Debug, Clone)]
pub struct IssuedResetToken {
    pub raw: String,
    pub hash: String,
    pub expires_at: OffsetDateTime,
}

pub fn issue(now: OffsetDateTime) -> IssuedResetToken {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = hash_token(&raw);
    IssuedResetToken {
        raw,
        hash,
        expires_at: now + RESET_TOKEN_TTL,
    }
}

pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
