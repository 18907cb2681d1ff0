//! Session token issuance and verification.
//!
//! Admin operations are gated on a signed bearer token carrying the caller's
//! identity and role. Tokens are HS256 JWTs with a configurable lifetime.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Role name carried by administrator tokens.
pub const ADMIN_ROLE: &str = "admin";

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: user id.
    sub: String,
    /// Role of the authenticated user.
    role: String,
    /// Expiry (unix seconds).
    exp: i64,
    /// Issued at (unix seconds).
    iat: i64,
}

/// Verified identity extracted from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    /// User id.
    pub id: String,
    /// Role name.
    pub role: String,
}

impl AuthPayload {
    /// Whether this identity carries the administrative capability.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl TokenManager {
    /// Create a token manager from a shared secret.
    #[must_use]
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::hours(expiry_hours),
        }
    }

    /// Issue a signed token for the given identity.
    pub fn issue(&self, user_id: &str, role: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a token and extract the identity it carries.
    ///
    /// Any failure (bad signature, expired, malformed) is `Unauthorized`.
    pub fn verify(&self, token: &str) -> AppResult<AuthPayload> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AppError::Unauthorized)?;

        Ok(AuthPayload {
            id: data.claims.sub,
            role: data.claims.role,
        })
    }
}
