//! User account service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::RngCore;
use sea_orm::Set;

use regportal_common::{AppError, AppResult, IdGenerator};
use regportal_db::{
    entities::{user, user::UserRole},
    repositories::UserRepository,
};

/// User service for account provisioning and authentication.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Authenticate a user by email and password.
    ///
    /// All credential failures are `Unauthorized` so the response does not
    /// reveal whether the email is registered. Deactivated accounts are
    /// refused with `Forbidden`.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        Ok(user)
    }

    /// Create the first administrator account if none exists yet.
    ///
    /// Idempotent: returns `None` when an admin (or an account with the seed
    /// email) is already present.
    pub async fn ensure_admin_seeded(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<Option<user::Model>> {
        if self.user_repo.count_admins().await? > 0 {
            return Ok(None);
        }

        let email = email.trim().to_lowercase();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "Seed email already taken by a non-admin account");
            return Ok(None);
        }

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            email: Set(email),
            password_hash: Set(hash_password(password)?),
            role: Set(UserRole::Admin),
            phone_number: Set(None),
            about: Set(None),
            passport_number: Set(None),
            passport_issued_by: Set(None),
            passport_issue_date: Set(None),
            is_active: Set(true),
            email_verified: Set(true),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let admin = self.user_repo.create(model).await?;
        tracing::info!(user_id = %admin.id, "Seeded initial administrator account");

        Ok(Some(admin))
    }
}

/// Hash a password with Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a one-time credential: 8 random bytes, hex-encoded.
#[must_use]
pub fn generate_temporary_password() -> String {
    let mut bytes = [0u8; 8];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
