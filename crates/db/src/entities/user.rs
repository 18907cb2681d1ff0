//! User account entity.
//!
//! Accounts are created exclusively by the approval workflow (or by the
//! first-admin seeding path), never directly by applicants.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role assigned to a provisioned account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "researcher")]
    Researcher,
    #[sea_orm(string_value = "staff")]
    Staff,
    #[sea_orm(string_value = "user")]
    #[default]
    User,
}

impl UserRole {
    /// Role name as stored and carried in session tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Researcher => "researcher",
            Self::Staff => "staff",
            Self::User => "user",
        }
    }
}

/// A provisioned user account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name, copied from the originating request's full name.
    pub name: String,

    /// Email address, stored lowercased. Globally unique.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 hash of the login credential. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role.
    pub role: UserRole,

    #[sea_orm(nullable)]
    pub phone_number: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub about: Option<String>,

    // Researcher verification fields, copied from the request on approval
    #[sea_orm(nullable)]
    pub passport_number: Option<String>,

    #[sea_orm(nullable)]
    pub passport_issued_by: Option<String>,

    #[sea_orm(nullable)]
    pub passport_issue_date: Option<Date>,

    /// Whether the account may log in.
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    /// Whether the email address has been verified.
    #[sea_orm(default_value = false)]
    pub email_verified: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
