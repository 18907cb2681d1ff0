//! Registration request entity.
//!
//! Requests are created by the public submission path in `pending` state and
//! mutated exclusively by the review workflow. They are never deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user::UserRole;

/// Lifecycle status of a registration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl RequestStatus {
    /// Parse a status filter value from the query string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Role an applicant asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum RequestedRole {
    #[sea_orm(string_value = "user")]
    #[default]
    User,
    #[sea_orm(string_value = "researcher")]
    Researcher,
}

impl From<RequestedRole> for UserRole {
    fn from(role: RequestedRole) -> Self {
        match role {
            RequestedRole::User => Self::User,
            RequestedRole::Researcher => Self::Researcher,
        }
    }
}

/// A registration request awaiting (or past) review.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration_request")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub full_name: String,

    /// Applicant email, stored trimmed and lowercased.
    pub email: String,

    pub phone_number: String,

    /// Free-text biography.
    #[sea_orm(column_type = "Text")]
    pub about: String,

    /// Explicit consent to data processing. Must be true at creation.
    pub consent_given: bool,

    pub requested_role: RequestedRole,

    // Researcher verification fields, required iff requested_role = researcher
    #[sea_orm(nullable)]
    pub passport_number: Option<String>,

    #[sea_orm(nullable)]
    pub passport_issued_by: Option<String>,

    #[sea_orm(nullable)]
    pub passport_issue_date: Option<Date>,

    #[sea_orm(nullable)]
    pub director_approval_letter_url: Option<String>,

    /// Current lifecycle status. Once it leaves `pending` it is immutable.
    pub status: RequestStatus,

    /// Admin who reviewed the request.
    #[sea_orm(nullable)]
    pub reviewed_by: Option<String>,

    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTimeWithTimeZone>,

    /// Present iff status = rejected.
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,

    /// Id of the account created on approval. Present iff status = approved.
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReviewedBy",
        to = "super::user::Column::Id"
    )]
    Reviewer,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
