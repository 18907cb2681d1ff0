//! Registration request repository.

use std::sync::Arc;

use crate::entities::{
    RegistrationRequest,
    registration_request::{self, RequestStatus},
};
use regportal_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Review outcome applied to a pending request.
///
/// The repository stamps `reviewed_at` and `updated_at` itself; callers only
/// provide the outcome fields.
#[derive(Debug, Clone)]
pub struct ReviewTransition {
    status: RequestStatus,
    reviewed_by: String,
    rejection_reason: Option<String>,
    user_id: Option<String>,
}

impl ReviewTransition {
    /// Transition to `approved`, linking the provisioned account.
    #[must_use]
    pub fn approved(reviewer_id: &str, user_id: &str) -> Self {
        Self {
            status: RequestStatus::Approved,
            reviewed_by: reviewer_id.to_string(),
            rejection_reason: None,
            user_id: Some(user_id.to_string()),
        }
    }

    /// Transition to `rejected` with the given reason.
    #[must_use]
    pub fn rejected(reviewer_id: &str, reason: &str) -> Self {
        Self {
            status: RequestStatus::Rejected,
            reviewed_by: reviewer_id.to_string(),
            rejection_reason: Some(reason.to_string()),
            user_id: None,
        }
    }
}

/// Registration request repository for database operations.
#[derive(Clone)]
pub struct RegistrationRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl RegistrationRequestRepository {
    /// Create a new registration request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new registration request.
    pub async fn create(
        &self,
        model: registration_request::ActiveModel,
    ) -> AppResult<registration_request::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a request by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<registration_request::Model>> {
        RegistrationRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a request by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<registration_request::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RequestNotFound(id.to_string()))
    }

    /// Find a pending or approved request for an email address.
    ///
    /// Used by the submission path to refuse duplicate applications.
    pub async fn find_active_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<registration_request::Model>> {
        RegistrationRequest::find()
            .filter(registration_request::Column::Email.eq(email.trim().to_lowercase()))
            .filter(
                registration_request::Column::Status
                    .is_in([RequestStatus::Pending, RequestStatus::Approved]),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List requests with an optional status filter, newest first.
    ///
    /// Ordered by creation time descending with id as a deterministic
    /// tiebreak, since creation times may collide.
    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration_request::Model>> {
        let mut query = RegistrationRequest::find()
            .order_by_desc(registration_request::Column::CreatedAt)
            .order_by_desc(registration_request::Column::Id);

        if let Some(s) = status {
            query = query.filter(registration_request::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count requests matching an optional status filter.
    pub async fn count(&self, status: Option<RequestStatus>) -> AppResult<u64> {
        let mut query = RegistrationRequest::find();

        if let Some(s) = status {
            query = query.filter(registration_request::Column::Status.eq(s));
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically transition a request out of `pending`.
    ///
    /// Compare-and-swap on `status`: the single UPDATE only matches while the
    /// stored record is still pending, so a concurrent reviewer loses the race
    /// cleanly and sees `AlreadyReviewed` instead of committing a second
    /// transition.
    pub async fn transition_from_pending(
        &self,
        id: &str,
        transition: ReviewTransition,
    ) -> AppResult<()> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let result = RegistrationRequest::update_many()
            .col_expr(
                registration_request::Column::Status,
                Expr::value(transition.status),
            )
            .col_expr(
                registration_request::Column::ReviewedBy,
                Expr::value(Some(transition.reviewed_by)),
            )
            .col_expr(
                registration_request::Column::ReviewedAt,
                Expr::value(Some(now)),
            )
            .col_expr(
                registration_request::Column::RejectionReason,
                Expr::value(transition.rejection_reason),
            )
            .col_expr(
                registration_request::Column::UserId,
                Expr::value(transition.user_id),
            )
            .col_expr(
                registration_request::Column::UpdatedAt,
                Expr::value(Some(now)),
            )
            .filter(registration_request::Column::Id.eq(id))
            .filter(registration_request::Column::Status.eq(RequestStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::AlreadyReviewed);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::registration_request::RequestedRole;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn mock_request(id: &str, status: RequestStatus) -> registration_request::Model {
        registration_request::Model {
            id: id.to_string(),
            full_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone_number: "+1555000".to_string(),
            about: "Applicant".to_string(),
            consent_given: true,
            requested_role: RequestedRole::User,
            passport_number: None,
            passport_issued_by: None,
            passport_issue_date: None,
            director_approval_letter_url: None,
            status,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            user_id: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_transition_succeeds_when_still_pending() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = RegistrationRequestRepository::new(db);
        let result = repo
            .transition_from_pending("req1", ReviewTransition::approved("admin1", "user1"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_transition_fails_when_no_longer_pending() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = RegistrationRequestRepository::new(db);
        let result = repo
            .transition_from_pending("req1", ReviewTransition::rejected("admin1", "some reason"))
            .await;

        assert!(matches!(result, Err(AppError::AlreadyReviewed)));
    }

    #[tokio::test]
    async fn test_get_by_id_errors_on_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<registration_request::Model>::new()])
                .into_connection(),
        );

        let repo = RegistrationRequestRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::RequestNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_returns_models() {
        let pending = mock_request("req1", RequestStatus::Pending);
        let rejected = mock_request("req2", RequestStatus::Rejected);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending, rejected]])
                .into_connection(),
        );

        let repo = RegistrationRequestRepository::new(db);
        let results = repo.list(None, 10, 0).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "req1");
    }
}
