//! Registration review workflow.
//!
//! The sole authority permitted to transition a request out of `pending` and
//! to provision the corresponding account. All transitions go through the
//! repository's conditional update, so two admins racing on the same request
//! cannot both commit: the loser sees `AlreadyReviewed`.

use sea_orm::Set;
use serde::Serialize;

use regportal_common::{AppError, AppResult, AuthPayload, IdGenerator};
use regportal_db::{
    entities::{
        registration_request::{self, RequestStatus},
        user,
    },
    repositories::{RegistrationRequestRepository, ReviewTransition, UserRepository},
};

use super::email::{ApprovalNotification, RejectionNotification};
use super::user::{generate_temporary_password, hash_password};

/// Minimum length for a reviewer-supplied rejection reason.
const MIN_REJECTION_REASON_LEN: usize = 10;

/// Review workflow service.
#[derive(Clone)]
pub struct ReviewService {
    request_repo: RegistrationRequestRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
    login_url: String,
}

/// Result of a successful approval.
#[derive(Debug)]
pub struct ApprovalOutcome {
    /// Id of the provisioned account.
    pub user_id: String,
    /// Payload for the approval email.
    pub notification: ApprovalNotification,
}

/// One page of the admin request listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPage {
    /// Requests on this page, newest first.
    pub requests: Vec<registration_request::Model>,
    /// 1-based page number.
    pub page: u64,
    /// Requested page size.
    pub limit: u64,
    /// Total matching requests.
    pub total: u64,
    /// Total page count (`ceil(total / limit)`).
    pub pages: u64,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub fn new(
        request_repo: RegistrationRequestRepository,
        user_repo: UserRepository,
        login_url: String,
    ) -> Self {
        Self {
            request_repo,
            user_repo,
            id_gen: IdGenerator::new(),
            login_url,
        }
    }

    fn ensure_admin(reviewer: &AuthPayload) -> AppResult<()> {
        if reviewer.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator role required".to_string(),
            ))
        }
    }

    /// Approve a pending request, provisioning its account.
    ///
    /// Account creation happens before the request is marked approved. If the
    /// request update fails afterwards the account is orphaned; that gap is
    /// surfaced to the caller rather than silently retried.
    pub async fn approve(
        &self,
        request_id: &str,
        reviewer: &AuthPayload,
    ) -> AppResult<ApprovalOutcome> {
        Self::ensure_admin(reviewer)?;

        let request = self.request_repo.get_by_id(request_id).await?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::AlreadyReviewed);
        }

        // Uniqueness guard: an existing account with this email converts the
        // approval attempt into an auto-rejection.
        if self.user_repo.find_by_email(&request.email).await?.is_some() {
            return Err(self.reject_email_collision(&request, reviewer).await);
        }

        let temporary_password = generate_temporary_password();
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(request.full_name.clone()),
            email: Set(request.email.clone()),
            password_hash: Set(hash_password(&temporary_password)?),
            role: Set(request.requested_role.into()),
            phone_number: Set(Some(request.phone_number.clone())),
            about: Set(Some(request.about.clone())),
            passport_number: Set(request.passport_number.clone()),
            passport_issued_by: Set(request.passport_issued_by.clone()),
            passport_issue_date: Set(request.passport_issue_date),
            is_active: Set(true),
            email_verified: Set(true),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let account = match self.user_repo.create(model).await {
            Ok(account) => account,
            // A duplicate raced in between the guard and the insert
            Err(AppError::Conflict(_)) => {
                return Err(self.reject_email_collision(&request, reviewer).await);
            }
            Err(e) => return Err(e),
        };

        self.request_repo
            .transition_from_pending(
                &request.id,
                ReviewTransition::approved(&reviewer.id, &account.id),
            )
            .await?;

        tracing::info!(
            request_id = %request.id,
            user_id = %account.id,
            reviewed_by = %reviewer.id,
            "Registration request approved"
        );

        Ok(ApprovalOutcome {
            user_id: account.id,
            notification: ApprovalNotification {
                to: request.email,
                to_name: request.full_name,
                temporary_password,
                login_url: self.login_url.clone(),
            },
        })
    }

    /// Reject a pending request with a reviewer-supplied reason.
    pub async fn reject(
        &self,
        request_id: &str,
        reviewer: &AuthPayload,
        reason: &str,
    ) -> AppResult<RejectionNotification> {
        Self::ensure_admin(reviewer)?;

        let reason = reason.trim();
        if reason.chars().count() < MIN_REJECTION_REASON_LEN {
            return Err(AppError::Validation(format!(
                "Rejection reason must be at least {MIN_REJECTION_REASON_LEN} characters"
            )));
        }

        let request = self.request_repo.get_by_id(request_id).await?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::AlreadyReviewed);
        }

        self.request_repo
            .transition_from_pending(
                &request.id,
                ReviewTransition::rejected(&reviewer.id, reason),
            )
            .await?;

        tracing::info!(
            request_id = %request.id,
            reviewed_by = %reviewer.id,
            "Registration request rejected"
        );

        Ok(RejectionNotification {
            to: request.email,
            to_name: request.full_name,
            reason: reason.to_string(),
        })
    }

    /// List requests for admin review, newest first.
    ///
    /// A page past the end yields an empty slice, not an error.
    pub async fn list(
        &self,
        reviewer: &AuthPayload,
        status: Option<RequestStatus>,
        page: u64,
        limit: u64,
    ) -> AppResult<RequestPage> {
        Self::ensure_admin(reviewer)?;

        if limit == 0 {
            return Err(AppError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }
        if page == 0 {
            return Err(AppError::Validation(
                "Page numbers start at 1".to_string(),
            ));
        }

        let total = self.request_repo.count(status).await?;
        let offset = (page - 1).saturating_mul(limit);
        let requests = self.request_repo.list(status, limit, offset).await?;

        Ok(RequestPage {
            requests,
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
        })
    }

    /// Auto-reject a request whose email collides with an existing account.
    ///
    /// Returns the error to surface: `Conflict` when the auto-rejection
    /// committed, otherwise whatever the conditional update ran into (a
    /// concurrent reviewer, a store failure).
    async fn reject_email_collision(
        &self,
        request: &registration_request::Model,
        reviewer: &AuthPayload,
    ) -> AppError {
        let reason = format!(
            "A user with the email '{}' already exists.",
            request.email
        );

        if let Err(e) = self
            .request_repo
            .transition_from_pending(
                &request.id,
                ReviewTransition::rejected(&reviewer.id, &reason),
            )
            .await
        {
            return e;
        }

        tracing::warn!(
            request_id = %request.id,
            email = %request.email,
            "Approval refused, request auto-rejected: email already registered"
        );

        AppError::Conflict(format!(
            "A user with the email '{}' already exists. The request has been rejected.",
            request.email
        ))
    }
}
