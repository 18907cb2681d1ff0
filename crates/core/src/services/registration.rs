//! Registration request submission service.

use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use regportal_common::{AppError, AppResult, IdGenerator, id::parse_id};
use regportal_db::{
    entities::registration_request::{self, RequestStatus, RequestedRole},
    repositories::RegistrationRequestRepository,
};

/// Registration service for the public submission path.
#[derive(Clone)]
pub struct RegistrationService {
    request_repo: RegistrationRequestRepository,
    id_gen: IdGenerator,
}

/// Input for submitting a registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestInput {
    #[validate(length(min = 1, max = 256))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 32))]
    pub phone_number: String,

    #[validate(length(min = 1, max = 2048))]
    pub about: String,

    pub consent_given: bool,

    pub requested_role: RequestedRole,

    // Researcher verification fields, required iff requested_role = researcher
    #[validate(length(min = 1, max = 64))]
    pub passport_number: Option<String>,

    #[validate(length(min = 1, max = 256))]
    pub passport_issued_by: Option<String>,

    pub passport_issue_date: Option<chrono::NaiveDate>,

    #[validate(url)]
    pub director_approval_letter_url: Option<String>,
}

impl SubmitRequestInput {
    fn has_all_researcher_fields(&self) -> bool {
        self.passport_number.is_some()
            && self.passport_issued_by.is_some()
            && self.passport_issue_date.is_some()
            && self.director_approval_letter_url.is_some()
    }
}

impl RegistrationService {
    /// Create a new registration service.
    #[must_use]
    pub fn new(request_repo: RegistrationRequestRepository) -> Self {
        Self {
            request_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new registration request.
    ///
    /// The request is created in `pending` state. An email with an existing
    /// pending or approved request is refused with `Conflict`.
    pub async fn submit(
        &self,
        input: SubmitRequestInput,
    ) -> AppResult<registration_request::Model> {
        input.validate()?;

        if !input.consent_given {
            return Err(AppError::Validation(
                "Consent must be given to submit a registration request".to_string(),
            ));
        }

        let is_researcher = input.requested_role == RequestedRole::Researcher;
        if is_researcher && !input.has_all_researcher_fields() {
            return Err(AppError::Validation(
                "Researcher requests require passport number, issuing authority, issue date \
                 and a director's approval letter"
                    .to_string(),
            ));
        }

        let email = input.email.trim().to_lowercase();

        if self.request_repo.find_active_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "A registration request with this email already exists".to_string(),
            ));
        }

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let model = registration_request::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set(input.full_name.trim().to_string()),
            email: Set(email),
            phone_number: Set(input.phone_number.trim().to_string()),
            about: Set(input.about.trim().to_string()),
            consent_given: Set(true),
            requested_role: Set(input.requested_role),
            // Verification fields are only kept for researcher requests
            passport_number: Set(input.passport_number.filter(|_| is_researcher)),
            passport_issued_by: Set(input.passport_issued_by.filter(|_| is_researcher)),
            passport_issue_date: Set(input.passport_issue_date.filter(|_| is_researcher)),
            director_approval_letter_url: Set(input
                .director_approval_letter_url
                .filter(|_| is_researcher)),
            status: Set(RequestStatus::Pending),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            rejection_reason: Set(None),
            user_id: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let request = self.request_repo.create(model).await?;
        tracing::info!(request_id = %request.id, role = ?request.requested_role, "Registration request submitted");

        Ok(request)
    }

    /// Get a request by ID (admin surface).
    pub async fn get(&self, id: &str) -> AppResult<registration_request::Model> {
        parse_id(id)?;
        self.request_repo.get_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn base_input() -> SubmitRequestInput {
        SubmitRequestInput {
            full_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone_number: "+15550001111".to_string(),
            about: "I would like to join the portal.".to_string(),
            consent_given: true,
            requested_role: RequestedRole::User,
            passport_number: None,
            passport_issued_by: None,
            passport_issue_date: None,
            director_approval_letter_url: None,
        }
    }

    fn researcher_input() -> SubmitRequestInput {
        SubmitRequestInput {
            requested_role: RequestedRole::Researcher,
            passport_number: Some("AB1234567".to_string()),
            passport_issued_by: Some("State Department".to_string()),
            passport_issue_date: chrono::NaiveDate::from_ymd_opt(2020, 1, 15),
            director_approval_letter_url: Some("https://files.example.org/letter.pdf".to_string()),
            ..base_input()
        }
    }

    fn mock_request(id: &str, input: &SubmitRequestInput) -> registration_request::Model {
        registration_request::Model {
            id: id.to_string(),
            full_name: input.full_name.clone(),
            email: input.email.to_lowercase(),
            phone_number: input.phone_number.clone(),
            about: input.about.clone(),
            consent_given: input.consent_given,
            requested_role: input.requested_role,
            passport_number: input.passport_number.clone(),
            passport_issued_by: input.passport_issued_by.clone(),
            passport_issue_date: input.passport_issue_date,
            director_approval_letter_url: input.director_approval_letter_url.clone(),
            status: RequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            user_id: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> RegistrationService {
        RegistrationService::new(RegistrationRequestRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_submit_requires_consent() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let input = SubmitRequestInput {
            consent_given: false,
            ..base_input()
        };
        let result = service.submit(input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_submit_requires_researcher_fields() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let input = SubmitRequestInput {
            requested_role: RequestedRole::Researcher,
            ..base_input()
        };
        let result = service.submit(input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_email() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let input = SubmitRequestInput {
            email: "not-an-email".to_string(),
            ..base_input()
        };
        let result = service.submit(input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_submit_refuses_duplicate_email() {
        let existing = mock_request("req0", &base_input());

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let result = service.submit(base_input()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_submit_creates_pending_request() {
        let created = mock_request("req1", &base_input());

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                // Duplicate check finds nothing
                .append_query_results([Vec::<registration_request::Model>::new()])
                // Insert returns the created row
                .append_query_results([[created]])
                .into_connection(),
        );

        let request = service.submit(base_input()).await.unwrap();

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.email, "jane@x.com");
    }

    #[tokio::test]
    async fn test_submit_researcher_keeps_verification_fields() {
        let created = mock_request("req2", &researcher_input());

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<registration_request::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );

        let request = service.submit(researcher_input()).await.unwrap();

        assert_eq!(request.requested_role, RequestedRole::Researcher);
        assert_eq!(request.passport_number.as_deref(), Some("AB1234567"));
        assert_eq!(request.passport_issued_by.as_deref(), Some("State Department"));
        assert_eq!(
            request.passport_issue_date,
            chrono::NaiveDate::from_ymd_opt(2020, 1, 15)
        );
        assert_eq!(
            request.director_approval_letter_url.as_deref(),
            Some("https://files.example.org/letter.pdf")
        );
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_id() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.get("definitely-not-a-ulid").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
