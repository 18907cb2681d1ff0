//! Registration request endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use regportal_common::{AppError, AppResult};
use regportal_core::services::{
    ApprovalNotification, RejectionNotification, RequestPage, SubmitRequestInput,
};
use regportal_db::entities::registration_request::{self, RequestStatus};

use crate::{extractors::AdminUser, middleware::AppState, response::ApiResponse};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

/// Submission response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub id: String,
    pub status: RequestStatus,
}

/// Submit a new registration request (public).
async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitRequestInput>,
) -> AppResult<ApiResponse<SubmitResponse>> {
    let request = state.registration_service.submit(input).await?;

    Ok(ApiResponse::created(SubmitResponse {
        id: request.id,
        status: request.status,
    }))
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// List registration requests (admin only).
async fn list(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<RequestPage>> {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(value) => Some(RequestStatus::parse(value).ok_or_else(|| {
            AppError::Validation(format!("Unknown status filter '{value}'"))
        })?),
    };

    let page = state
        .review_service
        .list(
            &admin,
            status,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        )
        .await?;

    Ok(ApiResponse::ok(page))
}

/// Get a single registration request (admin only).
async fn show(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<registration_request::Model>> {
    let request = state.registration_service.get(&id).await?;

    Ok(ApiResponse::ok(request))
}

/// Approval response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    pub user_id: String,
    pub email_data: ApprovalNotification,
}

/// Approve a registration request (admin only).
async fn approve(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ApproveResponse>> {
    let outcome = state.review_service.approve(&id, &admin).await?;

    state.mailer.dispatch_approval(&outcome.notification);

    Ok(ApiResponse::ok(ApproveResponse {
        user_id: outcome.user_id,
        email_data: outcome.notification,
    }))
}

/// Rejection request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub reason: String,
}

/// Rejection response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectResponse {
    pub email_data: RejectionNotification,
}

/// Reject a registration request (admin only).
async fn reject(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> AppResult<ApiResponse<RejectResponse>> {
    let notification = state.review_service.reject(&id, &admin, &req.reason).await?;

    state.mailer.dispatch_rejection(&notification);

    Ok(ApiResponse::ok(RejectResponse {
        email_data: notification,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit).get(list))
        .route("/{id}", get(show))
        .route("/{id}/approve", post(approve))
        .route("/{id}/reject", post(reject))
}
