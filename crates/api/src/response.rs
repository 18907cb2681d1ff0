//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper.
///
/// Success bodies are `{"data": ...}`; error bodies come from the error
/// type's own response conversion.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Create a success response for a newly created resource.
    pub const fn created(data: T) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_wraps_data() {
        let response = ApiResponse::ok(serde_json::json!({"id": "abc"}));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["data"]["id"], "abc");
    }

    #[test]
    fn test_created_sets_status() {
        let response = ApiResponse::created(()).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
