//! HTTP API layer for regportal.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: public registration submission, login, admin review
//! - **Extractors**: bearer authentication and the admin capability check
//! - **Middleware**: token verification, application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
