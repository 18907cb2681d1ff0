//! Repositories for database operations.

#![allow(missing_docs)]

pub mod registration_request;
pub mod user;

pub use registration_request::{RegistrationRequestRepository, ReviewTransition};
pub use user::UserRepository;
