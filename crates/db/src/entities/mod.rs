//! Database entities.

#![allow(missing_docs)]

pub mod registration_request;
pub mod user;

pub use registration_request::Entity as RegistrationRequest;
pub use user::Entity as User;
