//! Business logic services.

#![allow(missing_docs)]

pub mod email;
pub mod registration;
pub mod review;
pub mod user;

pub use email::{ApprovalNotification, Mailer, RejectionNotification};
pub use registration::{RegistrationService, SubmitRequestInput};
pub use review::{ApprovalOutcome, RequestPage, ReviewService};
pub use user::UserService;
