//! Core business logic for regportal.

pub mod services;

pub use services::*;
