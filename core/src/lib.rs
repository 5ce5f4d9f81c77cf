//! # folio-core
//!
//! The report renderer, the password reset controller and the concrete
//! adapters for the traits declared in `folio-common`.
//!
//! * [`report`]: PDF report assembly.
//! * [`password_reset`]: "forgot password" view selection and submission.
//! * [`translations`], [`security`], [`users`], [`mail`], [`reminder`]: adapters.

pub mod mail;
pub mod password_reset;
pub mod reminder;
pub mod report;
pub mod security;
pub mod translations;
pub mod users;
