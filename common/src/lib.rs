//! # folio-common
//!
//! Shared models, configuration and the collaborator traits (ports) that the
//! report renderer and the password reset flow depend on.
//!
//! Concrete implementations live in `folio-core`. Nothing in here performs IO.

pub mod config;
pub mod entity;
pub mod locale;
pub mod mail;
pub mod reminder;
pub mod security;
pub mod translation;
pub mod users;
