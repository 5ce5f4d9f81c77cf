//! Cross-crate tests of the report renderer and the password reset flow.

mod password_reset;
mod report;
