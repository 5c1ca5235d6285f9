//! DAO onboarding — the wizard that takes a user from template selection to
//! a launched organization.

pub mod cli;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod templates;
