//! passport-revoke — revoke OAuth2 access tokens in a Passport token table.
//!
//! The binary (`revoke-tokens`) is a thin wrapper over [`command::RevokeCommand`];
//! everything it needs is exported here so `tests/` can drive it against
//! [`store::MemoryStore`] or a live database.

pub mod cli;
pub mod command;
pub mod config;
pub mod errors;
pub mod models;
pub mod progress;
pub mod prompt;
pub mod store;
