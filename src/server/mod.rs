//! Server-side helpers built on [`crate::http`].

pub mod authenticator;
pub mod config;

pub use authenticator::{unix_timestamp, AuthOutcome, DigestAuthenticator, RejectReason};
pub use config::DigestConfig;
