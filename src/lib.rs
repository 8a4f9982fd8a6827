//! # httpdigest
//!
//! HTTP Digest access authentication (RFC 2617, `qop=auth`).
//!
//! `httpdigest` issues and validates signed nonces, builds and parses
//! `WWW-Authenticate` / `Authorization` Digest headers, and computes the
//! partial and request digests both sides need. Transport, credential
//! storage and session tracking stay with the caller.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use httpdigest::{DigestAuthenticator, DigestClient, DigestConfig};
//!
//! // Server: send a challenge
//! let auth = DigestAuthenticator::new(DigestConfig::new("api@example.com", secret));
//! let www_authenticate = auth.challenge(httpdigest::server::unix_timestamp(), false);
//!
//! // Client: answer it
//! let mut client = DigestClient::new(&www_authenticate, "alice", "wonderland")?;
//! let authorization = client.authorize("GET", "/private")?;
//!
//! // Server: check the answer against a stored partial digest
//! let outcome = auth.verify(&authorization, "GET", "/private", now, |user, realm| {
//!     store.partial_digest(user, realm)
//! });
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`http`](crate::http) - Header codecs, nonces and digest computation
//! - [`server`] - Configuration and verification flow
//! - [`client`] - Nonce-counting client session
//!
//! ## Security
//!
//! - Nonces are signed with a server secret and carry their issue time;
//!   expiry is enforced by [`DigestAuthenticator`] or by the caller.
//! - Salts and client nonces come from BoringSSL's CSPRNG.
//! - Compare responses with [`responses_match`], which runs in constant time.

pub mod base;
pub mod client;
pub mod http;
pub mod server;

// Re-exports for convenience
pub use base::autherror::DigestError;
pub use client::DigestClient;
pub use crate::http::challenge::{build_digest_challenge, is_digest_scheme, DigestChallenge, Qop};
pub use crate::http::credential::{
    build_authorization_request, is_digest_credential, validate_uri, ChallengeSource,
    DigestCredential, ResponseSource,
};
pub use crate::http::digestauth::{
    compute_partial_digest, compute_request_digest, responses_match, DigestSource, RequestFields,
};
pub use crate::http::hashalgorithm::DigestAlgorithm;
pub use crate::http::nonce::{extract_timestamp, generate_nonce, validate_nonce};
pub use server::{AuthOutcome, DigestAuthenticator, DigestConfig, RejectReason};
