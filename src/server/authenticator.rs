//! Server-side Digest verification flow.
//!
//! Ties the nonce service, challenge builder, credential parser and digest
//! computation together behind a [`DigestConfig`]. Partial digests stay in
//! the caller's storage and are handed in through a lookup closure.

use crate::http::challenge::build_digest_challenge;
use crate::http::credential::DigestCredential;
use crate::http::digestauth::{compute_request_digest, responses_match, DigestSource};
use crate::http::nonce::{extract_timestamp, validate_nonce};
use crate::server::config::DigestConfig;
use http::header::{HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use percent_encoding::percent_decode_str;
use time::OffsetDateTime;

/// Why a credential was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No `Authorization` header, or not valid UTF-8
    MissingHeader,
    /// Not a well-formed Digest credential
    Malformed,
    RealmMismatch,
    OpaqueMismatch,
    AlgorithmMismatch,
    /// `uri` does not name the requested path
    UriMismatch,
    /// Nonce was not issued with our secret
    InvalidNonce,
    /// No partial digest for this user
    UnknownUser,
    /// Response digest does not match
    BadResponse,
}

/// Result of verifying a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated { username: String },
    /// Credentials are correct but the nonce is too old; answer with a
    /// challenge carrying `stale=true`.
    Stale,
    Rejected(RejectReason),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Current time as fractional seconds since the Unix epoch.
pub fn unix_timestamp() -> f64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as f64 / 1e9
}

/// Issues challenges and verifies credentials for one realm.
#[derive(Debug, Clone)]
pub struct DigestAuthenticator {
    config: DigestConfig,
}

impl DigestAuthenticator {
    pub fn new(config: DigestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    /// `WWW-Authenticate` value with a nonce for `timestamp`.
    pub fn challenge(&self, timestamp: f64, stale: bool) -> String {
        build_digest_challenge(
            timestamp,
            &self.config.secret,
            &self.config.realm,
            &self.config.opaque,
            stale,
            self.config.algorithm,
        )
    }

    /// [`Self::challenge`] as a header value.
    pub fn challenge_header_value(
        &self,
        timestamp: f64,
        stale: bool,
    ) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.challenge(timestamp, stale))
    }

    /// Verify an `Authorization` value.
    ///
    /// `request_path` is the decoded path of the request. `now` is compared
    /// against the nonce timestamp; a non-finite `now` makes every nonce
    /// stale. `lookup` receives `(username, realm)`
    /// and returns the stored partial digest for that user.
    pub fn verify<F>(
        &self,
        header: &str,
        method: &str,
        request_path: &str,
        now: f64,
        lookup: F,
    ) -> AuthOutcome
    where
        F: FnOnce(&str, &str) -> Option<String>,
    {
        let Some(credential) = DigestCredential::parse(header) else {
            tracing::debug!("digest credential malformed");
            return AuthOutcome::Rejected(RejectReason::Malformed);
        };
        let outcome = self.check(&credential, method, request_path, now, lookup);
        match &outcome {
            AuthOutcome::Authenticated { username } => {
                tracing::debug!(username = %username, "digest authentication succeeded");
            }
            AuthOutcome::Stale => {
                tracing::debug!(username = %credential.username(), "digest nonce stale");
            }
            AuthOutcome::Rejected(reason) => {
                tracing::debug!(username = %credential.username(), ?reason, "digest authentication rejected");
            }
        }
        outcome
    }

    /// Verify the `Authorization` header of an [`http::Request`].
    pub fn verify_request<B, F>(&self, request: &http::Request<B>, now: f64, lookup: F) -> AuthOutcome
    where
        F: FnOnce(&str, &str) -> Option<String>,
    {
        let Some(header) = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return AuthOutcome::Rejected(RejectReason::MissingHeader);
        };
        let path = percent_decode_str(request.uri().path()).decode_utf8_lossy();
        self.verify(header, request.method().as_str(), &path, now, lookup)
    }

    fn check<F>(
        &self,
        credential: &DigestCredential,
        method: &str,
        request_path: &str,
        now: f64,
        lookup: F,
    ) -> AuthOutcome
    where
        F: FnOnce(&str, &str) -> Option<String>,
    {
        if credential.realm() != self.config.realm {
            return AuthOutcome::Rejected(RejectReason::RealmMismatch);
        }
        if credential.opaque() != self.config.opaque {
            return AuthOutcome::Rejected(RejectReason::OpaqueMismatch);
        }
        if credential.algorithm() != self.config.algorithm {
            return AuthOutcome::Rejected(RejectReason::AlgorithmMismatch);
        }
        if !credential.matches_uri(request_path) {
            return AuthOutcome::Rejected(RejectReason::UriMismatch);
        }
        if !validate_nonce(credential.nonce(), &self.config.secret) {
            return AuthOutcome::Rejected(RejectReason::InvalidNonce);
        }
        let Some(issued) = extract_timestamp(credential.nonce()).filter(|t| t.is_finite()) else {
            return AuthOutcome::Rejected(RejectReason::InvalidNonce);
        };

        let Some(partial) = lookup(credential.username(), credential.realm()) else {
            return AuthOutcome::Rejected(RejectReason::UnknownUser);
        };
        let expected =
            match compute_request_digest(method, &partial, DigestSource::Credential(credential)) {
                Ok(expected) => expected,
                Err(_) => return AuthOutcome::Rejected(RejectReason::Malformed),
            };
        if !responses_match(&expected, credential.response()) {
            return AuthOutcome::Rejected(RejectReason::BadResponse);
        }

        let age = now - issued;
        if !age.is_finite() || age > self.config.nonce_max_age.as_secs_f64() {
            return AuthOutcome::Stale;
        }

        AuthOutcome::Authenticated {
            username: credential.username().to_string(),
        }
    }
}
