//! Client-side Digest session.
//!
//! Holds the latest challenge from a server and answers it for successive
//! requests, counting nonce uses.
//!
//! # Example
//!
//! ```rust,ignore
//! use httpdigest::DigestClient;
//!
//! let mut client = DigestClient::new(www_authenticate, "Mufasa", "Circle Of Life")?;
//! let authorization = client.authorize("GET", "/dir/index.html")?;
//! ```

use crate::base::autherror::DigestError;
use crate::http::challenge::DigestChallenge;
use crate::http::credential::{build_authorization_request, ChallengeSource, ResponseSource};
use zeroize::Zeroizing;

/// Answers Digest challenges for one user.
#[derive(Clone)]
pub struct DigestClient {
    challenge: DigestChallenge,
    username: String,
    /// Password (zeroized on drop)
    password: Zeroizing<String>,
    /// Requests sent with the current nonce
    nonce_count: u32,
}

impl std::fmt::Debug for DigestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestClient")
            .field("challenge", &self.challenge)
            .field("username", &self.username)
            .field("nonce_count", &self.nonce_count)
            .finish_non_exhaustive()
    }
}

impl DigestClient {
    /// Create a client from a `WWW-Authenticate` value.
    pub fn new(challenge_header: &str, username: &str, password: &str) -> Result<Self, DigestError> {
        Ok(Self {
            challenge: parse_challenge(challenge_header)?,
            username: username.to_string(),
            password: Zeroizing::new(password.to_string()),
            nonce_count: 0,
        })
    }

    /// Build the `Authorization` value for the next request.
    pub fn authorize(&mut self, method: &str, uri: &str) -> Result<String, DigestError> {
        let nonce_count = self.nonce_count.wrapping_add(1);
        let header = build_authorization_request(
            &self.username,
            method,
            uri,
            nonce_count,
            ChallengeSource::Challenge(&self.challenge),
            ResponseSource::Password(self.password.as_str()),
            None,
        )?;
        self.nonce_count = nonce_count;
        Ok(header)
    }

    /// Replace the challenge, e.g. after a `stale=true` response. The nonce
    /// count starts over.
    pub fn update_challenge(&mut self, challenge_header: &str) -> Result<(), DigestError> {
        self.challenge = parse_challenge(challenge_header)?;
        self.nonce_count = 0;
        tracing::debug!(stale = self.challenge.is_stale(), "digest challenge updated");
        Ok(())
    }

    pub fn challenge(&self) -> &DigestChallenge {
        &self.challenge
    }

    /// Whether the current challenge reported the previous nonce as stale.
    pub fn is_stale(&self) -> bool {
        self.challenge.is_stale()
    }

    /// Nonce count used by the most recent [`Self::authorize`] call.
    pub fn nonce_count(&self) -> u32 {
        self.nonce_count
    }
}

fn parse_challenge(header: &str) -> Result<DigestChallenge, DigestError> {
    DigestChallenge::parse(header).ok_or_else(|| DigestError::InvalidChallenge(header.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::credential::DigestCredential;

    const CHALLENGE: &str = r#"Digest realm="test", qop=auth, nonce="abc123", opaque="xyz""#;

    #[test]
    fn test_authorize() {
        let mut client = DigestClient::new(CHALLENGE, "user", "pass").unwrap();
        let header = client.authorize("GET", "/path").unwrap();

        assert!(header.starts_with("Digest username=\"user\""));
        assert!(header.contains("realm=\"test\""));
        assert!(header.contains("nonce=\"abc123\""));
        assert!(header.contains("uri=\"/path\""));
        assert!(header.contains("qop=auth"));
        assert!(header.contains("nc=00000001"));
        assert!(DigestCredential::parse(&header).is_some());
    }

    #[test]
    fn test_nonce_count_increments() {
        let mut client = DigestClient::new(CHALLENGE, "u", "p").unwrap();

        let token1 = client.authorize("GET", "/").unwrap();
        let token2 = client.authorize("GET", "/").unwrap();

        assert!(token1.contains("nc=00000001"));
        assert!(token2.contains("nc=00000002"));
        assert_eq!(client.nonce_count(), 2);
    }

    #[test]
    fn test_update_challenge_resets_count() {
        let mut client = DigestClient::new(CHALLENGE, "u", "p").unwrap();
        client.authorize("GET", "/").unwrap();

        client
            .update_challenge(r#"Digest realm="test", qop=auth, nonce="fresh", opaque="xyz", stale=true"#)
            .unwrap();
        assert!(client.is_stale());
        assert_eq!(client.nonce_count(), 0);
        assert_eq!(client.challenge().nonce(), "fresh");

        let header = client.authorize("GET", "/").unwrap();
        assert!(header.contains("nonce=\"fresh\""));
        assert!(header.contains("nc=00000001"));
    }

    #[test]
    fn test_invalid_challenge() {
        let err = DigestClient::new(r#"Basic realm="x""#, "u", "p").unwrap_err();
        assert_eq!(err, DigestError::InvalidChallenge(r#"Basic realm="x""#.to_string()));

        let mut client = DigestClient::new(CHALLENGE, "u", "p").unwrap();
        assert!(client.update_challenge("Digest realm=\"x\"").is_err());
        assert_eq!(client.challenge().nonce(), "abc123");
    }

    #[test]
    fn test_empty_password_is_an_error() {
        let mut client = DigestClient::new(CHALLENGE, "u", "").unwrap();
        assert_eq!(
            client.authorize("GET", "/"),
            Err(DigestError::MissingParameter("password"))
        );
        assert_eq!(client.nonce_count(), 0);
    }

    #[test]
    fn test_debug_hides_password() {
        let client = DigestClient::new(CHALLENGE, "u", "hunter2").unwrap();
        assert!(!format!("{:?}", client).contains("hunter2"));
    }
}
