//! Server-side Digest configuration.

use crate::http::hashalgorithm::DigestAlgorithm;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;
use zeroize::Zeroizing;

/// Default maximum nonce age.
pub const DEFAULT_NONCE_MAX_AGE: Duration = Duration::from_secs(300);

/// Settings for a [`crate::server::DigestAuthenticator`].
///
/// Deserializable from any serde format:
///
/// ```json
/// { "realm": "api@example.com", "secret": "...", "algorithm": "SHA-256",
///   "nonce_max_age_secs": 120 }
/// ```
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Protection space announced in challenges
    pub realm: String,
    /// Opaque value echoed back by clients
    pub opaque: String,
    /// Hash algorithm announced in challenges
    #[serde(deserialize_with = "deserialize_algorithm")]
    pub algorithm: DigestAlgorithm,
    /// Nonce signing secret (zeroized on drop)
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret: Zeroizing<String>,
    /// Nonces older than this are answered with a stale challenge
    #[serde(rename = "nonce_max_age_secs", deserialize_with = "deserialize_secs")]
    pub nonce_max_age: Duration,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            realm: String::new(),
            opaque: String::new(),
            algorithm: DigestAlgorithm::Md5,
            secret: Zeroizing::new(String::new()),
            nonce_max_age: DEFAULT_NONCE_MAX_AGE,
        }
    }
}

impl fmt::Debug for DigestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestConfig")
            .field("realm", &self.realm)
            .field("opaque", &self.opaque)
            .field("algorithm", &self.algorithm)
            .field("secret", &"<redacted>")
            .field("nonce_max_age", &self.nonce_max_age)
            .finish()
    }
}

impl DigestConfig {
    /// Create a config for `realm` signed with `secret`.
    pub fn new(realm: &str, secret: &str) -> Self {
        Self {
            realm: realm.to_string(),
            secret: Zeroizing::new(secret.to_string()),
            ..Self::default()
        }
    }

    /// Set the opaque value.
    pub fn opaque(mut self, opaque: &str) -> Self {
        self.opaque = opaque.to_string();
        self
    }

    /// Set the challenge algorithm.
    pub fn algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the maximum nonce age.
    pub fn nonce_max_age(mut self, max_age: Duration) -> Self {
        self.nonce_max_age = max_age;
        self
    }
}

fn deserialize_algorithm<'de, D>(deserializer: D) -> Result<DigestAlgorithm, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Zeroizing<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Zeroizing::new)
}

fn deserialize_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DigestConfig::default();
        assert_eq!(config.algorithm, DigestAlgorithm::Md5);
        assert_eq!(config.nonce_max_age, Duration::from_secs(300));
        assert!(config.secret.is_empty());
    }

    #[test]
    fn test_builder_pattern() {
        let config = DigestConfig::new("realm@host", "s3cret")
            .opaque("xyz")
            .algorithm(DigestAlgorithm::Sha256)
            .nonce_max_age(Duration::from_secs(30));

        assert_eq!(config.realm, "realm@host");
        assert_eq!(config.opaque, "xyz");
        assert_eq!(config.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(config.secret.as_str(), "s3cret");
        assert_eq!(config.nonce_max_age, Duration::from_secs(30));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = DigestConfig::new("r", "hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_deserialize() {
        let config: DigestConfig = serde_json::from_str(
            r#"{"realm": "api", "secret": "k", "algorithm": "SHA-512", "nonce_max_age_secs": 60}"#,
        )
        .unwrap();
        assert_eq!(config.realm, "api");
        assert_eq!(config.secret.as_str(), "k");
        assert_eq!(config.algorithm, DigestAlgorithm::Sha512);
        assert_eq!(config.nonce_max_age, Duration::from_secs(60));
        assert_eq!(config.opaque, "");
    }

    #[test]
    fn test_deserialize_rejects_unknown_algorithm() {
        let result: Result<DigestConfig, _> =
            serde_json::from_str(r#"{"realm": "api", "algorithm": "SHA-1"}"#);
        assert!(result.is_err());
    }
}
