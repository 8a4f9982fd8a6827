//! Digest hash algorithms.
//!
//! Maps the `algorithm` parameter to a BoringSSL message digest.
//!
//! Two lookups exist and they deliberately disagree on unknown names:
//! - [`DigestAlgorithm::resolve`] is used when computing digests and falls
//!   back to MD5 for anything it does not recognise.
//! - [`DigestAlgorithm::from_name`] is used when validating parsed headers
//!   and rejects unknown or unavailable algorithms.

use crate::base::autherror::DigestError;
use boring::hash::{hash, MessageDigest};
use boring::nid::Nid;
use std::fmt::{self, Write};
use std::os::raw::c_int;
use std::str::FromStr;
use std::sync::LazyLock;

/// Algorithms available in this process, probed once.
static SUPPORTED_ALGORITHMS: LazyLock<Vec<DigestAlgorithm>> = LazyLock::new(|| {
    let mut algorithms = vec![
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha512,
    ];
    let sha512_256 = sha512_256_digest().is_some();
    if sha512_256 {
        algorithms.push(DigestAlgorithm::Sha512_256);
    }
    tracing::debug!(sha512_256, "probed digest algorithms");
    algorithms
});

/// Digest authentication hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestAlgorithm {
    /// MD5 (default)
    #[default]
    Md5,
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
    /// SHA-512/256, only when the crypto provider exposes it
    Sha512_256,
}

impl DigestAlgorithm {
    /// Every algorithm this crate knows about, available or not.
    pub const ALL: [DigestAlgorithm; 4] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Sha512_256,
    ];

    /// Wire name used in the `algorithm` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
            Self::Sha512_256 => "SHA-512-256",
        }
    }

    /// Exact, case-sensitive match on the wire name.
    fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.as_str() == name)
    }

    /// Resolve an algorithm name for hashing.
    ///
    /// Unknown names and algorithms missing from this process resolve to
    /// MD5 instead of failing.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    /// Strict lookup: the name must be known and available here.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::lookup(name).filter(|alg| alg.is_supported())
    }

    /// Whether this algorithm can be used in this process.
    pub fn is_supported(self) -> bool {
        SUPPORTED_ALGORITHMS.contains(&self)
    }

    /// The process-wide set of usable algorithms.
    pub fn supported() -> &'static [DigestAlgorithm] {
        &SUPPORTED_ALGORITHMS
    }

    fn message_digest(self) -> MessageDigest {
        match self {
            Self::Md5 => MessageDigest::md5(),
            Self::Sha256 => MessageDigest::sha256(),
            Self::Sha512 => MessageDigest::sha512(),
            Self::Sha512_256 => sha512_256_digest().unwrap_or_else(MessageDigest::md5),
        }
    }

    /// Hash `data` and return the lowercase hex digest.
    pub fn hex_digest(self, data: &[u8]) -> String {
        hex_hash(self.message_digest(), data)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| DigestError::UnknownAlgorithm(s.to_string()))
    }
}

fn sha512_256_digest() -> Option<MessageDigest> {
    MessageDigest::from_nid(Nid::from_raw(boring_sys::NID_sha512_256 as c_int))
}

/// Lowercase hex digest of `data`.
pub(crate) fn hex_hash(md: MessageDigest, data: &[u8]) -> String {
    // Built-in digests over in-memory input do not fail.
    let digest = hash(md, data).expect("hash should not fail");
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}
