//! `WWW-Authenticate: Digest` challenges.
//!
//! Servers build challenges with [`build_digest_challenge`]; clients turn
//! the header back into a [`DigestChallenge`] with
//! [`DigestChallenge::parse`].

use crate::http::authparams::{format_params, parse_params, AuthParams};
use crate::http::hashalgorithm::DigestAlgorithm;
use crate::http::nonce::generate_nonce;

/// Scheme prefix, including the separating space.
pub(crate) const DIGEST_PREFIX_LEN: usize = "Digest ".len();

/// Whether a header value uses the Digest scheme (case-insensitive).
pub fn is_digest_scheme(header: &str) -> bool {
    header
        .get(..DIGEST_PREFIX_LEN)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("digest "))
}

/// Parameter list after the scheme prefix.
pub(crate) fn digest_params(header: &str) -> Option<&str> {
    if is_digest_scheme(header) {
        header.get(DIGEST_PREFIX_LEN..)
    } else {
        None
    }
}

/// Quality of protection. Only `auth` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Qop {
    /// Authentication only
    #[default]
    Auth,
}

impl Qop {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
        }
    }

    /// Exact match on the wire value.
    pub fn parse(value: &str) -> Option<Self> {
        (value == "auth").then_some(Self::Auth)
    }
}

/// A parsed Digest challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    realm: String,
    nonce: String,
    stale: bool,
    algorithm: DigestAlgorithm,
    opaque: String,
    qop: Qop,
}

impl DigestChallenge {
    /// Parse a `WWW-Authenticate` value such as
    /// `Digest realm="r", qop=auth, nonce="n", opaque="o"`.
    ///
    /// Returns `None` for other schemes, malformed parameter lists, missing
    /// `realm`/`nonce`/`opaque`/`qop`, a qop other than `auth`, or an
    /// algorithm that is unknown or unavailable here. `algorithm` defaults
    /// to MD5 and `stale` to false.
    pub fn parse(header: &str) -> Option<Self> {
        let params = parse_params(
            digest_params(header)?,
            &[("algorithm", "MD5"), ("stale", "false")],
        )?;
        let challenge = Self::from_params(&params);
        if challenge.is_none() {
            tracing::trace!("rejecting digest challenge");
        }
        challenge
    }

    fn from_params(params: &AuthParams) -> Option<Self> {
        let realm = params.get("realm")?;
        let nonce = params.get("nonce")?;
        let stale = params.get("stale")?;
        let algorithm = params.get("algorithm")?;
        let opaque = params.get("opaque")?;
        let qop = params.get("qop")?;

        Some(Self {
            realm: realm.clone(),
            nonce: nonce.clone(),
            stale: stale.eq_ignore_ascii_case("true"),
            algorithm: DigestAlgorithm::from_name(algorithm)?,
            opaque: opaque.clone(),
            qop: Qop::parse(qop)?,
        })
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// The server rejected the previous nonce as expired; the credentials
    /// themselves were fine.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn opaque(&self) -> &str {
        &self.opaque
    }

    pub fn qop(&self) -> Qop {
        self.qop
    }

    /// Serialize back into a `WWW-Authenticate` value.
    pub fn to_header_value(&self) -> String {
        format_challenge(
            &self.realm,
            &self.nonce,
            &self.opaque,
            self.algorithm,
            self.stale,
        )
    }
}

/// Build a `WWW-Authenticate` value with a freshly salted nonce.
///
/// `timestamp` is signed into the nonce and can be read back with
/// [`crate::http::nonce::extract_timestamp`].
pub fn build_digest_challenge(
    timestamp: f64,
    secret: &str,
    realm: &str,
    opaque: &str,
    stale: bool,
    algorithm: DigestAlgorithm,
) -> String {
    let nonce = generate_nonce(timestamp, secret, None);
    format_challenge(realm, &nonce, opaque, algorithm, stale)
}

fn format_challenge(
    realm: &str,
    nonce: &str,
    opaque: &str,
    algorithm: DigestAlgorithm,
    stale: bool,
) -> String {
    let params = format_params([
        ("realm", realm),
        ("qop", Qop::Auth.as_str()),
        ("nonce", nonce),
        ("opaque", opaque),
        ("algorithm", algorithm.as_str()),
        ("stale", if stale { "true" } else { "false" }),
    ]);
    format!("Digest {}", params)
}
