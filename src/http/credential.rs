//! `Authorization: Digest` credentials.
//!
//! Servers parse incoming headers with [`DigestCredential::parse`] and
//! recompute the expected response from a stored partial digest. Clients
//! answer a challenge with [`build_authorization_request`].

use crate::base::autherror::DigestError;
use crate::http::authparams::{format_params, parse_params, AuthParams};
use crate::http::challenge::{digest_params, DigestChallenge, Qop};
use crate::http::digestauth::{
    compute_partial_digest, compute_request_digest, format_nonce_count, DigestSource,
    RequestFields,
};
use crate::http::hashalgorithm::DigestAlgorithm;
use crate::http::nonce::random_hex;
use percent_encoding::percent_decode_str;

/// Length of a generated client nonce.
pub const CLIENT_NONCE_LEN: usize = 32;

/// Same check as [`crate::http::challenge::is_digest_scheme`], named for
/// the `Authorization` side.
pub fn is_digest_credential(header: &str) -> bool {
    crate::http::challenge::is_digest_scheme(header)
}

/// A parsed Digest `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestCredential {
    username: String,
    realm: String,
    nonce: String,
    uri: String,
    response: String,
    algorithm: DigestAlgorithm,
    opaque: String,
    qop: Qop,
    nonce_count: u32,
    client_nonce: String,
}

impl DigestCredential {
    /// Parse an `Authorization` value.
    ///
    /// All of `username`, `realm`, `nonce`, `uri`, `response`, `opaque`,
    /// `qop`, `nc` and `cnonce` must be present (`algorithm` defaults to
    /// MD5). `nc` must be hexadecimal, `qop` must be `auth` and the
    /// algorithm must be supported in this process; otherwise `None`.
    pub fn parse(header: &str) -> Option<Self> {
        let params = parse_params(digest_params(header)?, &[("algorithm", "MD5")])?;
        let credential = Self::from_params(&params);
        if credential.is_none() {
            tracing::trace!("rejecting digest credential");
        }
        credential
    }

    fn from_params(params: &AuthParams) -> Option<Self> {
        let username = params.get("username")?;
        let realm = params.get("realm")?;
        let nonce = params.get("nonce")?;
        let uri = params.get("uri")?;
        let response = params.get("response")?;
        let algorithm = params.get("algorithm")?;
        let opaque = params.get("opaque")?;
        let qop = params.get("qop")?;
        let nc = params.get("nc")?;
        let cnonce = params.get("cnonce")?;

        Some(Self {
            username: username.clone(),
            realm: realm.clone(),
            nonce: nonce.clone(),
            uri: uri.clone(),
            response: response.clone(),
            algorithm: DigestAlgorithm::from_name(algorithm)?,
            opaque: opaque.clone(),
            qop: Qop::parse(qop)?,
            nonce_count: parse_nonce_count(nc)?,
            client_nonce: cnonce.clone(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The client's request digest.
    pub fn response(&self) -> &str {
        &self.response
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

    pub fn nonce_count(&self) -> u32 {
        self.nonce_count
    }

    pub fn client_nonce(&self) -> &str {
        &self.client_nonce
    }

    /// Whether the credential's `uri` names `request_path`.
    pub fn matches_uri(&self, request_path: &str) -> bool {
        validate_uri(&self.uri, request_path)
    }
}

/// `nc` is 1 to 8 hex digits.
fn parse_nonce_count(nc: &str) -> Option<u32> {
    if nc.is_empty() || nc.len() > 8 || !nc.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(nc, 16).ok()
}

/// Compare the path of a digest `uri` (absolute or relative, percent-encoded)
/// with the decoded path the request was made for.
///
/// The path is taken as written: dot-segments are not resolved and a
/// relative path is not rooted, so `/a/../b` only matches `/a/../b`.
pub fn validate_uri(digest_uri: &str, request_path: &str) -> bool {
    percent_decode_str(uri_path(digest_uri)).decode_utf8_lossy() == request_path
}

/// Raw path component of a URI reference: query and fragment dropped,
/// scheme and authority skipped when present.
fn uri_path(uri: &str) -> &str {
    let uri = uri.find(['?', '#']).map_or(uri, |end| &uri[..end]);
    let rest = match uri.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => uri,
    };
    match rest.strip_prefix("//") {
        Some(authority) => authority.find('/').map_or("", |start| &authority[start..]),
        None => rest,
    }
}

/// RFC 3986 `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Where the challenge parameters come from.
#[derive(Debug, Clone, Copy)]
pub enum ChallengeSource<'a> {
    /// An already parsed challenge.
    Challenge(&'a DigestChallenge),
    /// Raw `WWW-Authenticate` text, parsed on use.
    Header(&'a str),
    /// Individual challenge fields.
    Fields {
        realm: &'a str,
        nonce: &'a str,
        opaque: &'a str,
        /// `None` means MD5.
        algorithm: Option<DigestAlgorithm>,
    },
}

/// What the `response` parameter is derived from.
#[derive(Debug, Clone, Copy)]
pub enum ResponseSource<'a> {
    /// Derive partial and request digests from the password.
    Password(&'a str),
    /// Use a request digest computed elsewhere.
    RequestDigest(&'a str),
}

/// Build an `Authorization` value answering a Digest challenge.
///
/// `nonce_count` should be one more than the last count used with this
/// nonce. A random 32 character client nonce is generated when
/// `client_nonce` is `None` or empty.
pub fn build_authorization_request(
    username: &str,
    method: &str,
    uri: &str,
    nonce_count: u32,
    challenge: ChallengeSource<'_>,
    response: ResponseSource<'_>,
    client_nonce: Option<&str>,
) -> Result<String, DigestError> {
    let client_nonce = match client_nonce.filter(|c| !c.is_empty()) {
        Some(cnonce) => cnonce.to_string(),
        None => random_hex(CLIENT_NONCE_LEN),
    };

    let parsed;
    let (realm, nonce, opaque, algorithm) = match challenge {
        ChallengeSource::Challenge(challenge) => (
            challenge.realm(),
            challenge.nonce(),
            challenge.opaque(),
            challenge.algorithm(),
        ),
        ChallengeSource::Header(header) => {
            parsed = DigestChallenge::parse(header)
                .ok_or_else(|| DigestError::InvalidChallenge(header.to_string()))?;
            (
                parsed.realm(),
                parsed.nonce(),
                parsed.opaque(),
                parsed.algorithm(),
            )
        }
        ChallengeSource::Fields {
            realm,
            nonce,
            opaque,
            algorithm,
        } => {
            if realm.is_empty() {
                return Err(DigestError::MissingParameter("realm"));
            }
            if nonce.is_empty() {
                return Err(DigestError::MissingParameter("nonce"));
            }
            if opaque.is_empty() {
                return Err(DigestError::MissingParameter("opaque"));
            }
            (realm, nonce, opaque, algorithm.unwrap_or_default())
        }
    };

    let request_digest = match response {
        ResponseSource::RequestDigest("") => {
            return Err(DigestError::MissingParameter("response"));
        }
        ResponseSource::RequestDigest(digest) => digest.to_string(),
        ResponseSource::Password("") => {
            return Err(DigestError::MissingParameter("password"));
        }
        ResponseSource::Password(password) => {
            let partial = compute_partial_digest(username, realm, password, algorithm);
            compute_request_digest(
                method,
                &partial,
                DigestSource::Fields(RequestFields {
                    uri,
                    nonce,
                    nonce_count,
                    client_nonce: &client_nonce,
                    algorithm: Some(algorithm),
                }),
            )?
        }
    };

    let nc = format_nonce_count(nonce_count);
    let params = format_params([
        ("username", username),
        ("realm", realm),
        ("nonce", nonce),
        ("uri", uri),
        ("response", request_digest.as_str()),
        ("algorithm", algorithm.as_str()),
        ("opaque", opaque),
        ("qop", Qop::Auth.as_str()),
        ("nc", nc.as_str()),
        ("cnonce", client_nonce.as_str()),
    ]);
    Ok(format!("Digest {}", params))
}
