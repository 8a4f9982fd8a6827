//! HTTP Digest response computation (RFC 2617, qop=auth).
//!
//! - partial digest: `H(username:realm:password)`, cacheable server side
//! - request digest: `H(partial:nonce:nc:cnonce:auth:H(method:uri))`

use crate::base::autherror::DigestError;
use crate::http::challenge::Qop;
use crate::http::credential::DigestCredential;
use crate::http::hashalgorithm::DigestAlgorithm;

/// Compute `H(username:realm:password)`.
///
/// `realm` may be text or raw bytes; text is hashed as its UTF-8 encoding.
pub fn compute_partial_digest(
    username: &str,
    realm: impl AsRef<[u8]>,
    password: &str,
    algorithm: DigestAlgorithm,
) -> String {
    let realm = realm.as_ref();
    let mut data = Vec::with_capacity(username.len() + realm.len() + password.len() + 2);
    data.extend_from_slice(username.as_bytes());
    data.push(b':');
    data.extend_from_slice(realm);
    data.push(b':');
    data.extend_from_slice(password.as_bytes());
    algorithm.hex_digest(&data)
}

/// Individual request parameters for [`compute_request_digest`].
#[derive(Debug, Clone, Copy)]
pub struct RequestFields<'a> {
    pub uri: &'a str,
    pub nonce: &'a str,
    pub nonce_count: u32,
    pub client_nonce: &'a str,
    /// `None` hashes with MD5.
    pub algorithm: Option<DigestAlgorithm>,
}

/// Where the request parameters come from.
#[derive(Debug, Clone, Copy)]
pub enum DigestSource<'a> {
    /// A parsed `Authorization` header (server side verification).
    Credential(&'a DigestCredential),
    /// Explicit fields (client side generation).
    Fields(RequestFields<'a>),
}

/// Compute the `response` value for a request.
///
/// Fails with [`DigestError::MissingParameter`] when explicit fields leave
/// `uri`, `nonce` or `client_nonce` empty.
pub fn compute_request_digest(
    method: &str,
    partial_digest: &str,
    source: DigestSource<'_>,
) -> Result<String, DigestError> {
    let fields = match source {
        DigestSource::Credential(credential) => RequestFields {
            uri: credential.uri(),
            nonce: credential.nonce(),
            nonce_count: credential.nonce_count(),
            client_nonce: credential.client_nonce(),
            algorithm: Some(credential.algorithm()),
        },
        DigestSource::Fields(fields) => {
            if fields.uri.is_empty() {
                return Err(DigestError::MissingParameter("uri"));
            }
            if fields.nonce.is_empty() {
                return Err(DigestError::MissingParameter("nonce"));
            }
            if fields.client_nonce.is_empty() {
                return Err(DigestError::MissingParameter("cnonce"));
            }
            fields
        }
    };

    let algorithm = fields.algorithm.unwrap_or_default();
    let ha2 = algorithm.hex_digest(format!("{}:{}", method, fields.uri).as_bytes());
    let data = format!(
        "{}:{}:{}:{}:{}",
        fields.nonce,
        format_nonce_count(fields.nonce_count),
        fields.client_nonce,
        Qop::Auth.as_str(),
        ha2
    );
    Ok(algorithm.hex_digest(format!("{}:{}", partial_digest, data).as_bytes()))
}

/// Compare a recomputed response with the one a client sent, in constant
/// time for equal-length inputs.
pub fn responses_match(expected: &str, supplied: &str) -> bool {
    expected.len() == supplied.len()
        && boring::memcmp::eq(expected.as_bytes(), supplied.as_bytes())
}

/// Render a nonce count as 8 lowercase hex digits.
pub fn format_nonce_count(nonce_count: u32) -> String {
    format!("{:08x}", nonce_count)
}
