//! Signed, salted, timestamped server nonces.
//!
//! A nonce has the form `timestamp:salt:signature` where
//! `signature = MD5(timestamp:salt:secret)`. The signature always uses MD5,
//! independent of the negotiated digest algorithm.
//!
//! Validation only proves the nonce was issued with `secret`. Expiry is up
//! to the caller: pull the timestamp out with [`extract_timestamp`] and
//! compare it against the clock and a maximum age.

use crate::http::hashalgorithm::DigestAlgorithm;

/// Alphabet for salts and client nonces.
const HEX_ALPHABET: &[u8; 16] = b"0123456789ABCDEF";

/// Length of a generated salt.
pub const SALT_LEN: usize = 4;

/// Generate a nonce for `timestamp`.
///
/// A random salt is drawn when `salt` is `None` or empty, so two nonces
/// issued for the same timestamp still differ.
pub fn generate_nonce(timestamp: f64, secret: &str, salt: Option<&str>) -> String {
    let timestamp = timestamp.to_string();
    match salt.filter(|s| !s.is_empty()) {
        Some(salt) => sign(&timestamp, salt, secret),
        None => sign(&timestamp, &random_hex(SALT_LEN), secret),
    }
}

/// Check that `nonce` was generated with `secret`.
pub fn validate_nonce(nonce: &str, secret: &str) -> bool {
    let Some((timestamp, salt, _)) = split_nonce(nonce) else {
        return false;
    };
    if salt.is_empty() {
        return false;
    }

    let expected = sign(timestamp, salt, secret);
    expected.len() == nonce.len() && boring::memcmp::eq(expected.as_bytes(), nonce.as_bytes())
}

/// Timestamp embedded in `nonce`.
///
/// The value is not authenticated; call [`validate_nonce`] before trusting
/// it.
pub fn extract_timestamp(nonce: &str) -> Option<f64> {
    let (timestamp, _, _) = split_nonce(nonce)?;
    timestamp.parse().ok()
}

/// Split into exactly three parts, on the first two colons.
fn split_nonce(nonce: &str) -> Option<(&str, &str, &str)> {
    let mut parts = nonce.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(timestamp), Some(salt), Some(signature)) => Some((timestamp, salt, signature)),
        _ => None,
    }
}

fn sign(timestamp: &str, salt: &str, secret: &str) -> String {
    let signature =
        DigestAlgorithm::Md5.hex_digest(format!("{}:{}:{}", timestamp, salt, secret).as_bytes());
    format!("{}:{}:{}", timestamp, salt, signature)
}

/// Random token of `len` characters from `0-9A-F`.
pub(crate) fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    // BoringSSL's RAND_bytes does not report failure.
    boring::rand::rand_bytes(&mut bytes).expect("rand_bytes should not fail");
    bytes
        .iter()
        .map(|b| char::from(HEX_ALPHABET[usize::from(b & 0x0f)]))
        .collect()
}
