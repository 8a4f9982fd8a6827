//! Wire-level Digest authentication.
//!
//! - [`authparams`]: auth-param list parsing and formatting
//! - [`hashalgorithm`]: algorithm names and hashing
//! - [`nonce`]: signed server nonces
//! - [`digestauth`]: partial and request digests
//! - [`challenge`]: `WWW-Authenticate` challenges
//! - [`credential`]: `Authorization` credentials

pub mod authparams;
pub mod challenge;
pub mod credential;
pub mod digestauth;
pub mod hashalgorithm;
pub mod nonce;
