//! Base types and error handling.
//!
//! - [`DigestError`](autherror::DigestError): misuse errors from the builder operations

pub mod autherror;
