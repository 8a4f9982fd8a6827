use thiserror::Error;

/// Errors returned when a digest operation is called with an inconsistent
/// set of arguments.
///
/// Untrusted header input never produces one of these: parsers report
/// malformed headers as `None`. A `DigestError` always points at a bug in
/// the calling code.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DigestError {
    #[error("Digest challenge header could not be parsed: {0}")]
    InvalidChallenge(String),
    #[error("Missing required digest parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),
}

impl DigestError {
    /// Name of the parameter that was missing, if that is the failure.
    pub fn missing_parameter(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameter(name) => Some(name),
            _ => None,
        }
    }
}
