//! Error types shared across the client.

use crate::x509;
use crate::x509::identity;
use crate::x509::trust;
use crate::x509::verify;

/// Top-level error for every client operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a usable reply.
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    /// The service refused the request with a structured error reply.
    #[error("remote service replied with {code}: {message}")]
    Protocol { code: u16, message: String },
    /// The certificate returned by the service could not be parsed.
    #[error("certificate: {0}")]
    Certificate(#[from] x509::Error),
    /// The certificate parsed but failed trust validation.
    #[error("untrusted certificate: {0}")]
    UntrustedCertificate(#[from] trust::Error),
    /// The signature did not verify against the session hash.
    #[error("{0}")]
    InvalidSignature(#[from] verify::Error),
    /// The certificate is missing attributes required for identity
    /// extraction.
    #[error("incomplete certificate: {0}")]
    IncompleteCertificate(#[from] identity::Error),
}

/// Failures between issuing a request and decoding a well-formed reply.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("malformed reply: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reply is missing required field {0}")]
    MissingField(&'static str),
    #[error("reply field is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unrecognized session state {0:?}")]
    UnrecognizedState(String),
}
