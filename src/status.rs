//! Session status polling model.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use crate::error::TransportError;

/// Wire shape of the session status endpoint reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionStatusResponse {
    pub state: String,
    pub result: Option<ResultPayload>,
    pub cert: Option<CertificatePayload>,
    pub signature: Option<SignaturePayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResultPayload {
    pub end_result: EndResult,
    pub document_number: Option<String>,
}

/// Terminal outcome vocabulary. Unrecognized values are passed through
/// verbatim, never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EndResult {
    Ok,
    UserRefused,
    Timeout,
    DocumentUnusable,
    WrongVc,
    #[strum(default)]
    Other(String),
}

impl From<String> for EndResult {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(EndResult::Other(value))
    }
}

impl From<EndResult> for String {
    fn from(value: EndResult) -> Self {
        value.to_string()
    }
}

impl fmt::Display for EndResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndResult::Ok => f.write_str("OK"),
            EndResult::UserRefused => f.write_str("USER_REFUSED"),
            EndResult::Timeout => f.write_str("TIMEOUT"),
            EndResult::DocumentUnusable => f.write_str("DOCUMENT_UNUSABLE"),
            EndResult::WrongVc => f.write_str("WRONG_VC"),
            EndResult::Other(other) => f.write_str(other),
        }
    }
}

/// Certificate payload of a completed session: the base64 DER value plus the
/// level the remote attests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePayload {
    pub value: String,
    pub certificate_level: Option<String>,
}

/// Signature payload of a completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignaturePayload {
    pub value: String,
    pub algorithm: Option<String>,
}

impl SignaturePayload {
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::decode(&self.value)
    }
}

/// One status poll: either the session is still pending, or it reached a
/// terminal outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionStatus {
    Running,
    Complete(SessionResult),
}

/// Terminal session outcome with the payloads the remote delivered for it.
/// Only a successful outcome carries certificate and signature material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    pub end_result: EndResult,
    pub document_number: Option<String>,
    pub certificate: Option<CertificatePayload>,
    pub signature: Option<SignaturePayload>,
}

impl TryFrom<SessionStatusResponse> for SessionStatus {
    type Error = TransportError;

    fn try_from(response: SessionStatusResponse) -> Result<Self, TransportError> {
        if response.state == "RUNNING" {
            return Ok(SessionStatus::Running);
        }
        if response.state != "COMPLETE" {
            return Err(TransportError::UnrecognizedState(response.state));
        }
        let result = response
            .result
            .ok_or(TransportError::MissingField("result.endResult"))?;
        Ok(SessionStatus::Complete(SessionResult {
            end_result: result.end_result,
            document_number: result.document_number,
            certificate: response.cert,
            signature: response.signature,
        }))
    }
}
