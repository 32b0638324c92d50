//! The relying-party client: session initiation, status polling and verified
//! status interpretation over an injected HTTP transport.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{Error, TransportError};
use crate::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::session::{Session, SessionHash, SessionKind};
use crate::status::{EndResult, SessionResult, SessionStatus, SessionStatusResponse};
use crate::x509::identity::{self, PersonalIdentity};
use crate::x509::{trust, verify, Certificate};

const SNIPPET_LEN: usize = 256;

/// Body of a session initiation request. Certificate choice sends the
/// relying-party identity only, so the hash fields are optional.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRequest<'a> {
    #[serde(rename = "relyingPartyUUID")]
    relying_party_uuid: &'a Uuid,
    relying_party_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash_type: Option<&'static str>,
}

/// Successful initiation reply.
#[derive(Debug, Deserialize)]
struct SessionReply {
    #[serde(rename = "sessionID")]
    session_id: Option<String>,
}

/// Structured diagnostic the service sends instead of a session.
#[derive(Debug, Deserialize)]
struct ErrorReply {
    code: u16,
    message: String,
}

/// Outcome of one verified status poll of an authentication or signing
/// session.
#[derive(Debug, Clone)]
pub enum ValidatedStatus {
    /// The user has not acted yet. Poll again.
    Running,
    /// The session ended without a signature. This is ordinary data, not an
    /// error; inspect the end result to learn why.
    Failed(SessionResult),
    /// The session succeeded and the returned proof checked out.
    Confirmed(ValidatedSession),
}

/// A successful session outcome after full verification: the certificate
/// parsed, its issuer is on the trust list, the signature verifies over the
/// session hash and the subject yields a complete identity.
#[derive(Debug, Clone)]
pub struct ValidatedSession {
    pub identity: PersonalIdentity,
    pub certificate: Certificate,
    pub document_number: Option<String>,
    pub certificate_level: Option<String>,
}

/// Outcome of one certificate choice status poll.
#[derive(Debug, Clone)]
pub enum CertificateChoiceStatus {
    Running,
    Failed(SessionResult),
    /// The user's signing certificate, trust-validated. This flow produces
    /// no signature to verify.
    Available {
        certificate: Certificate,
        document_number: Option<String>,
    },
}

/// Client for one relying party.
///
/// Cheap to share: every operation takes `&self` and performs a single
/// transport round trip, so any number of sessions may be driven
/// concurrently over one instance. Polling cadence belongs to the caller;
/// nothing here loops, sleeps or retries.
#[derive(Debug, Clone)]
pub struct SmartIdClient<H> {
    config: ClientConfig,
    http: H,
}

impl<H> SmartIdClient<H> {
    pub fn new(config: ClientConfig, http: H) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, tail: &str) -> String {
        format!("https://{}{}{}", self.config.hostname, self.config.api_path, tail)
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.config.authorize_token),
        )]
    }
}

impl<H: HttpClient> SmartIdClient<H> {
    /// Begin an authentication session for a national identity number.
    ///
    /// A fresh random session hash is generated here. Display the returned
    /// verification code to the user so they can match it against the code
    /// their device shows before confirming.
    pub async fn start_authentication(
        &self,
        identifier: &str,
        country: &str,
    ) -> Result<Session, Error> {
        let hash = SessionHash::generate();
        let id = self
            .start_session("authentication", identifier, country, Some(&hash))
            .await?;
        Ok(Session {
            id,
            verification_code: hash.verification_code(),
            hash,
            kind: SessionKind::Authentication,
        })
    }

    /// Begin a signing session over a caller-prepared document digest.
    ///
    /// The digest is sent and later verified as-is. Hash the document with
    /// [`SessionHash::digest`] first; passing raw document bytes through
    /// this parameter produces a signature over the wrong value.
    pub async fn start_signature(
        &self,
        identifier: &str,
        country: &str,
        digest: SessionHash,
    ) -> Result<Session, Error> {
        let id = self
            .start_session("signature", identifier, country, Some(&digest))
            .await?;
        Ok(Session {
            id,
            verification_code: digest.verification_code(),
            hash: digest,
            kind: SessionKind::Signature,
        })
    }

    /// Ask which signing certificate the user's account holds.
    ///
    /// No hash is sent and no verification code exists for this flow; the
    /// returned session id is polled with
    /// [`certificate_choice_status`](Self::certificate_choice_status).
    pub async fn start_certificate_choice(
        &self,
        identifier: &str,
        country: &str,
    ) -> Result<String, Error> {
        self.start_session("certificatechoice", identifier, country, None)
            .await
    }

    async fn start_session(
        &self,
        action: &str,
        identifier: &str,
        country: &str,
        hash: Option<&SessionHash>,
    ) -> Result<String, Error> {
        let body = serde_json::to_vec(&SessionRequest {
            relying_party_uuid: &self.config.relying_party_uuid,
            relying_party_name: &self.config.relying_party_name,
            hash: hash.map(SessionHash::to_base64),
            hash_type: hash.map(|_| "SHA256"),
        })
        .map_err(TransportError::Json)?;
        let url = self.endpoint(&format!("/{action}/pno/{country}/{identifier}"));
        tracing::debug!("initiating {action} session at {url}");
        let response = self
            .send(HttpRequest {
                url,
                method: HttpMethod::Post {
                    body,
                    content_type: "application/json".to_string(),
                },
                headers: self.auth_headers(),
            })
            .await?;
        decode_initiation(&response)
    }

    /// Poll a session once.
    ///
    /// `timeout` is forwarded as the service's advisory `timeoutMs` hint: it
    /// asks the remote to hold the request open for up to that long before
    /// answering `RUNNING`. It bounds that one remote call only; this method
    /// never loops.
    pub async fn session_status(
        &self,
        session_id: &str,
        timeout: Option<Duration>,
    ) -> Result<SessionStatus, Error> {
        let mut url = self.endpoint(&format!("/session/{session_id}"));
        if let Some(timeout) = timeout {
            url.push_str(&format!("?timeoutMs={}", timeout.as_millis()));
        }
        let response = self
            .send(HttpRequest {
                url,
                method: HttpMethod::Get,
                headers: self.auth_headers(),
            })
            .await?;
        if !success(response.status) {
            return Err(classify_failure(&response));
        }
        let reply: SessionStatusResponse =
            serde_json::from_slice(&response.body).map_err(TransportError::Json)?;
        Ok(SessionStatus::try_from(reply)?)
    }

    /// Poll an authentication session once and verify a successful outcome
    /// end to end before exposing the user's identity.
    pub async fn authentication_status(
        &self,
        session: &Session,
        timeout: Option<Duration>,
    ) -> Result<ValidatedStatus, Error> {
        self.verified_status(session, timeout).await
    }

    /// Poll a signing session once. A successful outcome is verified the
    /// same way as authentication, with the signature checked against the
    /// document digest the session was started with.
    pub async fn signature_status(
        &self,
        session: &Session,
        timeout: Option<Duration>,
    ) -> Result<ValidatedStatus, Error> {
        self.verified_status(session, timeout).await
    }

    async fn verified_status(
        &self,
        session: &Session,
        timeout: Option<Duration>,
    ) -> Result<ValidatedStatus, Error> {
        let result = match self.session_status(&session.id, timeout).await? {
            SessionStatus::Running => return Ok(ValidatedStatus::Running),
            SessionStatus::Complete(result) => result,
        };
        if result.end_result != EndResult::Ok {
            tracing::warn!("session {} ended with {}", session.id, result.end_result);
            return Ok(ValidatedStatus::Failed(result));
        }
        let certificate = self.trusted_certificate(&result)?;
        let signature = result
            .signature
            .as_ref()
            .ok_or(TransportError::MissingField("signature.value"))?
            .decode()
            .map_err(TransportError::Base64)?;
        verify::verify_signature(&certificate, &session.hash, &signature)?;
        let identity = identity::extract(&certificate)?;
        tracing::debug!(
            "session {} confirmed for document {:?}",
            session.id,
            result.document_number
        );
        Ok(ValidatedStatus::Confirmed(ValidatedSession {
            identity,
            certificate,
            document_number: result.document_number,
            certificate_level: result.certificate.and_then(|cert| cert.certificate_level),
        }))
    }

    /// Poll a certificate choice session once, trust-validating the
    /// certificate of a successful outcome.
    pub async fn certificate_choice_status(
        &self,
        session_id: &str,
        timeout: Option<Duration>,
    ) -> Result<CertificateChoiceStatus, Error> {
        let result = match self.session_status(session_id, timeout).await? {
            SessionStatus::Running => return Ok(CertificateChoiceStatus::Running),
            SessionStatus::Complete(result) => result,
        };
        if result.end_result != EndResult::Ok {
            return Ok(CertificateChoiceStatus::Failed(result));
        }
        let certificate = self.trusted_certificate(&result)?;
        Ok(CertificateChoiceStatus::Available {
            certificate,
            document_number: result.document_number,
        })
    }

    /// Decode the certificate payload of a successful outcome and validate
    /// it against the configured issuer allow-list.
    fn trusted_certificate(&self, result: &SessionResult) -> Result<Certificate, Error> {
        let payload = result
            .certificate
            .as_ref()
            .ok_or(TransportError::MissingField("cert.value"))?;
        let certificate = Certificate::from_base64(&payload.value)?;
        trust::validate(&certificate, &self.config.trusted_issuers)?;
        Ok(certificate)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let response = self
            .http
            .request(request)
            .await
            .map_err(|e| TransportError::Http(Box::new(e)))?;
        Ok(response)
    }
}

/// Interpret an initiation reply. The service answers either
/// `{"sessionID": ...}` or a `{"code", "message"}` diagnostic; the latter is
/// surfaced verbatim whatever the HTTP status was.
fn decode_initiation(response: &HttpResponse) -> Result<String, Error> {
    if let Ok(ErrorReply { code, message }) = serde_json::from_slice(&response.body) {
        return Err(Error::Protocol { code, message });
    }
    if !success(response.status) {
        return Err(failure_from_status(response));
    }
    let reply: SessionReply =
        serde_json::from_slice(&response.body).map_err(TransportError::Json)?;
    reply
        .session_id
        .ok_or_else(|| TransportError::MissingField("sessionID").into())
}

/// Turn a non-2xx reply into an error, preferring the service's structured
/// diagnostic when the body carries one.
fn classify_failure(response: &HttpResponse) -> Error {
    match serde_json::from_slice::<ErrorReply>(&response.body) {
        Ok(ErrorReply { code, message }) => Error::Protocol { code, message },
        Err(_) => failure_from_status(response),
    }
}

fn failure_from_status(response: &HttpResponse) -> Error {
    Error::Protocol {
        code: response.status,
        message: body_snippet(&response.body),
    }
}

fn success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn body_snippet(body: &[u8]) -> String {
    let end = body.len().min(SNIPPET_LEN);
    String::from_utf8_lossy(&body[..end]).into_owned()
}
