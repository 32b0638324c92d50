//! Relying-party client for the Smart-ID digital identity service.
//!
//! Smart-ID lets a person authenticate or sign a document with a key held on
//! their personal device. The relying party starts a session for a national
//! identity number, displays the 4-digit verification code, and polls until
//! the user confirms or declines on the device. A successful outcome carries
//! the user's certificate and a signature over the session hash; nothing in
//! it may be trusted until the certificate has been parsed, its issuer
//! matched against the configured allow-list, the signature verified and the
//! personal identity extracted. [`SmartIdClient::authentication_status`] and
//! [`SmartIdClient::signature_status`] run that chain in one call.
//!
//! Transport is abstracted behind the [`HttpClient`] trait so embedders can
//! bring their own stack; a [`ReqwestClient`] implementation ships behind the
//! default `reqwest` feature. The client never loops, sleeps or retries:
//! every operation is a single round trip and polling cadence stays with the
//! caller.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
#[cfg(feature = "reqwest")]
pub mod reqwest_client;
pub mod session;
pub mod status;
pub mod x509;

pub use client::{CertificateChoiceStatus, SmartIdClient, ValidatedSession, ValidatedStatus};
pub use config::ClientConfig;
pub use error::{Error, TransportError};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
pub use session::{Session, SessionHash, SessionKind, VerificationCode};
pub use status::{CertificatePayload, EndResult, SessionResult, SessionStatus, SignaturePayload};
pub use x509::identity::PersonalIdentity;
pub use x509::trust::TrustedIssuer;
pub use x509::Certificate;
