//! Issuer trust validation against the configured allow-list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Certificate;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("certificate is not active at {now} (valid from {not_before} until {not_after})")]
    NotActive {
        now: OffsetDateTime,
        not_before: OffsetDateTime,
        not_after: OffsetDateTime,
    },
    #[error("certificate issuer does not match any trusted issuer")]
    UnrecognizedIssuer,
}

/// One accepted issuer: the exact attribute set, keyed by short-or-long
/// attribute name, that a certificate issuer must carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustedIssuer(pub BTreeMap<String, String>);

impl From<BTreeMap<String, String>> for TrustedIssuer {
    fn from(attributes: BTreeMap<String, String>) -> Self {
        Self(attributes)
    }
}

/// Validate the certificate against the current instant and the issuer
/// allow-list.
pub fn validate(certificate: &Certificate, issuers: &[TrustedIssuer]) -> Result<(), Error> {
    validate_at(certificate, issuers, OffsetDateTime::now_utc())
}

/// `validate` with an injectable instant.
///
/// The validity interval is open on both ends: a certificate is rejected at
/// exactly `not_before` and exactly `not_after`. An inactive certificate
/// never reaches issuer comparison.
pub fn validate_at(
    certificate: &Certificate,
    issuers: &[TrustedIssuer],
    now: OffsetDateTime,
) -> Result<(), Error> {
    if now <= certificate.not_before || now >= certificate.not_after {
        return Err(Error::NotActive {
            now,
            not_before: certificate.not_before,
            not_after: certificate.not_after,
        });
    }

    let issuer = certificate.issuer.short_name_map();
    if issuers.iter().any(|trusted| trusted.0 == issuer) {
        Ok(())
    } else {
        Err(Error::UnrecognizedIssuer)
    }
}
