//! Personal identity extraction from a validated certificate subject.

use serde::{Deserialize, Serialize};

use super::attributes::DnAttribute;
use super::Certificate;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("certificate subject is missing the {0} attribute")]
    MissingAttribute(&'static str),
    #[error("certificate subject carries no usable personal identifier")]
    NoIdentifier,
}

/// The person a certificate was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalIdentity {
    pub first_name: String,
    pub last_name: String,
    pub personal_identifier: String,
    pub country: String,
}

/// Extract the personal identity from the certificate subject.
///
/// The personal identifier is the DeviceSerialNumber attribute when present.
/// Older certificate profiles lack it; for those the CommonName is split on
/// `,` and the first component differing from both the given name and the
/// surname is taken. Extraction is all or nothing: a subject from which any
/// field cannot be determined yields an error, never a partial record.
pub fn extract(certificate: &Certificate) -> Result<PersonalIdentity, Error> {
    let subject = &certificate.subject;
    let first_name = subject
        .get(DnAttribute::GivenName)
        .ok_or(Error::MissingAttribute("GivenName"))?;
    let last_name = subject
        .get(DnAttribute::Surname)
        .ok_or(Error::MissingAttribute("SurName"))?;
    let country = subject
        .get(DnAttribute::Country)
        .ok_or(Error::MissingAttribute("Country"))?;

    let personal_identifier = match subject.get(DnAttribute::DeviceSerialNumber) {
        Some(serial) => serial.to_string(),
        None => subject
            .get(DnAttribute::CommonName)
            .ok_or(Error::NoIdentifier)?
            .split(',')
            .find(|part| *part != first_name && *part != last_name)
            .ok_or(Error::NoIdentifier)?
            .to_string(),
    };

    Ok(PersonalIdentity {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        personal_identifier,
        country: country.to_string(),
    })
}
