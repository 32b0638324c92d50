//! X.509 certificate handling: parsing, issuer trust validation, signature
//! verification and identity extraction.

pub mod attributes;
pub mod identity;
pub mod trust;
pub mod verify;

use const_oid::ObjectIdentifier;
use der::{
    asn1::{Ia5StringRef, PrintableStringRef, TeletexStringRef, Utf8StringRef},
    Decode, Tag, Tagged,
};
use rsa::BigUint;
use time::OffsetDateTime;
use x509_cert::attr::AttributeValue;
use x509_cert::name::Name;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::Time;

use attributes::{AttributeKey, DistinguishedName, DnAttribute};

const OID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const OID_RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to decode base64 certificate value: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unable to parse certificate from PEM encoding: {0}")]
    Pem(#[from] pem_rfc7468::Error),
    #[error("unable to parse certificate from DER encoding: {0}")]
    Der(#[from] der::Error),
    #[error("undecodable value for attribute {0}")]
    UndecodableAttribute(String),
    #[error("unsupported public key algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("EC public key is not an uncompressed SEC1 point")]
    MalformedPoint,
}

/// Raw coordinates of an uncompressed elliptic-curve public point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPoint {
    pub x: Vec<u8>,
    pub y: Vec<u8>,
}

/// RSA public key components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaComponents {
    pub modulus: BigUint,
    pub exponent: BigUint,
}

/// Certificate public key, tagged by algorithm family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectPublicKey {
    Ec(EcPoint),
    Rsa(RsaComponents),
}

/// Parsed end-user certificate with the DER representation held alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
    pub subject: DistinguishedName,
    pub issuer: DistinguishedName,
    pub public_key: SubjectPublicKey,
    der: Vec<u8>,
}

impl Certificate {
    /// Parse from the base64 form delivered in session status payloads.
    pub fn from_base64(value: &str) -> Result<Self, Error> {
        let der = base64::decode(value)?;
        Self::from_der(&der)
    }

    pub fn from_pem(bytes: &[u8]) -> Result<Self, Error> {
        let der = pem_rfc7468::decode_vec(bytes)?.1;
        Self::from_der(&der)
    }

    pub fn from_der(bytes: &[u8]) -> Result<Self, Error> {
        let cert = x509_cert::Certificate::from_der(bytes)?;
        let validity = cert.tbs_certificate.validity;
        Ok(Self {
            not_before: instant(validity.not_before),
            not_after: instant(validity.not_after),
            subject: distinguished_name(&cert.tbs_certificate.subject)?,
            issuer: distinguished_name(&cert.tbs_certificate.issuer)?,
            public_key: subject_public_key(&cert.tbs_certificate.subject_public_key_info)?,
            der: bytes.to_vec(),
        })
    }

    /// The DER bytes this certificate was parsed from.
    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

fn instant(time: Time) -> OffsetDateTime {
    OffsetDateTime::from(time.to_system_time())
}

fn distinguished_name(name: &Name) -> Result<DistinguishedName, Error> {
    let mut entries = Vec::new();
    for attribute in name.0.iter().flat_map(|rdn| rdn.0.iter()) {
        let key = match DnAttribute::from_oid(&attribute.oid) {
            Some(known) => AttributeKey::Known(known),
            None => AttributeKey::Unrecognized(attribute.oid.to_string()),
        };
        let value = attribute_value_to_str(&attribute.value)
            .ok_or_else(|| Error::UndecodableAttribute(attribute.oid.to_string()))?;
        entries.push((key, value.to_string()));
    }
    Ok(entries.into())
}

fn attribute_value_to_str(value: &AttributeValue) -> Option<&str> {
    match value.tag() {
        Tag::PrintableString => PrintableStringRef::try_from(value).ok().map(|s| s.as_str()),
        Tag::Utf8String => Utf8StringRef::try_from(value).ok().map(|s| s.as_str()),
        Tag::Ia5String => Ia5StringRef::try_from(value).ok().map(|s| s.as_str()),
        Tag::TeletexString => TeletexStringRef::try_from(value).ok().map(|s| s.as_str()),
        _ => None,
    }
}

fn subject_public_key(spki: &SubjectPublicKeyInfoOwned) -> Result<SubjectPublicKey, Error> {
    let key_bytes = spki.subject_public_key.raw_bytes();
    if spki.algorithm.oid == OID_EC_PUBLIC_KEY {
        // Uncompressed SEC1 point: 0x04 tag, then x and y of equal length.
        match key_bytes.split_first() {
            Some((&0x04, coordinates))
                if !coordinates.is_empty() && coordinates.len() % 2 == 0 =>
            {
                let (x, y) = coordinates.split_at(coordinates.len() / 2);
                Ok(SubjectPublicKey::Ec(EcPoint {
                    x: x.to_vec(),
                    y: y.to_vec(),
                }))
            }
            _ => Err(Error::MalformedPoint),
        }
    } else if spki.algorithm.oid == OID_RSA_ENCRYPTION {
        let components = pkcs1::RsaPublicKey::from_der(key_bytes)?;
        Ok(SubjectPublicKey::Rsa(RsaComponents {
            modulus: BigUint::from_bytes_be(components.modulus.as_bytes()),
            exponent: BigUint::from_bytes_be(components.public_exponent.as_bytes()),
        }))
    } else {
        Err(Error::UnsupportedAlgorithm(spki.algorithm.oid.to_string()))
    }
}
