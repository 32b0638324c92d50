//! Subject and issuer attribute naming.
//!
//! Certificates issued for this service key their subject and issuer fields
//! by a small, fixed set of attribute OIDs. The table below maps each OID to
//! the short and long names the rest of the crate (and relying-party trust
//! configuration) uses.

use std::collections::BTreeMap;

use const_oid::ObjectIdentifier;
use serde::{Deserialize, Serialize};

const OID_COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
const OID_SURNAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.4");
const OID_SERIAL_NUMBER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.5");
const OID_COUNTRY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const OID_LOCALITY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
const OID_STATE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
const OID_STREET_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.9");
const OID_ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const OID_ORGANIZATION_UNIT: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");
const OID_TITLE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.12");
const OID_GIVEN_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.42");
const OID_INITIALS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.43");
const OID_ORGANIZATION_IDENTIFIER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.97");
const OID_EMAIL: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.1");
const OID_UNSTRUCTURED_NAME: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.2");
const OID_UNSTRUCTURED_ADDRESS: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.8");
const OID_DOMAIN_COMPONENT: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("0.9.2342.19200300.100.1.25");

/// Distinguished-name attributes this crate recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DnAttribute {
    CommonName,
    Surname,
    DeviceSerialNumber,
    Country,
    Locality,
    State,
    StreetAddress,
    Organization,
    OrganizationUnit,
    Title,
    GivenName,
    Initials,
    OrganizationIdentifier,
    Email,
    UnstructuredName,
    UnstructuredAddress,
    DomainComponent,
}

impl DnAttribute {
    pub const ALL: [DnAttribute; 17] = [
        DnAttribute::CommonName,
        DnAttribute::Surname,
        DnAttribute::DeviceSerialNumber,
        DnAttribute::Country,
        DnAttribute::Locality,
        DnAttribute::State,
        DnAttribute::StreetAddress,
        DnAttribute::Organization,
        DnAttribute::OrganizationUnit,
        DnAttribute::Title,
        DnAttribute::GivenName,
        DnAttribute::Initials,
        DnAttribute::OrganizationIdentifier,
        DnAttribute::Email,
        DnAttribute::UnstructuredName,
        DnAttribute::UnstructuredAddress,
        DnAttribute::DomainComponent,
    ];

    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.oid() == *oid)
    }

    pub const fn oid(self) -> ObjectIdentifier {
        match self {
            DnAttribute::CommonName => OID_COMMON_NAME,
            DnAttribute::Surname => OID_SURNAME,
            DnAttribute::DeviceSerialNumber => OID_SERIAL_NUMBER,
            DnAttribute::Country => OID_COUNTRY,
            DnAttribute::Locality => OID_LOCALITY,
            DnAttribute::State => OID_STATE,
            DnAttribute::StreetAddress => OID_STREET_ADDRESS,
            DnAttribute::Organization => OID_ORGANIZATION,
            DnAttribute::OrganizationUnit => OID_ORGANIZATION_UNIT,
            DnAttribute::Title => OID_TITLE,
            DnAttribute::GivenName => OID_GIVEN_NAME,
            DnAttribute::Initials => OID_INITIALS,
            DnAttribute::OrganizationIdentifier => OID_ORGANIZATION_IDENTIFIER,
            DnAttribute::Email => OID_EMAIL,
            DnAttribute::UnstructuredName => OID_UNSTRUCTURED_NAME,
            DnAttribute::UnstructuredAddress => OID_UNSTRUCTURED_ADDRESS,
            DnAttribute::DomainComponent => OID_DOMAIN_COMPONENT,
        }
    }

    pub const fn long_name(self) -> &'static str {
        match self {
            DnAttribute::CommonName => "CommonName",
            DnAttribute::Surname => "SurName",
            DnAttribute::DeviceSerialNumber => "DeviceSerialNumber",
            DnAttribute::Country => "Country",
            DnAttribute::Locality => "Locality",
            DnAttribute::State => "State",
            DnAttribute::StreetAddress => "StreetAddress",
            DnAttribute::Organization => "Organization",
            DnAttribute::OrganizationUnit => "OrganizationUnit",
            DnAttribute::Title => "Title",
            DnAttribute::GivenName => "GivenName",
            DnAttribute::Initials => "Initials",
            DnAttribute::OrganizationIdentifier => "OrganizationIdentifier",
            DnAttribute::Email => "EMail",
            DnAttribute::UnstructuredName => "UnstructuredName",
            DnAttribute::UnstructuredAddress => "UnstructuredAddress",
            DnAttribute::DomainComponent => "DomainComponent",
        }
    }

    /// Short name, for the attributes that have one.
    pub const fn short_name(self) -> Option<&'static str> {
        match self {
            DnAttribute::CommonName => Some("CN"),
            DnAttribute::Surname => Some("SN"),
            DnAttribute::DeviceSerialNumber => None,
            DnAttribute::Country => Some("C"),
            DnAttribute::Locality => Some("L"),
            DnAttribute::State => Some("ST"),
            DnAttribute::StreetAddress => Some("Street"),
            DnAttribute::Organization => Some("O"),
            DnAttribute::OrganizationUnit => Some("OU"),
            DnAttribute::Title => Some("T"),
            DnAttribute::GivenName => Some("G"),
            DnAttribute::Initials => Some("I"),
            DnAttribute::OrganizationIdentifier => Some("OID"),
            DnAttribute::Email => Some("E"),
            DnAttribute::UnstructuredName => None,
            DnAttribute::UnstructuredAddress => None,
            DnAttribute::DomainComponent => Some("DC"),
        }
    }

    /// The name trust records key this attribute by: the short name where one
    /// is defined, the long name otherwise.
    pub const fn name(self) -> &'static str {
        match self.short_name() {
            Some(short) => short,
            None => self.long_name(),
        }
    }
}

/// Key of one subject or issuer attribute. Unrecognized OIDs are retained
/// under their dotted string so no attribute is silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKey {
    Known(DnAttribute),
    Unrecognized(String),
}

impl AttributeKey {
    pub fn name(&self) -> &str {
        match self {
            AttributeKey::Known(attr) => attr.name(),
            AttributeKey::Unrecognized(oid) => oid,
        }
    }
}

impl From<DnAttribute> for AttributeKey {
    fn from(attr: DnAttribute) -> Self {
        AttributeKey::Known(attr)
    }
}

/// Ordered subject or issuer attribute list, preserving certificate order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinguishedName(Vec<(AttributeKey, String)>);

impl DistinguishedName {
    /// First value carried for the given attribute, if any.
    pub fn get(&self, attr: DnAttribute) -> Option<&str> {
        self.0.iter().find_map(|(key, value)| match key {
            AttributeKey::Known(known) if *known == attr => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &(AttributeKey, String)> {
        self.0.iter()
    }

    /// Attribute map keyed by short-or-long name, as used for trust-record
    /// comparison. Later duplicates overwrite earlier ones.
    pub fn short_name_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(key, value)| (key.name().to_string(), value.clone()))
            .collect()
    }
}

impl From<Vec<(AttributeKey, String)>> for DistinguishedName {
    fn from(entries: Vec<(AttributeKey, String)>) -> Self {
        Self(entries)
    }
}
