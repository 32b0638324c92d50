//! Relying-party configuration, supplied once before any session call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::x509::trust::TrustedIssuer;

/// Immutable client configuration.
///
/// The serde keys match the option names the service documentation uses, so
/// a configuration file can be deserialized straight into this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// UUID identifying the relying party towards the service.
    #[serde(rename = "relyingPartyUUID")]
    pub relying_party_uuid: Uuid,
    /// Name shown on the end user's device while a session is pending.
    pub relying_party_name: String,
    /// Bearer token for the Authorization header.
    pub authorize_token: String,
    /// Service host, optionally with a port (`host` or `host:port`).
    /// HTTPS is assumed.
    pub hostname: String,
    /// API base path, e.g. `/smart-id-rp/v1`.
    pub api_path: String,
    /// Issuer allow-list for certificate trust validation.
    #[serde(rename = "issuers", default)]
    pub trusted_issuers: Vec<TrustedIssuer>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserializes_documented_option_names() {
        let config: ClientConfig = serde_json::from_str(
            r#"{
                "relyingPartyUUID": "00000000-0000-0000-0000-000000000000",
                "relyingPartyName": "DEMO",
                "authorizeToken": "token",
                "hostname": "sid.demo.sk.ee",
                "apiPath": "/smart-id-rp/v1",
                "issuers": [
                    {"C": "EE", "O": "AS Sertifitseerimiskeskus", "OID": "NTREE-10747013", "CN": "TEST of EID-SK 2016"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.relying_party_uuid, Uuid::nil());
        assert_eq!(config.relying_party_name, "DEMO");
        assert_eq!(config.hostname, "sid.demo.sk.ee");
        assert_eq!(config.trusted_issuers.len(), 1);
        assert_eq!(
            config.trusted_issuers[0].0.get("CN").map(String::as_str),
            Some("TEST of EID-SK 2016")
        );
    }

    #[test]
    fn issuer_list_defaults_to_empty() {
        let config: ClientConfig = serde_json::from_str(
            r#"{
                "relyingPartyUUID": "00000000-0000-0000-0000-000000000000",
                "relyingPartyName": "DEMO",
                "authorizeToken": "token",
                "hostname": "sid.demo.sk.ee",
                "apiPath": "/smart-id-rp/v1"
            }"#,
        )
        .unwrap();
        assert!(config.trusted_issuers.is_empty());
    }
}
