#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hex_literal::hex;
use rsa::pkcs8::DecodePrivateKey;
use serde_json::{json, Value};
use signature::hazmat::PrehashSigner;

use smartid::{ClientConfig, HttpClient, HttpMethod, HttpRequest, HttpResponse};

pub const SESSION_ID: &str = "de305d54-75b4-431b-adb2-eb6b9e546014";
pub const DOCUMENT_NUMBER: &str = "PNOEE-10101010005-MOCK-Q";

const SHA256_DIGEST_INFO: [u8; 19] = hex!("3031300d060960864801650304020105000420");

pub type Signer = Box<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>;

/// How the scripted service concludes the session.
#[derive(Clone, Copy)]
enum Outcome {
    Confirmed,
    TamperedSignature,
    Refused,
}

struct Inner {
    cert_base64: String,
    signer: Option<Signer>,
    algorithm: &'static str,
    outcome: Outcome,
    reject: Option<(u16, String)>,
    hash: Mutex<Option<Vec<u8>>>,
    polls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

/// In-memory Smart-ID service scripted for a single session.
///
/// Initiation checks the bearer token and the request body, then hands out
/// [`SESSION_ID`]. The first status poll answers `RUNNING`; every later poll
/// answers the scripted outcome, signing whatever hash the initiation
/// request carried, like the user's device would.
#[derive(Clone)]
pub struct FakeSmartId(Arc<Inner>);

impl FakeSmartId {
    fn scripted(
        outcome: Outcome,
        cert_base64: String,
        signer: Option<Signer>,
        algorithm: &'static str,
        reject: Option<(u16, String)>,
    ) -> Self {
        Self(Arc::new(Inner {
            cert_base64,
            signer,
            algorithm,
            outcome,
            reject,
            hash: Mutex::new(None),
            polls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }))
    }

    /// The user confirms; the session completes with a valid signature.
    pub fn confirming(cert_base64: String, algorithm: &'static str, signer: Signer) -> Self {
        Self::scripted(Outcome::Confirmed, cert_base64, Some(signer), algorithm, None)
    }

    /// The session completes but a bit of the signature has been flipped.
    pub fn tampering(cert_base64: String, algorithm: &'static str, signer: Signer) -> Self {
        Self::scripted(
            Outcome::TamperedSignature,
            cert_base64,
            Some(signer),
            algorithm,
            None,
        )
    }

    /// The user refuses; the session completes without payloads.
    pub fn refusing() -> Self {
        Self::scripted(Outcome::Refused, String::new(), None, "", None)
    }

    /// Certificate choice: completes with a certificate and no signature.
    pub fn choosing(cert_base64: String) -> Self {
        Self::scripted(Outcome::Confirmed, cert_base64, None, "", None)
    }

    /// Initiation is rejected with the given status and body.
    pub fn rejecting(status: u16, body: &str) -> Self {
        Self::scripted(
            Outcome::Refused,
            String::new(),
            None,
            "",
            Some((status, body.to_string())),
        )
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.0.requests.lock().unwrap().clone()
    }

    fn check_authorization(request: &HttpRequest) {
        assert!(
            request
                .headers
                .iter()
                .any(|(name, value)| name == "Authorization" && value == "Bearer token"),
            "request carries no bearer token: {:?}",
            request.headers
        );
    }

    fn initiate(&self, request: &HttpRequest) -> HttpResponse {
        Self::check_authorization(request);
        let HttpMethod::Post { body, content_type } = &request.method else {
            panic!("initiation must be a POST");
        };
        assert_eq!(content_type, "application/json");
        let body: Value = serde_json::from_slice(body).unwrap();
        assert_eq!(
            body["relyingPartyUUID"],
            "00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(body["relyingPartyName"], "DEMO");
        if let Some(hash) = body.get("hash") {
            assert_eq!(body["hashType"], "SHA256");
            let hash = base64::decode(hash.as_str().unwrap()).unwrap();
            *self.0.hash.lock().unwrap() = Some(hash);
        } else {
            assert!(
                body.get("hashType").is_none(),
                "hashType must be omitted together with hash"
            );
        }
        if let Some((status, reply)) = &self.0.reject {
            return HttpResponse {
                status: *status,
                body: reply.clone().into_bytes(),
            };
        }
        HttpResponse {
            status: 200,
            body: json!({ "sessionID": SESSION_ID }).to_string().into_bytes(),
        }
    }

    fn poll(&self, request: &HttpRequest) -> HttpResponse {
        Self::check_authorization(request);
        if self.0.polls.fetch_add(1, Ordering::SeqCst) == 0 {
            return HttpResponse {
                status: 200,
                body: json!({ "state": "RUNNING" }).to_string().into_bytes(),
            };
        }
        let body = match self.0.outcome {
            Outcome::Refused => json!({
                "state": "COMPLETE",
                "result": { "endResult": "USER_REFUSED" }
            }),
            Outcome::Confirmed | Outcome::TamperedSignature => {
                let mut reply = json!({
                    "state": "COMPLETE",
                    "result": {
                        "endResult": "OK",
                        "documentNumber": DOCUMENT_NUMBER
                    },
                    "cert": {
                        "value": self.0.cert_base64.clone(),
                        "certificateLevel": "QUALIFIED"
                    }
                });
                if let Some(hash) = self.0.hash.lock().unwrap().as_deref() {
                    let signer = self
                        .0
                        .signer
                        .as_ref()
                        .expect("a hash was submitted but no signer is scripted");
                    let mut signature = signer(hash);
                    if matches!(self.0.outcome, Outcome::TamperedSignature) {
                        signature[7] ^= 0x01;
                    }
                    reply["signature"] = json!({
                        "value": base64::encode(&signature),
                        "algorithm": self.0.algorithm
                    });
                }
                reply
            }
        };
        HttpResponse {
            status: 200,
            body: body.to_string().into_bytes(),
        }
    }
}

#[async_trait]
impl HttpClient for FakeSmartId {
    type Error = Infallible;

    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, Infallible> {
        self.0.requests.lock().unwrap().push(request.url.clone());
        Ok(match request.method {
            HttpMethod::Post { .. } => self.initiate(&request),
            HttpMethod::Get => self.poll(&request),
        })
    }
}

/// Demo-environment configuration whose trusted issuer record matches the
/// authority the fixture certificates under `test/` are issued by.
pub fn demo_config() -> ClientConfig {
    serde_json::from_str(
        r#"{
            "relyingPartyUUID": "00000000-0000-0000-0000-000000000000",
            "relyingPartyName": "DEMO",
            "authorizeToken": "token",
            "hostname": "sid.demo.sk.ee",
            "apiPath": "/smart-id-rp/v1",
            "issuers": [
                {
                    "C": "EE",
                    "O": "AS Sertifitseerimiskeskus",
                    "OID": "NTREE-10747013",
                    "CN": "TEST of EID-SK 2016"
                }
            ]
        }"#,
    )
    .unwrap()
}

pub fn auth_cert_base64() -> String {
    cert_base64(include_str!("../test/auth-cert.pem"))
}

pub fn sign_cert_base64() -> String {
    cert_base64(include_str!("../test/sign-cert.pem"))
}

fn cert_base64(pem: &str) -> String {
    base64::encode(pem_rfc7468::decode_vec(pem.as_bytes()).unwrap().1)
}

/// Signer over the EC fixture key, producing the raw `r ‖ s` form the
/// service delivers.
pub fn ec_signer() -> Signer {
    let key: p256::ecdsa::SigningKey = p256::SecretKey::from_sec1_pem(include_str!(
        "../test/auth-key.pem"
    ))
    .unwrap()
    .into();
    Box::new(move |hash| {
        let signature: p256::ecdsa::Signature = key.sign_prehash(hash).unwrap();
        signature.to_bytes().as_slice().to_vec()
    })
}

/// Signer over the RSA fixture key, PKCS#1 v1.5 with a SHA-256 DigestInfo.
pub fn rsa_signer() -> Signer {
    let key = rsa::RsaPrivateKey::from_pkcs8_pem(include_str!("../test/sign-key.pem")).unwrap();
    Box::new(move |hash| {
        let mut message = SHA256_DIGEST_INFO.to_vec();
        message.extend_from_slice(hash);
        key.sign(rsa::Pkcs1v15Sign::new_unprefixed(), &message)
            .unwrap()
    })
}
