//! Session material: the session hash and the verification code derived
//! from it.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of the random seed hashed into an authentication session hash.
const SEED_LEN: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("session hash must be 32 bytes, received {0}")]
    InvalidLength(usize),
    #[error("session hash is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// SHA-256 digest bound to one authentication or signing session.
///
/// The same byte value is used for the outbound base64 hash, for
/// verification-code derivation and as the signed digest during signature
/// verification. Serializes as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionHash([u8; 32]);

impl SessionHash {
    /// Generate a fresh session hash from 20 bytes of OS randomness.
    pub fn generate() -> Self {
        let mut seed = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut seed);
        Self::digest(seed)
    }

    /// Hash caller-supplied content, e.g. a document to be signed.
    pub fn digest(data: impl AsRef<[u8]>) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Wrap an already-computed 32-byte digest.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, Error> {
        let bytes = hex::decode(hex_str)?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The base64 form sent in session initiation requests.
    pub fn to_base64(&self) -> String {
        base64::encode(self.0)
    }

    pub fn verification_code(&self) -> VerificationCode {
        VerificationCode::derive(self)
    }
}

impl AsRef<[u8]> for SessionHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<String> for SessionHash {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Error> {
        Self::from_hex(&value)
    }
}

impl From<SessionHash> for String {
    fn from(hash: SessionHash) -> String {
        hash.to_hex()
    }
}

/// Four-digit decimal code shown to the end user so they can confirm that
/// both ends display the same session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Last two bytes of `SHA256(hash)` as a big-endian integer, reduced
    /// modulo 10000 and left-padded with zeroes to four digits.
    pub fn derive(hash: &SessionHash) -> Self {
        let digest = Sha256::digest(hash.as_bytes());
        let tail = u16::from_be_bytes([digest[30], digest[31]]);
        Self(format!("{:04}", tail % 10000))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    Authentication,
    Signature,
}

/// An initiated session, as returned by the session initiation operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session id assigned by the remote service.
    pub id: String,
    pub hash: SessionHash,
    pub verification_code: VerificationCode,
    pub kind: SessionKind,
}
