//! Signature verification over the session hash.

use elliptic_curve::generic_array::GenericArray;
use p256::ecdsa::{Signature, VerifyingKey};
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use signature::hazmat::PrehashVerifier;

use super::{Certificate, EcPoint, RsaComponents, SubjectPublicKey};
use crate::session::SessionHash;

/// ASN.1 DigestInfo prefix for SHA-256 in PKCS#1 v1.5 signatures.
const SHA256_DIGEST_INFO: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];

/// Uniform verification failure. Deliberately carries no detail about which
/// internal check failed.
#[derive(Debug, thiserror::Error)]
#[error("invalid signature")]
pub struct Error;

/// Verify `signature` over the session hash with the certificate's public
/// key, dispatched by key family.
pub fn verify_signature(
    certificate: &Certificate,
    hash: &SessionHash,
    signature: &[u8],
) -> Result<(), Error> {
    match &certificate.public_key {
        SubjectPublicKey::Ec(point) => verify_ec(point, hash, signature),
        SubjectPublicKey::Rsa(components) => verify_rsa(components, hash, signature),
    }
}

/// ECDSA over P-256. The signature is the raw 64-byte concatenation of `r`
/// and `s`; the session hash is taken as the signed digest.
fn verify_ec(point: &EcPoint, hash: &SessionHash, signature: &[u8]) -> Result<(), Error> {
    if point.x.len() != 32 || point.y.len() != 32 {
        return Err(Error);
    }
    let encoded = p256::EncodedPoint::from_affine_coordinates(
        GenericArray::from_slice(&point.x),
        GenericArray::from_slice(&point.y),
        false,
    );
    let key = VerifyingKey::from_encoded_point(&encoded).map_err(|_| Error)?;
    let signature = Signature::from_slice(signature).map_err(|_| Error)?;
    key.verify_prehash(hash.as_bytes(), &signature)
        .map_err(|_| Error)
}

/// RSA PKCS#1 v1.5: the recovered block must equal `DigestInfo ‖ hash`
/// byte for byte; no hashing happens here.
fn verify_rsa(
    components: &RsaComponents,
    hash: &SessionHash,
    signature: &[u8],
) -> Result<(), Error> {
    let key = RsaPublicKey::new(components.modulus.clone(), components.exponent.clone())
        .map_err(|_| Error)?;
    let mut expected = Vec::with_capacity(SHA256_DIGEST_INFO.len() + hash.as_bytes().len());
    expected.extend_from_slice(&SHA256_DIGEST_INFO);
    expected.extend_from_slice(hash.as_bytes());
    key.verify(Pkcs1v15Sign::new_unprefixed(), &expected, signature)
        .map_err(|_| Error)
}
